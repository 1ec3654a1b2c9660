use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use signscribe_sentence::SentenceAssembler;
use signscribe_video::FrameSource;
use tracing::Instrument;
use uuid::Uuid;

use crate::activity::ActivityEstimate;
use crate::engine::{RecognitionReport, SignRecognizer};
use crate::error::{RecognitionError, Result};
use crate::params::{AdaptiveParameters, Regime};
use crate::recognizer::{ConfirmedWord, RecognitionStats};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecognitionStatus {
    Recognized,
    NoSignDetected,
}

impl RecognitionStatus {
    pub fn user_message(&self) -> &'static str {
        match self {
            RecognitionStatus::Recognized => "Signs recognized.",
            RecognitionStatus::NoSignDetected => {
                "No sign was recognized. Make sure your hands are visible and try again."
            }
        }
    }
}

/// Result of one request, ready to hand to a client.
#[derive(Debug, Clone, Serialize)]
pub struct RecognitionOutcome {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub status: RecognitionStatus,
    pub words: Vec<String>,
    pub sentence: String,
    pub word_count: usize,
    pub confirmations: Vec<ConfirmedWord>,
    pub estimated_word_count: usize,
    pub regime: Regime,
    pub parameters: AdaptiveParameters,
    pub stats: RecognitionStats,
}

impl RecognitionOutcome {
    fn from_report(id: Uuid, report: RecognitionReport, sentence: String) -> Self {
        let words = report.words();
        let status = report.status();
        let ActivityEstimate {
            estimated_word_count,
            ..
        } = report.estimate;
        Self {
            id,
            created_at: Utc::now(),
            status,
            word_count: words.len(),
            words,
            sentence,
            confirmations: report.confirmations,
            estimated_word_count,
            regime: report.regime,
            parameters: report.parameters,
            stats: report.stats,
        }
    }
}

/// Runs recognition off the async runtime and assembles the sentence.
///
/// Requests share no mutable state; each one gets its own pass state and
/// its own source.
#[derive(Debug, Clone)]
pub struct SignRecognitionService {
    recognizer: Arc<SignRecognizer>,
    assembler: SentenceAssembler,
}

impl SignRecognitionService {
    pub fn new(recognizer: SignRecognizer, assembler: SentenceAssembler) -> Self {
        Self {
            recognizer: Arc::new(recognizer),
            assembler,
        }
    }

    pub fn recognizer(&self) -> &SignRecognizer {
        &self.recognizer
    }

    pub async fn process<S>(&self, source: S) -> Result<RecognitionOutcome>
    where
        S: FrameSource + 'static,
    {
        let request_id = Uuid::new_v4();
        let span = tracing::info_span!("recognition", %request_id);

        async move {
            let recognizer = Arc::clone(&self.recognizer);
            let worker_span = tracing::Span::current();
            let mut source = source;

            let report = tokio::task::spawn_blocking(move || {
                let _entered = worker_span.enter();
                recognizer.recognize(&mut source)
            })
            .await
            .map_err(|e| {
                tracing::error!("Recognition worker panicked: {}", e);
                RecognitionError::WorkerFailed(e.to_string())
            })??;

            let words = report.words();
            let sentence = self.assembler.assemble(&words).await;
            tracing::info!(words = ?words, sentence = %sentence, "Request complete");

            Ok(RecognitionOutcome::from_report(request_id, report, sentence))
        }
        .instrument(span)
        .await
    }
}
