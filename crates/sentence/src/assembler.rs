use std::sync::Arc;
use std::time::Duration;

use crate::{SentenceError, SentenceGenerator};

/// Returned in place of a sentence when no words were recognized.
pub const NOT_RECOGNIZED: &str = "(no sign recognized)";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Words joined by single spaces, in order.
pub fn fallback_sentence(words: &[String]) -> String {
    words.join(" ")
}

/// Builds the final sentence for a recognized word sequence.
#[derive(Clone)]
pub struct SentenceAssembler {
    generator: Option<Arc<dyn SentenceGenerator>>,
    timeout: Duration,
}

impl SentenceAssembler {
    pub fn new(generator: Arc<dyn SentenceGenerator>) -> Self {
        Self {
            generator: Some(generator),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// An assembler without a generator; multi-word input always uses the
    /// fallback.
    pub fn offline() -> Self {
        Self {
            generator: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub async fn assemble(&self, words: &[String]) -> String {
        match words {
            [] => NOT_RECOGNIZED.to_string(),
            [word] => word.clone(),
            _ => {
                let Some(generator) = &self.generator else {
                    return fallback_sentence(words);
                };
                match self.generate(generator.as_ref(), words).await {
                    Ok(sentence) => sentence,
                    Err(e) => {
                        tracing::warn!(
                            generator = generator.name(),
                            "Sentence generation failed, joining words: {}",
                            e
                        );
                        fallback_sentence(words)
                    }
                }
            }
        }
    }

    async fn generate(
        &self,
        generator: &dyn SentenceGenerator,
        words: &[String],
    ) -> Result<String, SentenceError> {
        let sentence = tokio::time::timeout(self.timeout, generator.generate(words))
            .await
            .map_err(|_| SentenceError::Timeout(self.timeout))??;
        let sentence = sentence.trim();
        if sentence.is_empty() {
            return Err(SentenceError::EmptyResponse);
        }
        Ok(sentence.to_string())
    }
}

impl std::fmt::Debug for SentenceAssembler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SentenceAssembler")
            .field("generator", &self.generator.as_ref().map(|g| g.name().to_string()))
            .field("timeout", &self.timeout)
            .finish()
    }
}
