//! Fine-grained windowed recognition pass.
//!
//! Each processed frame moves through the same steps: extract a feature,
//! buffer it, classify the newest window, vote, and possibly confirm a
//! word. Frames without landmarks count towards pause detection, which
//! discards pending votes once a gesture boundary has passed.

mod feature_buffer;
mod vote_tally;

pub use feature_buffer::FeatureBuffer;
pub use vote_tally::VoteTally;

use serde::Serialize;
use signscribe_classifier::{LabelMap, Prediction, SignClassifier};
use signscribe_pose::{DetectionProfile, FrameFeature, PoseExtractor};
use signscribe_video::FrameSource;

use crate::config::RecognizerConfig;
use crate::params::AdaptiveParameters;

/// Buffering and sampling settings that do not depend on the clip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowSettings {
    pub frame_skip: u64,
    pub min_frames: usize,
    pub prediction_window: usize,
    pub pause_buffer_keep: usize,
}

impl From<&RecognizerConfig> for WindowSettings {
    fn from(config: &RecognizerConfig) -> Self {
        Self {
            frame_skip: config.frame_skip,
            min_frames: config.min_frames,
            prediction_window: config.prediction_window,
            pause_buffer_keep: config.pause_buffer_keep,
        }
    }
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self::from(&RecognizerConfig::default())
    }
}

/// A word accepted by the recognizer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfirmedWord {
    pub label: String,
    pub class_index: usize,
    /// Raw frame (1-based) on which the word was confirmed.
    pub frame_index: u64,
    pub timestamp_secs: f64,
    /// Mean confidence of the votes that confirmed the word.
    pub mean_confidence: f32,
}

/// Counters for one recognition pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RecognitionStats {
    pub frames_read: u64,
    pub frames_processed: u64,
    pub frames_with_landmarks: u64,
    pub extraction_failures: u64,
    pub predictions: u64,
    pub classifier_failures: u64,
    pub votes: u64,
    pub pauses_detected: u64,
}

/// Where a processed frame ended up.
#[derive(Debug, Clone, PartialEq)]
pub enum FrameState {
    /// No landmarks on this frame.
    NoFeature { pause_detected: bool },
    /// Feature stored, not enough frames to classify yet.
    Buffering { buffered: usize },
    /// Classified, but no vote was cast (low confidence or classifier error).
    Predicting { prediction: Option<Prediction> },
    /// A vote was added for `class_index`.
    Voting { class_index: usize, votes: usize },
    /// A new word was appended.
    Confirmed { word: String },
}

/// Output of a finished pass.
#[derive(Debug, Clone, PartialEq)]
pub struct RecognitionPass {
    pub words: Vec<ConfirmedWord>,
    pub stats: RecognitionStats,
}

pub struct WindowedRecognizer<'a> {
    classifier: &'a dyn SignClassifier,
    labels: &'a LabelMap,
    params: AdaptiveParameters,
    settings: WindowSettings,
    fps: f64,
    buffer: FeatureBuffer,
    tally: VoteTally,
    last_word: Option<String>,
    /// Raw frame index of the last confirmation; 0 before the first one.
    last_confirmed_frame: u64,
    no_detection_count: u64,
    words: Vec<ConfirmedWord>,
    stats: RecognitionStats,
}

impl<'a> WindowedRecognizer<'a> {
    pub fn new(
        classifier: &'a dyn SignClassifier,
        labels: &'a LabelMap,
        params: AdaptiveParameters,
        settings: WindowSettings,
        fps: f64,
    ) -> Self {
        Self {
            classifier,
            labels,
            params,
            settings,
            fps,
            buffer: FeatureBuffer::new(settings.prediction_window),
            tally: VoteTally::new(),
            last_word: None,
            last_confirmed_frame: 0,
            no_detection_count: 0,
            words: Vec::new(),
            stats: RecognitionStats::default(),
        }
    }

    /// Read the source to the end, processing every `frame_skip`-th frame.
    pub fn run(
        mut self,
        extractor: &dyn PoseExtractor,
        source: &mut dyn FrameSource,
    ) -> RecognitionPass {
        let frame_skip = self.settings.frame_skip.max(1);
        extractor.begin_pass(DetectionProfile::Fine);

        loop {
            let frame = match source.next_frame() {
                Ok(Some(frame)) => frame,
                Ok(None) => break,
                Err(e) => {
                    tracing::warn!(
                        frame = self.stats.frames_read + 1,
                        "Recognition pass stopped early: {}",
                        e
                    );
                    break;
                }
            };
            self.stats.frames_read += 1;
            let frame_index = self.stats.frames_read;

            if frame_index % frame_skip != 0 {
                continue;
            }

            let feature = match extractor.extract_features(&frame, DetectionProfile::Fine) {
                Ok(feature) => feature,
                Err(e) => {
                    tracing::warn!(frame = frame_index, "Feature extraction failed: {}", e);
                    self.stats.extraction_failures += 1;
                    None
                }
            };
            self.observe(frame_index, feature);
        }

        self.finish()
    }

    /// Advance the state machine by one processed frame.
    pub fn observe(&mut self, frame_index: u64, feature: Option<FrameFeature>) -> FrameState {
        self.stats.frames_processed += 1;
        match feature {
            Some(feature) => self.on_feature(frame_index, feature),
            None => self.on_missing(),
        }
    }

    fn on_missing(&mut self) -> FrameState {
        self.no_detection_count += 1;
        if self.no_detection_count < self.params.pause_detection_frames() {
            return FrameState::NoFeature {
                pause_detected: false,
            };
        }

        if self.no_detection_count == self.params.pause_detection_frames() {
            self.stats.pauses_detected += 1;
            if !self.tally.is_empty() {
                tracing::debug!("Pause detected, discarding pending votes");
            }
        }
        self.tally.clear();
        self.buffer.retain_newest(self.settings.pause_buffer_keep);
        FrameState::NoFeature {
            pause_detected: true,
        }
    }

    fn on_feature(&mut self, frame_index: u64, feature: FrameFeature) -> FrameState {
        self.stats.frames_with_landmarks += 1;
        self.no_detection_count = 0;
        self.buffer.push(feature);

        if self.buffer.len() < self.settings.min_frames {
            return FrameState::Buffering {
                buffered: self.buffer.len(),
            };
        }

        let window = self.buffer.newest(self.settings.min_frames);
        let prediction = match self.classifier.classify(window) {
            Ok(prediction) => prediction,
            Err(e) => {
                tracing::warn!(frame = frame_index, "Prediction failed: {}", e);
                self.stats.classifier_failures += 1;
                return FrameState::Predicting { prediction: None };
            }
        };
        self.stats.predictions += 1;

        tracing::debug!(
            frame = frame_index,
            label = %self.labels.label_of(prediction.class_index),
            confidence = prediction.confidence,
            margin = prediction.margin,
            "Window prediction"
        );

        if prediction.confidence < self.params.confidence_threshold() {
            return FrameState::Predicting {
                prediction: Some(prediction),
            };
        }

        let votes = self
            .tally
            .add(prediction.class_index, prediction.confidence);
        self.stats.votes += 1;

        if votes >= self.params.stability_threshold() {
            if let Some(word) = self.try_confirm(frame_index, prediction.class_index) {
                return FrameState::Confirmed { word };
            }
        }

        FrameState::Voting {
            class_index: prediction.class_index,
            votes,
        }
    }

    /// Confirm `class_index` if it differs from the previous word and enough
    /// frames have passed since the previous confirmation.
    fn try_confirm(&mut self, frame_index: u64, class_index: usize) -> Option<String> {
        let label = self.labels.label_of(class_index);
        if self.last_word.as_deref() == Some(label.as_str()) {
            return None;
        }
        if frame_index.saturating_sub(self.last_confirmed_frame)
            <= self.params.pause_detection_frames()
        {
            return None;
        }

        let mean_confidence = self.tally.mean_confidence(class_index).unwrap_or_default();
        let timestamp_secs = if self.fps > 0.0 {
            frame_index as f64 / self.fps
        } else {
            frame_index as f64
        };

        tracing::info!(
            word = %label,
            frame = frame_index,
            timestamp_secs,
            mean_confidence,
            "Recognized sign"
        );

        self.words.push(ConfirmedWord {
            label: label.clone(),
            class_index,
            frame_index,
            timestamp_secs,
            mean_confidence,
        });
        self.last_word = Some(label.clone());
        self.last_confirmed_frame = frame_index;
        self.tally.clear();
        Some(label)
    }

    pub fn words(&self) -> &[ConfirmedWord] {
        &self.words
    }

    pub fn stats(&self) -> &RecognitionStats {
        &self.stats
    }

    pub fn finish(self) -> RecognitionPass {
        RecognitionPass {
            words: self.words,
            stats: self.stats,
        }
    }
}
