//! Isolated sign recognition over a video clip.
//!
//! A [`SignRecognizer`] reads a clip twice. The first pass samples hand and
//! body activity to estimate how many signs the clip holds and picks the
//! recognition thresholds from that estimate. The second pass classifies a
//! sliding window of landmark features and confirms a word once enough
//! confident votes agree. [`SignRecognitionService`] wraps the recognizer for
//! async callers and turns the words into a sentence.

mod activity;
mod config;
mod constants;
mod engine;
mod error;
mod params;
mod recognizer;
mod service;

pub use activity::{frame_activity_score, ActivityEstimate, ActivityEstimator, ActivitySegment};
pub use config::{ActivityConfig, AdaptiveBounds, ConfigError, RecognizerConfig};
pub use constants::*;
pub use engine::{Capabilities, RecognitionReport, SignRecognizer};
pub use error::{Capability, RecognitionError, Result};
pub use params::{AdaptiveParameters, ParameterAdapter, Regime};
pub use recognizer::{
    ConfirmedWord, FeatureBuffer, FrameState, RecognitionPass, RecognitionStats, VoteTally,
    WindowSettings, WindowedRecognizer,
};
pub use service::{RecognitionOutcome, RecognitionStatus, SignRecognitionService};
