//! Tunable recognition settings.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::*;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid setting: {0}")]
    Invalid(String),
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(String),
}

fn invalid(msg: impl Into<String>) -> ConfigError {
    ConfigError::Invalid(msg.into())
}

fn check_unit(name: &str, value: f32) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(invalid(format!("{name} must be within [0, 1], got {value}")))
    }
}

/// Settings for the coarse activity scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActivityConfig {
    pub sampling_rate: u64,
    pub segment_duration_secs: f64,
    pub activity_floor: f32,
    pub min_word_count: usize,
    pub max_word_count: usize,
}

impl Default for ActivityConfig {
    fn default() -> Self {
        Self {
            sampling_rate: ACTIVITY_SAMPLING_RATE,
            segment_duration_secs: SEGMENT_DURATION_SECS,
            activity_floor: ACTIVITY_FLOOR,
            min_word_count: MIN_WORD_COUNT,
            max_word_count: MAX_WORD_COUNT,
        }
    }
}

impl ActivityConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sampling_rate == 0 {
            return Err(invalid("activity.sampling_rate must be at least 1"));
        }
        if !(self.segment_duration_secs.is_finite() && self.segment_duration_secs > 0.0) {
            return Err(invalid("activity.segment_duration_secs must be positive"));
        }
        check_unit("activity.activity_floor", self.activity_floor)?;
        if self.min_word_count == 0 || self.min_word_count > self.max_word_count {
            return Err(invalid(format!(
                "activity word count range [{}, {}] is invalid",
                self.min_word_count, self.max_word_count
            )));
        }
        Ok(())
    }
}

/// Extremes the adaptive parameters are chosen between.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdaptiveBounds {
    pub min_stability_threshold: usize,
    pub max_stability_threshold: usize,
    pub min_pause_frames: u64,
    pub max_pause_frames: u64,
    /// Confidence required when many signs are expected.
    pub high_confidence_threshold: f32,
    /// Confidence required for a single held sign.
    pub low_confidence_threshold: f32,
}

impl Default for AdaptiveBounds {
    fn default() -> Self {
        Self {
            min_stability_threshold: 3,
            max_stability_threshold: 8,
            min_pause_frames: 5,
            max_pause_frames: 20,
            high_confidence_threshold: 0.8,
            low_confidence_threshold: 0.55,
        }
    }
}

impl AdaptiveBounds {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_stability_threshold == 0
            || self.min_stability_threshold > self.max_stability_threshold
        {
            return Err(invalid(format!(
                "stability threshold range [{}, {}] is invalid",
                self.min_stability_threshold, self.max_stability_threshold
            )));
        }
        if self.min_pause_frames == 0 || self.min_pause_frames > self.max_pause_frames {
            return Err(invalid(format!(
                "pause frame range [{}, {}] is invalid",
                self.min_pause_frames, self.max_pause_frames
            )));
        }
        check_unit("high_confidence_threshold", self.high_confidence_threshold)?;
        check_unit("low_confidence_threshold", self.low_confidence_threshold)?;
        if self.low_confidence_threshold > self.high_confidence_threshold {
            return Err(invalid(
                "low_confidence_threshold must not exceed high_confidence_threshold",
            ));
        }
        Ok(())
    }
}

/// Full configuration for one recognizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecognizerConfig {
    pub frame_skip: u64,
    pub min_frames: usize,
    pub prediction_window: usize,
    pub pause_buffer_keep: usize,
    pub activity: ActivityConfig,
    pub adaptive: AdaptiveBounds,
}

impl Default for RecognizerConfig {
    fn default() -> Self {
        Self {
            frame_skip: FRAME_SKIP,
            min_frames: MIN_FRAMES,
            prediction_window: PREDICTION_WINDOW,
            pause_buffer_keep: PAUSE_BUFFER_KEEP,
            activity: ActivityConfig::default(),
            adaptive: AdaptiveBounds::default(),
        }
    }
}

impl RecognizerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.frame_skip == 0 {
            return Err(invalid("frame_skip must be at least 1"));
        }
        if self.min_frames == 0 {
            return Err(invalid("min_frames must be at least 1"));
        }
        if self.prediction_window < self.min_frames {
            return Err(invalid(format!(
                "prediction_window ({}) must be at least min_frames ({})",
                self.prediction_window, self.min_frames
            )));
        }
        self.activity.validate()?;
        self.adaptive.validate()
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&json)
    }
}
