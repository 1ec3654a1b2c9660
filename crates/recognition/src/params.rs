//! Recognition parameters chosen from the estimated sign count.

use serde::Serialize;

use crate::config::{AdaptiveBounds, ConfigError};

/// Parameter profile selected by estimated sign density.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Regime {
    /// One deliberate, held sign: slow and lenient confirmation.
    SingleSign,
    /// Two or three signs.
    Balanced,
    /// Four or more signs: fast and strict confirmation.
    MultiSign,
}

impl Regime {
    pub fn for_word_count(estimated_word_count: usize) -> Self {
        match estimated_word_count {
            0 | 1 => Self::SingleSign,
            2 | 3 => Self::Balanced,
            _ => Self::MultiSign,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SingleSign => "single-sign",
            Self::Balanced => "balanced",
            Self::MultiSign => "multi-sign",
        }
    }
}

impl std::fmt::Display for Regime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Thresholds used by the windowed recognizer for one clip.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AdaptiveParameters {
    stability_threshold: usize,
    pause_detection_frames: u64,
    confidence_threshold: f32,
}

impl AdaptiveParameters {
    pub fn new(
        stability_threshold: usize,
        pause_detection_frames: u64,
        confidence_threshold: f32,
    ) -> Result<Self, ConfigError> {
        if stability_threshold == 0 {
            return Err(ConfigError::Invalid(
                "stability_threshold must be at least 1".to_string(),
            ));
        }
        if pause_detection_frames == 0 {
            return Err(ConfigError::Invalid(
                "pause_detection_frames must be at least 1".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&confidence_threshold) {
            return Err(ConfigError::Invalid(format!(
                "confidence_threshold must be within [0, 1], got {confidence_threshold}"
            )));
        }
        Ok(Self {
            stability_threshold,
            pause_detection_frames,
            confidence_threshold,
        })
    }

    /// Votes one class needs before its word is confirmed.
    pub fn stability_threshold(&self) -> usize {
        self.stability_threshold
    }

    /// Frames without landmarks that count as a pause, and the minimum frame
    /// gap between two confirmations.
    pub fn pause_detection_frames(&self) -> u64 {
        self.pause_detection_frames
    }

    /// Minimum prediction confidence for a vote.
    pub fn confidence_threshold(&self) -> f32 {
        self.confidence_threshold
    }
}

/// Maps an estimated sign count to [`AdaptiveParameters`].
#[derive(Debug, Clone)]
pub struct ParameterAdapter {
    bounds: AdaptiveBounds,
}

impl ParameterAdapter {
    pub fn new(bounds: AdaptiveBounds) -> Result<Self, ConfigError> {
        bounds.validate()?;
        Ok(Self { bounds })
    }

    pub fn bounds(&self) -> &AdaptiveBounds {
        &self.bounds
    }

    /// Select parameters for a clip. `duration_secs` is only logged.
    pub fn adapt(&self, estimated_word_count: usize, duration_secs: f64) -> AdaptiveParameters {
        let b = &self.bounds;
        let regime = Regime::for_word_count(estimated_word_count);
        let params = match regime {
            Regime::SingleSign => AdaptiveParameters {
                stability_threshold: b.max_stability_threshold,
                pause_detection_frames: b.max_pause_frames,
                confidence_threshold: b.low_confidence_threshold,
            },
            Regime::MultiSign => AdaptiveParameters {
                stability_threshold: b.min_stability_threshold,
                pause_detection_frames: b.min_pause_frames,
                confidence_threshold: b.high_confidence_threshold,
            },
            Regime::Balanced => AdaptiveParameters {
                stability_threshold: (b.min_stability_threshold + b.max_stability_threshold) / 2,
                pause_detection_frames: (b.min_pause_frames + b.max_pause_frames) / 2,
                confidence_threshold: (b.low_confidence_threshold + b.high_confidence_threshold)
                    / 2.0,
            },
        };

        tracing::info!(
            regime = %regime,
            estimated_word_count,
            duration_secs,
            stability_threshold = params.stability_threshold,
            pause_detection_frames = params.pause_detection_frames,
            confidence_threshold = params.confidence_threshold,
            "Selected recognition parameters"
        );
        params
    }
}

impl Default for ParameterAdapter {
    fn default() -> Self {
        Self {
            bounds: AdaptiveBounds::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_regimes() {
        assert_eq!(Regime::for_word_count(0), Regime::SingleSign);
        assert_eq!(Regime::for_word_count(1), Regime::SingleSign);
        assert_eq!(Regime::for_word_count(2), Regime::Balanced);
        assert_eq!(Regime::for_word_count(3), Regime::Balanced);
        assert_eq!(Regime::for_word_count(4), Regime::MultiSign);
        assert_eq!(Regime::for_word_count(6), Regime::MultiSign);
    }

    #[test]
    fn test_single_sign_parameters() {
        let params = ParameterAdapter::default().adapt(1, 3.0);
        assert_eq!(params.stability_threshold(), 8);
        assert_eq!(params.pause_detection_frames(), 20);
        assert_eq!(params.confidence_threshold(), 0.55);
    }

    #[test]
    fn test_multi_sign_parameters() {
        let params = ParameterAdapter::default().adapt(5, 12.0);
        assert_eq!(params.stability_threshold(), 3);
        assert_eq!(params.pause_detection_frames(), 5);
        assert_eq!(params.confidence_threshold(), 0.8);
    }

    #[test]
    fn test_balanced_is_midpoint() {
        let params = ParameterAdapter::default().adapt(2, 6.0);
        assert_eq!(params.stability_threshold(), 5);
        assert_eq!(params.pause_detection_frames(), 12);
        assert!((params.confidence_threshold() - 0.675).abs() < 1e-6);
        assert_eq!(params, ParameterAdapter::default().adapt(3, 1.0));
    }

    #[test]
    fn test_monotonic_in_word_count() {
        let adapter = ParameterAdapter::default();
        let all: Vec<_> = (0..=10).map(|n| adapter.adapt(n, 5.0)).collect();
        for pair in all.windows(2) {
            assert!(pair[1].stability_threshold() <= pair[0].stability_threshold());
            assert!(pair[1].pause_detection_frames() <= pair[0].pause_detection_frames());
        }
    }

    #[test]
    fn test_deterministic() {
        let adapter = ParameterAdapter::default();
        for n in 0..8 {
            assert_eq!(adapter.adapt(n, 4.0), adapter.adapt(n, 4.0));
        }
    }

    #[test]
    fn test_new_rejects_invalid_values() {
        assert!(AdaptiveParameters::new(0, 5, 0.5).is_err());
        assert!(AdaptiveParameters::new(3, 0, 0.5).is_err());
        assert!(AdaptiveParameters::new(3, 5, -0.1).is_err());
        assert!(AdaptiveParameters::new(3, 5, 1.1).is_err());
        assert!(AdaptiveParameters::new(3, 5, 0.9).is_ok());
    }

    #[test]
    fn test_adapter_rejects_invalid_bounds() {
        let bounds = AdaptiveBounds {
            min_pause_frames: 0,
            ..Default::default()
        };
        assert!(ParameterAdapter::new(bounds).is_err());
    }
}
