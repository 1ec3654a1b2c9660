//! Pose landmarks and the per-frame feature vectors built from them.

mod feature;
mod landmarks;
mod replay;

pub use feature::{FrameFeature, FEATURE_DIM};
pub use landmarks::{HolisticLandmarks, Landmark, HAND_KEYPOINTS, POSE_KEYPOINTS};
pub use replay::RecordedLandmarks;

use signscribe_video::VideoFrame;

#[derive(Debug, thiserror::Error)]
pub enum PoseError {
    #[error("pose extractor not available: {0}")]
    NotAvailable(String),
    #[error("landmark detection failed on frame {index}: {reason}")]
    Detection { index: u64, reason: String },
    #[error("invalid feature vector: expected {expected} values, got {actual}")]
    InvalidFeature { expected: usize, actual: usize },
    #[error("invalid landmark recording: {0}")]
    InvalidRecording(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PoseError>;

/// Detector configuration used for each recognition pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DetectionProfile {
    /// Lightweight model for the activity scan.
    Coarse,
    /// Full model with temporal smoothing for recognition.
    Fine,
}

/// Concrete detector knobs for a [`DetectionProfile`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectionSettings {
    pub model_complexity: u8,
    pub smooth_landmarks: bool,
    pub min_detection_confidence: f32,
    pub min_tracking_confidence: f32,
}

impl DetectionProfile {
    pub fn settings(self) -> DetectionSettings {
        match self {
            Self::Coarse => DetectionSettings {
                model_complexity: 0,
                smooth_landmarks: false,
                min_detection_confidence: 0.3,
                min_tracking_confidence: 0.3,
            },
            Self::Fine => DetectionSettings {
                model_complexity: 1,
                smooth_landmarks: true,
                min_detection_confidence: 0.5,
                min_tracking_confidence: 0.5,
            },
        }
    }
}

/// Holistic (hands + body) landmark detector.
///
/// One extractor is shared by every request a service handles, and passes
/// from different requests may run at the same time on different threads.
/// Detectors that track across frames must therefore keep that state per
/// pass (for example keyed by thread, or in a pool of trackers checked out
/// in [`PoseExtractor::begin_pass`]) and never in a single field that a
/// concurrent pass could reset. Stateless detectors such as
/// [`RecordedLandmarks`] need nothing extra.
pub trait PoseExtractor: Send + Sync {
    fn name(&self) -> &str;

    /// Check that the underlying model is loaded and usable.
    fn ensure_ready(&self) -> Result<()> {
        Ok(())
    }

    /// Called on the pass's worker thread before its first frame. Every
    /// pass starts from the first frame of the clip, so tracking state for
    /// this pass should start fresh here without touching other passes.
    fn begin_pass(&self, _profile: DetectionProfile) {}

    fn detect(&self, frame: &VideoFrame, profile: DetectionProfile) -> Result<HolisticLandmarks>;

    /// Detect landmarks and flatten them into a feature vector.
    ///
    /// Returns `None` when neither hand nor body was found.
    fn extract_features(
        &self,
        frame: &VideoFrame,
        profile: DetectionProfile,
    ) -> Result<Option<FrameFeature>> {
        let landmarks = self.detect(frame, profile)?;
        if landmarks.is_empty() {
            return Ok(None);
        }
        Ok(Some(FrameFeature::from_landmarks(&landmarks)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct PoseOnly;

    impl PoseExtractor for PoseOnly {
        fn name(&self) -> &str {
            "pose-only"
        }

        fn detect(&self, frame: &VideoFrame, _profile: DetectionProfile) -> Result<HolisticLandmarks> {
            if frame.index % 2 == 0 {
                Ok(HolisticLandmarks {
                    pose: Some(vec![Landmark::new(0.5, 0.5, 0.0); POSE_KEYPOINTS]),
                    ..Default::default()
                })
            } else {
                Ok(HolisticLandmarks::default())
            }
        }
    }

    #[test]
    fn test_extract_features_none_without_landmarks() {
        let extractor = PoseOnly;
        let features = extractor
            .extract_features(&VideoFrame::placeholder(1), DetectionProfile::Fine)
            .unwrap();
        assert!(features.is_none());
    }

    #[test]
    fn test_extract_features_pose_only() {
        let extractor = PoseOnly;
        let feature = extractor
            .extract_features(&VideoFrame::placeholder(2), DetectionProfile::Fine)
            .unwrap()
            .unwrap();
        assert_eq!(feature.len(), FEATURE_DIM);
        // Hands are zero-filled, pose is populated
        assert!(feature.as_slice()[..HAND_KEYPOINTS * 6].iter().all(|v| *v == 0.0));
        assert_eq!(feature.as_slice()[HAND_KEYPOINTS * 6], 0.5);
    }

    #[test]
    fn test_profiles() {
        let coarse = DetectionProfile::Coarse.settings();
        let fine = DetectionProfile::Fine.settings();
        assert!(coarse.model_complexity < fine.model_complexity);
        assert!(!coarse.smooth_landmarks);
        assert!(fine.min_detection_confidence > coarse.min_detection_confidence);
    }
}
