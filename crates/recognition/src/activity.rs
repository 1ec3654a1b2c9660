//! Coarse activity scan used to estimate how many signs a clip contains.

use serde::Serialize;
use signscribe_pose::{DetectionProfile, HolisticLandmarks, PoseExtractor, HAND_KEYPOINTS};
use signscribe_video::FrameSource;

use crate::config::{ActivityConfig, ConfigError};
use crate::constants::{HAND_PRESENCE_WEIGHT, HAND_VISIBILITY_WEIGHT, POSE_PRESENCE_WEIGHT};

/// Mean activity over one fixed-duration bucket of the clip.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ActivitySegment {
    start_frame: u64,
    end_frame: u64,
    activity_score: f32,
    timestamp_secs: f64,
}

impl ActivitySegment {
    /// Raw frame count before the bucket's first frame.
    pub fn start_frame(&self) -> u64 {
        self.start_frame
    }

    /// Last raw frame of the bucket (inclusive, 1-based).
    pub fn end_frame(&self) -> u64 {
        self.end_frame
    }

    pub fn activity_score(&self) -> f32 {
        self.activity_score
    }

    /// Seconds from clip start at which the bucket begins.
    pub fn timestamp_secs(&self) -> f64 {
        self.timestamp_secs
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivityEstimate {
    pub estimated_word_count: usize,
    pub segments: Vec<ActivitySegment>,
}

/// Activity score for one frame, in [0, 1].
///
/// Hands present add [`HAND_PRESENCE_WEIGHT`], a body adds
/// [`POSE_PRESENCE_WEIGHT`], and each visible hand adds up to
/// [`HAND_VISIBILITY_WEIGHT`] in proportion to its mean keypoint visibility.
pub fn frame_activity_score(landmarks: &HolisticLandmarks) -> f32 {
    let mut score = 0.0;
    if landmarks.has_hand() {
        score += HAND_PRESENCE_WEIGHT;
    }
    if landmarks.has_pose() {
        score += POSE_PRESENCE_WEIGHT;
    }
    for hand in landmarks.hands() {
        let visibility: f32 = hand.iter().map(|lm| lm.visibility.max(0.0)).sum();
        score += (visibility / HAND_KEYPOINTS as f32 * HAND_VISIBILITY_WEIGHT)
            .min(HAND_VISIBILITY_WEIGHT);
    }
    score.min(1.0)
}

/// Accumulates sampled scores for the bucket currently being scanned.
#[derive(Default)]
struct Bucket {
    start_frame: u64,
    frames: u64,
    score_sum: f32,
    scored: u32,
}

impl Bucket {
    fn close(&mut self, end_frame: u64, fps: f64) -> ActivitySegment {
        let activity_score = if self.scored > 0 {
            (self.score_sum / self.scored as f32).clamp(0.0, 1.0)
        } else {
            0.0
        };
        let segment = ActivitySegment {
            start_frame: self.start_frame,
            end_frame,
            activity_score,
            timestamp_secs: self.start_frame as f64 / fps,
        };
        *self = Bucket {
            start_frame: end_frame,
            ..Default::default()
        };
        segment
    }
}

#[derive(Debug, Clone, Default)]
pub struct ActivityEstimator {
    config: ActivityConfig,
}

impl ActivityEstimator {
    pub fn new(config: ActivityConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Scan the whole source once and estimate the sign count.
    ///
    /// The source is read from its current position to the end; the caller
    /// is responsible for rewinding it afterwards.
    pub fn estimate(
        &self,
        extractor: &dyn PoseExtractor,
        source: &mut dyn FrameSource,
    ) -> ActivityEstimate {
        let fps = source.info().effective_fps();
        let sampling_rate = self.config.sampling_rate.max(1);
        let bucket_frames = ((self.config.segment_duration_secs * fps).round() as u64).max(1);

        extractor.begin_pass(DetectionProfile::Coarse);

        let mut segments = Vec::new();
        let mut bucket = Bucket::default();
        let mut frame_count = 0u64;

        loop {
            let frame = match source.next_frame() {
                Ok(Some(frame)) => frame,
                Ok(None) => break,
                Err(e) => {
                    tracing::warn!(frame = frame_count + 1, "Activity scan stopped early: {}", e);
                    break;
                }
            };
            frame_count += 1;
            bucket.frames += 1;

            if frame_count % sampling_rate != 0 {
                continue;
            }

            let score = match extractor.detect(&frame, DetectionProfile::Coarse) {
                Ok(landmarks) => frame_activity_score(&landmarks),
                Err(e) => {
                    tracing::warn!(frame = frame_count, "Activity detection failed: {}", e);
                    0.0
                }
            };
            bucket.score_sum += score;
            bucket.scored += 1;

            if bucket.frames >= bucket_frames {
                segments.push(bucket.close(frame_count, fps));
            }
        }

        if bucket.frames > 0 {
            segments.push(bucket.close(frame_count, fps));
        }

        let active = segments
            .iter()
            .filter(|s| s.activity_score > self.config.activity_floor)
            .count();
        let estimated_word_count =
            active.clamp(self.config.min_word_count, self.config.max_word_count);

        tracing::info!(
            frames = frame_count,
            segments = segments.len(),
            active_segments = active,
            estimated_word_count,
            "Activity scan complete"
        );

        ActivityEstimate {
            estimated_word_count,
            segments,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use signscribe_pose::{Landmark, RecordedLandmarks, POSE_KEYPOINTS};
    use signscribe_video::MaterializedClip;

    fn hand(visibility: f32) -> Vec<Landmark> {
        vec![Landmark::new(0.5, 0.5, 0.0).with_visibility(visibility); HAND_KEYPOINTS]
    }

    fn body() -> Vec<Landmark> {
        vec![Landmark::new(0.5, 0.5, 0.0); POSE_KEYPOINTS]
    }

    fn active() -> HolisticLandmarks {
        HolisticLandmarks {
            right_hand: Some(hand(1.0)),
            pose: Some(body()),
            ..Default::default()
        }
    }

    #[test]
    fn test_score_nothing_detected() {
        assert_eq!(frame_activity_score(&HolisticLandmarks::default()), 0.0);
    }

    #[test]
    fn test_score_pose_only() {
        let landmarks = HolisticLandmarks {
            pose: Some(body()),
            ..Default::default()
        };
        assert!((frame_activity_score(&landmarks) - 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_score_hand_visibility() {
        let landmarks = HolisticLandmarks {
            left_hand: Some(hand(0.5)),
            ..Default::default()
        };
        assert!((frame_activity_score(&landmarks) - 0.6).abs() < 1e-6);
    }

    #[test]
    fn test_score_is_capped() {
        let landmarks = HolisticLandmarks {
            left_hand: Some(hand(1.0)),
            right_hand: Some(hand(1.0)),
            pose: Some(body()),
        };
        assert_eq!(frame_activity_score(&landmarks), 1.0);
    }

    #[test]
    fn test_two_second_buckets() {
        // 30 fps, 6 seconds: three full buckets of 60 frames.
        let frames = (0..180)
            .map(|i| if i < 60 || i >= 120 { active() } else { HolisticLandmarks::default() })
            .collect();
        let extractor = RecordedLandmarks::from_frames(frames);
        let mut clip = MaterializedClip::placeholders(30.0, 180);

        let estimate = ActivityEstimator::default().estimate(&extractor, &mut clip);

        assert_eq!(estimate.segments.len(), 3);
        assert_eq!(estimate.segments[0].start_frame(), 0);
        assert_eq!(estimate.segments[0].end_frame(), 60);
        assert_eq!(estimate.segments[1].timestamp_secs(), 2.0);
        assert!((estimate.segments[0].activity_score() - 1.0).abs() < 1e-6);
        assert_eq!(estimate.segments[1].activity_score(), 0.0);
        assert_eq!(estimate.estimated_word_count, 2);
    }

    #[test]
    fn test_trailing_partial_bucket() {
        let extractor = RecordedLandmarks::from_frames(vec![active(); 75]);
        let mut clip = MaterializedClip::placeholders(30.0, 75);

        let estimate = ActivityEstimator::default().estimate(&extractor, &mut clip);

        assert_eq!(estimate.segments.len(), 2);
        assert_eq!(estimate.segments[1].start_frame(), 60);
        assert_eq!(estimate.segments[1].end_frame(), 75);
        assert!(estimate.segments[1].activity_score() > 0.3);
    }

    #[test]
    fn test_count_clamped_low() {
        let extractor = RecordedLandmarks::default();
        let mut clip = MaterializedClip::placeholders(30.0, 90);
        let estimate = ActivityEstimator::default().estimate(&extractor, &mut clip);
        assert_eq!(estimate.estimated_word_count, 1);

        let mut empty = MaterializedClip::placeholders(30.0, 0);
        let estimate = ActivityEstimator::default().estimate(&extractor, &mut empty);
        assert!(estimate.segments.is_empty());
        assert_eq!(estimate.estimated_word_count, 1);
    }

    #[test]
    fn test_count_clamped_high() {
        // 20 seconds of constant activity: ten active buckets.
        let extractor = RecordedLandmarks::from_frames(vec![active(); 600]);
        let mut clip = MaterializedClip::placeholders(30.0, 600);
        let estimate = ActivityEstimator::default().estimate(&extractor, &mut clip);
        assert_eq!(estimate.segments.len(), 10);
        assert_eq!(estimate.estimated_word_count, 6);
    }

    #[test]
    fn test_new_rejects_inverted_word_range() {
        let config = ActivityConfig {
            min_word_count: 5,
            max_word_count: 2,
            ..Default::default()
        };
        assert!(matches!(
            ActivityEstimator::new(config),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_new_accepts_custom_range() {
        let config = ActivityConfig {
            min_word_count: 2,
            max_word_count: 3,
            ..Default::default()
        };
        let estimator = ActivityEstimator::new(config).unwrap();
        let extractor = RecordedLandmarks::default();
        let mut clip = MaterializedClip::placeholders(30.0, 90);
        assert_eq!(estimator.estimate(&extractor, &mut clip).estimated_word_count, 2);
    }

    #[test]
    fn test_unknown_fps_uses_default() {
        let extractor = RecordedLandmarks::from_frames(vec![active(); 60]);
        let mut clip = MaterializedClip::placeholders(0.0, 60);
        let estimate = ActivityEstimator::default().estimate(&extractor, &mut clip);
        assert_eq!(estimate.segments.len(), 1);
        assert_eq!(estimate.segments[0].end_frame(), 60);
    }
}
