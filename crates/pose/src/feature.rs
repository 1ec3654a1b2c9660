use crate::landmarks::{HolisticLandmarks, Landmark, HAND_KEYPOINTS, POSE_KEYPOINTS};
use crate::{PoseError, Result};

const COORDS: usize = 3;

/// Length of every feature vector: two hands plus body, x/y/z per keypoint.
pub const FEATURE_DIM: usize = (HAND_KEYPOINTS * 2 + POSE_KEYPOINTS) * COORDS;

/// Flattened landmarks for one frame.
///
/// Layout is left hand, right hand, pose. Missing parts are zero-filled so
/// the length is always [`FEATURE_DIM`].
#[derive(Debug, Clone, PartialEq)]
pub struct FrameFeature(Vec<f32>);

impl FrameFeature {
    pub fn from_landmarks(landmarks: &HolisticLandmarks) -> Self {
        let mut values = Vec::with_capacity(FEATURE_DIM);
        push_part(&mut values, landmarks.left_hand.as_deref(), HAND_KEYPOINTS);
        push_part(&mut values, landmarks.right_hand.as_deref(), HAND_KEYPOINTS);
        push_part(&mut values, landmarks.pose.as_deref(), POSE_KEYPOINTS);
        debug_assert_eq!(values.len(), FEATURE_DIM);
        Self(values)
    }

    pub fn from_vec(values: Vec<f32>) -> Result<Self> {
        if values.len() != FEATURE_DIM {
            return Err(PoseError::InvalidFeature {
                expected: FEATURE_DIM,
                actual: values.len(),
            });
        }
        Ok(Self(values))
    }

    /// Every coordinate set to `value`.
    pub fn filled(value: f32) -> Self {
        Self(vec![value; FEATURE_DIM])
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Append `keypoints` coordinates for one part. Extra keypoints are ignored
/// and missing ones are zero-filled.
fn push_part(values: &mut Vec<f32>, part: Option<&[Landmark]>, keypoints: usize) {
    let start = values.len();
    if let Some(part) = part {
        for lm in part.iter().take(keypoints) {
            values.extend_from_slice(&[lm.x, lm.y, lm.z]);
        }
    }
    values.resize(start + keypoints * COORDS, 0.0);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimension() {
        assert_eq!(FEATURE_DIM, 225);
        let feature = FrameFeature::from_landmarks(&HolisticLandmarks::default());
        assert_eq!(feature.len(), FEATURE_DIM);
        assert!(feature.as_slice().iter().all(|v| *v == 0.0));
    }

    #[test]
    fn test_layout() {
        let landmarks = HolisticLandmarks {
            left_hand: None,
            right_hand: Some(vec![Landmark::new(1.0, 2.0, 3.0); HAND_KEYPOINTS]),
            pose: None,
        };
        let feature = FrameFeature::from_landmarks(&landmarks);
        let right = HAND_KEYPOINTS * COORDS;
        assert_eq!(feature.as_slice()[right - 1], 0.0);
        assert_eq!(&feature.as_slice()[right..right + 3], &[1.0, 2.0, 3.0]);
        assert_eq!(feature.as_slice()[right * 2], 0.0);
    }

    #[test]
    fn test_short_part_is_padded() {
        let landmarks = HolisticLandmarks {
            left_hand: Some(vec![Landmark::new(1.0, 1.0, 1.0); 5]),
            ..Default::default()
        };
        let feature = FrameFeature::from_landmarks(&landmarks);
        assert_eq!(feature.len(), FEATURE_DIM);
        assert_eq!(feature.as_slice()[14], 1.0);
        assert_eq!(feature.as_slice()[15], 0.0);
    }

    #[test]
    fn test_from_vec_rejects_wrong_length() {
        assert!(FrameFeature::from_vec(vec![0.0; FEATURE_DIM]).is_ok());
        assert!(matches!(
            FrameFeature::from_vec(vec![0.0; 42]),
            Err(PoseError::InvalidFeature { actual: 42, .. })
        ));
    }
}
