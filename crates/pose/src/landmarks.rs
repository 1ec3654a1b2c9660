use serde::{Deserialize, Serialize};

/// Keypoints reported per hand.
pub const HAND_KEYPOINTS: usize = 21;

/// Keypoints reported for the body pose.
pub const POSE_KEYPOINTS: usize = 33;

/// A single normalized keypoint.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    /// Detector visibility estimate in [0, 1]; 0 when not reported.
    #[serde(default)]
    pub visibility: f32,
}

impl Landmark {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self {
            x,
            y,
            z,
            visibility: 0.0,
        }
    }

    pub fn with_visibility(mut self, visibility: f32) -> Self {
        self.visibility = visibility;
        self
    }
}

/// Landmarks detected on one frame. A part is `None` when it was not found.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HolisticLandmarks {
    pub left_hand: Option<Vec<Landmark>>,
    pub right_hand: Option<Vec<Landmark>>,
    pub pose: Option<Vec<Landmark>>,
}

impl HolisticLandmarks {
    pub fn has_hand(&self) -> bool {
        self.left_hand.is_some() || self.right_hand.is_some()
    }

    pub fn has_pose(&self) -> bool {
        self.pose.is_some()
    }

    /// True when nothing at all was detected.
    pub fn is_empty(&self) -> bool {
        !self.has_hand() && !self.has_pose()
    }

    /// Hands that were detected, left first.
    pub fn hands(&self) -> impl Iterator<Item = &[Landmark]> {
        self.left_hand
            .as_deref()
            .into_iter()
            .chain(self.right_hand.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty() {
        let landmarks = HolisticLandmarks::default();
        assert!(landmarks.is_empty());
        assert_eq!(landmarks.hands().count(), 0);
    }

    #[test]
    fn test_hands_order() {
        let landmarks = HolisticLandmarks {
            left_hand: Some(vec![Landmark::new(0.1, 0.0, 0.0)]),
            right_hand: Some(vec![Landmark::new(0.9, 0.0, 0.0)]),
            pose: None,
        };
        let xs: Vec<f32> = landmarks.hands().map(|hand| hand[0].x).collect();
        assert_eq!(xs, vec![0.1, 0.9]);
        assert!(landmarks.has_hand());
        assert!(!landmarks.has_pose());
    }

    #[test]
    fn test_deserialize_partial() {
        let json = r#"{"right_hand": [{"x": 0.2, "y": 0.3, "z": 0.0, "visibility": 0.9}]}"#;
        let landmarks: HolisticLandmarks = serde_json::from_str(json).unwrap();
        assert!(landmarks.left_hand.is_none());
        assert_eq!(landmarks.right_hand.unwrap()[0].visibility, 0.9);
    }
}
