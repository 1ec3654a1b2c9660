use std::path::Path;

use serde::Deserialize;
use signscribe_video::VideoFrame;

use crate::{DetectionProfile, HolisticLandmarks, PoseError, PoseExtractor, Result};

/// Serves landmarks that were detected ahead of time.
///
/// Entry `i` holds the landmarks for frame `i + 1`; frames past the end of
/// the recording have no landmarks. Both detection profiles see the same
/// data.
#[derive(Debug, Clone, Default)]
pub struct RecordedLandmarks {
    frames: Vec<HolisticLandmarks>,
}

#[derive(Deserialize)]
struct Recording {
    frames: Vec<Option<HolisticLandmarks>>,
}

impl RecordedLandmarks {
    pub fn from_frames(frames: Vec<HolisticLandmarks>) -> Self {
        Self { frames }
    }

    /// Parse a recording of the form `{"frames": [{...}, null, ...]}`.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let recording: Recording =
            serde_json::from_str(json).map_err(|e| PoseError::InvalidRecording(e.to_string()))?;
        Ok(Self::from_frames(
            recording
                .frames
                .into_iter()
                .map(Option::unwrap_or_default)
                .collect(),
        ))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let recorded = Self::from_json_str(&json)?;
        tracing::info!(
            path = %path.display(),
            frames = recorded.len(),
            "Loaded landmark recording"
        );
        Ok(recorded)
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

impl PoseExtractor for RecordedLandmarks {
    fn name(&self) -> &str {
        "recorded-landmarks"
    }

    fn detect(&self, frame: &VideoFrame, _profile: DetectionProfile) -> Result<HolisticLandmarks> {
        let landmarks = frame
            .index
            .checked_sub(1)
            .and_then(|i| self.frames.get(i as usize))
            .cloned()
            .unwrap_or_default();
        Ok(landmarks)
    }
}
