use serde::{Deserialize, Serialize};

use crate::{Result, VideoError};

/// Frame rate assumed when a container reports none.
pub const DEFAULT_FPS: f64 = 30.0;

/// A decoded RGB24 frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoFrame {
    /// 1-based position of the frame in its clip.
    pub index: u64,
    pub width: u32,
    pub height: u32,
    /// Row-major packed RGB pixels.
    pub pixels: Vec<u8>,
}

impl VideoFrame {
    pub fn new(index: u64, width: u32, height: u32, pixels: Vec<u8>) -> Result<Self> {
        let expected = width as usize * height as usize * 3;
        if pixels.len() != expected {
            return Err(VideoError::InvalidFrame {
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            index,
            width,
            height,
            pixels,
        })
    }

    /// A frame with no pixel data.
    ///
    /// Useful when the landmarks for a clip were recorded ahead of time and
    /// the extractor only needs the frame position.
    pub fn placeholder(index: u64) -> Self {
        Self {
            index,
            width: 0,
            height: 0,
            pixels: Vec::new(),
        }
    }

    /// Seconds from clip start at which this frame is shown.
    pub fn timestamp_secs(&self, fps: f64) -> f64 {
        if fps > 0.0 {
            self.index as f64 / fps
        } else {
            self.index as f64
        }
    }
}

/// Container-level information about a clip.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClipInfo {
    pub fps: f64,
    pub total_frames: u64,
}

impl ClipInfo {
    pub fn new(fps: f64, total_frames: u64) -> Self {
        Self { fps, total_frames }
    }

    /// Frame rate to use for time arithmetic.
    ///
    /// Falls back to [`DEFAULT_FPS`] when the container reported a
    /// non-positive or non-finite rate.
    pub fn effective_fps(&self) -> f64 {
        if self.fps.is_finite() && self.fps > 0.0 {
            self.fps
        } else {
            DEFAULT_FPS
        }
    }

    pub fn duration_secs(&self) -> f64 {
        if self.fps.is_finite() && self.fps > 0.0 {
            self.total_frames as f64 / self.fps
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_validates_pixel_length() {
        assert!(VideoFrame::new(1, 2, 2, vec![0; 12]).is_ok());

        let err = VideoFrame::new(1, 2, 2, vec![0; 10]).unwrap_err();
        assert!(matches!(
            err,
            VideoError::InvalidFrame {
                expected: 12,
                actual: 10
            }
        ));
    }

    #[test]
    fn test_duration_with_unknown_fps() {
        let info = ClipInfo::new(0.0, 120);
        assert_eq!(info.duration_secs(), 0.0);
        assert_eq!(info.effective_fps(), DEFAULT_FPS);
    }

    #[test]
    fn test_duration() {
        let info = ClipInfo::new(30.0, 90);
        assert!((info.duration_secs() - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_timestamp_secs() {
        let frame = VideoFrame::placeholder(45);
        assert!((frame.timestamp_secs(30.0) - 1.5).abs() < 1e-9);
    }
}
