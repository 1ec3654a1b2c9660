//! Decoded video frames and resettable frame sources.
//!
//! Recognition reads every clip twice (a coarse activity scan, then the
//! windowed recognition pass), so sources must be able to rewind to the
//! first frame. Inputs that cannot seek are materialized up front.

mod frame;
mod source;

pub use frame::{ClipInfo, VideoFrame, DEFAULT_FPS};
pub use source::{materialize, FrameSource, MaterializedClip};

#[derive(Debug, thiserror::Error)]
pub enum VideoError {
    #[error("failed to decode frame {index}: {reason}")]
    Decode { index: u64, reason: String },
    #[error("failed to rewind source: {0}")]
    Reset(String),
    #[error("invalid frame: expected {expected} bytes, got {actual}")]
    InvalidFrame { expected: usize, actual: usize },
    #[error("invalid clip: {0}")]
    InvalidClip(String),
}

pub type Result<T> = std::result::Result<T, VideoError>;
