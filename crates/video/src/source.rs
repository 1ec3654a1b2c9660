use crate::{ClipInfo, Result, VideoError, VideoFrame};

/// Sequential reader over the frames of one clip.
///
/// Implementations must yield the identical frame sequence after every
/// [`FrameSource::reset`].
pub trait FrameSource: Send {
    fn info(&self) -> ClipInfo;

    /// Read the next frame, or `None` at end of clip.
    fn next_frame(&mut self) -> Result<Option<VideoFrame>>;

    /// Rewind to the first frame.
    fn reset(&mut self) -> Result<()>;
}

/// A clip held fully in memory.
#[derive(Debug, Clone)]
pub struct MaterializedClip {
    fps: f64,
    frames: Vec<VideoFrame>,
    cursor: usize,
}

impl MaterializedClip {
    /// Build a clip from decoded frames. Frames are re-indexed from 1 in the
    /// order given.
    pub fn new(fps: f64, frames: Vec<VideoFrame>) -> Self {
        let frames = frames
            .into_iter()
            .enumerate()
            .map(|(i, mut frame)| {
                frame.index = i as u64 + 1;
                frame
            })
            .collect();
        Self {
            fps,
            frames,
            cursor: 0,
        }
    }

    /// A clip of `count` placeholder frames.
    pub fn placeholders(fps: f64, count: u64) -> Self {
        Self::new(fps, (1..=count).map(VideoFrame::placeholder).collect())
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

impl FrameSource for MaterializedClip {
    fn info(&self) -> ClipInfo {
        ClipInfo::new(self.fps, self.frames.len() as u64)
    }

    fn next_frame(&mut self) -> Result<Option<VideoFrame>> {
        let frame = self.frames.get(self.cursor).cloned();
        if frame.is_some() {
            self.cursor += 1;
        }
        Ok(frame)
    }

    fn reset(&mut self) -> Result<()> {
        self.cursor = 0;
        Ok(())
    }
}

/// Drain a non-seekable frame stream into a resettable clip.
///
/// Fails on the first decode error so that both recognition passes observe
/// exactly the same frames.
pub fn materialize<I>(fps: f64, frames: I) -> Result<MaterializedClip>
where
    I: IntoIterator<Item = Result<VideoFrame>>,
{
    let frames = frames.into_iter().collect::<Result<Vec<_>>>()?;
    if !fps.is_finite() {
        return Err(VideoError::InvalidClip(format!("non-finite frame rate {fps}")));
    }
    tracing::debug!(frames = frames.len(), fps, "Materialized clip");
    Ok(MaterializedClip::new(fps, frames))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(source: &mut dyn FrameSource) -> Vec<u64> {
        let mut indices = Vec::new();
        while let Some(frame) = source.next_frame().unwrap() {
            indices.push(frame.index);
        }
        indices
    }

    #[test]
    fn test_reset_replays_identical_sequence() {
        let mut clip = MaterializedClip::placeholders(30.0, 5);
        let first = drain(&mut clip);
        assert_eq!(first, vec![1, 2, 3, 4, 5]);

        // Exhausted source keeps returning None until reset
        assert!(clip.next_frame().unwrap().is_none());

        clip.reset().unwrap();
        assert_eq!(drain(&mut clip), first);
    }

    #[test]
    fn test_new_reindexes_frames() {
        let frames = vec![VideoFrame::placeholder(7), VideoFrame::placeholder(3)];
        let mut clip = MaterializedClip::new(25.0, frames);
        assert_eq!(drain(&mut clip), vec![1, 2]);
        assert_eq!(clip.info().total_frames, 2);
    }

    #[test]
    fn test_materialize_propagates_decode_error() {
        let frames = vec![
            Ok(VideoFrame::placeholder(1)),
            Err(VideoError::Decode {
                index: 2,
                reason: "corrupt packet".to_string(),
            }),
        ];
        let result = materialize(30.0, frames);
        assert!(matches!(result, Err(VideoError::Decode { index: 2, .. })));
    }

    #[test]
    fn test_materialize() {
        let frames = (1..=3).map(|i| Ok(VideoFrame::placeholder(i)));
        let clip = materialize(24.0, frames).unwrap();
        assert_eq!(clip.len(), 3);
        assert_eq!(clip.info().fps, 24.0);
    }
}
