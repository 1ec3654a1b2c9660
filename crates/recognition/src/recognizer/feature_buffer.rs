//! Fixed-capacity sliding window of frame features.

use std::collections::VecDeque;

use signscribe_pose::FrameFeature;

pub struct FeatureBuffer {
    frames: VecDeque<FrameFeature>,
    capacity: usize,
}

impl FeatureBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            frames: VecDeque::with_capacity(capacity + 1),
            capacity: capacity.max(1),
        }
    }

    /// Append a feature, evicting the oldest one when over capacity.
    pub fn push(&mut self, feature: FrameFeature) {
        self.frames.push_back(feature);
        while self.frames.len() > self.capacity {
            self.frames.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// The `count` most recent features, oldest first.
    ///
    /// Returns fewer when the buffer holds fewer.
    pub fn newest(&mut self, count: usize) -> &[FrameFeature] {
        let start = self.frames.len().saturating_sub(count);
        &self.frames.make_contiguous()[start..]
    }

    /// Drop everything except the `keep` most recent features.
    pub fn retain_newest(&mut self, keep: usize) {
        let excess = self.frames.len().saturating_sub(keep);
        self.frames.drain(..excess);
    }
}
