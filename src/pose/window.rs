//! Bounded rolling window of pose frames for frame-incremental analysis

use std::collections::VecDeque;

use super::landmark::PoseFrame;

/// Fixed-capacity FIFO of the most recent frames
#[derive(Debug, Clone)]
pub struct RollingWindow {
    capacity: usize,
    frames: VecDeque<PoseFrame>,
}

impl RollingWindow {
    /// Create an empty window holding at most `capacity` frames (minimum 1)
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            frames: VecDeque::with_capacity(capacity),
        }
    }

    /// Append a frame, evicting the oldest when full
    ///
    /// Returns the evicted frame, if any.
    pub fn push(&mut self, frame: PoseFrame) -> Option<PoseFrame> {
        let evicted = if self.frames.len() == self.capacity {
            self.frames.pop_front()
        } else {
            None
        };
        self.frames.push_back(frame);
        evicted
    }

    /// Frames in arrival order
    pub fn frames(&mut self) -> &[PoseFrame] {
        self.frames.make_contiguous()
    }

    /// Number of frames currently held
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Whether the window is empty
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Whether the window is at capacity
    pub fn is_full(&self) -> bool {
        self.frames.len() == self.capacity
    }

    /// Maximum number of frames held
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Drop every frame
    pub fn clear(&mut self) {
        self.frames.clear();
    }
}
