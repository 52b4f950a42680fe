//! Frame sequences with playback metadata.

use super::{EditorConfig, Frame};

/// Ordered list of frames plus the metadata the cube needs to play them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnimationSequence {
    /// Frames in playback order.
    pub frames: Vec<Frame>,
    /// Milliseconds between frames.
    pub delay: i32,
    /// Restart from the first frame after the last one.
    pub looping: bool,
}

impl Default for AnimationSequence {
    fn default() -> Self {
        Self::new(100, true)
    }
}

impl AnimationSequence {
    /// Create an empty sequence.
    pub fn new(delay: i32, looping: bool) -> Self {
        Self {
            frames: Vec::new(),
            delay,
            looping,
        }
    }

    /// Create a sequence from existing frames.
    pub fn with_frames(frames: Vec<Frame>, delay: i32, looping: bool) -> Self {
        Self {
            frames,
            delay,
            looping,
        }
    }

    /// Create a sequence holding a single empty frame, using config defaults.
    pub fn from_config(config: &EditorConfig) -> Self {
        Self::with_frames(vec![Frame::new()], config.delay_ms, config.looping)
    }

    #[inline]
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Size in bytes of this sequence once encoded as `.cbin`.
    pub fn encoded_len(&self) -> usize {
        crate::animation::HEADER_SIZE + self.frames.len() * crate::animation::FRAME_PAYLOAD_SIZE
    }
}
