//! Animation player that steps through a sequence the way the cube does.

use std::path::Path;

use super::format::{CodecError, load};
use crate::schema::{AnimationSequence, Frame};

/// Playback cursor over a decoded sequence.
///
/// Usage:
/// ```ignore
/// let mut player = AnimationPlayer::open("animation.cbin", 65_536)?;
/// loop {
///     let frame = player.advance(elapsed_ms);
///     // Push frame to the cube...
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AnimationPlayer {
    sequence: AnimationSequence,
    current: usize,
    /// Milliseconds spent on the current frame.
    elapsed_ms: u64,
    finished: bool,
}

impl AnimationPlayer {
    /// Create a player positioned at the first frame.
    pub fn new(sequence: AnimationSequence) -> Self {
        let finished = sequence.frames.is_empty();
        Self {
            sequence,
            current: 0,
            elapsed_ms: 0,
            finished,
        }
    }

    /// Open a `.cbin` file for playback.
    pub fn open<P: AsRef<Path>>(path: P, max_frames: u32) -> Result<Self, CodecError> {
        Ok(Self::new(load(path, max_frames)?))
    }

    pub fn sequence(&self) -> &AnimationSequence {
        &self.sequence
    }

    pub fn into_sequence(self) -> AnimationSequence {
        self.sequence
    }

    /// Get total number of frames.
    pub fn frame_count(&self) -> usize {
        self.sequence.frames.len()
    }

    /// Milliseconds each frame stays on; never less than 1.
    pub fn frame_delay_ms(&self) -> u64 {
        self.sequence.delay.max(1) as u64
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_frame(&self) -> Option<&Frame> {
        self.sequence.frames.get(self.current)
    }

    /// True once a non-looping sequence has shown its last frame for a full delay.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Advance the clock by `elapsed_ms` and return the frame now showing.
    pub fn advance(&mut self, elapsed_ms: u64) -> Option<&Frame> {
        if self.finished {
            return self.current_frame();
        }

        let delay = self.frame_delay_ms();
        let count = self.frame_count() as u64;
        let total = self.elapsed_ms.saturating_add(elapsed_ms);
        let steps = total / delay;
        self.elapsed_ms = total % delay;

        if self.sequence.looping {
            self.current = ((self.current as u64 + steps % count) % count) as usize;
        } else {
            let last = count - 1;
            let target = (self.current as u64).saturating_add(steps);
            if target > last {
                self.current = last as usize;
                self.elapsed_ms = 0;
                self.finished = true;
            } else {
                self.current = target as usize;
            }
        }

        self.current_frame()
    }

    /// Jump to a frame, clamped to the sequence.
    pub fn seek(&mut self, index: usize) {
        if self.sequence.frames.is_empty() {
            return;
        }
        self.current = index.min(self.frame_count() - 1);
        self.elapsed_ms = 0;
        self.finished = false;
    }

    /// Return to the first frame.
    pub fn reset(&mut self) {
        self.current = 0;
        self.elapsed_ms = 0;
        self.finished = self.sequence.frames.is_empty();
    }

    /// Create an iterator over one pass of the frames in playback order.
    pub fn frames(&self) -> FrameIterator<'_> {
        FrameIterator {
            frames: &self.sequence.frames,
            current: 0,
        }
    }
}

/// Iterator over animation frames.
pub struct FrameIterator<'a> {
    frames: &'a [Frame],
    current: usize,
}

impl<'a> Iterator for FrameIterator<'a> {
    type Item = &'a Frame;

    fn next(&mut self) -> Option<Self::Item> {
        let frame = self.frames.get(self.current)?;
        self.current += 1;
        Some(frame)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.frames.len() - self.current;
        (remaining, Some(remaining))
    }
}

impl<'a> ExactSizeIterator for FrameIterator<'a> {}
