//! Editor session state.
//!
//! Holds the animation being edited together with the editor's cursor
//! (current frame and edit layer). The UI layer owns one session and calls
//! into the codec through it.

use std::path::Path;

use log::{info, warn};

use crate::animation::{CodecError, load, save};
use crate::schema::{AnimationSequence, CUBE_SIZE, EditorConfig, Frame};

/// Animation plus editing cursor.
#[derive(Debug, Clone)]
pub struct EditorSession {
    sequence: AnimationSequence,
    current_frame: usize,
    edit_layer: usize,
    max_frames: u32,
}

impl EditorSession {
    /// Start a session with one empty frame.
    pub fn new(config: &EditorConfig) -> Self {
        Self {
            sequence: AnimationSequence::from_config(config),
            current_frame: 0,
            edit_layer: 0,
            max_frames: config.max_frames,
        }
    }

    pub fn sequence(&self) -> &AnimationSequence {
        &self.sequence
    }

    pub fn frame_count(&self) -> usize {
        self.sequence.frames.len()
    }

    pub fn current_index(&self) -> usize {
        self.current_frame
    }

    pub fn edit_layer(&self) -> usize {
        self.edit_layer
    }

    pub fn current_frame(&self) -> &Frame {
        &self.sequence.frames[self.current_frame]
    }

    fn current_frame_mut(&mut self) -> &mut Frame {
        &mut self.sequence.frames[self.current_frame]
    }

    /// Select a frame, clamped to the sequence.
    pub fn set_current_frame(&mut self, index: usize) {
        self.current_frame = index.min(self.frame_count() - 1);
    }

    /// Select the z plane being edited, clamped to the cube.
    pub fn set_edit_layer(&mut self, z: usize) {
        self.edit_layer = z.min(CUBE_SIZE - 1);
    }

    pub fn set_delay(&mut self, delay_ms: i32) {
        self.sequence.delay = delay_ms;
    }

    pub fn set_looping(&mut self, looping: bool) {
        self.sequence.looping = looping;
    }

    /// Append an empty frame. The selection does not move.
    pub fn add_frame(&mut self) {
        self.sequence.frames.push(Frame::new());
    }

    /// Insert a copy of the current frame after it and select the copy.
    pub fn duplicate_frame(&mut self) {
        let copy = *self.current_frame();
        self.current_frame += 1;
        self.sequence.frames.insert(self.current_frame, copy);
    }

    /// Remove the current frame. The last remaining frame is kept.
    ///
    /// Returns true if a frame was removed.
    pub fn remove_frame(&mut self) -> bool {
        if self.frame_count() <= 1 {
            return false;
        }
        self.sequence.frames.remove(self.current_frame);
        self.set_current_frame(self.current_frame);
        true
    }

    /// Voxel behind editor grid cell `(row, col)` on the edit layer.
    ///
    /// The layer grid is drawn mirrored on both axes, matching the cube's
    /// wiring.
    ///
    /// # Panics
    /// Panics if `row` or `col` is `>= CUBE_SIZE`.
    pub fn cell(&self, row: usize, col: usize) -> bool {
        self.current_frame()
            .get(CUBE_SIZE - 1 - row, CUBE_SIZE - 1 - col, self.edit_layer)
    }

    /// Flip the voxel behind editor grid cell `(row, col)`; returns its new state.
    ///
    /// # Panics
    /// Panics if `row` or `col` is `>= CUBE_SIZE`.
    pub fn toggle_cell(&mut self, row: usize, col: usize) -> bool {
        let z = self.edit_layer;
        self.current_frame_mut()
            .toggle(CUBE_SIZE - 1 - row, CUBE_SIZE - 1 - col, z)
    }

    /// Turn off every voxel on the edit layer of the current frame.
    pub fn clear_layer(&mut self) {
        let z = self.edit_layer;
        self.current_frame_mut().clear_layer(z);
    }

    /// Write the animation to `path`.
    ///
    /// `None` means the user cancelled the file picker; nothing happens and
    /// `Ok(false)` is returned.
    pub fn export_to(&self, path: Option<&Path>) -> Result<bool, CodecError> {
        let Some(path) = path else {
            info!("No file selected");
            return Ok(false);
        };
        save(path, &self.sequence)?;
        info!(
            "Exported {} frames to {}",
            self.frame_count(),
            path.display()
        );
        Ok(true)
    }

    /// Replace the animation with the contents of `path`.
    ///
    /// On error the session is left untouched. `None` behaves as in
    /// [`export_to`](Self::export_to).
    pub fn import_from(&mut self, path: Option<&Path>) -> Result<bool, CodecError> {
        let Some(path) = path else {
            info!("No file selected");
            return Ok(false);
        };
        let mut sequence = load(path, self.max_frames)?;
        if sequence.frames.is_empty() {
            warn!("{} holds no frames, starting with an empty one", path.display());
            sequence.frames.push(Frame::new());
        }
        info!(
            "Imported {} frames from {}",
            sequence.frames.len(),
            path.display()
        );
        self.sequence = sequence;
        self.current_frame = 0;
        Ok(true)
    }
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new(&EditorConfig::default())
    }
}
