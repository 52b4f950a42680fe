//! LED cube animation editor core.
//!
//! This crate holds everything the 8x8x8 LED cube editor needs apart from
//! its window, renderer and widgets: voxel frames, the `.cbin` frame
//! sequence codec the cube firmware reads, and the editor session state.
//!
//! # Architecture
//!
//! - `schema`: Voxel grids, frame sequences and editor configuration
//! - `animation`: `.cbin` encoding/decoding, streaming recorder, playback
//! - `session`: Editing cursor over an animation, import/export
//!
//! # Example
//!
//! ```rust
//! use ledcube::{
//!     animation::{decode_slice, encode_to_vec},
//!     schema::{AnimationSequence, VoxelGrid},
//! };
//!
//! let mut frame = VoxelGrid::new();
//! frame.set(0, 0, 0, true);
//!
//! let sequence = AnimationSequence::with_frames(vec![frame, VoxelGrid::filled()], 100, true);
//! let bytes = encode_to_vec(&sequence).unwrap();
//! assert_eq!(bytes.len(), 9 + 2 * 64);
//!
//! let decoded = decode_slice(&bytes).unwrap();
//! assert_eq!(decoded, sequence);
//! ```

pub mod animation;
pub mod schema;
pub mod session;

// Re-export commonly used types
pub use animation::{AnimationPlayer, CodecError, decode, encode};
pub use schema::{AnimationSequence, CUBE_SIZE, EditorConfig, Frame, VoxelGrid};
pub use session::EditorSession;
