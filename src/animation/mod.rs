//! Animation storage and playback for LED cube frame sequences.
//!
//! # File Format
//!
//! The `.cbin` format is what the cube firmware reads. All integers are
//! little-endian; there is no magic number, version or checksum.
//!
//! ```text
//! Header (9 bytes):
//!   Frame count: u32
//!   Delay (ms): i32
//!   Loop: u8 (0 = off, nonzero = on)
//!
//! Frame data (frame_count * 64 bytes):
//!   For each z plane, for each x, one byte packing the 8 voxels along y.
//!   Bit y of byte (z, x) holds voxel [7 - x][7 - y][z], bit 0 = LSB.
//! ```

mod format;
mod player;
mod recorder;

pub use format::{
    BitPosition, CbinHeader, CodecError, FRAME_PAYLOAD_SIZE, FramePayload, HEADER_SIZE,
    bit_to_voxel, decode, decode_slice, decode_with_limit, encode, encode_to_vec, load,
    pack_frame, save, unpack_frame, voxel_to_bit,
};
pub use player::{AnimationPlayer, FrameIterator};
pub use recorder::{CbinRecorder, RecorderConfig, RecordingStats};
