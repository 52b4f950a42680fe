//! Schema module - Voxel frames, sequences and editor configuration.

mod config;
mod sequence;
mod voxel;

pub use config::*;
pub use sequence::*;
pub use voxel::*;
