//! Voxel grid types for LED cube frames.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Edge length of the cube, in voxels.
pub const CUBE_SIZE: usize = 8;

/// A single time-step of an animation.
pub type Frame = VoxelGrid;

/// Fixed-size boolean cube, indexed `[x][y][z]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct VoxelGrid {
    voxels: [[[bool; CUBE_SIZE]; CUBE_SIZE]; CUBE_SIZE],
}

impl VoxelGrid {
    /// Create an empty grid.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a grid with every voxel lit.
    pub fn filled() -> Self {
        Self {
            voxels: [[[true; CUBE_SIZE]; CUBE_SIZE]; CUBE_SIZE],
        }
    }

    /// Create a grid of uniform random noise.
    ///
    /// Each voxel is lit with probability `density` (clamped to 0.0-1.0, NaN reads as 0).
    pub fn noise(density: f64, seed: u64) -> Self {
        let density = if density.is_nan() {
            0.0
        } else {
            density.clamp(0.0, 1.0)
        };
        let mut rng = StdRng::seed_from_u64(seed);
        let mut grid = Self::new();
        for plane in grid.voxels.iter_mut() {
            for line in plane.iter_mut() {
                for voxel in line.iter_mut() {
                    *voxel = rng.gen_bool(density);
                }
            }
        }
        grid
    }

    /// Read one voxel.
    ///
    /// # Panics
    /// Panics if any coordinate is `>= CUBE_SIZE`.
    #[inline]
    pub fn get(&self, x: usize, y: usize, z: usize) -> bool {
        self.voxels[x][y][z]
    }

    /// Write one voxel.
    ///
    /// # Panics
    /// Panics if any coordinate is `>= CUBE_SIZE`.
    #[inline]
    pub fn set(&mut self, x: usize, y: usize, z: usize, on: bool) {
        self.voxels[x][y][z] = on;
    }

    /// Flip one voxel and return its new state.
    pub fn toggle(&mut self, x: usize, y: usize, z: usize) -> bool {
        let voxel = &mut self.voxels[x][y][z];
        *voxel = !*voxel;
        *voxel
    }

    /// Turn every voxel off.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Turn every voxel off in the plane at height `z`.
    pub fn clear_layer(&mut self, z: usize) {
        for plane in self.voxels.iter_mut() {
            for line in plane.iter_mut() {
                line[z] = false;
            }
        }
    }

    /// Turn every voxel on.
    pub fn fill(&mut self) {
        *self = Self::filled();
    }

    /// Number of lit voxels.
    pub fn count_occupied(&self) -> usize {
        self.voxels
            .iter()
            .flatten()
            .flatten()
            .filter(|&&on| on)
            .count()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count_occupied() == 0
    }

    /// Iterate over coordinates of lit voxels in `x`, `y`, `z` order.
    pub fn occupied(&self) -> impl Iterator<Item = (usize, usize, usize)> + '_ {
        (0..CUBE_SIZE).flat_map(move |x| {
            (0..CUBE_SIZE).flat_map(move |y| {
                (0..CUBE_SIZE).filter_map(move |z| self.voxels[x][y][z].then_some((x, y, z)))
            })
        })
    }
}
