//! # Chunk Module
//!
//! This module provides the `Chunk` struct: the metadata for one 8x8x8 block of
//! voxels. A chunk does not own its voxels. They live in the world's flat
//! palette, and the chunk only records where its slice starts and whether any
//! voxel inside it is solid.
//!
//! ## Palette Layout
//!
//! Each occupied chunk owns a contiguous slice of `CHUNK_SIZE` palette entries,
//! laid out in `x + y * 8 + z * 64` order. Chunks that hold only air are not
//! given a slice of their own: they point at the canonical air slice at the
//! start of the palette, so memory grows with the number of occupied chunks.
//!
//! ### Performance Characteristics
//! - **Occupancy Check**: O(1) - a single flag
//! - **Voxel Lookup**: O(1) - `palette_offset` plus the local index

use cgmath::Point3;

pub mod chunk_creation;

/// The dimension (width, height, depth) of a chunk in voxels.
pub const CHUNK_DIMENSION: i32 = 8;
/// The number of voxels in a single 2D plane of a chunk (CHUNK_DIMENSION²).
pub const CHUNK_PLANE_SIZE: i32 = CHUNK_DIMENSION * CHUNK_DIMENSION;
/// The total number of voxels in a chunk (CHUNK_DIMENSION³).
pub const CHUNK_SIZE: i32 = CHUNK_PLANE_SIZE * CHUNK_DIMENSION;
/// `log2(CHUNK_DIMENSION)`, used to turn a non-negative voxel coordinate into a chunk index.
pub const CHUNK_SHIFT: i32 = 3;
/// Mask selecting the local voxel index from a non-negative voxel coordinate.
pub const CHUNK_MASK: i32 = CHUNK_DIMENSION - 1;
/// Palette offset of the shared all-air slice used by every unoccupied chunk.
pub const AIR_PALETTE_OFFSET: usize = 0;

/// Metadata for an 8x8x8 block of voxels.
///
/// Chunks are created once while the world is built and never change
/// afterwards, so they can be read from any number of render threads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk {
    /// The position of this chunk in chunk coordinates (not voxel coordinates).
    pub position: Point3<i32>,
    /// `true` if at least one voxel in the chunk is solid.
    pub occupied: bool,
    /// Index of this chunk's first voxel in the world palette.
    pub palette_offset: usize,
}

impl Chunk {
    /// Creates an unoccupied chunk pointing at the shared air slice.
    pub fn empty(position: Point3<i32>) -> Self {
        Chunk {
            position,
            occupied: false,
            palette_offset: AIR_PALETTE_OFFSET,
        }
    }

    /// Returns the palette index of the voxel at the given chunk-relative coordinates.
    ///
    /// # Arguments
    /// * `lx` - X coordinate within the chunk (0..CHUNK_DIMENSION)
    /// * `ly` - Y coordinate within the chunk (0..CHUNK_DIMENSION)
    /// * `lz` - Z coordinate within the chunk (0..CHUNK_DIMENSION)
    #[inline]
    pub fn palette_index(&self, lx: usize, ly: usize, lz: usize) -> usize {
        debug_assert!(lx < CHUNK_DIMENSION as usize);
        debug_assert!(ly < CHUNK_DIMENSION as usize);
        debug_assert!(lz < CHUNK_DIMENSION as usize);
        self.palette_offset
            + lx
            + ly * CHUNK_DIMENSION as usize
            + lz * CHUNK_PLANE_SIZE as usize
    }
}
