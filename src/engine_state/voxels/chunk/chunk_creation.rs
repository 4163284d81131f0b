//! # Chunk Creation Module
//!
//! This module provides the builder used to append one chunk's voxels to the
//! world palette while keeping the chunk's occupancy flag in sync.
//!
//! Voxels must be pushed in palette order: x fastest, then y, then z. The
//! builder tracks the local position itself so callers only supply colors.
//! If every pushed voxel is air, the slice is rolled back and the chunk is
//! pointed at the shared air slice instead.

use cgmath::Point3;

use crate::engine_state::voxels::voxel::VoxelColor;

use super::{Chunk, AIR_PALETTE_OFFSET, CHUNK_DIMENSION, CHUNK_SIZE};

/// A builder that appends a chunk's voxels to the palette.
///
/// The builder borrows the palette mutably for its whole lifetime, so only
/// one chunk can be under construction at a time and offsets can never overlap.
pub struct ChunkCreationIterator<'a> {
    /// The chunk coordinates of the chunk being created
    position: Point3<i32>,
    /// The palette the voxels are appended to
    palette: &'a mut Vec<VoxelColor>,
    /// Palette length when the chunk was started; the chunk's offset if it is kept
    palette_offset: usize,
    /// Whether any solid voxel has been pushed
    occupied: bool,
    /// Current X position within the chunk (0..CHUNK_DIMENSION)
    local_x: i32,
    /// Current Y position within the chunk (0..CHUNK_DIMENSION)
    local_y: i32,
    /// Current Z position within the chunk (0..CHUNK_DIMENSION)
    local_z: i32,
    /// Number of voxels pushed so far
    pushed: i32,
}

impl<'a> ChunkCreationIterator<'a> {
    /// Creates a builder for the chunk at `position`, appending to `palette`.
    pub fn new(position: Point3<i32>, palette: &'a mut Vec<VoxelColor>) -> Self {
        let palette_offset = palette.len();
        palette.reserve(CHUNK_SIZE as usize);
        ChunkCreationIterator {
            position,
            palette,
            palette_offset,
            occupied: false,
            local_x: 0,
            local_y: 0,
            local_z: 0,
            pushed: 0,
        }
    }

    /// Returns the chunk-relative coordinates of the next voxel to be pushed.
    pub fn next_local_position(&self) -> Point3<i32> {
        Point3::new(self.local_x, self.local_y, self.local_z)
    }

    /// Appends the color of the voxel at the current position and advances.
    ///
    /// # Panics
    /// Panics if more than `CHUNK_SIZE` voxels are pushed.
    pub fn push_voxel(&mut self, color: VoxelColor) {
        assert!(self.pushed < CHUNK_SIZE, "chunk {:?} is already full", self.position);

        self.occupied |= color.is_solid();
        self.palette.push(color);
        self.pushed += 1;

        self.local_x += 1;
        if self.local_x == CHUNK_DIMENSION {
            self.local_x = 0;
            self.local_y += 1;
            if self.local_y == CHUNK_DIMENSION {
                self.local_y = 0;
                self.local_z += 1;
            }
        }
    }

    /// Finalizes the chunk.
    ///
    /// Any voxels that were never pushed are filled with air. An all-air chunk
    /// gives its slice back and points at the shared air slice.
    pub fn return_chunk(mut self) -> Chunk {
        if !self.occupied {
            self.palette.truncate(self.palette_offset);
            return Chunk::empty(self.position);
        }

        for _ in self.pushed..CHUNK_SIZE {
            self.palette.push(VoxelColor::AIR);
        }

        Chunk {
            position: self.position,
            occupied: true,
            palette_offset: self.palette_offset,
        }
    }
}
