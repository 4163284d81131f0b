//! # World Module
//!
//! This module provides the `VoxelWorld`: a dense grid of chunk metadata plus
//! the flat palette of voxel colors the chunks index into.
//!
//! ## Architecture
//!
//! The world spans chunk coordinates `-WORLD_CHUNK_RADIUS..=WORLD_CHUNK_RADIUS`
//! on every axis. Chunk metadata is stored densely, so a lookup is a bounds
//! check plus one index computation. Voxel colors are only stored for occupied
//! chunks; every air-only chunk shares the air slice at the start of the palette.
//!
//! ## Coordinates
//!
//! A world voxel coordinate is bias-shifted by `WORLD_VOXEL_BIAS` before it is
//! split into a chunk index (high bits) and a local index (low three bits).
//! The shift keeps the value non-negative for every in-world voxel, so the
//! masking step is valid for negative world coordinates too.
//!
//! ## Thread Safety
//!
//! The world has no mutation API once built. It is shared by reference with
//! every render thread for the duration of a frame.

use std::collections::HashMap;

use cgmath::Point3;

use super::chunk::{
    chunk_creation::ChunkCreationIterator, Chunk, CHUNK_DIMENSION, CHUNK_MASK, CHUNK_SHIFT,
    CHUNK_SIZE,
};
use super::voxel::VoxelColor;

/// Largest absolute chunk coordinate inside the world.
pub const WORLD_CHUNK_RADIUS: i32 = 16;
/// Number of chunks along each axis of the world grid.
pub const WORLD_CHUNK_DIMENSION: i32 = 2 * WORLD_CHUNK_RADIUS + 1;
/// Total number of chunks in the world grid.
pub const WORLD_CHUNK_COUNT: usize =
    (WORLD_CHUNK_DIMENSION * WORLD_CHUNK_DIMENSION * WORLD_CHUNK_DIMENSION) as usize;
/// Shift applied to world voxel coordinates so every in-world voxel is non-negative.
pub const WORLD_VOXEL_BIAS: i32 = WORLD_CHUNK_RADIUS * CHUNK_DIMENSION;

/// Splits a world voxel coordinate into its chunk coordinate and local coordinate.
///
/// This is `floor(coord / 8)` and `coord mod 8` for any integer, negative or not.
pub fn world_to_chunk(voxel: Point3<i32>) -> (Point3<i32>, Point3<usize>) {
    let chunk = Point3::new(
        voxel.x.div_euclid(CHUNK_DIMENSION),
        voxel.y.div_euclid(CHUNK_DIMENSION),
        voxel.z.div_euclid(CHUNK_DIMENSION),
    );
    let local = Point3::new(
        voxel.x.rem_euclid(CHUNK_DIMENSION) as usize,
        voxel.y.rem_euclid(CHUNK_DIMENSION) as usize,
        voxel.z.rem_euclid(CHUNK_DIMENSION) as usize,
    );
    (chunk, local)
}

/// Splits one biased axis into `(grid index, local index)`, or `None` outside the world.
#[inline]
fn split_axis(coord: i32) -> Option<(usize, usize)> {
    let shifted = coord.checked_add(WORLD_VOXEL_BIAS)?;
    if shifted < 0 {
        return None;
    }
    let grid = shifted >> CHUNK_SHIFT;
    if grid >= WORLD_CHUNK_DIMENSION {
        return None;
    }
    Some((grid as usize, (shifted & CHUNK_MASK) as usize))
}

#[inline]
fn grid_index(gx: usize, gy: usize, gz: usize) -> usize {
    let dim = WORLD_CHUNK_DIMENSION as usize;
    gx + gy * dim + gz * dim * dim
}

/// A chunked, sparse voxel volume.
///
/// # Examples
///
/// ```
/// use cgmath::Point3;
/// use voxel_raymarch::engine_state::voxels::{voxel::VoxelColor, world::WorldBuilder};
///
/// let mut builder = WorldBuilder::new();
/// builder.set_voxel(Point3::new(-3, 4, 10), VoxelColor::new(1.0, 0.5, 0.0));
/// let world = builder.build();
///
/// assert_eq!(world.voxel_at(Point3::new(-3, 4, 10)), VoxelColor::new(1.0, 0.5, 0.0));
/// assert_eq!(world.occupied_chunk_count(), 1);
/// ```
pub struct VoxelWorld {
    /// Chunk metadata in grid order: x fastest, then y, then z.
    chunks: Vec<Chunk>,
    /// Voxel colors; the first `CHUNK_SIZE` entries are the shared air slice.
    palette: Vec<VoxelColor>,
}

impl VoxelWorld {
    /// Creates a world containing only air.
    pub fn empty() -> Self {
        WorldBuilder::new().build()
    }

    /// Builds a world by evaluating `voxel_fn` once for every in-world voxel.
    ///
    /// Chunks are visited in grid order and voxels in palette order, so a
    /// function drawing from a seeded generator produces the same world every run.
    pub fn from_fn<F: FnMut(Point3<i32>) -> VoxelColor>(mut voxel_fn: F) -> Self {
        let mut palette = vec![VoxelColor::AIR; CHUNK_SIZE as usize];
        let mut chunks = Vec::with_capacity(WORLD_CHUNK_COUNT);

        for cz in -WORLD_CHUNK_RADIUS..=WORLD_CHUNK_RADIUS {
            for cy in -WORLD_CHUNK_RADIUS..=WORLD_CHUNK_RADIUS {
                for cx in -WORLD_CHUNK_RADIUS..=WORLD_CHUNK_RADIUS {
                    let position = Point3::new(cx, cy, cz);
                    let mut cci = ChunkCreationIterator::new(position, &mut palette);
                    for _ in 0..CHUNK_SIZE {
                        let local = cci.next_local_position();
                        let voxel = Point3::new(
                            cx * CHUNK_DIMENSION + local.x,
                            cy * CHUNK_DIMENSION + local.y,
                            cz * CHUNK_DIMENSION + local.z,
                        );
                        cci.push_voxel(voxel_fn(voxel));
                    }
                    chunks.push(cci.return_chunk());
                }
            }
        }

        VoxelWorld { chunks, palette }
    }

    /// Retrieves the chunk at the specified chunk coordinates.
    ///
    /// # Returns
    /// `None` if any coordinate lies outside `-WORLD_CHUNK_RADIUS..=WORLD_CHUNK_RADIUS`.
    pub fn get_chunk_at(&self, position: Point3<i32>) -> Option<&Chunk> {
        let range = -WORLD_CHUNK_RADIUS..=WORLD_CHUNK_RADIUS;
        if !range.contains(&position.x) || !range.contains(&position.y) || !range.contains(&position.z) {
            return None;
        }
        let index = grid_index(
            (position.x + WORLD_CHUNK_RADIUS) as usize,
            (position.y + WORLD_CHUNK_RADIUS) as usize,
            (position.z + WORLD_CHUNK_RADIUS) as usize,
        );
        self.chunks.get(index)
    }

    /// Reads the color of a voxel by chunk and chunk-relative coordinates.
    #[inline]
    pub fn voxel_color_at(&self, chunk: &Chunk, lx: usize, ly: usize, lz: usize) -> VoxelColor {
        self.palette[chunk.palette_index(lx, ly, lz)]
    }

    /// Reads the color of a voxel by world voxel coordinates. Out-of-world voxels are air.
    pub fn voxel_at(&self, voxel: Point3<i32>) -> VoxelColor {
        let (chunk_position, local) = world_to_chunk(voxel);
        match self.get_chunk_at(chunk_position) {
            Some(chunk) => self.voxel_color_at(chunk, local.x, local.y, local.z),
            None => VoxelColor::AIR,
        }
    }

    /// Returns the color of the voxel at `voxel` if it lies inside the world,
    /// inside an occupied chunk, and is solid.
    ///
    /// This is the occupancy test used while marching rays.
    #[inline]
    pub fn solid_voxel_at(&self, voxel: Point3<i32>) -> Option<VoxelColor> {
        let (gx, lx) = split_axis(voxel.x)?;
        let (gy, ly) = split_axis(voxel.y)?;
        let (gz, lz) = split_axis(voxel.z)?;

        let chunk = &self.chunks[grid_index(gx, gy, gz)];
        if !chunk.occupied {
            return None;
        }

        let color = self.voxel_color_at(chunk, lx, ly, lz);
        color.is_solid().then_some(color)
    }

    /// Iterates over all chunks in grid order.
    pub fn chunks(&self) -> impl Iterator<Item = &Chunk> {
        self.chunks.iter()
    }

    /// Number of chunks containing at least one solid voxel.
    pub fn occupied_chunk_count(&self) -> usize {
        self.chunks.iter().filter(|chunk| chunk.occupied).count()
    }

    /// Number of entries in the palette, including the shared air slice.
    pub fn palette_len(&self) -> usize {
        self.palette.len()
    }
}

/// Collects individual voxels and builds a `VoxelWorld` from them.
///
/// Only chunks that receive a voxel are materialized while building, which
/// keeps small hand-built worlds cheap.
#[derive(Default)]
pub struct WorldBuilder {
    /// Voxel colors per touched chunk, in palette order.
    chunks: HashMap<Point3<i32>, Vec<VoxelColor>>,
}

impl WorldBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the color of the voxel at world voxel coordinates.
    ///
    /// # Returns
    /// `false` if the voxel lies outside the world and was ignored.
    pub fn set_voxel(&mut self, voxel: Point3<i32>, color: VoxelColor) -> bool {
        let (chunk_position, local) = world_to_chunk(voxel);
        let range = -WORLD_CHUNK_RADIUS..=WORLD_CHUNK_RADIUS;
        if !range.contains(&chunk_position.x)
            || !range.contains(&chunk_position.y)
            || !range.contains(&chunk_position.z)
        {
            return false;
        }

        let voxels = self
            .chunks
            .entry(chunk_position)
            .or_insert_with(|| vec![VoxelColor::AIR; CHUNK_SIZE as usize]);
        let template = Chunk::empty(chunk_position);
        voxels[template.palette_index(local.x, local.y, local.z)] = color;
        true
    }

    /// Builds the immutable world.
    pub fn build(self) -> VoxelWorld {
        let mut palette = vec![VoxelColor::AIR; CHUNK_SIZE as usize];
        let mut chunks = Vec::with_capacity(WORLD_CHUNK_COUNT);

        for cz in -WORLD_CHUNK_RADIUS..=WORLD_CHUNK_RADIUS {
            for cy in -WORLD_CHUNK_RADIUS..=WORLD_CHUNK_RADIUS {
                for cx in -WORLD_CHUNK_RADIUS..=WORLD_CHUNK_RADIUS {
                    let position = Point3::new(cx, cy, cz);
                    let chunk = match self.chunks.get(&position) {
                        Some(voxels) => {
                            let mut cci = ChunkCreationIterator::new(position, &mut palette);
                            for color in voxels {
                                cci.push_voxel(*color);
                            }
                            cci.return_chunk()
                        }
                        None => Chunk::empty(position),
                    };
                    chunks.push(chunk);
                }
            }
        }

        VoxelWorld { chunks, palette }
    }
}
