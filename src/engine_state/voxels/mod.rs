//! # Voxel World
//!
//! This module contains the voxel data model the renderer traverses.
//!
//! ## Architecture
//!
//! * **Voxel**: the RGB color stored per voxel; all-zero is air
//! * **Chunk**: metadata for an 8x8x8 block, pointing into the world palette
//! * **World**: the dense chunk grid plus the flat palette
//! * **Generation**: procedural fills used to build the world at startup
//!
//! ## Data Flow
//!
//! 1. A `WorldGenerator` (or a `WorldBuilder` for hand-built scenes) produces a `VoxelWorld`
//! 2. The world is handed to the engine and never mutated again
//! 3. Every render thread reads it through a shared reference

pub mod chunk;
pub mod generation;
pub mod voxel;
pub mod world;
