//! # Voxel Module
//!
//! This module defines the color value stored for every voxel in the palette.
//! A voxel has no type beyond its color: the all-zero color is air, anything
//! else is solid.

/// The RGB color of a single voxel, each channel in `[0, 1]`.
///
/// # Memory Layout
/// The `#[repr(C)]` attribute keeps the palette castable to raw `f32` triples,
/// matching the layout an accelerator upload expects.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct VoxelColor {
    /// Red channel
    pub red: f32,
    /// Green channel
    pub green: f32,
    /// Blue channel
    pub blue: f32,
}

impl VoxelColor {
    /// The air voxel, also used as the background color of a missed ray.
    pub const AIR: VoxelColor = VoxelColor {
        red: 0.0,
        green: 0.0,
        blue: 0.0,
    };

    /// Creates a new voxel color.
    pub const fn new(red: f32, green: f32, blue: f32) -> Self {
        VoxelColor { red, green, blue }
    }

    /// Returns `true` if any channel is non-zero.
    ///
    /// Only strictly positive channels count, so a channel holding `-0.0`
    /// still reads as air.
    #[inline]
    pub fn is_solid(&self) -> bool {
        self.red > 0.0 || self.green > 0.0 || self.blue > 0.0
    }

    /// Returns `true` for the air voxel.
    #[inline]
    pub fn is_air(&self) -> bool {
        !self.is_solid()
    }
}

impl From<[f32; 3]> for VoxelColor {
    fn from(rgb: [f32; 3]) -> Self {
        VoxelColor::new(rgb[0], rgb[1], rgb[2])
    }
}
