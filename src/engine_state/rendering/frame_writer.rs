//! # Frame Writer
//!
//! The output side of the renderer: a fixed-size BGRA byte buffer and the
//! packing rule that turns a resolved voxel color into four bytes.

use crate::engine_state::voxels::voxel::VoxelColor;

use super::ray_marcher::MarchState;

/// Bytes per pixel in the frame buffer (B, G, R, A).
pub const BYTES_PER_PIXEL: usize = 4;

/// Packs a color into `[blue, green, red, 255]`.
///
/// Channels are scaled by 255 and truncated, not rounded.
#[inline]
pub fn pack_bgra(color: VoxelColor) -> [u8; BYTES_PER_PIXEL] {
    [
        (color.blue * 255.0) as u8,
        (color.green * 255.0) as u8,
        (color.red * 255.0) as u8,
        255,
    ]
}

/// Packs the color a finished march resolves to.
#[inline]
pub fn resolve_pixel(state: MarchState) -> [u8; BYTES_PER_PIXEL] {
    pack_bgra(state.color())
}

/// A frame of `width * height` BGRA pixels, allocated once and overwritten every frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    width: u32,
    height: u32,
    bytes: Vec<u8>,
}

impl FrameBuffer {
    /// Allocates a frame filled with zero bytes.
    pub fn new(width: u32, height: u32) -> Self {
        FrameBuffer {
            width,
            height,
            bytes: vec![0; width as usize * height as usize * BYTES_PER_PIXEL],
        }
    }

    /// Frame width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Frame height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// The raw BGRA bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Mutable access to the raw BGRA bytes, for partitioned parallel writes.
    pub fn bytes_mut(&mut self) -> &mut [u8] {
        &mut self.bytes
    }

    /// Byte offset of pixel `(x, y)`.
    ///
    /// # Panics
    /// Panics if `(x, y)` lies outside the frame. Clamping would silently
    /// overwrite a neighboring pixel.
    #[inline]
    pub fn pixel_offset(&self, x: u32, y: u32) -> usize {
        assert!(
            x < self.width && y < self.height,
            "pixel ({}, {}) is outside the {}x{} frame",
            x,
            y,
            self.width,
            self.height
        );
        (x as usize + y as usize * self.width as usize) * BYTES_PER_PIXEL
    }

    /// Writes the color at pixel `(x, y)`.
    ///
    /// # Panics
    /// Panics if `(x, y)` lies outside the frame.
    pub fn write_pixel(&mut self, x: u32, y: u32, color: VoxelColor) {
        let offset = self.pixel_offset(x, y);
        self.bytes[offset..offset + BYTES_PER_PIXEL].copy_from_slice(&pack_bgra(color));
    }

    /// Reads back the four bytes of pixel `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; BYTES_PER_PIXEL] {
        let offset = self.pixel_offset(x, y);
        let mut pixel = [0; BYTES_PER_PIXEL];
        pixel.copy_from_slice(&self.bytes[offset..offset + BYTES_PER_PIXEL]);
        pixel
    }
}
