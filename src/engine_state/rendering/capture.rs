//! # Frame Capture
//!
//! Saves rendered frames as PNG files, standing in for a display when the
//! engine runs headless.

use std::path::{Path, PathBuf};

use image::{ImageFormat, RgbaImage};
use log::info;

use crate::error::EngineError;

use super::frame_writer::{FrameBuffer, BYTES_PER_PIXEL};

/// Converts BGRA bytes to an RGBA image.
///
/// # Errors
/// `EngineError::FrameSize` if `bgra` is not exactly `width * height * 4` bytes long.
pub fn bgra_to_rgba(width: u32, height: u32, bgra: &[u8]) -> Result<RgbaImage, EngineError> {
    let expected = width as usize * height as usize * BYTES_PER_PIXEL;
    if bgra.len() != expected {
        return Err(EngineError::FrameSize {
            width,
            height,
            expected,
            actual: bgra.len(),
        });
    }

    let mut image = RgbaImage::new(width, height);
    for (rgba, pixel) in image
        .chunks_exact_mut(BYTES_PER_PIXEL)
        .zip(bgra.chunks_exact(BYTES_PER_PIXEL))
    {
        rgba.copy_from_slice(&[pixel[2], pixel[1], pixel[0], pixel[3]]);
    }
    Ok(image)
}

/// Writes `frame` to `path` as a PNG.
pub fn save_png<P: AsRef<Path>>(frame: &FrameBuffer, path: P) -> Result<(), EngineError> {
    let path = path.as_ref();
    let image = bgra_to_rgba(frame.width(), frame.height(), frame.bytes())?;

    image.save_with_format(path, ImageFormat::Png)?;
    info!("Saved frame to {}", path.display());
    Ok(())
}

/// Output path for frame `index` of `frame_count`.
///
/// A single frame is written to `base` unchanged; sequences get a zero-padded
/// index inserted before the extension (`out.png` becomes `out_0003.png`).
pub fn frame_path(base: &Path, index: usize, frame_count: usize) -> PathBuf {
    if frame_count <= 1 {
        return base.to_path_buf();
    }

    let stem = base
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "frame".to_string());
    let extension = base
        .extension()
        .map(|extension| extension.to_string_lossy().into_owned())
        .unwrap_or_else(|| "png".to_string());

    base.with_file_name(format!("{}_{:04}.{}", stem, index, extension))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::voxels::voxel::VoxelColor;

    #[test]
    fn test_channel_order_is_swapped() {
        let rgba = bgra_to_rgba(2, 1, &[1, 2, 3, 4, 5, 6, 7, 8]).unwrap();
        assert_eq!(rgba.dimensions(), (2, 1));
        assert_eq!(rgba.into_raw(), vec![3, 2, 1, 4, 7, 6, 5, 8]);
    }

    #[test]
    fn test_size_mismatch_is_rejected() {
        let result = bgra_to_rgba(2, 2, &[0; 12]);
        assert!(matches!(
            result,
            Err(EngineError::FrameSize {
                expected: 16,
                actual: 12,
                ..
            })
        ));
    }

    #[test]
    fn test_frame_paths() {
        let base = Path::new("/tmp/render.png");
        assert_eq!(frame_path(base, 0, 1), PathBuf::from("/tmp/render.png"));
        assert_eq!(frame_path(base, 3, 10), PathBuf::from("/tmp/render_0003.png"));
    }

    #[test]
    fn test_save_png_round_trip() {
        let mut frame = FrameBuffer::new(2, 2);
        frame.write_pixel(1, 0, VoxelColor::new(1.0, 0.0, 0.0));
        let path = std::env::temp_dir().join("voxel_raymarch_capture_test.png");

        save_png(&frame, &path).unwrap();
        let loaded = image::open(&path).unwrap().to_rgba8();
        assert_eq!(loaded.dimensions(), (2, 2));
        assert_eq!(loaded.get_pixel(1, 0).0, [255, 0, 0, 255]);
        assert_eq!(loaded.get_pixel(0, 0).0, [0, 0, 0, 0]);

        let _ = std::fs::remove_file(&path);
    }
}
