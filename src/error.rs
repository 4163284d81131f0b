//! # Errors
//!
//! Errors raised by the host-side layers: configuration loading and frame
//! export. Rendering itself cannot fail.

use std::path::PathBuf;

/// Errors returned by the engine's host-side operations.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// A configuration file was requested but does not exist
    #[error("Configuration file not found: {0}")]
    ConfigNotFound(PathBuf),

    /// Reading a configuration file or writing an image failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration file is not valid JSON for `EngineConfig`
    #[error("Failed to parse configuration: {0}")]
    ConfigParse(#[from] serde_json::Error),

    /// The configuration parsed but holds unusable values
    #[error("Configuration validation error: {0}")]
    InvalidConfig(String),

    /// Encoding a frame failed
    #[error("Failed to encode image: {0}")]
    Image(#[from] image::ImageError),

    /// A frame's byte length does not match its resolution
    #[error("Frame of {width}x{height} needs {expected} bytes, got {actual}")]
    FrameSize {
        /// Frame width in pixels
        width: u32,
        /// Frame height in pixels
        height: u32,
        /// Byte length implied by the resolution
        expected: usize,
        /// Byte length actually supplied
        actual: usize,
    },
}
