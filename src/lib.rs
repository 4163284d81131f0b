#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::invalid_rust_codeblocks)]

//! # Voxel Raymarch
//!
//! A per-pixel ray-marching renderer for chunked, sparse voxel worlds.
//!
//! Every pixel is an independent computation: the camera produces a ray, the
//! ray marcher walks it through the world one voxel boundary at a time, and
//! the frame writer packs the color of the first solid voxel it meets into a
//! BGRA byte buffer. Frames are rendered on a rayon thread pool.
//!
//! ## Key Modules
//!
//! * `config` - JSON configuration with validated defaults
//! * `core` - Shared-resource container used across threads
//! * `engine_state` - World, camera, renderer and the frame driver
//! * `error` - The error type of the host-side operations
//!
//! ## Usage
//!
//! ```no_run
//! use std::path::Path;
//! use voxel_raymarch::config::EngineConfig;
//!
//! voxel_raymarch::init_logger();
//! voxel_raymarch::run(&EngineConfig::default(), Path::new("frame.png")).unwrap();
//! ```

use std::path::Path;

use log::info;
use web_time::Instant;

use engine_state::{rendering::capture, EngineState};

pub mod config;
pub mod core;
pub mod engine_state;
pub mod error;

pub use config::EngineConfig;
pub use error::EngineError;

/// Initializes `env_logger`, writing to stdout and filtered by `RUST_LOG`.
pub fn init_logger() {
    let mut log_builder = env_logger::Builder::new();
    log_builder
        .target(env_logger::Target::Stdout)
        .parse_env("RUST_LOG")
        .init();

    info!("Logger initialized");
}

/// Builds the world described by `config`, renders `config.frames` frames and
/// saves each one as a PNG next to `output`.
pub fn run(config: &EngineConfig, output: &Path) -> Result<(), EngineError> {
    config.validate()?;

    let start = Instant::now();
    let mut engine = EngineState::new(config);
    info!("World built in {:?}", start.elapsed());

    for index in 0..config.frames {
        let frame = engine.render_frame();
        capture::save_png(frame, capture::frame_path(output, index, config.frames))?;
    }

    info!("Rendered {} frames in {:?}", config.frames, start.elapsed());
    Ok(())
}
