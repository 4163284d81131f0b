//! # Voxel Raymarch Entry Point
//!
//! Renders frames of a generated voxel world to PNG files.
//!
//! ## Usage
//!
//! ```bash
//! RUST_LOG=info cargo run --release -- --config scene.json --output frame.png --frames 24
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::error;

/// Command-line arguments.
#[derive(Parser, Debug)]
#[command(name = "voxel-raymarch")]
#[command(about = "Ray-marches a chunked voxel world and saves the frames as PNG")]
struct Args {
    /// Path to a JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output PNG path; sequences get a frame index appended
    #[arg(short, long, default_value = "frame.png")]
    output: PathBuf,

    /// Number of frames to render (overrides config)
    #[arg(short, long)]
    frames: Option<usize>,

    /// Image width in pixels (overrides config)
    #[arg(long)]
    width: Option<u32>,

    /// Image height in pixels (overrides config)
    #[arg(long)]
    height: Option<u32>,
}

fn main() -> ExitCode {
    let args = Args::parse();
    voxel_raymarch::init_logger();

    let mut config = match voxel_raymarch::config::load_or_default(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Some(frames) = args.frames {
        config.frames = frames;
    }
    if let Some(width) = args.width {
        config.width = width;
    }
    if let Some(height) = args.height {
        config.height = height;
    }

    match voxel_raymarch::run(&config, &args.output) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
