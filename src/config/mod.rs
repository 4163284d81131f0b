//! # Engine Configuration
//!
//! JSON configuration for a render run. Every field has a default, so an
//! empty object (or no file at all) is a valid configuration.
//!
//! ```json
//! {
//!   "width": 640,
//!   "height": 480,
//!   "render": { "fov_degrees": 90, "step_epsilon": 0.01, "max_distance": 128, "traversal": "dda" },
//!   "camera": { "position": [0, 0, 0], "yaw": 0, "pitch": 0, "yaw_per_frame": 0, "pitch_per_frame": 0 },
//!   "world": { "method": "random", "seed": 0, "density": 0.02 },
//!   "frames": 1
//! }
//! ```

mod loader;

use serde::{Deserialize, Serialize};

use crate::engine_state::camera_state::camera::DEFAULT_FOV_DEGREES;
use crate::engine_state::rendering::ray_marcher::{
    DEFAULT_MAX_DISTANCE, DEFAULT_STEP_EPSILON, MAX_MARCH_DISTANCE, MIN_STEP_EPSILON,
};
use crate::engine_state::rendering::TraversalMethod;
use crate::engine_state::voxels::generation::GenerationMethod;
use crate::error::EngineError;

pub use loader::{load_config, load_or_default};

/// Top-level configuration of a render run.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Ray generation and traversal
    pub render: RenderConfig,
    /// Initial camera and its animation
    pub camera: CameraConfig,
    /// World generation
    pub world: WorldConfig,
    /// Number of frames to render
    pub frames: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            render: RenderConfig::default(),
            camera: CameraConfig::default(),
            world: WorldConfig::default(),
            frames: 1,
        }
    }
}

/// Ray generation and traversal settings.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Field of view in degrees, before aspect scaling
    pub fov_degrees: f32,
    /// Overshoot added to every march step
    pub step_epsilon: f32,
    /// Distance after which a ray misses
    pub max_distance: f32,
    /// `dda` or `bresenham`
    pub traversal: TraversalMethod,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            fov_degrees: DEFAULT_FOV_DEGREES,
            step_epsilon: DEFAULT_STEP_EPSILON,
            max_distance: DEFAULT_MAX_DISTANCE,
            traversal: TraversalMethod::default(),
        }
    }
}

/// Initial camera placement and the turntable applied between frames.
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct CameraConfig {
    /// World-space position
    pub position: [f32; 3],
    /// Yaw in degrees
    pub yaw: f32,
    /// Pitch in degrees, clamped to `[-90, 90]`
    pub pitch: f32,
    /// Degrees of yaw added after each frame
    pub yaw_per_frame: f32,
    /// Degrees of pitch added after each frame
    pub pitch_per_frame: f32,
}

/// World generation settings.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Procedural fill
    pub method: GenerationMethod,
    /// Seed for the random and noise based fills
    pub seed: u64,
    /// Probability of a solid voxel for the random fills
    pub density: f64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            method: GenerationMethod::default(),
            seed: 0,
            density: 0.02,
        }
    }
}

impl EngineConfig {
    /// Checks that the configuration can be rendered.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.width == 0 || self.height == 0 {
            return Err(EngineError::InvalidConfig(format!(
                "resolution must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }
        if !(self.render.step_epsilon >= MIN_STEP_EPSILON && self.render.step_epsilon.is_finite()) {
            return Err(EngineError::InvalidConfig(format!(
                "render.step_epsilon must be at least {}, got {}",
                MIN_STEP_EPSILON, self.render.step_epsilon
            )));
        }
        if !(self.render.max_distance > 0.0 && self.render.max_distance <= MAX_MARCH_DISTANCE) {
            return Err(EngineError::InvalidConfig(format!(
                "render.max_distance must be in (0, {}], got {}",
                MAX_MARCH_DISTANCE, self.render.max_distance
            )));
        }
        if !(self.render.fov_degrees > 0.0 && self.render.fov_degrees < 180.0) {
            return Err(EngineError::InvalidConfig(format!(
                "render.fov_degrees must be between 0 and 180, got {}",
                self.render.fov_degrees
            )));
        }
        if !(0.0..=1.0).contains(&self.world.density) {
            return Err(EngineError::InvalidConfig(format!(
                "world.density must be in [0, 1], got {}",
                self.world.density
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.render.fov_degrees, 90.0);
        assert_eq!(config.render.step_epsilon, 0.01);
        assert_eq!(config.render.max_distance, 128.0);
        assert_eq!(config.world.method, GenerationMethod::Random);
    }

    #[test]
    fn test_empty_object_uses_defaults() {
        let config: EngineConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn test_partial_sections_keep_other_defaults() {
        let config: EngineConfig = serde_json::from_str(
            r#"{ "render": { "traversal": "bresenham" }, "world": { "method": "shell" } }"#,
        )
        .unwrap();
        assert_eq!(config.render.traversal, TraversalMethod::Bresenham);
        assert_eq!(config.render.max_distance, 128.0);
        assert_eq!(config.world.method, GenerationMethod::Shell);
        assert_eq!(config.world.density, 0.02);
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let cases: [fn(&mut EngineConfig); 10] = [
            |c: &mut EngineConfig| c.width = 0,
            |c: &mut EngineConfig| c.height = 0,
            |c: &mut EngineConfig| c.render.step_epsilon = 0.0,
            |c: &mut EngineConfig| c.render.step_epsilon = 1e-9,
            |c: &mut EngineConfig| c.render.max_distance = -1.0,
            |c: &mut EngineConfig| c.render.max_distance = 1e9,
            |c: &mut EngineConfig| c.render.max_distance = f32::INFINITY,
            |c: &mut EngineConfig| c.render.fov_degrees = 180.0,
            |c: &mut EngineConfig| c.render.fov_degrees = 0.0,
            |c: &mut EngineConfig| c.world.density = 1.5,
        ];

        for mutate in cases {
            let mut config = EngineConfig::default();
            mutate(&mut config);
            assert!(matches!(config.validate(), Err(EngineError::InvalidConfig(_))));
        }
    }

    #[test]
    fn test_march_limits_are_accepted() {
        let mut config = EngineConfig::default();
        config.render.max_distance = MAX_MARCH_DISTANCE;
        config.render.step_epsilon = MIN_STEP_EPSILON;
        assert!(config.validate().is_ok());
    }
}
