use std::path::Path;

use log::{info, warn};

use super::EngineConfig;
use crate::error::EngineError;

/// Default config file looked up when no path is given.
const DEFAULT_CONFIG_PATH: &str = "voxel-raymarch.json";

/// Load and validate configuration from a JSON file.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<EngineConfig, EngineError> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(EngineError::ConfigNotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path)?;
    let config: EngineConfig = serde_json::from_str(&content)?;
    config.validate()?;

    info!("Loaded configuration from {}", path.display());
    Ok(config)
}

/// Load configuration from `path`, or from the default file if it exists,
/// falling back to built-in defaults.
///
/// An explicitly given path must exist.
pub fn load_or_default(path: Option<&Path>) -> Result<EngineConfig, EngineError> {
    match path {
        Some(path) => load_config(path),
        None => {
            let default_path = Path::new(DEFAULT_CONFIG_PATH);
            if default_path.exists() {
                return load_config(default_path);
            }
            warn!(
                "No configuration given and {} not found, using defaults",
                DEFAULT_CONFIG_PATH
            );
            Ok(EngineConfig::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::voxels::generation::GenerationMethod;

    #[test]
    fn test_load_missing_config() {
        let result = load_config("/nonexistent/voxel-raymarch.json");
        assert!(matches!(result, Err(EngineError::ConfigNotFound(_))));
    }

    #[test]
    fn test_explicit_missing_path_is_an_error() {
        let result = load_or_default(Some(Path::new("/nonexistent/voxel-raymarch.json")));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_invalid_json() {
        let temp_file = std::env::temp_dir().join("voxel_raymarch_invalid_config.json");
        std::fs::write(&temp_file, "{ \"width\": ").unwrap();

        let result = load_config(&temp_file);
        assert!(matches!(result, Err(EngineError::ConfigParse(_))));

        let _ = std::fs::remove_file(&temp_file);
    }

    #[test]
    fn test_load_config_rejects_invalid_values() {
        let temp_file = std::env::temp_dir().join("voxel_raymarch_zero_width_config.json");
        std::fs::write(&temp_file, r#"{ "width": 0 }"#).unwrap();

        let result = load_config(&temp_file);
        assert!(matches!(result, Err(EngineError::InvalidConfig(_))));

        let _ = std::fs::remove_file(&temp_file);
    }

    #[test]
    fn test_load_config_valid() {
        let temp_file = std::env::temp_dir().join("voxel_raymarch_valid_config.json");
        let config_content = r#"
{
    "width": 320,
    "height": 200,
    "camera": { "position": [4.5, 2.0, -3.0], "yaw": 45.0, "yaw_per_frame": 2.5 },
    "world": { "method": "perlin", "seed": 99 },
    "frames": 12
}
"#;
        std::fs::write(&temp_file, config_content).unwrap();

        let config = load_config(&temp_file).unwrap();
        assert_eq!((config.width, config.height), (320, 200));
        assert_eq!(config.camera.position, [4.5, 2.0, -3.0]);
        assert_eq!(config.camera.yaw, 45.0);
        assert_eq!(config.camera.pitch, 0.0);
        assert_eq!(config.camera.yaw_per_frame, 2.5);
        assert_eq!(config.world.method, GenerationMethod::Perlin);
        assert_eq!(config.world.seed, 99);
        assert_eq!(config.frames, 12);

        let _ = std::fs::remove_file(&temp_file);
    }
}
