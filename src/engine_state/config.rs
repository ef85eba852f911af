//! # Engine Configuration
//!
//! All tunables of the engine, loaded from a JSON file. Every section and every field
//! has a default, so a config file only needs to name what it changes:
//!
//! ```json
//! { "world": { "terrain": "perlin", "render_distance": 3 } }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use log::info;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::engine_state::rendering::meshing::FaceLayout;
use crate::engine_state::voxels::terrain::TerrainKind;

/// Errors raised while loading a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Output surface size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    pub width: u32,
    pub height: u32,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        ViewportConfig {
            width: 1280,
            height: 720,
        }
    }
}

/// Perspective projection parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectionConfig {
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        ProjectionConfig {
            fov_degrees: 90.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

/// Camera spawn point and movement controls.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub spawn: [f32; 3],
    /// Units per second
    pub move_speed: f32,
    pub mouse_sensitivity: f32,
    /// Normalize the strafe vector
    pub level_strafe: bool,
}

impl Default for CameraConfig {
    fn default() -> Self {
        CameraConfig {
            spawn: [8.0, 70.0, -20.0],
            move_speed: 5.0,
            mouse_sensitivity: 2.0,
            level_strafe: false,
        }
    }
}

/// Chunk streaming, terrain and meshing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Horizontal radius in chunks
    pub render_distance: u32,
    /// Chunk layers above y = 0
    pub world_height: u32,
    pub terrain: TerrainKind,
    pub face_layout: FaceLayout,
    pub seed: u64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        WorldConfig {
            render_distance: 5,
            world_height: 8,
            terrain: TerrainKind::default(),
            face_layout: FaceLayout::default(),
            seed: 0,
        }
    }
}

/// Texture atlas grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AtlasConfig {
    pub columns: u32,
    pub rows: u32,
}

impl Default for AtlasConfig {
    fn default() -> Self {
        AtlasConfig {
            columns: 16,
            rows: 16,
        }
    }
}

/// The headless fly-through run by the binary.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScriptConfig {
    /// Number of frames to render
    pub frames: u32,
    /// Simulated frame time in milliseconds
    pub frame_millis: u64,
}

impl Default for ScriptConfig {
    fn default() -> Self {
        ScriptConfig {
            frames: 240,
            frame_millis: 16,
        }
    }
}

/// The complete engine configuration.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub viewport: ViewportConfig,
    pub projection: ProjectionConfig,
    pub camera: CameraConfig,
    pub world: WorldConfig,
    pub atlas: AtlasConfig,
    pub script: ScriptConfig,
}

impl EngineConfig {
    /// Parses and validates a JSON configuration.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json(&json)?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Rejects values the engine cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.viewport.width == 0 || self.viewport.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "viewport must be non-empty, got {}x{}",
                self.viewport.width, self.viewport.height
            )));
        }
        let projection = &self.projection;
        if projection.near <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "near plane must be positive, got {}",
                projection.near
            )));
        }
        if projection.far <= projection.near {
            return Err(ConfigError::Invalid(format!(
                "far plane ({}) must lie beyond the near plane ({})",
                projection.far, projection.near
            )));
        }
        if !(projection.fov_degrees > 0.0 && projection.fov_degrees < 180.0) {
            return Err(ConfigError::Invalid(format!(
                "field of view must be in (0, 180) degrees, got {}",
                projection.fov_degrees
            )));
        }
        if self.atlas.columns == 0 || self.atlas.rows == 0 {
            return Err(ConfigError::Invalid("atlas grid must be non-empty".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_gives_defaults() {
        let config = EngineConfig::from_json("{}").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.viewport.width, 1280);
        assert_eq!(config.world.face_layout, FaceLayout::Indexed);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = EngineConfig::from_json(
            r#"{ "world": { "terrain": "perlin", "face_layout": "duplicated" }, "camera": { "level_strafe": true } }"#,
        )
        .unwrap();
        assert_eq!(config.world.terrain, TerrainKind::Perlin);
        assert_eq!(config.world.face_layout, FaceLayout::Duplicated);
        assert_eq!(config.world.render_distance, 5);
        assert!(config.camera.level_strafe);
        assert_eq!(config.camera.move_speed, 5.0);
    }

    #[test]
    fn invalid_values_are_rejected() {
        let err = EngineConfig::from_json(r#"{ "projection": { "near": 5.0, "far": 1.0 } }"#)
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
        let err = EngineConfig::from_json(r#"{ "viewport": { "width": 0 } }"#).unwrap_err();
        assert!(err.to_string().contains("viewport"));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        assert!(matches!(
            EngineConfig::from_json("{ nope"),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            EngineConfig::from_json(r#"{ "world": { "terrain": "lava" } }"#),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = EngineConfig::load("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        assert!(err.to_string().contains("/definitely/not/here.json"));
    }
}
