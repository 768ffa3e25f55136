//! Configuration types for the engine
//!
//! Loaded from a JSON file; every field falls back to its default so partial
//! files stay valid.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid asset name: {0}")]
    InvalidName(String),
}

/// Dynamics world parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    pub gravity: Vec3,
    /// Seconds per simulation sub-step
    pub fixed_timestep: f32,
    /// Upper bound on sub-steps per frame
    pub max_substeps: u32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: Vec3::new(0.0, -9.81, 0.0),
            fixed_timestep: 1.0 / 60.0,
            max_substeps: 8,
        }
    }
}

/// Scene runtime behaviour
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Roll transforms back to their pre-run values when stopping
    pub restore_transforms_on_stop: bool,
    pub draw_light_meshes: bool,
    pub max_lights: usize,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            restore_transforms_on_stop: false,
            draw_light_meshes: true,
            max_lights: 16,
        }
    }
}

/// Configuration for asset paths
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetConfig {
    /// Root directory for all assets
    pub asset_root: PathBuf,
    /// Directory name for scenes (relative to asset_root)
    pub scenes_dir: String,
    /// Directory name for shaders (relative to asset_root)
    pub shader_dir: String,
}

impl AssetConfig {
    /// Create a new AssetConfig with custom paths
    pub fn new(asset_root: PathBuf, scenes_dir: String, shader_dir: String) -> Self {
        debug!(
            asset_root = ?asset_root,
            scenes_dir = scenes_dir,
            shader_dir = shader_dir,
            "Creating new AssetConfig"
        );
        Self {
            asset_root,
            scenes_dir,
            shader_dir,
        }
    }

    /// Get the full path to a scene file
    pub fn scene_path(&self, name: &str) -> Result<PathBuf, ConfigError> {
        if name.is_empty() || name.contains("..") || name.contains('/') || name.contains('\\') {
            return Err(ConfigError::InvalidName(name.to_string()));
        }
        let path = self
            .asset_root
            .join(&self.scenes_dir)
            .join(format!("{name}.json"));
        debug!(name = name, path = ?path, "Generated scene path");
        Ok(path)
    }

    /// Directory holding shader sources
    pub fn shader_root(&self) -> PathBuf {
        self.asset_root.join(&self.shader_dir)
    }

    /// Check if the asset directories exist
    pub fn validate(&self) -> Result<(), std::io::Error> {
        let scenes_path = self.asset_root.join(&self.scenes_dir);

        if !self.asset_root.exists() {
            return Err(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("Asset root directory not found: {:?}", self.asset_root),
            ));
        }

        if !scenes_path.exists() {
            return Err(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("Scenes directory not found: {scenes_path:?}"),
            ));
        }

        Ok(())
    }
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            asset_root: PathBuf::from("assets"),
            scenes_dir: "scenes".to_string(),
            shader_dir: "shaders".to_string(),
        }
    }
}

/// Top-level engine configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub physics: PhysicsConfig,
    pub scene: SceneConfig,
    pub assets: AssetConfig,
}

impl EngineConfig {
    /// Load configuration from file, or return defaults if not found
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            info!(path = ?path, "Engine config not found, using defaults");
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)?;
        let config = serde_json::from_str(&contents)?;
        info!(path = ?path, "Loaded engine config");
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        debug!(path = ?path, "Saved engine config");
        Ok(())
    }
}
