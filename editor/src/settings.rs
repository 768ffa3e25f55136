//! Project settings management
//!
//! A project is a directory holding a `<name>.project` JSON file next to its
//! scenes and the temporary directory used when building behaviour scripts.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

/// Extension of project files
pub const PROJECT_EXTENSION: &str = "project";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid project name '{0}'")]
    InvalidName(String),
}

/// Persistent per-project settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ProjectSettings {
    pub project_name: String,
    /// Directory containing the project file
    pub root_path: PathBuf,
    /// Scene reopened with the project and targeted by quick-save
    #[serde(default)]
    pub last_scene_path: Option<PathBuf>,
    /// Scratch directory for script builds
    #[serde(default)]
    pub script_temp_dir: PathBuf,
    /// Settings version for future migration support
    #[serde(default = "default_version")]
    pub version: u32,
}

fn default_version() -> u32 {
    1
}

impl Default for ProjectSettings {
    fn default() -> Self {
        Self {
            project_name: "Untitled".to_string(),
            root_path: PathBuf::from("."),
            last_scene_path: None,
            script_temp_dir: PathBuf::from("./temp"),
            version: default_version(),
        }
    }
}

impl ProjectSettings {
    /// Settings for a project rooted at `parent_dir/name`
    pub fn new(name: &str, parent_dir: &Path) -> Result<Self, SettingsError> {
        if name.is_empty() || name.contains(['/', '\\']) || name == "." || name == ".." {
            return Err(SettingsError::InvalidName(name.to_string()));
        }
        let root_path = parent_dir.join(name);
        Ok(Self {
            project_name: name.to_string(),
            script_temp_dir: root_path.join("temp"),
            root_path,
            last_scene_path: None,
            version: default_version(),
        })
    }

    /// Create the project directory layout and write the project file
    pub fn create(name: &str, parent_dir: &Path) -> Result<Self, SettingsError> {
        let settings = Self::new(name, parent_dir)?;
        fs::create_dir_all(&settings.root_path)?;
        fs::create_dir_all(&settings.script_temp_dir)?;
        settings.save()?;
        info!(project = %settings.project_name, root = ?settings.root_path, "Created project");
        Ok(settings)
    }

    /// Path of the project file
    pub fn project_file_path(&self) -> PathBuf {
        self.root_path
            .join(format!("{}.{}", self.project_name, PROJECT_EXTENSION))
    }

    /// Save to the project file inside the root directory
    pub fn save(&self) -> Result<(), SettingsError> {
        self.save_to(self.project_file_path())
    }

    /// Save settings to a specific path
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> Result<(), SettingsError> {
        let json = serde_json::to_string_pretty(self)?;
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&path, json)?;
        info!("Saved project settings to {:?}", path.as_ref());
        Ok(())
    }

    /// Load settings from a specific path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let content = fs::read_to_string(&path)?;
        let settings: Self = serde_json::from_str(&content)?;
        info!("Loaded project settings from {:?}", path.as_ref());
        Ok(settings)
    }

    /// Remembered scene, if it still exists on disk
    pub fn last_scene(&self) -> Option<&Path> {
        let path = self.last_scene_path.as_deref()?;
        if path.exists() {
            Some(path)
        } else {
            warn!(path = ?path, "Last scene no longer exists");
            None
        }
    }
}
