//! Editor settings

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::PersistenceError;

/// Gesture tuning for the manipulation machine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManipulationSettings {
    /// Horizontal drag, as a fraction of the viewport width, for a full turn about Y
    pub full_swing_y: f32,
    /// Vertical drag, as a fraction of the viewport height, for a full turn about camera right
    pub full_swing_x: f32,
    /// Scale change per unit of normalized drag
    pub scale_sensitivity: f32,
    pub min_scale: f32,
    pub max_scale: f32,
    /// Normalized drags shorter than this are ignored
    pub movement_epsilon: f32,
}

impl Default for ManipulationSettings {
    fn default() -> Self {
        Self {
            full_swing_y: 0.6,
            full_swing_x: 0.6,
            scale_sensitivity: 6.0,
            min_scale: 0.25,
            max_scale: 3.0,
            movement_epsilon: 0.01,
        }
    }
}

/// Camera navigation speeds, applied only while nothing is selected
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavigationSettings {
    /// Degrees of orbit per degree of two-finger twist
    pub rotate_speed: f32,
    /// World units of dolly per unit of pinch
    pub zoom_speed: f32,
    pub pan_speed: f32,
    /// Closest the camera may get to its look-at point
    pub min_distance: f32,
}

impl Default for NavigationSettings {
    fn default() -> Self {
        Self {
            rotate_speed: 0.1,
            zoom_speed: 1.5,
            pan_speed: 1.0,
            min_distance: 2.0,
        }
    }
}

/// Where scenes are written
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageSettings {
    /// Folder name under the platform data directory
    pub folder_name: String,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            folder_name: "Scenes".into(),
        }
    }
}

impl StorageSettings {
    /// Default scene folder for this platform
    pub fn default_folder(&self) -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.data_dir().join(&self.folder_name))
    }
}

/// All editor settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EditorSettings {
    #[serde(default)]
    pub manipulation: ManipulationSettings,
    #[serde(default)]
    pub navigation: NavigationSettings,
    #[serde(default)]
    pub storage: StorageSettings,
}

fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("com", "scene-placer", "scene-placer")
}

impl EditorSettings {
    /// Load settings from the platform config dir, or return default if not found
    pub fn load() -> Self {
        if let Some(dirs) = project_dirs() {
            let config_path = dirs.config_dir().join("settings.json");
            match Self::load_from(&config_path) {
                Ok(settings) => return settings,
                Err(PersistenceError::Io { .. }) => {}
                Err(e) => tracing::warn!("Ignoring settings file: {e}"),
            }
        }
        Self::default()
    }

    /// Save settings to the platform config dir
    pub fn save(&self) {
        if let Some(dirs) = project_dirs() {
            let config_path = dirs.config_dir().join("settings.json");
            if let Err(e) = self.save_to(&config_path) {
                tracing::warn!("Failed to save settings: {e}");
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, PersistenceError> {
        let json = std::fs::read_to_string(path).map_err(|e| PersistenceError::io(path, e))?;
        serde_json::from_str(&json).map_err(|source| PersistenceError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn save_to(&self, path: &Path) -> Result<(), PersistenceError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| PersistenceError::io(parent, e))?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).map_err(|e| PersistenceError::io(path, e))
    }
}
