//! Persisted user settings and on-disk locations.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::engine::RowLayout;
use crate::error::FileError;
use crate::model::ZoomLevel;

/// Overrides the directory holding the autosaved schedule.
pub const DATA_DIR_ENV: &str = "SHOPFLOOR_DATA_DIR";

const SETTINGS_FILE: &str = "settings.json";
const AUTOSAVE_FILE: &str = "schedule.json";

/// Persisted user settings (lives in the OS config directory).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub default_zoom: ZoomLevel,
    /// Last document opened or saved through the file dialogs.
    pub last_file: Option<PathBuf>,
    pub row_layout: RowLayout,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            default_zoom: ZoomLevel::Day,
            last_file: None,
            row_layout: RowLayout::default(),
        }
    }
}

impl AppSettings {
    /// Read settings, falling back to defaults when the file is missing or unreadable.
    pub fn load(path: &Path) -> Self {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "No settings file, using defaults");
                return Self::default();
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to read settings, using defaults");
                return Self::default();
            }
        };
        match serde_json::from_str(&contents) {
            Ok(settings) => settings,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Invalid settings file, using defaults");
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), FileError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

/// Where settings and the autosaved schedule live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppPaths {
    pub config_dir: PathBuf,
    pub data_dir: PathBuf,
}

impl AppPaths {
    /// OS-specific directories, with `SHOPFLOOR_DATA_DIR` taking precedence
    /// for the data dir. Falls back to the working directory.
    pub fn resolve() -> Self {
        let (config_dir, data_dir) = match directories::ProjectDirs::from("", "", "ShopfloorTimeline") {
            Some(dirs) => (dirs.config_dir().to_path_buf(), dirs.data_dir().to_path_buf()),
            None => (PathBuf::from("."), PathBuf::from(".")),
        };
        let data_dir = std::env::var_os(DATA_DIR_ENV)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .unwrap_or(data_dir);
        Self { config_dir, data_dir }
    }

    pub fn settings_file(&self) -> PathBuf {
        self.config_dir.join(SETTINGS_FILE)
    }

    pub fn autosave_file(&self) -> PathBuf {
        self.data_dir.join(AUTOSAVE_FILE)
    }
}
