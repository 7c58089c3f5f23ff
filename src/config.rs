// SPDX-License-Identifier: GPL-3.0-only

//! Read-only application configuration
//!
//! Loaded once at startup from JSON. Capture parameters are never stored
//! here; zoom, exposure, flash and torch always start from their defaults.

use crate::backends::camera::CameraPosition;
use crate::constants::{CONFIG_DIR_NAME, CONFIG_FILE_NAME, DEFAULT_SAVE_FOLDER};
use crate::errors::ConfigError;
use crate::gallery::{GalleryTargets, Platform};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Camera the session starts on
    pub default_position: CameraPosition,
    /// Folder under the pictures directory that receives photos
    pub save_folder_name: String,
    /// Gallery locators replacing the built-in ones, keyed by platform
    pub gallery_overrides: HashMap<Platform, String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_position: CameraPosition::Back,
            save_folder_name: DEFAULT_SAVE_FOLDER.to_string(),
            gallery_overrides: HashMap::new(),
        }
    }
}

impl Config {
    /// `<config dir>/obscura/config.json`, if the platform has a config dir
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Load from `path`; a missing file yields the defaults
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "No config file, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(e.into()),
        };

        let config: Config = serde_json::from_str(&contents)?;
        info!(path = %path.display(), "Loaded config");
        Ok(config)
    }

    /// Load from [`Config::default_path`]
    pub fn load_default() -> Result<Self, ConfigError> {
        match Self::default_path() {
            Some(path) => Self::load(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn photo_directory(&self) -> PathBuf {
        crate::storage::photo_directory(&self.save_folder_name)
    }

    /// Built-in gallery table with this config's overrides applied
    pub fn gallery_targets(&self) -> GalleryTargets {
        GalleryTargets::with_defaults(&self.photo_directory())
            .with_overrides(&self.gallery_overrides)
    }
}
