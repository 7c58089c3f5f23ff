// SPDX-License-Identifier: GPL-3.0-only

//! Application-wide constants

/// Zoom shown by the zoom panel while no device has been initialized
pub const FALLBACK_PANEL_ZOOM: f64 = 1.0;

/// Folder under the user's pictures directory that receives photos
pub const DEFAULT_SAVE_FOLDER: &str = "Obscura";

/// Directory name under the user's config directory
pub const CONFIG_DIR_NAME: &str = "obscura";

pub const CONFIG_FILE_NAME: &str = "config.json";

/// Extensions recognised as photos when scanning the photo directory
pub const PHOTO_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];
