// SPDX-License-Identifier: GPL-3.0-only

//! Gallery targets per platform
//!
//! Each platform opens its photo gallery through a different locator: a URL
//! scheme on iOS, a content URI on Android and the photo directory on the
//! desktop. The table is built once and injected into the session, so the
//! core never branches on the platform itself.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use tracing::info;

pub const IOS_GALLERY_URL: &str = "photos-redirect://";
pub const ANDROID_GALLERY_URI: &str = "content://media/external/images/media";

/// Platform identifier used as the strategy key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Ios,
    Android,
    Desktop,
}

impl Platform {
    /// Platform the binary was compiled for
    pub fn current() -> Self {
        if cfg!(target_os = "ios") {
            Platform::Ios
        } else if cfg!(target_os = "android") {
            Platform::Android
        } else {
            Platform::Desktop
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Platform::Ios => write!(f, "ios"),
            Platform::Android => write!(f, "android"),
            Platform::Desktop => write!(f, "desktop"),
        }
    }
}

/// Strategy table from platform to gallery locator
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GalleryTargets {
    targets: HashMap<Platform, String>,
}

impl GalleryTargets {
    /// Built-in locators, with the desktop pointing at `photo_dir`
    pub fn with_defaults(photo_dir: &Path) -> Self {
        let mut targets = HashMap::new();
        targets.insert(Platform::Ios, IOS_GALLERY_URL.to_string());
        targets.insert(Platform::Android, ANDROID_GALLERY_URI.to_string());
        targets.insert(Platform::Desktop, photo_dir.display().to_string());
        Self { targets }
    }

    /// Replace or add locators
    pub fn with_overrides(mut self, overrides: &HashMap<Platform, String>) -> Self {
        for (platform, target) in overrides {
            self.targets.insert(*platform, target.clone());
        }
        self
    }

    pub fn insert(&mut self, platform: Platform, target: impl Into<String>) {
        self.targets.insert(platform, target.into());
    }

    pub fn lookup(&self, platform: Platform) -> Option<&str> {
        self.targets.get(&platform).map(String::as_str)
    }
}

/// Opens a gallery locator
pub trait GalleryLauncher: Send + Sync {
    fn launch(&self, target: &str) -> std::io::Result<()>;
}

/// Launcher backed by the system URL/file handler
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemLauncher;

impl GalleryLauncher for SystemLauncher {
    fn launch(&self, target: &str) -> std::io::Result<()> {
        info!(target = %target, "Opening gallery");
        open::that_detached(target)
    }
}
