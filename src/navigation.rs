// SPDX-License-Identifier: GPL-3.0-only

//! Outbound navigation requests
//!
//! The session decides *where* to go; the presentation layer owns the routing
//! stack and implements [`Navigator`].

use serde::Serialize;
use std::path::Path;
use std::sync::Mutex;

/// Kind of media handed to the viewer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Photo,
}

/// Parameters of the media viewer route
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MediaParams {
    /// Path of the captured file
    pub media: String,
    #[serde(rename = "type")]
    pub media_type: MediaType,
}

impl MediaParams {
    pub fn photo(path: &Path) -> Self {
        Self {
            media: path.display().to_string(),
            media_type: MediaType::Photo,
        }
    }
}

/// Navigation targets reachable from the capture screen
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "route", rename_all = "lowercase")]
pub enum Route {
    /// Media viewer showing a freshly captured photo
    Media(MediaParams),
    /// Permission request screen
    Permissions,
    /// Settings / route index
    Settings,
}

impl Route {
    /// Path of the route in the presentation layer's router
    pub fn path(&self) -> &'static str {
        match self {
            Route::Media(_) => "/media",
            Route::Permissions => "/permissions",
            Route::Settings => "/_sitemap",
        }
    }
}

/// Receives navigation requests
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route);
}

/// Navigator that records every request, in order
///
/// Useful for headless runs where nobody is there to render the next screen.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    routes: Mutex<Vec<Route>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    /// All routes requested so far
    pub fn routes(&self) -> Vec<Route> {
        self.routes
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn last(&self) -> Option<Route> {
        self.routes
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .last()
            .cloned()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, route: Route) {
        self.routes
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(route);
    }
}
