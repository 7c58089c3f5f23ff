// SPDX-License-Identifier: GPL-3.0-only

//! Error types for the capture session

use crate::backends::camera::BackendError;
use crate::gallery::Platform;
use std::fmt;

/// Result type alias using SessionError
pub type SessionResult<T> = Result<T, SessionError>;

/// Failures surfaced by the capture session
///
/// None of these end the session. `PermissionDenied` is the only one that
/// causes a structural transition (a redirect to the permission screen); the
/// capture-path variants are terminal only for the attempt that produced them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// Camera not granted or microphone not yet determined
    PermissionDenied,
    /// No device resolved yet for the requested position
    DevicePending,
    /// Capture attempted while no device handle exists
    HandleUnavailable,
    /// Another capture is still running against the handle
    CaptureInProgress,
    /// The hardware capture call failed
    Hardware(BackendError),
    /// No gallery locator registered for the platform
    GalleryUnavailable(Platform),
    /// The gallery locator could not be opened
    GalleryLaunch(String),
}

/// Configuration loading errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The config file exists but could not be read
    Read(String),
    /// The config file is not valid JSON for [`crate::config::Config`]
    Parse(String),
}

impl SessionError {
    /// Whether retrying the same operation later can succeed without user action
    pub fn is_transient(&self) -> bool {
        match self {
            SessionError::DevicePending
            | SessionError::HandleUnavailable
            | SessionError::CaptureInProgress
            | SessionError::Hardware(_) => true,
            SessionError::PermissionDenied
            | SessionError::GalleryUnavailable(_)
            | SessionError::GalleryLaunch(_) => false,
        }
    }
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::PermissionDenied => write!(f, "Camera or microphone permission missing"),
            SessionError::DevicePending => write!(f, "No camera device available yet"),
            SessionError::HandleUnavailable => write!(f, "Camera handle is not available"),
            SessionError::CaptureInProgress => write!(f, "A capture is already in progress"),
            SessionError::Hardware(e) => write!(f, "Capture failed: {}", e),
            SessionError::GalleryUnavailable(platform) => {
                write!(f, "No gallery target for platform {}", platform)
            }
            SessionError::GalleryLaunch(msg) => write!(f, "Failed to open gallery: {}", msg),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Read(msg) => write!(f, "Failed to read config: {}", msg),
            ConfigError::Parse(msg) => write!(f, "Invalid config: {}", msg),
        }
    }
}

impl std::error::Error for SessionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SessionError::Hardware(e) => Some(e),
            _ => None,
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<BackendError> for SessionError {
    fn from(err: BackendError) -> Self {
        SessionError::Hardware(err)
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::Read(err.to_string())
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Parse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capture_failures_are_transient() {
        assert!(SessionError::HandleUnavailable.is_transient());
        assert!(SessionError::CaptureInProgress.is_transient());
        assert!(SessionError::Hardware(BackendError::Timeout).is_transient());
        assert!(!SessionError::PermissionDenied.is_transient());
    }

    #[test]
    fn test_hardware_error_display_includes_detail() {
        let err = SessionError::from(BackendError::Io("disk full".into()));
        assert_eq!(err.to_string(), "Capture failed: I/O error: disk full");
    }
}
