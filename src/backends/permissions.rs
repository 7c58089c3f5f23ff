// SPDX-License-Identifier: GPL-3.0-only

//! Permission state as reported by the platform permission subsystem

use serde::{Deserialize, Serialize};

/// Status of a single runtime permission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PermissionStatus {
    Granted,
    Denied,
    /// The user has not been asked yet
    #[default]
    #[serde(alias = "not-determined")]
    Undetermined,
}

/// Camera and microphone permission snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PermissionState {
    pub camera: PermissionStatus,
    pub microphone: PermissionStatus,
}

impl PermissionState {
    pub fn new(camera: PermissionStatus, microphone: PermissionStatus) -> Self {
        Self { camera, microphone }
    }

    /// Both permissions granted
    pub fn granted() -> Self {
        Self::new(PermissionStatus::Granted, PermissionStatus::Granted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_undetermined() {
        let state = PermissionState::default();
        assert_eq!(state.camera, PermissionStatus::Undetermined);
        assert_eq!(state.microphone, PermissionStatus::Undetermined);
    }

    #[test]
    fn test_not_determined_alias() {
        let status: PermissionStatus = serde_json::from_str("\"not-determined\"").unwrap();
        assert_eq!(status, PermissionStatus::Undetermined);
    }
}
