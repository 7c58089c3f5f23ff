// SPDX-License-Identifier: GPL-3.0-only

//! Permission gate
//!
//! Decides whether capture may initialize. Pure: call it again on every
//! permission change, capture must never initialize while denied.

use crate::backends::permissions::{PermissionState, PermissionStatus};

/// Gate decision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    Allow,
    RedirectToPermissions,
}

/// Evaluate the gate
///
/// Redirects when the camera is not granted, or when the microphone has not
/// been asked yet. A denied microphone does not block photo capture.
pub fn evaluate(state: &PermissionState) -> GateDecision {
    let camera_granted = state.camera == PermissionStatus::Granted;
    let microphone_asked = state.microphone != PermissionStatus::Undetermined;

    if camera_granted && microphone_asked {
        GateDecision::Allow
    } else {
        GateDecision::RedirectToPermissions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [PermissionStatus; 3] = [
        PermissionStatus::Granted,
        PermissionStatus::Denied,
        PermissionStatus::Undetermined,
    ];

    #[test]
    fn test_truth_table() {
        for camera in ALL {
            for microphone in ALL {
                let decision = evaluate(&PermissionState::new(camera, microphone));
                let expected = if camera == PermissionStatus::Granted
                    && microphone != PermissionStatus::Undetermined
                {
                    GateDecision::Allow
                } else {
                    GateDecision::RedirectToPermissions
                };
                assert_eq!(decision, expected, "camera={camera:?} mic={microphone:?}");
            }
        }
    }

    #[test]
    fn test_denied_microphone_allows() {
        let state = PermissionState::new(PermissionStatus::Granted, PermissionStatus::Denied);
        assert_eq!(evaluate(&state), GateDecision::Allow);
    }
}
