// SPDX-License-Identifier: GPL-3.0-only

//! Device selection by camera position

use crate::backends::camera::{CameraDevice, CameraPosition};
use tracing::debug;

/// Outcome of a selection
#[derive(Debug, Clone, PartialEq)]
pub enum DeviceSelection {
    Resolved(CameraDevice),
    /// Enumeration has not produced a device for the position yet
    Pending,
}

impl DeviceSelection {
    pub fn device(&self) -> Option<&CameraDevice> {
        match self {
            DeviceSelection::Resolved(device) => Some(device),
            DeviceSelection::Pending => None,
        }
    }
}

/// Pick the device for `position`
///
/// The first device in enumeration order wins; platforms list their preferred
/// (multi-lens) device first. Nothing is cached, callers re-run this after
/// every position change and every device-set update.
pub fn select(position: CameraPosition, devices: &[CameraDevice]) -> DeviceSelection {
    match devices.iter().find(|d| d.position == position) {
        Some(device) => {
            debug!(position = %position, device = %device.name, "Device selected");
            DeviceSelection::Resolved(device.clone())
        }
        None => {
            debug!(position = %position, available = devices.len(), "No device for position yet");
            DeviceSelection::Pending
        }
    }
}
