// SPDX-License-Identifier: GPL-3.0-only
// Shared types for camera backend abstraction

//! Shared types for camera backends

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Result type alias for backend operations
pub type BackendResult<T> = Result<T, BackendError>;

/// Errors reported by the hardware side of a capture
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// The device could not be opened (already in use, disconnected, ...)
    DeviceUnavailable(String),
    /// The device is busy with another operation
    Busy,
    /// The capture did not complete in time
    Timeout,
    /// I/O failure while writing the photo
    Io(String),
    /// Encoding the photo failed
    Encoding(String),
    /// A device manifest could not be parsed
    InvalidManifest(String),
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendError::DeviceUnavailable(msg) => write!(f, "Device unavailable: {}", msg),
            BackendError::Busy => write!(f, "Camera is busy"),
            BackendError::Timeout => write!(f, "Capture timed out"),
            BackendError::Io(msg) => write!(f, "I/O error: {}", msg),
            BackendError::Encoding(msg) => write!(f, "Encoding failed: {}", msg),
            BackendError::InvalidManifest(msg) => write!(f, "Invalid device manifest: {}", msg),
        }
    }
}

impl std::error::Error for BackendError {}

impl From<std::io::Error> for BackendError {
    fn from(err: std::io::Error) -> Self {
        BackendError::Io(err.to_string())
    }
}

/// Logical camera position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CameraPosition {
    #[default]
    Back,
    Front,
}

impl CameraPosition {
    /// The opposite-facing position
    pub fn flipped(self) -> Self {
        match self {
            CameraPosition::Back => CameraPosition::Front,
            CameraPosition::Front => CameraPosition::Back,
        }
    }
}

impl fmt::Display for CameraPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CameraPosition::Back => write!(f, "back"),
            CameraPosition::Front => write!(f, "front"),
        }
    }
}

/// Photo format advertised by a device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoFormat {
    pub max_fps: u32,
    pub photo_width: u32,
    pub photo_height: u32,
}

impl fmt::Display for PhotoFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}x{}@{}fps",
            self.photo_width, self.photo_height, self.max_fps
        )
    }
}

/// Represents a camera device as reported by device enumeration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraDevice {
    pub id: String,
    pub name: String,
    pub position: CameraPosition,
    /// Zoom factor of the natural (non-magnified) field of view
    pub neutral_zoom: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
    /// Formats in the order the platform reports them (preferred first)
    #[serde(default)]
    pub formats: Vec<PhotoFormat>,
}

impl CameraDevice {
    /// Preferred photo format, if the device reported any
    pub fn primary_format(&self) -> Option<&PhotoFormat> {
        self.formats.first()
    }

    /// Clamp a zoom factor into the supported range of this device
    pub fn clamp_zoom(&self, zoom: f64) -> f64 {
        // Guard against inverted ranges from misbehaving drivers
        let (lo, hi) = if self.min_zoom <= self.max_zoom {
            (self.min_zoom, self.max_zoom)
        } else {
            (self.max_zoom, self.min_zoom)
        };
        // max/min rather than clamp: a NaN request lands on the lower bound
        zoom.max(lo).min(hi)
    }

    /// Info shown in the default panel: max fps, photo size and name
    pub fn summary(&self) -> DeviceSummary {
        let format = self.primary_format();
        DeviceSummary {
            max_fps: format.map(|f| f.max_fps),
            photo_width: format.map(|f| f.photo_width),
            photo_height: format.map(|f| f.photo_height),
            name: self.name.clone(),
        }
    }
}

/// Display data for the default control panel
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceSummary {
    pub max_fps: Option<u32>,
    pub photo_width: Option<u32>,
    pub photo_height: Option<u32>,
    pub name: String,
}

impl fmt::Display for DeviceSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.max_fps, self.photo_width, self.photo_height) {
            (Some(fps), Some(width), Some(height)) => write!(
                f,
                "Max FPS: {}\nWidth: {} Height: {}\nCamera: {}",
                fps, width, height, self.name
            ),
            _ => write!(f, "Camera: {}", self.name),
        }
    }
}

/// Per-shot flash setting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashMode {
    #[default]
    Off,
    On,
}

impl FlashMode {
    pub fn toggled(self) -> Self {
        match self {
            FlashMode::Off => FlashMode::On,
            FlashMode::On => FlashMode::Off,
        }
    }
}

/// Continuous illumination, independent of the per-shot flash
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TorchMode {
    #[default]
    Off,
    On,
}

impl TorchMode {
    pub fn toggled(self) -> Self {
        match self {
            TorchMode::Off => TorchMode::On,
            TorchMode::On => TorchMode::Off,
        }
    }
}

/// Options passed to the hardware for a single shot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TakePhotoOptions {
    pub flash: FlashMode,
    pub enable_shutter_sound: bool,
}

impl TakePhotoOptions {
    /// Shutter sound is always disabled
    pub fn with_flash(flash: FlashMode) -> Self {
        Self {
            flash,
            enable_shutter_sound: false,
        }
    }
}

/// Live controls applied to an opened device
///
/// Unlike [`TakePhotoOptions`] these stay in effect between shots, the way
/// the preview follows zoom, exposure and torch.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct DeviceControls {
    /// `None` leaves the device at its neutral zoom
    pub zoom: Option<f64>,
    /// Exposure bias in EV
    pub exposure: f64,
    pub torch: TorchMode,
}

/// A photo written by the hardware capture subsystem
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoFile {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
}
