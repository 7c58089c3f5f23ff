// SPDX-License-Identifier: GPL-3.0-only

//! Camera backend abstraction
//!
//! The capture session never talks to hardware directly. It goes through two
//! traits:
//!
//! ```text
//! ┌─────────────────────┐
//! │   CaptureSession    │
//! └──────────┬──────────┘
//!            │ open(device)
//!            ▼
//! ┌─────────────────────┐
//! │ CameraBackend Trait │  ← Turns a device descriptor into a handle
//! └──────────┬──────────┘
//!            │
//!            ▼
//! ┌─────────────────────┐
//! │ PhotoCapturer Trait │  ← apply_controls, take_photo (no shutter sound)
//! └──────────┬──────────┘
//!            │
//!            ▼
//!       ┌────────┐
//!       │Virtual │  ← Software implementation (CLI, tests)
//!       └────────┘
//! ```
//!
//! The handle returned by [`CameraBackend::open`] is wrapped in a
//! [`DeviceHandle`], a scoped capability owned by exactly one active session.

pub mod types;
pub mod virtual_camera;

pub use types::*;
pub use virtual_camera::{VirtualBackend, VirtualCapturer};

use std::future::Future;
use tracing::{debug, info};
use uuid::Uuid;

/// Hardware operations of an opened device
pub trait PhotoCapturer: Send + Sync {
    /// Apply live zoom, exposure and torch
    ///
    /// Called on activation, whenever the parameters change and right
    /// before each shot. Zoom is already clamped to the device range.
    fn apply_controls(&self, controls: &DeviceControls) -> BackendResult<()>;

    /// Capture a single photo
    ///
    /// Suspends while the hardware performs the shot. Implementations must
    /// honour `options.flash` and must not play a shutter sound when
    /// `options.enable_shutter_sound` is false.
    fn take_photo(
        &self,
        options: TakePhotoOptions,
    ) -> impl Future<Output = BackendResult<PhotoFile>> + Send;
}

/// Platform camera backend
pub trait CameraBackend: Send + Sync {
    type Capturer: PhotoCapturer;

    /// Open a device for capture
    ///
    /// # Returns
    /// * `Ok(Capturer)` - Device ready for capture
    /// * `Err(BackendError)` - The device could not be opened
    fn open(&self, device: &CameraDevice) -> BackendResult<Self::Capturer>;
}

/// Exclusive capture capability for one device
///
/// Acquired when a session becomes active and released (dropped) when the
/// session deactivates, switches device or ends.
pub struct DeviceHandle<C> {
    id: Uuid,
    device_id: String,
    capturer: C,
}

impl<C: PhotoCapturer> DeviceHandle<C> {
    /// Open `device` through `backend` and wrap the result
    pub fn acquire<B>(backend: &B, device: &CameraDevice) -> BackendResult<Self>
    where
        B: CameraBackend<Capturer = C>,
    {
        let capturer = backend.open(device)?;
        let handle = Self {
            id: Uuid::new_v4(),
            device_id: device.id.clone(),
            capturer,
        };
        info!(handle = %handle.id, device = %device.name, "Device handle acquired");
        Ok(handle)
    }

    /// Id of the device this handle was opened for
    pub fn device_id(&self) -> &str {
        &self.device_id
    }

    pub fn capturer(&self) -> &C {
        &self.capturer
    }

    /// Push live controls to the device
    pub fn configure(&self, controls: &DeviceControls) -> BackendResult<()> {
        debug!(
            handle = %self.id,
            zoom = ?controls.zoom,
            exposure = controls.exposure,
            torch = ?controls.torch,
            "Applying device controls"
        );
        self.capturer.apply_controls(controls)
    }
}

impl<C> Drop for DeviceHandle<C> {
    fn drop(&mut self) {
        debug!(handle = %self.id, device = %self.device_id, "Device handle released");
    }
}

impl<C> std::fmt::Debug for DeviceHandle<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeviceHandle")
            .field("id", &self.id)
            .field("device_id", &self.device_id)
            .finish()
    }
}
