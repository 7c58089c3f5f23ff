// SPDX-License-Identifier: GPL-3.0-only

//! Capture session state machine
//!
//! ```text
//!   PermissionState ──┐
//!                     ▼
//!             ┌────────────────┐  redirect   ┌───────────┐
//!             │ PermissionGate │────────────▶│ Navigator │
//!             └───────┬────────┘             └───────────┘
//!                     │ Allow                      ▲
//!   Vec<CameraDevice> ▼                            │ /media
//!             ┌────────────────┐              ┌────┴───────────────────┐
//!             │ DeviceSelector │─────────────▶│ CaptureSessionController│
//!             └───────┬────────┘  handle      └────────────────────────┘
//!                     ▼                            ▲
//!             ┌───────────────────────┐  params    │
//!             │ CaptureParameterStore │────────────┘
//!             └───────────────────────┘
//! ```
//!
//! The session starts `Gated` and becomes `Active` only once the gate allows
//! and a device is resolved for the current position. Permission and device
//! updates can arrive at any time; each one re-runs the whole evaluation, so
//! a revoked permission drops the session back to `Gated` and releases the
//! device handle.
//!
//! Internal state sits behind a mutex that is never held across an await.
//! Parameter changes and panel toggles can therefore be dispatched while a
//! capture is pending.

pub mod controller;
pub mod device_selector;
pub mod parameters;
pub mod permission_gate;

pub use controller::{CaptureSessionController, CapturedPhoto};
pub use device_selector::DeviceSelection;
pub use parameters::{CaptureParameterStore, CaptureParameters, ParameterSnapshot, UiMode};
pub use permission_gate::GateDecision;

use crate::backends::camera::{
    CameraBackend, CameraDevice, CameraPosition, DeviceHandle, DeviceSummary,
};
use crate::backends::permissions::PermissionState;
use crate::errors::{SessionError, SessionResult};
use crate::gallery::{GalleryLauncher, GalleryTargets, Platform, SystemLauncher};
use crate::navigation::{MediaParams, Navigator, Route};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Why the session is not active
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateReason {
    PermissionDenied,
    DevicePending,
}

/// Session-level state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Gated(GateReason),
    Active,
    /// Torn down; no further activation
    Ended,
}

impl SessionStatus {
    pub fn is_active(&self) -> bool {
        matches!(self, SessionStatus::Active)
    }
}

/// What is left to do after the locked part of a reconcile
enum Step {
    Settled { redirect: bool },
    /// Active without a handle for this device
    Acquire(CameraDevice),
}

struct SessionInner<C> {
    permissions: PermissionState,
    devices: Vec<CameraDevice>,
    position: CameraPosition,
    device: Option<CameraDevice>,
    handle: Option<Arc<DeviceHandle<C>>>,
    /// A redirect was emitted for the current denial
    redirected: bool,
    ended: bool,
}

/// One capture screen session
pub struct CaptureSession<B: CameraBackend> {
    id: Uuid,
    backend: B,
    navigator: Arc<dyn Navigator>,
    gallery: GalleryTargets,
    launcher: Arc<dyn GalleryLauncher>,
    platform: Platform,
    parameters: CaptureParameterStore,
    controller: CaptureSessionController,
    status: watch::Sender<SessionStatus>,
    inner: Mutex<SessionInner<B::Capturer>>,
}

impl<B: CameraBackend> CaptureSession<B> {
    /// Create a gated session for the back camera
    ///
    /// Nothing is evaluated until the first permission or device update.
    pub fn new(backend: B, navigator: Arc<dyn Navigator>) -> Self {
        let (status, _) = watch::channel(SessionStatus::Gated(GateReason::PermissionDenied));
        let id = Uuid::new_v4();
        info!(session = %id, "Capture session created");

        Self {
            id,
            backend,
            navigator,
            gallery: GalleryTargets::default(),
            launcher: Arc::new(SystemLauncher),
            platform: Platform::current(),
            parameters: CaptureParameterStore::new(),
            controller: CaptureSessionController::new(),
            status,
            inner: Mutex::new(SessionInner {
                permissions: PermissionState::default(),
                devices: Vec::new(),
                position: CameraPosition::default(),
                device: None,
                handle: None,
                redirected: false,
                ended: false,
            }),
        }
    }

    /// Start on `position` instead of the back camera
    pub fn with_position(self, position: CameraPosition) -> Self {
        self.lock_inner().position = position;
        self
    }

    /// Gallery strategy table and the launcher used to open its entries
    pub fn with_gallery(
        mut self,
        targets: GalleryTargets,
        launcher: Arc<dyn GalleryLauncher>,
    ) -> Self {
        self.gallery = targets;
        self.launcher = launcher;
        self
    }

    /// Override the platform used for gallery lookups
    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    fn lock_inner(&self) -> MutexGuard<'_, SessionInner<B::Capturer>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // ===== Observation =====

    pub fn status(&self) -> SessionStatus {
        *self.status.borrow()
    }

    /// Receive the session status after every transition
    pub fn subscribe_status(&self) -> watch::Receiver<SessionStatus> {
        self.status.subscribe()
    }

    pub fn parameters(&self) -> &CaptureParameterStore {
        &self.parameters
    }

    pub fn position(&self) -> CameraPosition {
        self.lock_inner().position
    }

    /// Device of the active session
    pub fn device(&self) -> Option<CameraDevice> {
        self.lock_inner().device.clone()
    }

    /// Default-panel info for the active device
    pub fn device_summary(&self) -> Option<DeviceSummary> {
        self.lock_inner().device.as_ref().map(CameraDevice::summary)
    }

    pub fn has_handle(&self) -> bool {
        self.lock_inner().handle.is_some()
    }

    pub fn is_capturing(&self) -> bool {
        self.controller.is_capturing()
    }

    // ===== Inbound updates =====

    /// New permission state from the permission subsystem
    pub fn update_permissions(&self, permissions: PermissionState) {
        debug!(session = %self.id, ?permissions, "Permission update");
        self.lock_inner().permissions = permissions;
        self.reconcile();
    }

    /// New device set from device enumeration
    pub fn update_devices(&self, devices: Vec<CameraDevice>) {
        debug!(session = %self.id, count = devices.len(), "Device list update");
        self.lock_inner().devices = devices;
        self.reconcile();
    }

    /// Switch between back and front camera
    pub fn toggle_position(&self) -> CameraPosition {
        let position = {
            let mut inner = self.lock_inner();
            inner.position = inner.position.flipped();
            inner.position
        };
        info!(session = %self.id, position = %position, "Camera position switched");
        self.reconcile();
        position
    }

    /// Follow permission and device sources until both are closed
    ///
    /// Applies the current value of each source first, then every change.
    /// Parameter changes are pushed to the device while this runs.
    pub async fn watch(
        &self,
        mut permissions: watch::Receiver<PermissionState>,
        mut devices: watch::Receiver<Vec<CameraDevice>>,
    ) {
        let current = *permissions.borrow_and_update();
        self.update_permissions(current);
        let current = devices.borrow_and_update().clone();
        self.update_devices(current);

        let mut parameters = self.parameters.subscribe();
        self.sync_controls();

        let mut permissions_open = true;
        let mut devices_open = true;

        while permissions_open || devices_open {
            tokio::select! {
                changed = permissions.changed(), if permissions_open => match changed {
                    Ok(()) => {
                        let state = *permissions.borrow_and_update();
                        self.update_permissions(state);
                    }
                    Err(_) => {
                        debug!(session = %self.id, "Permission source closed");
                        permissions_open = false;
                    }
                },
                changed = devices.changed(), if devices_open => match changed {
                    Ok(()) => {
                        let list = devices.borrow_and_update().clone();
                        self.update_devices(list);
                    }
                    Err(_) => {
                        debug!(session = %self.id, "Device source closed");
                        devices_open = false;
                    }
                },
                Ok(()) = parameters.changed() => self.sync_controls(),
            }
        }
    }

    /// Re-run gate and selection against the latest inputs
    fn reconcile(&self) {
        let step = {
            let mut inner = self.lock_inner();
            if inner.ended {
                return;
            }
            self.evaluate(&mut inner)
        };

        // Outside the lock: the navigator and the backend may call back
        // into the session
        match step {
            Step::Settled { redirect: true } => {
                info!(session = %self.id, "Redirecting to permission screen");
                self.navigator.navigate(Route::Permissions);
            }
            Step::Settled { redirect: false } => {}
            Step::Acquire(device) => self.acquire_handle(device),
        }
    }

    /// Gate and selection over the locked state
    ///
    /// Status is published before the lock is released, so concurrent
    /// reconciles publish in the order they mutated the state.
    fn evaluate(&self, inner: &mut SessionInner<B::Capturer>) -> Step {
        match permission_gate::evaluate(&inner.permissions) {
            GateDecision::RedirectToPermissions => {
                let redirect = !inner.redirected;
                inner.redirected = true;
                Self::deactivate(inner);
                self.publish(SessionStatus::Gated(GateReason::PermissionDenied));
                Step::Settled { redirect }
            }
            GateDecision::Allow => {
                inner.redirected = false;
                let selection = device_selector::select(inner.position, &inner.devices);
                match selection {
                    DeviceSelection::Pending => {
                        Self::deactivate(inner);
                        self.publish(SessionStatus::Gated(GateReason::DevicePending));
                        Step::Settled { redirect: false }
                    }
                    DeviceSelection::Resolved(device) => {
                        // Watch sends only; no session code runs from here
                        self.parameters.initialize(&device);

                        let stale = inner
                            .handle
                            .as_ref()
                            .is_some_and(|handle| handle.device_id() != device.id);
                        if stale {
                            inner.handle = None;
                        }

                        inner.device = Some(device.clone());
                        self.publish(SessionStatus::Active);

                        if inner.handle.is_some() {
                            Step::Settled { redirect: false }
                        } else {
                            Step::Acquire(device)
                        }
                    }
                }
            }
        }
    }

    /// Open `device` without holding the lock, then install the handle if
    /// the session still wants it
    fn acquire_handle(&self, device: CameraDevice) {
        let handle = match DeviceHandle::acquire(&self.backend, &device) {
            Ok(handle) => Arc::new(handle),
            Err(e) => {
                // Capture reports HandleUnavailable until the next update succeeds
                warn!(
                    session = %self.id,
                    device = %device.name,
                    error = %e,
                    "Failed to open device"
                );
                return;
            }
        };

        let installed = {
            let mut inner = self.lock_inner();
            let wanted = !inner.ended
                && inner.handle.is_none()
                && inner.device.as_ref().is_some_and(|d| d.id == device.id);
            if wanted {
                inner.handle = Some(Arc::clone(&handle));
            }
            wanted
        };

        if installed {
            self.configure(&handle);
        } else {
            debug!(session = %self.id, device = %device.name, "Session moved on, discarding handle");
        }
    }

    fn deactivate(inner: &mut SessionInner<B::Capturer>) {
        inner.device = None;
        inner.handle = None;
    }

    fn publish(&self, status: SessionStatus) {
        self.status.send_if_modified(|current| {
            if *current == status {
                return false;
            }
            info!(session = %self.id, from = ?*current, to = ?status, "Session status changed");
            *current = status;
            true
        });
    }

    /// Push the stored zoom, exposure and torch to `handle`
    fn configure(&self, handle: &DeviceHandle<B::Capturer>) {
        let controls = self.parameters.parameters().controls();
        if let Err(e) = handle.configure(&controls) {
            warn!(
                session = %self.id,
                device = %handle.device_id(),
                error = %e,
                "Failed to apply device controls"
            );
        }
    }

    /// Push the stored controls to the current device, if any
    pub fn sync_controls(&self) {
        let handle = self.lock_inner().handle.clone();
        if let Some(handle) = handle {
            self.configure(&handle);
        }
    }

    // ===== Actions =====

    /// Take a photo and hand it to the media viewer
    ///
    /// Failures are logged and returned; the session stays usable and the
    /// capture can be retried. A photo that completes after the session left
    /// `Active` is still returned but not forwarded, so a permission redirect
    /// is never followed by the viewer.
    pub async fn take_picture(&self) -> SessionResult<CapturedPhoto> {
        let handle = self.lock_inner().handle.clone();
        let params = self.parameters.parameters();

        let photo = self.controller.capture(handle.as_deref(), &params).await?;

        // Permission may have been revoked while the shot was pending
        let status = self.status();
        if status.is_active() {
            self.navigator
                .navigate(Route::Media(MediaParams::photo(&photo.path)));
        } else {
            info!(
                session = %self.id,
                status = ?status,
                path = %photo.path.display(),
                "Session no longer active, photo not forwarded to the viewer"
            );
        }
        Ok(photo)
    }

    /// Open the platform photo gallery
    pub fn open_gallery(&self) -> SessionResult<()> {
        let Some(target) = self.gallery.lookup(self.platform) else {
            warn!(platform = %self.platform, "No gallery target registered");
            return Err(SessionError::GalleryUnavailable(self.platform));
        };

        self.launcher.launch(target).map_err(|e| {
            warn!(target = %target, error = %e, "Failed to open gallery");
            SessionError::GalleryLaunch(e.to_string())
        })
    }

    /// Navigate to the settings screen
    pub fn open_settings(&self) {
        self.navigator.navigate(Route::Settings);
    }

    /// Tear the session down
    ///
    /// Waits for a pending capture to finish (its photo is still delivered)
    /// before releasing the device handle.
    pub async fn end(&self) {
        self.lock_inner().ended = true;
        self.controller.wait_idle().await;

        let handle = {
            let mut inner = self.lock_inner();
            inner.device = None;
            inner.handle.take()
        };
        drop(handle);

        self.status.send_replace(SessionStatus::Ended);
        info!(session = %self.id, "Capture session ended");
    }
}

impl<B: CameraBackend> std::fmt::Debug for CaptureSession<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CaptureSession")
            .field("id", &self.id)
            .field("status", &self.status())
            .field("platform", &self.platform)
            .finish()
    }
}
