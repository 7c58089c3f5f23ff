// SPDX-License-Identifier: GPL-3.0-only

//! Capture parameter store
//!
//! Holds zoom, exposure, flash, torch and the active control panel for one
//! session. Every mutation is a synchronous state transition; observers get
//! the new [`ParameterSnapshot`] through a [`watch`] channel, and only when
//! something actually changed.
//!
//! Exactly one [`UiMode`] is active at a time. Exclusivity is enforced here,
//! at the mutation boundary, so no caller can end up with two panels open.

use crate::backends::camera::{CameraDevice, DeviceControls, FlashMode, TorchMode};
use crate::constants::FALLBACK_PANEL_ZOOM;
use serde::Serialize;
use tokio::sync::watch;
use tracing::{debug, info};

/// Which control panel occupies the bottom of the screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum UiMode {
    /// Device info, quick actions and the shutter button
    #[default]
    Default,
    ZoomPanel,
    ExposurePanel,
}

/// Adjustable capture parameters
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct CaptureParameters {
    /// Unset until a device has been initialized
    pub zoom: Option<f64>,
    /// Exposure bias in EV
    pub exposure: f64,
    pub flash: FlashMode,
    pub torch: TorchMode,
}

impl CaptureParameters {
    /// The part of the parameters the device follows live
    ///
    /// Flash is per shot and travels with the capture instead.
    pub fn controls(&self) -> DeviceControls {
        DeviceControls {
            zoom: self.zoom,
            exposure: self.exposure,
            torch: self.torch,
        }
    }
}

/// Zoom limits of the device the store was initialized for
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZoomBinding {
    pub device_id: String,
    pub min_zoom: f64,
    pub max_zoom: f64,
}

/// Everything an observer of the store can see
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ParameterSnapshot {
    pub parameters: CaptureParameters,
    pub ui_mode: UiMode,
    pub binding: Option<ZoomBinding>,
}

impl ParameterSnapshot {
    /// Value shown by the zoom panel; falls back to 1x while zoom is unset
    pub fn panel_zoom(&self) -> f64 {
        self.parameters.zoom.unwrap_or(FALLBACK_PANEL_ZOOM)
    }

    /// Text of the preview overlay, e.g. `Exposure: 0 | Zoom: x2`
    pub fn overlay_label(&self) -> String {
        format!(
            "Exposure: {} | Zoom: x{}",
            self.parameters.exposure,
            self.panel_zoom()
        )
    }
}

/// Store for the parameters of one capture session
#[derive(Debug)]
pub struct CaptureParameterStore {
    state: watch::Sender<ParameterSnapshot>,
}

impl Default for CaptureParameterStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CaptureParameterStore {
    /// Store with session defaults: zoom unset, 0 EV, flash and torch off
    pub fn new() -> Self {
        let (state, _) = watch::channel(ParameterSnapshot::default());
        Self { state }
    }

    /// Receive a snapshot after every change
    pub fn subscribe(&self) -> watch::Receiver<ParameterSnapshot> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> ParameterSnapshot {
        self.state.borrow().clone()
    }

    pub fn parameters(&self) -> CaptureParameters {
        self.state.borrow().parameters
    }

    pub fn ui_mode(&self) -> UiMode {
        self.state.borrow().ui_mode
    }

    /// Seed zoom from the device's neutral zoom
    ///
    /// Does nothing when the store is already initialized for this device, so
    /// device-list refreshes keep the user's zoom. A different device resets
    /// zoom to its own neutral value.
    ///
    /// # Returns
    /// * `true` - Zoom was (re)seeded
    /// * `false` - Already initialized for `device`
    pub fn initialize(&self, device: &CameraDevice) -> bool {
        self.state.send_if_modified(|state| {
            if state
                .binding
                .as_ref()
                .is_some_and(|binding| binding.device_id == device.id)
            {
                return false;
            }

            let zoom = device.clamp_zoom(device.neutral_zoom);
            state.parameters.zoom = Some(zoom);
            state.binding = Some(ZoomBinding {
                device_id: device.id.clone(),
                min_zoom: device.min_zoom.min(device.max_zoom),
                max_zoom: device.max_zoom.max(device.min_zoom),
            });
            info!(device = %device.name, zoom, "Zoom initialized from device");
            true
        })
    }

    /// Set zoom, clamped to the initialized device's range
    ///
    /// Ignored while no device has been initialized, since there is no range
    /// to clamp against yet.
    ///
    /// # Returns
    /// * `Some(zoom)` - The stored (clamped) value
    /// * `None` - No device initialized
    pub fn set_zoom(&self, zoom: f64) -> Option<f64> {
        let mut stored = None;
        self.state.send_if_modified(|state| {
            let Some(binding) = state.binding.as_ref() else {
                debug!(zoom, "Zoom ignored, no device initialized");
                return false;
            };
            let clamped = zoom.max(binding.min_zoom).min(binding.max_zoom);
            stored = Some(clamped);
            if state.parameters.zoom == Some(clamped) {
                return false;
            }
            state.parameters.zoom = Some(clamped);
            debug!(requested = zoom, zoom = clamped, "Zoom set");
            true
        });
        stored
    }

    /// Set exposure bias in EV, stored as given
    pub fn set_exposure(&self, exposure: f64) {
        self.state.send_if_modified(|state| {
            if state.parameters.exposure == exposure {
                return false;
            }
            state.parameters.exposure = exposure;
            debug!(exposure, "Exposure set");
            true
        });
    }

    /// Flip the per-shot flash; torch is untouched
    pub fn toggle_flash(&self) -> FlashMode {
        let mut flash = FlashMode::Off;
        self.state.send_modify(|state| {
            state.parameters.flash = state.parameters.flash.toggled();
            flash = state.parameters.flash;
        });
        info!(flash = ?flash, "Flash toggled");
        flash
    }

    /// Flip the torch; flash is untouched
    pub fn toggle_torch(&self) -> TorchMode {
        let mut torch = TorchMode::Off;
        self.state.send_modify(|state| {
            state.parameters.torch = state.parameters.torch.toggled();
            torch = state.parameters.torch;
        });
        info!(torch = ?torch, "Torch toggled");
        torch
    }

    /// Replace the active mode
    pub fn set_ui_mode(&self, mode: UiMode) {
        self.state.send_if_modified(|state| {
            if state.ui_mode == mode {
                return false;
            }
            debug!(from = ?state.ui_mode, to = ?mode, "UI mode changed");
            state.ui_mode = mode;
            true
        });
    }

    /// Open `mode`, or go back to [`UiMode::Default`] if it is already open
    ///
    /// Opening a panel while the other one is open closes the other one.
    pub fn toggle_ui_mode(&self, mode: UiMode) -> UiMode {
        let current = self.ui_mode();
        let next = if current == mode {
            UiMode::Default
        } else {
            mode
        };
        self.set_ui_mode(next);
        next
    }

    pub fn toggle_zoom_panel(&self) -> UiMode {
        self.toggle_ui_mode(UiMode::ZoomPanel)
    }

    pub fn toggle_exposure_panel(&self) -> UiMode {
        self.toggle_ui_mode(UiMode::ExposurePanel)
    }
}
