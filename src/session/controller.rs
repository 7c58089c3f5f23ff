// SPDX-License-Identifier: GPL-3.0-only

//! Single-shot capture against a device handle
//!
//! The controller owns no session state. It turns (handle, parameters) into a
//! [`CapturedPhoto`] or a typed failure, and guarantees that at most one
//! capture runs against the hardware at a time.

use crate::backends::camera::{DeviceHandle, PhotoCapturer, TakePhotoOptions};
use crate::errors::{SessionError, SessionResult};
use crate::navigation::MediaType;
use crate::session::parameters::CaptureParameters;
use std::path::PathBuf;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

/// Result of a successful capture
///
/// Not retained by the controller; the caller forwards it to the viewer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedPhoto {
    pub path: PathBuf,
    pub media_type: MediaType,
}

/// Executes captures one at a time
#[derive(Debug, Default)]
pub struct CaptureSessionController {
    in_flight: Mutex<()>,
}

impl CaptureSessionController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a capture is currently running
    pub fn is_capturing(&self) -> bool {
        self.in_flight.try_lock().is_err()
    }

    /// Capture a photo
    ///
    /// Suspends while the hardware performs the shot. Zoom, exposure and
    /// torch are pushed to the device first; flash comes from `params` and
    /// the shutter sound is always off.
    ///
    /// # Returns
    /// * `Ok(CapturedPhoto)` - Photo written by the hardware
    /// * `Err(SessionError::HandleUnavailable)` - No handle, hardware not invoked
    /// * `Err(SessionError::CaptureInProgress)` - Another capture is running
    /// * `Err(SessionError::Hardware(_))` - The hardware call failed
    pub async fn capture<C: PhotoCapturer>(
        &self,
        handle: Option<&DeviceHandle<C>>,
        params: &CaptureParameters,
    ) -> SessionResult<CapturedPhoto> {
        let Some(handle) = handle else {
            warn!("Capture requested without a device handle");
            return Err(SessionError::HandleUnavailable);
        };

        let Ok(_guard) = self.in_flight.try_lock() else {
            warn!(device = %handle.device_id(), "Capture rejected, another capture is in flight");
            return Err(SessionError::CaptureInProgress);
        };

        info!(device = %handle.device_id(), flash = ?params.flash, "Taking photo...");

        // The shot must see the latest zoom, exposure and torch
        if let Err(e) = handle.configure(&params.controls()) {
            error!(error = %e, "Failed to apply device controls");
            return Err(SessionError::Hardware(e));
        }

        let options = TakePhotoOptions::with_flash(params.flash);
        match handle.capturer().take_photo(options).await {
            Ok(photo) => {
                info!(
                    path = %photo.path.display(),
                    width = photo.width,
                    height = photo.height,
                    "Photo captured"
                );
                Ok(CapturedPhoto {
                    path: photo.path,
                    media_type: MediaType::Photo,
                })
            }
            Err(e) => {
                error!(error = %e, "Failed to take photo");
                Err(SessionError::Hardware(e))
            }
        }
    }

    /// Wait until no capture is running
    ///
    /// Used at session teardown so a pending shot is never abandoned.
    pub async fn wait_idle(&self) {
        let _guard = self.in_flight.lock().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::camera::{
        BackendError, BackendResult, CameraBackend, CameraDevice, CameraPosition, DeviceControls,
        FlashMode, PhotoFile, TorchMode,
    };
    use std::sync::Arc;
    use std::sync::Mutex as StdMutex;
    use tokio::sync::Notify;

    /// Capturer recording its calls, optionally blocking until released
    #[derive(Clone, Default)]
    struct ScriptedCapturer {
        calls: Arc<StdMutex<Vec<TakePhotoOptions>>>,
        applied: Arc<StdMutex<Vec<DeviceControls>>>,
        release: Option<Arc<Notify>>,
        fail: bool,
    }

    impl PhotoCapturer for ScriptedCapturer {
        fn apply_controls(&self, controls: &DeviceControls) -> BackendResult<()> {
            self.applied.lock().unwrap().push(*controls);
            Ok(())
        }

        async fn take_photo(&self, options: TakePhotoOptions) -> BackendResult<PhotoFile> {
            self.calls.lock().unwrap().push(options);
            if let Some(release) = &self.release {
                release.notified().await;
            }
            if self.fail {
                return Err(BackendError::Busy);
            }
            Ok(PhotoFile {
                path: PathBuf::from("/tmp/IMG_test.jpg"),
                width: 640,
                height: 480,
            })
        }
    }

    struct ScriptedBackend(ScriptedCapturer);

    impl CameraBackend for ScriptedBackend {
        type Capturer = ScriptedCapturer;

        fn open(&self, _device: &CameraDevice) -> BackendResult<ScriptedCapturer> {
            Ok(self.0.clone())
        }
    }

    fn handle(capturer: ScriptedCapturer) -> DeviceHandle<ScriptedCapturer> {
        let device = CameraDevice {
            id: "cam".into(),
            name: "cam".into(),
            position: CameraPosition::Back,
            neutral_zoom: 1.0,
            min_zoom: 1.0,
            max_zoom: 1.0,
            formats: Vec::new(),
        };
        DeviceHandle::acquire(&ScriptedBackend(capturer), &device).unwrap()
    }

    #[tokio::test]
    async fn test_missing_handle() {
        let controller = CaptureSessionController::new();
        let result = controller
            .capture::<ScriptedCapturer>(None, &CaptureParameters::default())
            .await;
        assert_eq!(result, Err(SessionError::HandleUnavailable));
        assert!(!controller.is_capturing());
    }

    #[tokio::test]
    async fn test_flash_passed_through_without_shutter_sound() {
        let capturer = ScriptedCapturer::default();
        let calls = Arc::clone(&capturer.calls);
        let handle = handle(capturer);
        let params = CaptureParameters {
            flash: FlashMode::On,
            ..Default::default()
        };

        let photo = CaptureSessionController::new()
            .capture(Some(&handle), &params)
            .await
            .unwrap();

        assert_eq!(photo.path, PathBuf::from("/tmp/IMG_test.jpg"));
        assert_eq!(photo.media_type, MediaType::Photo);
        let calls = calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].flash, FlashMode::On);
        assert!(!calls[0].enable_shutter_sound);
    }

    #[tokio::test]
    async fn test_controls_applied_before_shot() {
        let capturer = ScriptedCapturer::default();
        let applied = Arc::clone(&capturer.applied);
        let handle = handle(capturer);
        let params = CaptureParameters {
            zoom: Some(3.0),
            exposure: 1.0,
            torch: TorchMode::On,
            ..Default::default()
        };

        CaptureSessionController::new()
            .capture(Some(&handle), &params)
            .await
            .unwrap();

        let applied = applied.lock().unwrap();
        assert_eq!(*applied, vec![params.controls()]);
    }

    #[tokio::test]
    async fn test_hardware_failure_is_reported_and_retryable() {
        let capturer = ScriptedCapturer {
            fail: true,
            ..Default::default()
        };
        let handle = handle(capturer);
        let controller = CaptureSessionController::new();
        let params = CaptureParameters::default();

        let first = controller.capture(Some(&handle), &params).await;
        assert_eq!(first, Err(SessionError::Hardware(BackendError::Busy)));
        assert!(!controller.is_capturing());

        let second = controller.capture(Some(&handle), &params).await;
        assert_eq!(second, Err(SessionError::Hardware(BackendError::Busy)));
    }

    #[tokio::test]
    async fn test_overlapping_capture_rejected() {
        let release = Arc::new(Notify::new());
        let capturer = ScriptedCapturer {
            release: Some(Arc::clone(&release)),
            ..Default::default()
        };
        let calls = Arc::clone(&capturer.calls);
        let applied = Arc::clone(&capturer.applied);
        let handle = handle(capturer);
        let controller = CaptureSessionController::new();
        let params = CaptureParameters::default();

        let (first, second) = tokio::join!(controller.capture(Some(&handle), &params), async {
            tokio::task::yield_now().await;
            assert!(controller.is_capturing());
            let second = controller.capture(Some(&handle), &params).await;
            release.notify_one();
            second
        });

        assert!(first.is_ok());
        assert_eq!(second, Err(SessionError::CaptureInProgress));
        assert_eq!(calls.lock().unwrap().len(), 1);
        assert_eq!(applied.lock().unwrap().len(), 1);
    }
}
