// SPDX-License-Identifier: GPL-3.0-only

//! Software camera backend
//!
//! Renders a gradient test pattern instead of reading a sensor. Used by the
//! command line tool and by tests, and as a stand-in on machines without a
//! camera. Photos are JPEG encoded and written with a timestamped name, the
//! same way a hardware pipeline would hand back a file path.

use super::types::*;
use super::{CameraBackend, PhotoCapturer};
use image::{Rgb, RgbImage};
use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, info};

/// Longest edge of the rendered test pattern
const MAX_RENDER_EDGE: u32 = 640;
/// Brightness added to every channel when the flash fires
const FLASH_BOOST: i32 = 48;
/// Brightness added while the torch is on
const TORCH_BOOST: i32 = 24;
/// Brightness per EV of exposure bias
const EXPOSURE_STEP: f64 = 32.0;
const JPEG_QUALITY: u8 = 85;
/// Suffixes tried before giving up on a free file name
const MAX_NAME_ATTEMPTS: u32 = 1000;

/// Backend producing [`VirtualCapturer`]s that write into `output_dir`
///
/// All capturers opened from one backend share a shot counter, so handles
/// re-acquired after a position switch keep numbering where the last one
/// stopped.
#[derive(Debug, Clone)]
pub struct VirtualBackend {
    devices: Vec<CameraDevice>,
    output_dir: PathBuf,
    shots: Arc<AtomicU64>,
}

impl VirtualBackend {
    pub fn new(devices: Vec<CameraDevice>, output_dir: PathBuf) -> Self {
        Self {
            devices,
            output_dir,
            shots: Arc::new(AtomicU64::new(0)),
        }
    }

    /// A back camera with a 1x-10x range (neutral 2x, as on triple-lens
    /// phones) and a plain front camera
    pub fn default_devices() -> Vec<CameraDevice> {
        vec![
            CameraDevice {
                id: "virtual-back".to_string(),
                name: "Virtual Back Camera".to_string(),
                position: CameraPosition::Back,
                neutral_zoom: 2.0,
                min_zoom: 1.0,
                max_zoom: 10.0,
                formats: vec![
                    PhotoFormat {
                        max_fps: 60,
                        photo_width: 4032,
                        photo_height: 3024,
                    },
                    PhotoFormat {
                        max_fps: 30,
                        photo_width: 1920,
                        photo_height: 1080,
                    },
                ],
            },
            CameraDevice {
                id: "virtual-front".to_string(),
                name: "Virtual Front Camera".to_string(),
                position: CameraPosition::Front,
                neutral_zoom: 1.0,
                min_zoom: 1.0,
                max_zoom: 4.0,
                formats: vec![PhotoFormat {
                    max_fps: 30,
                    photo_width: 3088,
                    photo_height: 2316,
                }],
            },
        ]
    }

    /// Load a JSON device manifest (an array of camera devices)
    pub async fn load_manifest(path: &Path) -> BackendResult<Vec<CameraDevice>> {
        let bytes = tokio::fs::read(path).await?;
        let devices: Vec<CameraDevice> = serde_json::from_slice(&bytes)
            .map_err(|e| BackendError::InvalidManifest(e.to_string()))?;
        debug!(path = %path.display(), count = devices.len(), "Loaded device manifest");
        Ok(devices)
    }

    /// Devices this backend enumerates
    pub fn devices(&self) -> &[CameraDevice] {
        &self.devices
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Photos taken through all capturers of this backend
    pub fn shot_count(&self) -> u64 {
        self.shots.load(Ordering::SeqCst)
    }
}

impl CameraBackend for VirtualBackend {
    type Capturer = VirtualCapturer;

    fn open(&self, device: &CameraDevice) -> BackendResult<VirtualCapturer> {
        if !self.devices.iter().any(|d| d.id == device.id) {
            return Err(BackendError::DeviceUnavailable(format!(
                "{} is not enumerated by the virtual backend",
                device.id
            )));
        }

        Ok(VirtualCapturer {
            device: device.clone(),
            output_dir: self.output_dir.clone(),
            shots: Arc::clone(&self.shots),
            controls: Arc::new(Mutex::new(DeviceControls::default())),
        })
    }
}

/// Opened virtual device
#[derive(Debug, Clone)]
pub struct VirtualCapturer {
    device: CameraDevice,
    output_dir: PathBuf,
    shots: Arc<AtomicU64>,
    controls: Arc<Mutex<DeviceControls>>,
}

impl VirtualCapturer {
    /// Render size keeping the primary format's aspect ratio
    fn render_size(&self) -> (u32, u32) {
        let (width, height) = self
            .device
            .primary_format()
            .map(|f| (f.photo_width.max(1), f.photo_height.max(1)))
            .unwrap_or((4, 3));

        let longest = width.max(height);
        if longest <= MAX_RENDER_EDGE {
            return (width, height);
        }
        let scale = MAX_RENDER_EDGE as f64 / longest as f64;
        (
            ((width as f64 * scale).round() as u32).max(1),
            ((height as f64 * scale).round() as u32).max(1),
        )
    }

    /// Number of photos taken through the backend this capturer came from
    pub fn shot_count(&self) -> u64 {
        self.shots.load(Ordering::SeqCst)
    }

    /// Controls currently in effect
    pub fn controls(&self) -> DeviceControls {
        *self.controls.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Share of the neutral field of view that is visible at `controls.zoom`
    fn field_of_view(&self, controls: &DeviceControls) -> f64 {
        let neutral = self.device.neutral_zoom;
        match controls.zoom {
            Some(zoom) if zoom > 0.0 && neutral > 0.0 => neutral / zoom,
            _ => 1.0,
        }
    }
}

impl PhotoCapturer for VirtualCapturer {
    fn apply_controls(&self, controls: &DeviceControls) -> BackendResult<()> {
        *self.controls.lock().unwrap_or_else(PoisonError::into_inner) = *controls;
        Ok(())
    }

    async fn take_photo(&self, options: TakePhotoOptions) -> BackendResult<PhotoFile> {
        let (width, height) = self.render_size();
        let controls = self.controls();
        let view = self.field_of_view(&controls);
        let offset = brightness_offset(options.flash, &controls);
        let shot = self.shots.fetch_add(1, Ordering::SeqCst);

        let stem = format!(
            "IMG_{}_{}",
            chrono::Local::now().format("%Y%m%d_%H%M%S"),
            shot
        );

        info!(
            device = %self.device.name,
            flash = ?options.flash,
            zoom = ?controls.zoom,
            exposure = controls.exposure,
            torch = ?controls.torch,
            "Virtual capture"
        );

        // Rendering, encoding and the write are blocking work
        let output_dir = self.output_dir.clone();
        let path = tokio::task::spawn_blocking(move || {
            let image = render_pattern(width, height, view, offset);
            let data = encode_jpeg(&image)?;
            write_unique(&output_dir, &stem, &data)
        })
        .await
        .map_err(|e| BackendError::Io(format!("Capture task error: {}", e)))??;

        debug!(path = %path.display(), "Virtual photo written");
        Ok(PhotoFile {
            path,
            width,
            height,
        })
    }
}

/// Channel offset from flash, torch and exposure bias
fn brightness_offset(flash: FlashMode, controls: &DeviceControls) -> i32 {
    let flash = match flash {
        FlashMode::On => FLASH_BOOST,
        FlashMode::Off => 0,
    };
    let torch = match controls.torch {
        TorchMode::On => TORCH_BOOST,
        TorchMode::Off => 0,
    };
    // `as` saturates and maps NaN to 0
    let exposure = (controls.exposure * EXPOSURE_STEP).round() as i32;
    flash
        .saturating_add(torch)
        .saturating_add(exposure)
        .clamp(-255, 255)
}

/// Gradient over the visible part of the field, centered on the optical axis
fn render_pattern(width: u32, height: u32, view: f64, offset: i32) -> RgbImage {
    let channel = |value: f64| ((value * 255.0).round() as i32 + offset).clamp(0, 255) as u8;
    RgbImage::from_fn(width, height, |x, y| {
        let u = (x as f64 / width.max(1) as f64 - 0.5) * view + 0.5;
        let v = (y as f64 / height.max(1) as f64 - 0.5) * view + 0.5;
        Rgb([
            channel(u.clamp(0.0, 1.0)),
            channel(v.clamp(0.0, 1.0)),
            channel(128.0 / 255.0),
        ])
    })
}

fn encode_jpeg(image: &RgbImage) -> BackendResult<Vec<u8>> {
    let mut buffer = Vec::new();
    let mut cursor = std::io::Cursor::new(&mut buffer);
    let mut encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut cursor, JPEG_QUALITY);

    encoder
        .encode(
            image.as_raw(),
            image.width(),
            image.height(),
            image::ExtendedColorType::Rgb8,
        )
        .map_err(|e| BackendError::Encoding(e.to_string()))?;

    Ok(buffer)
}

/// Write `data` to `<dir>/<stem>.jpg`, never replacing an existing file
///
/// Taken names get a `-<n>` suffix.
fn write_unique(dir: &Path, stem: &str, data: &[u8]) -> BackendResult<PathBuf> {
    std::fs::create_dir_all(dir)?;

    for attempt in 0..MAX_NAME_ATTEMPTS {
        let name = if attempt == 0 {
            format!("{}.jpg", stem)
        } else {
            format!("{}-{}.jpg", stem, attempt)
        };
        let path = dir.join(name);

        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(mut file) => {
                file.write_all(data)?;
                return Ok(path);
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
            Err(e) => return Err(e.into()),
        }
    }

    Err(BackendError::Io(format!(
        "No free file name for {} in {}",
        stem,
        dir.display()
    )))
}
