// SPDX-License-Identifier: GPL-3.0-only

//! CLI commands driving a capture session on the virtual backend
//!
//! This module provides command-line functionality for:
//! - Listing available cameras
//! - Taking a photo through a full session (gate, selection, capture)
//! - Opening the platform gallery

use obscura::backends::camera::{CameraDevice, CameraPosition, VirtualBackend};
use obscura::backends::permissions::PermissionState;
use obscura::gallery::SystemLauncher;
use obscura::navigation::RecordingNavigator;
use obscura::session::CaptureSession;
use obscura::{Config, SessionError};
use std::path::{Path, PathBuf};
use std::sync::Arc;

type CliResult = Result<(), Box<dyn std::error::Error>>;

/// Options of the `photo` command
pub struct PhotoRequest {
    pub position: Option<CameraPosition>,
    pub flash: bool,
    pub torch: bool,
    pub zoom: Option<f64>,
    pub exposure: Option<f64>,
    pub output: Option<PathBuf>,
    pub devices: Option<PathBuf>,
}

pub fn load_config(path: Option<&Path>) -> Result<Config, Box<dyn std::error::Error>> {
    let config = match path {
        Some(path) => Config::load(path)?,
        None => Config::load_default()?,
    };
    Ok(config)
}

async fn load_devices(
    manifest: Option<&Path>,
) -> Result<Vec<CameraDevice>, Box<dyn std::error::Error>> {
    match manifest {
        Some(path) => Ok(VirtualBackend::load_manifest(path).await?),
        None => Ok(VirtualBackend::default_devices()),
    }
}

/// List all cameras of the virtual backend
pub fn list_cameras(manifest: Option<PathBuf>) -> CliResult {
    let rt = tokio::runtime::Runtime::new()?;
    let cameras = rt.block_on(load_devices(manifest.as_deref()))?;

    if cameras.is_empty() {
        println!("No cameras found.");
        return Ok(());
    }

    println!("Available cameras:");
    println!();
    for (index, camera) in cameras.iter().enumerate() {
        println!("  [{}] {} ({})", index, camera.name, camera.position);
        println!(
            "      Zoom: {}x-{}x (neutral {}x)",
            camera.min_zoom, camera.max_zoom, camera.neutral_zoom
        );

        // Show top 3 formats in reported order
        let formats: Vec<String> = camera.formats.iter().take(3).map(|f| f.to_string()).collect();
        if !formats.is_empty() {
            println!("      Formats: {}", formats.join(", "));
        }
        println!();
    }

    Ok(())
}

/// Run a session with granted permissions and take one photo
pub fn take_photo(config: &Config, request: PhotoRequest) -> CliResult {
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async {
        let devices = load_devices(request.devices.as_deref()).await?;
        let output_dir = request
            .output
            .clone()
            .unwrap_or_else(|| config.photo_directory());

        let backend = VirtualBackend::new(devices.clone(), output_dir);
        let navigator = Arc::new(RecordingNavigator::new());
        let position = request.position.unwrap_or(config.default_position);
        let session = CaptureSession::new(backend, navigator.clone()).with_position(position);

        session.update_permissions(PermissionState::granted());
        session.update_devices(devices);
        if !session.status().is_active() {
            return Err(SessionError::DevicePending.into());
        }

        if let Some(summary) = session.device_summary() {
            println!("{}", summary);
        }

        let parameters = session.parameters();
        if request.flash {
            parameters.toggle_flash();
        }
        if request.torch {
            parameters.toggle_torch();
        }
        if let Some(zoom) = request.zoom {
            parameters.set_zoom(zoom);
        }
        if let Some(exposure) = request.exposure {
            parameters.set_exposure(exposure);
        }
        println!("{}", parameters.snapshot().overlay_label());

        println!("Capturing...");
        let photo = session.take_picture().await?;
        session.end().await;

        println!("Photo saved: {}", photo.path.display());
        if let Some(route) = navigator.last() {
            println!("{} {}", route.path(), serde_json::to_string(&route)?);
        }
        Ok::<_, Box<dyn std::error::Error>>(())
    })
}

/// Open the gallery for the current platform
pub fn open_gallery(config: &Config) -> CliResult {
    let rt = tokio::runtime::Runtime::new()?;
    if let Some(latest) = rt.block_on(obscura::storage::latest_photo(config.photo_directory())) {
        println!("Latest photo: {}", latest.display());
    }

    let backend = VirtualBackend::new(Vec::new(), config.photo_directory());
    let session = CaptureSession::new(backend, Arc::new(RecordingNavigator::new()))
        .with_gallery(config.gallery_targets(), Arc::new(SystemLauncher));
    session.open_gallery()?;
    Ok(())
}
