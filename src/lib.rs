// SPDX-License-Identifier: GPL-3.0-only

//! Obscura - capture-session core of a mobile camera screen
//!
//! This library holds everything the capture screen decides on its own:
//! permission gating, device selection, the adjustable capture parameters,
//! the exclusive control panels and the single-shot capture action. Hardware,
//! permission prompts, routing and the media viewer are collaborators behind
//! traits.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - [`session`]: The capture session state machine and its components
//! - [`backends`]: Camera backend traits, device types, permission state
//! - [`navigation`]: Outbound navigation requests
//! - [`gallery`]: Platform gallery strategy table
//! - [`config`]: Read-only configuration
//! - [`storage`]: Photo directory helpers
//!
//! # Example
//!
//! ```no_run
//! use obscura::backends::camera::VirtualBackend;
//! use obscura::backends::permissions::PermissionState;
//! use obscura::navigation::RecordingNavigator;
//! use obscura::session::CaptureSession;
//! use std::sync::Arc;
//!
//! # async fn run() -> Result<(), obscura::errors::SessionError> {
//! let backend = VirtualBackend::new(VirtualBackend::default_devices(), "/tmp/photos".into());
//! let devices = backend.devices().to_vec();
//! let session = CaptureSession::new(backend, Arc::new(RecordingNavigator::new()));
//!
//! session.update_permissions(PermissionState::granted());
//! session.update_devices(devices);
//! session.parameters().toggle_flash();
//! let photo = session.take_picture().await?;
//! println!("saved {}", photo.path.display());
//! # Ok(())
//! # }
//! ```

pub mod backends;
pub mod config;
pub mod constants;
pub mod errors;
pub mod gallery;
pub mod navigation;
pub mod session;
pub mod storage;

// Re-export commonly used types
pub use config::Config;
pub use errors::{SessionError, SessionResult};
pub use session::{CaptureSession, SessionStatus, UiMode};
