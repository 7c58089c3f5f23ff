// SPDX-License-Identifier: GPL-3.0-only

//! Platform collaborators consumed by the capture session
//!
//! - [`camera`]: device descriptors, the capture traits and the virtual backend
//! - [`permissions`]: camera and microphone permission state

pub mod camera;
pub mod permissions;
