//! # Camera System
//!
//! First-person camera with fixed, free-look and chase modes.
//!
//! - [`camera`] - camera pose, modes and movement commands
//! - [`camera_controller`] - held keys and pointer-look
//! - [`camera_utils`] - view and projection matrices per mode
//! - [`collision`] - obstacle push-out and scene bounds

pub mod camera;
pub mod camera_controller;
pub mod camera_utils;
pub mod collision;

pub use camera::{Camera, CameraMode, Movement};
pub use camera_controller::CameraController;
pub use camera_utils::ViewProjection;
