// src/lib.rs
//! Wild Island
//!
//! A small real-time island scene viewer built on wgpu and winit: fixed,
//! free-look and chase cameras, toggleable lights and fog, an animated fire
//! sprite and scrolling banner, and stencil-based mouse picking.

pub mod app;
pub mod config;
pub mod error;
pub mod gfx;
pub mod settings;
pub mod ui;
pub mod wgpu_utils;

// Re-export main types for convenience
pub use app::WildIslandApp;
pub use config::Config;
