// src/settings.rs
//! Fixed scene and window constants.

/// Half extent of the walkable area along x.
pub const SCENE_WIDTH: f32 = 3.8;
/// Half extent of the walkable area along y.
pub const SCENE_HEIGHT: f32 = 3.8;
pub const SCENE_DEPTH: f32 = 1.0;

pub const WINDOW_TITLE: &str = "Wild Island";
pub const WINDOW_WIDTH: u32 = 1000;
pub const WINDOW_HEIGHT: u32 = 800;

/// Period of the scene update timer in milliseconds.
pub const TICK_PERIOD_MS: u64 = 33;

/// Camera translation per move command before the 0.5 step factor.
pub const MOVEMENT_SPEED: f32 = 0.1;
/// Radius added around the camera when testing for a collision.
pub const CAMERA_COLLISION_RADIUS: f32 = 0.5;
/// Radius of the floating duck used as the only camera obstacle.
pub const DUCK_OBSTACLE_RADIUS: f32 = 0.7;
/// Degrees turned per pixel of horizontal pointer offset.
pub const POINTER_LOOK_SENSITIVITY: f32 = 0.5;

pub const CAMERA_FOV_DEGREES: f32 = 60.0;
pub const CAMERA_NEAR: f32 = 0.1;
pub const CAMERA_FAR: f32 = 10.0;

/// Blend factor applied per tick while the free-look eye catches up with its target.
pub const FREE_LOOK_BLEND: f32 = 0.1;
/// Distance below which the free-look eye snaps onto its target.
pub const FREE_LOOK_SNAP_THRESHOLD: f32 = 0.01;

pub const CONFIG_FILE: &str = "config.txt";
pub const SHADER_DIR: &str = "shaders";
