//! # Scene Module
//!
//! The island's fixed layout, its props and the per-tick scene update.
//!
//! ## Key Components
//!
//! - [`Scene`] - Camera, toggles and props, advanced once per timer tick
//! - [`SceneObject`] - One placed prop created by [`SceneObject::spawn`]
//! - [`SceneCommand`] - Actions coming from keys, the context menu or picks
//! - [`Vertex3D`] - Vertex layout shared by every mesh
//!
//! ## Usage
//!
//! ```no_run
//! use wild_island::gfx::scene::{Scene, SceneCommand};
//! use wild_island::gfx::camera::CameraMode;
//!
//! let mut scene = Scene::new("config.txt");
//! scene.apply(SceneCommand::SetCameraMode(CameraMode::Corner));
//! scene.tick(0.033);
//! ```

pub mod layout;
pub mod object;
pub mod scene;
pub mod vertex;

pub use object::{ObjectKind, SceneObject};
pub use scene::{HostRequest, Scene, SceneCommand, SceneObjects, SceneState};
pub use vertex::Vertex3D;
