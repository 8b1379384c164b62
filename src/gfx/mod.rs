//! # Graphics Module
//!
//! Scene state, cameras and everything needed to draw the island.
//!
//! - **Camera System** ([`camera`]) - fixed, free-look and chase views with collision
//! - **Geometry** ([`geometry`]) - built-in shapes and per-kind model transforms
//! - **Picking** ([`picking`]) - stencil tags and single-texel readback
//! - **Rendering** ([`rendering`]) - draw plan, pipelines and the frame executor
//! - **Resource Management** ([`resources`]) - meshes, textures, materials and uniforms
//! - **Scene Management** ([`scene`]) - props, toggles and the per-tick update
//!
//! The scene is plain data and never touches the GPU; the [`RenderEngine`]
//! reads it once per frame.

pub mod camera;
pub mod geometry;
pub mod picking;
pub mod rendering;
pub mod resources;
pub mod scene;

// Re-export commonly used types
pub use rendering::render_engine::RenderEngine;
pub use scene::Scene;
