// src/gfx/resources/mod.rs
//! GPU resource management
//!
//! Handles textures, meshes, materials and the per-frame bindings.

pub mod global_bindings;
pub mod material;
pub mod mesh_store;
pub mod texture_resource;

// Re-export main types
pub use global_bindings::{GlobalBindings, GlobalUniform};
pub use material::{DrawUniform, Material};
pub use mesh_store::{GpuMesh, MeshStore};
pub use texture_resource::TextureResource;
