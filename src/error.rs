// src/error.rs
//! Error types shared by asset loading and renderer setup.

use std::{io, path::PathBuf};
use thiserror::Error;

/// Failure to load a mesh, texture or shader from disk
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("failed to load mesh '{path}'")]
    Mesh {
        path: PathBuf,
        #[source]
        source: tobj::LoadError,
    },

    #[error("mesh '{path}' has no geometry")]
    EmptyMesh { path: PathBuf },

    #[error("mesh '{path}' contains {count} meshes, expected exactly one")]
    NotSingleMesh { path: PathBuf, count: usize },

    #[error("failed to load texture '{path}'")]
    Texture {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("cube map face '{path}' does not match the size of the first face")]
    CubeFaceMismatch { path: PathBuf },

    #[error("failed to read shader '{path}'")]
    Shader {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Failure while bringing up the GPU
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to create surface")]
    Surface(#[from] wgpu::CreateSurfaceError),

    #[error("no suitable graphics adapter")]
    Adapter(#[from] wgpu::RequestAdapterError),

    #[error("failed to request device")]
    Device(#[from] wgpu::RequestDeviceError),

    #[error("pipeline setup failed: {0}")]
    Pipeline(String),

    #[error(transparent)]
    Asset(#[from] AssetError),
}
