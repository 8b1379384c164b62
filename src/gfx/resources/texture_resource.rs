//! Texture resource management for wgpu
//!
//! Creates GPU textures, views and samplers for the depth-stencil target,
//! image files, the skybox cube map and a plain white fallback.

use std::path::{Path, PathBuf};

use crate::error::AssetError;

/// Cube map face suffixes in wgpu layer order (+x, -x, +y, -y, +z, -z)
pub const CUBE_FACE_SUFFIXES: [&str; 6] = ["posx", "negx", "posy", "negy", "posz", "negz"];

/// GPU texture resource containing texture, view, and sampler
#[derive(Clone)]
pub struct TextureResource {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
}

impl TextureResource {
    /// Depth and stencil share one attachment; the stencil holds pick ids
    pub const DEPTH_STENCIL_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth24PlusStencil8;

    /// Creates the depth-stencil target matching the surface configuration
    ///
    /// The texture can be copied from so the stencil aspect can be read back
    /// for picking.
    ///
    /// # Arguments
    /// * `device` - WGPU device for creating resources
    /// * `config` - Surface configuration to match dimensions
    /// * `label` - Debug label for the texture
    pub fn create_depth_stencil(
        device: &wgpu::Device,
        config: &wgpu::SurfaceConfiguration,
        label: &str,
    ) -> Self {
        let size = wgpu::Extent3d {
            width: config.width.max(1),
            height: config.height.max(1),
            depth_or_array_layers: 1,
        };

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Self::DEPTH_STENCIL_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some(&format!("{} Sampler", label)),
            ..Default::default()
        });

        Self {
            texture,
            view,
            sampler,
        }
    }

    /// Creates a 2D texture from raw RGBA data
    ///
    /// # Arguments
    /// * `data` - Raw RGBA8 pixel data (4 bytes per pixel)
    /// * `address_mode` - Repeat for tiled and scrolling textures, clamp otherwise
    pub fn create_from_rgba_data(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        data: &[u8],
        width: u32,
        height: u32,
        label: &str,
        address_mode: wgpu::AddressMode,
    ) -> Self {
        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            data,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * width),
                rows_per_image: Some(height),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some(&format!("{} Sampler", label)),
            address_mode_u: address_mode,
            address_mode_v: address_mode,
            address_mode_w: address_mode,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        Self {
            texture,
            view,
            sampler,
        }
    }

    /// Loads a png or jpeg file into a 2D texture
    ///
    /// Rows are flipped so that v = 0 is the bottom of the image, matching the
    /// texture coordinates stored in OBJ files.
    pub fn from_file(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        path: impl AsRef<Path>,
        address_mode: wgpu::AddressMode,
    ) -> Result<Self, AssetError> {
        let path = path.as_ref();
        let image = image::open(path)
            .map_err(|source| AssetError::Texture {
                path: path.to_path_buf(),
                source,
            })?
            .flipv()
            .to_rgba8();
        let (width, height) = image.dimensions();
        log::info!("Loaded texture {} ({}x{})", path.display(), width, height);

        Ok(Self::create_from_rgba_data(
            device,
            queue,
            &image,
            width,
            height,
            &path.display().to_string(),
            address_mode,
        ))
    }

    /// 1x1 white texture bound for draws without a diffuse map
    pub fn white(device: &wgpu::Device, queue: &wgpu::Queue) -> Self {
        Self::create_from_rgba_data(
            device,
            queue,
            &[255, 255, 255, 255],
            1,
            1,
            "White Fallback",
            wgpu::AddressMode::Repeat,
        )
    }

    /// Loads the six faces `<prefix>_<suffix>.jpg` into a cube texture
    ///
    /// All faces must share the size of the first one.
    pub fn cube_from_files(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        prefix: &str,
    ) -> Result<Self, AssetError> {
        let mut faces: Vec<image::RgbaImage> = Vec::with_capacity(CUBE_FACE_SUFFIXES.len());
        for suffix in CUBE_FACE_SUFFIXES {
            let path = PathBuf::from(format!("{}_{}.jpg", prefix, suffix));
            let face = image::open(&path)
                .map_err(|source| AssetError::Texture {
                    path: path.clone(),
                    source,
                })?
                .to_rgba8();
            if faces
                .first()
                .is_some_and(|first| first.dimensions() != face.dimensions())
            {
                return Err(AssetError::CubeFaceMismatch { path });
            }
            faces.push(face);
        }

        let (width, height) = faces[0].dimensions();
        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 6,
        };
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Skybox Cube"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        for (layer, face) in faces.iter().enumerate() {
            queue.write_texture(
                wgpu::TexelCopyTextureInfo {
                    texture: &texture,
                    mip_level: 0,
                    origin: wgpu::Origin3d {
                        x: 0,
                        y: 0,
                        z: layer as u32,
                    },
                    aspect: wgpu::TextureAspect::All,
                },
                face,
                wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(4 * width),
                    rows_per_image: Some(height),
                },
                wgpu::Extent3d {
                    width,
                    height,
                    depth_or_array_layers: 1,
                },
            );
        }
        log::info!("Loaded skybox {} ({}x{} per face)", prefix, width, height);

        let view = texture.create_view(&wgpu::TextureViewDescriptor {
            label: Some("Skybox Cube View"),
            dimension: Some(wgpu::TextureViewDimension::Cube),
            ..Default::default()
        });
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Skybox Sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        Ok(Self {
            texture,
            view,
            sampler,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_depth_stencil_format_has_stencil() {
        assert!(TextureResource::DEPTH_STENCIL_FORMAT.has_stencil_aspect());
        assert!(TextureResource::DEPTH_STENCIL_FORMAT.has_depth_aspect());
    }

    #[test]
    fn test_cube_faces_in_layer_order() {
        assert_eq!(CUBE_FACE_SUFFIXES[0], "posx");
        assert_eq!(CUBE_FACE_SUFFIXES[5], "negz");
    }
}
