//! # Object Picking System
//!
//! Objects are tagged in the stencil buffer while they are drawn. Clicking reads
//! the stencil value under the pointer back from the GPU and maps it to the
//! object that was hit.
//!
//! ## How it works
//!
//! 1. **Tagging**: each tagged draw pass writes its [`PickTarget::stencil_id`]
//! 2. **Readback**: after the frame, one stencil texel is copied to a mappable buffer
//! 3. **Resolve**: [`PickTarget::from_stencil`] turns the value back into a target

use crate::gfx::scene::object::ObjectKind;

/// Objects that can be clicked, with the stencil value each one writes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PickTarget {
    Snowman,
    Flyer,
    Palm,
    Sofa,
    Duck,
    Gem,
    Billboard,
}

impl PickTarget {
    pub fn stencil_id(self) -> u8 {
        match self {
            PickTarget::Snowman => 1,
            PickTarget::Flyer => 2,
            PickTarget::Palm => 3,
            PickTarget::Sofa => 4,
            PickTarget::Duck => 5,
            PickTarget::Gem => 6,
            PickTarget::Billboard => 7,
        }
    }

    /// Maps a stencil value back to a target; 0 and unknown values are background
    pub fn from_stencil(value: u8) -> Option<Self> {
        match value {
            1 => Some(PickTarget::Snowman),
            2 => Some(PickTarget::Flyer),
            3 => Some(PickTarget::Palm),
            4 => Some(PickTarget::Sofa),
            5 => Some(PickTarget::Duck),
            6 => Some(PickTarget::Gem),
            7 => Some(PickTarget::Billboard),
            _ => None,
        }
    }

    /// Target tagged by objects of `kind`; ground tiles and the fire are untagged
    pub fn for_kind(kind: ObjectKind) -> Option<Self> {
        match kind {
            ObjectKind::Snowman => Some(PickTarget::Snowman),
            ObjectKind::Flyer => Some(PickTarget::Flyer),
            ObjectKind::Palm => Some(PickTarget::Palm),
            ObjectKind::Sofa => Some(PickTarget::Sofa),
            ObjectKind::Duck => Some(PickTarget::Duck),
            ObjectKind::Gem => Some(PickTarget::Gem),
            ObjectKind::Billboard => Some(PickTarget::Billboard),
            ObjectKind::GroundTile | ObjectKind::Fire => None,
        }
    }
}

/// Rows in a texture to buffer copy must be padded to this many bytes
const READBACK_ROW_BYTES: u32 = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;

/// Reads single stencil texels back from the depth-stencil target
pub struct StencilPicker {
    buffer: wgpu::Buffer,
    pending: Option<(u32, u32)>,
    copied: bool,
}

impl StencilPicker {
    pub fn new(device: &wgpu::Device) -> Self {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Stencil Pick Readback"),
            size: READBACK_ROW_BYTES as u64,
            usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        Self {
            buffer,
            pending: None,
            copied: false,
        }
    }

    /// Queues a pick at a pixel for the next rendered frame
    pub fn request(&mut self, x: u32, y: u32) {
        self.pending = Some((x, y));
    }

    /// Records the copy of the requested stencil texel, if a pick is pending
    ///
    /// Must be encoded after the scene passes of the frame.
    ///
    /// # Arguments
    /// * `encoder` - Frame command encoder
    /// * `depth_stencil` - Depth-stencil texture with COPY_SRC usage
    pub fn encode_copy(&mut self, encoder: &mut wgpu::CommandEncoder, depth_stencil: &wgpu::Texture) {
        let Some((x, y)) = self.pending.take() else {
            return;
        };
        let size = depth_stencil.size();
        let x = x.min(size.width.saturating_sub(1));
        let y = y.min(size.height.saturating_sub(1));

        encoder.copy_texture_to_buffer(
            wgpu::TexelCopyTextureInfo {
                texture: depth_stencil,
                mip_level: 0,
                origin: wgpu::Origin3d { x, y, z: 0 },
                aspect: wgpu::TextureAspect::StencilOnly,
            },
            wgpu::TexelCopyBufferInfo {
                buffer: &self.buffer,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(READBACK_ROW_BYTES),
                    rows_per_image: Some(1),
                },
            },
            wgpu::Extent3d {
                width: 1,
                height: 1,
                depth_or_array_layers: 1,
            },
        );
        self.copied = true;
    }

    /// Waits for the copied texel and resolves it
    ///
    /// Call after the frame's command buffer was submitted. Returns None when no
    /// copy was recorded, on mapping failure, or when the background was hit.
    pub fn resolve(&mut self, device: &wgpu::Device) -> Option<PickTarget> {
        if !std::mem::take(&mut self.copied) {
            return None;
        }

        let slice = self.buffer.slice(..);
        let (tx, rx) = futures::channel::oneshot::channel();
        slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = tx.send(result);
        });
        if let Err(err) = device.poll(wgpu::PollType::Wait) {
            log::warn!("Device poll failed during pick readback: {}", err);
        }

        let value = match futures::executor::block_on(rx) {
            Ok(Ok(())) => {
                let mapped = slice.get_mapped_range();
                let value = mapped.first().copied();
                drop(mapped);
                self.buffer.unmap();
                value
            }
            Ok(Err(err)) => {
                log::warn!("Pick readback mapping failed: {}", err);
                None
            }
            Err(_) => None,
        }?;

        let target = PickTarget::from_stencil(value);
        log::debug!("Picked stencil value {} -> {:?}", value, target);
        target
    }
}
