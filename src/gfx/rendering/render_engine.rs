//! WGPU-based rendering engine for the island scene
//!
//! Owns the surface, device, pipelines and uploaded assets, and executes the
//! [`draw_plan`](super::draw_plan) of each frame in a single render pass.

use std::{path::Path, sync::Arc};
use wgpu::TextureFormat;

use crate::{
    error::RenderError,
    gfx::{
        camera::ViewProjection,
        geometry::{generate_gem, generate_quad},
        picking::{PickTarget, StencilPicker},
        resources::{
            DrawUniform, GlobalBindings, GlobalUniform, GpuMesh, Material, MeshStore,
            TextureResource,
        },
        scene::{ObjectKind, Scene},
    },
    settings::SHADER_DIR,
    wgpu_utils::{
        binding_types, BindGroupBuilder, BindGroupLayoutBuilder, BindGroupLayoutWithDesc,
        DynamicUniformBuffer,
    },
};

use super::{
    draw_plan::{build_draw_plan, DrawPass, PassKind},
    pipeline_manager::{PipelineConfig, PipelineManager, StencilMode, ADDITIVE_BLENDING},
    render_pass_ext::DrawMesh,
};

const LIT: &str = "lit";
const LIT_TAGGED: &str = "lit_tagged";
const SKYBOX: &str = "skybox";
const FIRE: &str = "fire";
const BILLBOARD: &str = "billboard";

const SKYBOX_PREFIX: &str = "data/skybox1/skybox";
const GEM_TEXTURE: &str = "data/diamond.png";
const FIRE_TEXTURE: &str = "data/fire.png";
const BILLBOARD_TEXTURE: &str = "data/img.png";

/// Pipeline used for a pass
pub fn pipeline_for(pass: &DrawPass) -> &'static str {
    match pass.kind {
        PassKind::Skybox => SKYBOX,
        PassKind::Object(ObjectKind::Fire) => FIRE,
        PassKind::Object(ObjectKind::Billboard) => BILLBOARD,
        PassKind::Object(_) if pass.stencil_id.is_some() => LIT_TAGGED,
        PassKind::Object(_) => LIT,
    }
}

/// Projection times view for a pass; the billboard always uses the top-down view
pub fn pass_view_proj(pass: &DrawPass, main: &ViewProjection) -> cgmath::Matrix4<f32> {
    match pass.kind {
        PassKind::Object(ObjectKind::Billboard) => ViewProjection::top_down().view_proj(),
        _ => main.view_proj(),
    }
}

/// Geometry that is generated rather than loaded from OBJ files
struct BuiltinMeshes {
    gem: GpuMesh,
    fire: GpuMesh,
    billboard: GpuMesh,
}

fn meshes_for<'a>(
    store: &'a MeshStore,
    builtin: &'a BuiltinMeshes,
    kind: ObjectKind,
) -> Option<&'a [GpuMesh]> {
    match kind {
        ObjectKind::Gem => Some(std::slice::from_ref(&builtin.gem)),
        ObjectKind::Fire => Some(std::slice::from_ref(&builtin.fire)),
        ObjectKind::Billboard => Some(std::slice::from_ref(&builtin.billboard)),
        _ => store.get(kind),
    }
}

/// One indexed draw of the frame
struct DrawCall<'a> {
    pass: &'a DrawPass,
    mesh: Option<&'a GpuMesh>,
    slot: usize,
}

/// Core rendering engine managing GPU resources and draw calls
pub struct RenderEngine {
    surface: wgpu::Surface<'static>,
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    config: wgpu::SurfaceConfiguration,
    format: TextureFormat,
    depth_stencil: TextureResource,
    pipeline_manager: PipelineManager,
    global_bindings: GlobalBindings,
    draw_layout: BindGroupLayoutWithDesc,
    draw_uniforms: DynamicUniformBuffer<DrawUniform>,
    draw_bind_group: wgpu::BindGroup,
    meshes: MeshStore,
    builtin: BuiltinMeshes,
    skybox_bind_group: wgpu::BindGroup,
    picker: StencilPicker,
}

impl RenderEngine {
    /// Creates the render engine for a window and loads every asset
    ///
    /// Meshes and textures that fail to load are logged and skipped; missing
    /// shaders or skybox faces abort startup.
    ///
    /// # Arguments
    /// * `window` - Window surface target for rendering
    /// * `width` - Initial surface width in pixels
    /// * `height` - Initial surface height in pixels
    /// * `asset_root` - Directory containing `data/` and the shader directory
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        width: u32,
        height: u32,
        asset_root: &Path,
    ) -> Result<RenderEngine, RenderError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;
        log::info!("Using adapter {:?}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("WGPU Device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_defaults(),
                memory_hints: wgpu::MemoryHints::default(),
                trace: wgpu::Trace::Off,
            })
            .await?;
        let device = Arc::new(device);
        let queue = Arc::new(queue);

        let surface_capabilities = surface.get_capabilities(&adapter);
        let format = surface_capabilities
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| surface_capabilities.formats.first().copied())
            .ok_or_else(|| RenderError::Pipeline("surface reports no formats".to_string()))?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_capabilities
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let depth_stencil =
            TextureResource::create_depth_stencil(&device, &config, "Depth Stencil");

        let global_bindings = GlobalBindings::new(&device);
        let draw_layout = BindGroupLayoutBuilder::new()
            .next_binding_rendering(binding_types::uniform_dynamic(
                std::mem::size_of::<DrawUniform>() as u64,
            ))
            .create(&device, "Draw Uniform Layout");
        let texture_layout = BindGroupLayoutBuilder::new()
            .next_binding_fragment(binding_types::texture_2d())
            .next_binding_fragment(binding_types::sampler(
                wgpu::SamplerBindingType::Filtering,
            ))
            .create(&device, "Texture Layout");
        let cube_layout = BindGroupLayoutBuilder::new()
            .next_binding_fragment(binding_types::texture_cube())
            .next_binding_fragment(binding_types::sampler(
                wgpu::SamplerBindingType::Filtering,
            ))
            .create(&device, "Skybox Layout");

        let draw_uniforms = DynamicUniformBuffer::new(&device, 64);
        let draw_bind_group = BindGroupBuilder::new(&draw_layout)
            .resource(draw_uniforms.binding_resource())
            .create(&device, "Draw Uniform Bind Group");

        let mut pipeline_manager = PipelineManager::new(device.clone());
        let shader_dir = asset_root.join(SHADER_DIR);
        for shader in [LIT, SKYBOX, FIRE, BILLBOARD] {
            pipeline_manager.load_shader_file(&shader_dir, shader)?;
        }

        let object_layouts = vec![
            global_bindings.bind_group_layout().clone(),
            draw_layout.layout.clone(),
            texture_layout.layout.clone(),
        ];
        let lit = PipelineConfig::default()
            .with_shader(LIT)
            .with_bind_group_layouts(object_layouts.clone())
            .with_depth_stencil(TextureResource::DEPTH_STENCIL_FORMAT)
            .with_color_target(format, wgpu::BlendState::REPLACE);
        pipeline_manager.register_pipeline(LIT, lit.clone().with_label("Lit"));
        pipeline_manager.register_pipeline(
            LIT_TAGGED,
            lit.with_label("Lit Tagged").with_stencil(StencilMode::Tag),
        );
        pipeline_manager.register_pipeline(
            SKYBOX,
            PipelineConfig::default()
                .with_label("Skybox")
                .with_shader(SKYBOX)
                .with_bind_group_layouts(vec![
                    global_bindings.bind_group_layout().clone(),
                    cube_layout.layout.clone(),
                ])
                .with_depth_stencil(TextureResource::DEPTH_STENCIL_FORMAT)
                .with_depth_test(wgpu::CompareFunction::LessEqual, false)
                .with_color_target(format, wgpu::BlendState::REPLACE)
                .with_no_vertex_buffers(),
        );
        pipeline_manager.register_pipeline(
            FIRE,
            PipelineConfig::default()
                .with_label("Fire Sprite")
                .with_shader(FIRE)
                .with_bind_group_layouts(object_layouts.clone())
                .with_depth_stencil(TextureResource::DEPTH_STENCIL_FORMAT)
                .with_depth_test(wgpu::CompareFunction::Less, false)
                .with_color_target(format, ADDITIVE_BLENDING),
        );
        pipeline_manager.register_pipeline(
            BILLBOARD,
            PipelineConfig::default()
                .with_label("Billboard")
                .with_shader(BILLBOARD)
                .with_bind_group_layouts(object_layouts)
                .with_depth_stencil(TextureResource::DEPTH_STENCIL_FORMAT)
                .with_depth_test(wgpu::CompareFunction::Always, false)
                .with_stencil(StencilMode::Tag)
                .with_color_target(format, wgpu::BlendState::ALPHA_BLENDING),
        );
        pipeline_manager
            .create_all_pipelines()
            .map_err(|errors| RenderError::Pipeline(errors.join("; ")))?;

        let fallback = TextureResource::white(&device, &queue);
        let meshes = MeshStore::load_all(&device, &queue, asset_root, &texture_layout, &fallback);

        let textured = |path: &str, kind: ObjectKind| Material {
            diffuse_texture: Some(asset_root.join(path)),
            ..Material::default().for_kind(kind)
        };
        let builtin = BuiltinMeshes {
            gem: GpuMesh::upload(
                &device,
                &queue,
                "gem",
                &generate_gem(),
                textured(GEM_TEXTURE, ObjectKind::Gem),
                &texture_layout,
                &fallback,
            ),
            fire: GpuMesh::upload(
                &device,
                &queue,
                "fire",
                &generate_quad(),
                textured(FIRE_TEXTURE, ObjectKind::Fire),
                &texture_layout,
                &fallback,
            ),
            billboard: GpuMesh::upload(
                &device,
                &queue,
                "billboard",
                &generate_quad(),
                textured(BILLBOARD_TEXTURE, ObjectKind::Billboard),
                &texture_layout,
                &fallback,
            ),
        };

        let skybox = TextureResource::cube_from_files(
            &device,
            &queue,
            &asset_root.join(SKYBOX_PREFIX).to_string_lossy(),
        )?;
        let skybox_bind_group = BindGroupBuilder::new(&cube_layout)
            .texture(&skybox.view)
            .sampler(&skybox.sampler)
            .create(&device, "Skybox Bind Group");

        let picker = StencilPicker::new(&device);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            format,
            depth_stencil,
            pipeline_manager,
            global_bindings,
            draw_layout,
            draw_uniforms,
            draw_bind_group,
            meshes,
            builtin,
            skybox_bind_group,
            picker,
        })
    }

    /// Queues a stencil readback at a pixel for the next frame
    pub fn request_pick(&mut self, x: u32, y: u32) {
        self.picker.request(x, y);
    }

    /// Renders one frame of `scene`, then the optional UI overlay
    ///
    /// # Returns
    /// The object under a pending pick request, if one was requested and hit
    pub fn render_frame<F>(&mut self, scene: &Scene, ui_callback: Option<F>) -> Option<PickTarget>
    where
        F: FnOnce(&wgpu::Device, &wgpu::Queue, &mut wgpu::CommandEncoder, &wgpu::TextureView),
    {
        let surface_texture = match self.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::warn!("Surface lost, reconfiguring");
                self.surface.configure(&self.device, &self.config);
                return None;
            }
            Err(err) => {
                log::error!("Failed to acquire surface texture: {}", err);
                return None;
            }
        };
        let surface_texture_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let aspect = self.config.width as f32 / self.config.height as f32;
        let view = scene.view_projection(aspect);
        let plan = build_draw_plan(scene, &view);

        self.global_bindings
            .update(&self.queue, GlobalUniform::from_scene(scene, &view));

        let mut calls = Vec::with_capacity(plan.len());
        let mut uniforms = Vec::with_capacity(plan.len());
        for pass in &plan {
            let PassKind::Object(kind) = pass.kind else {
                calls.push(DrawCall {
                    pass,
                    mesh: None,
                    slot: 0,
                });
                continue;
            };
            let Some(parts) = meshes_for(&self.meshes, &self.builtin, kind) else {
                continue;
            };
            let view_proj = pass_view_proj(pass, &view);
            for mesh in parts {
                calls.push(DrawCall {
                    pass,
                    mesh: Some(mesh),
                    slot: uniforms.len(),
                });
                uniforms.push(DrawUniform::new(
                    view_proj,
                    pass.model,
                    &mesh.material,
                    mesh.textured,
                    pass.frame_duration,
                    pass.local_time,
                ));
            }
        }

        if self
            .draw_uniforms
            .write_all(&self.device, &self.queue, &uniforms)
        {
            self.draw_bind_group = BindGroupBuilder::new(&self.draw_layout)
                .resource(self.draw_uniforms.binding_resource())
                .create(&self.device, "Draw Uniform Bind Group");
        }

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &surface_texture_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_stencil.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(0),
                        store: wgpu::StoreOp::Store,
                    }),
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            render_pass.set_bind_group(0, self.global_bindings.bind_group(), &[]);

            for call in &calls {
                let name = pipeline_for(call.pass);
                let Some(pipeline) = self.pipeline_manager.pipeline(name) else {
                    continue;
                };
                render_pass.set_pipeline(pipeline);
                if let Some(id) = call.pass.stencil_id {
                    render_pass.set_stencil_reference(id as u32);
                }
                if !call.pass.visible {
                    continue;
                }

                match call.mesh {
                    Some(mesh) => render_pass.draw_mesh(
                        mesh,
                        &self.draw_bind_group,
                        self.draw_uniforms.offset(call.slot),
                    ),
                    None => {
                        render_pass.set_bind_group(1, &self.skybox_bind_group, &[]);
                        render_pass.draw(0..3, 0..1);
                    }
                }
            }
        }

        self.picker
            .encode_copy(&mut encoder, &self.depth_stencil.texture);

        if let Some(ui_callback) = ui_callback {
            ui_callback(
                &self.device,
                &self.queue,
                &mut encoder,
                &surface_texture_view,
            );
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        surface_texture.present();

        self.picker.resolve(&self.device)
    }

    /// Resizes the surface and recreates the depth-stencil target
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
        self.depth_stencil =
            TextureResource::create_depth_stencil(&self.device, &self.config, "Depth Stencil");
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    pub fn surface_format(&self) -> TextureFormat {
        self.format
    }
}
