//! Render pipeline management system for wgpu
//!
//! Shaders are read from WGSL files, pipelines are registered by name from a
//! [`PipelineConfig`] and created together once all shaders are loaded.

use std::{collections::HashMap, path::Path, sync::Arc};
use wgpu::*;

use crate::{error::AssetError, gfx::scene::vertex::Vertex3D};

/// How a pipeline treats the stencil buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StencilMode {
    /// Stencil is left untouched
    Keep,
    /// Fragments that pass the depth test write the pass's stencil reference
    Tag,
}

impl StencilMode {
    fn state(self) -> StencilState {
        match self {
            StencilMode::Keep => StencilState {
                front: StencilFaceState::IGNORE,
                back: StencilFaceState::IGNORE,
                read_mask: 0xff,
                write_mask: 0x00,
            },
            StencilMode::Tag => {
                let face = StencilFaceState {
                    compare: CompareFunction::Always,
                    fail_op: StencilOperation::Keep,
                    depth_fail_op: StencilOperation::Keep,
                    pass_op: StencilOperation::Replace,
                };
                StencilState {
                    front: face,
                    back: face,
                    read_mask: 0xff,
                    write_mask: 0xff,
                }
            }
        }
    }
}

/// Configuration for creating a render pipeline
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub label: String,
    pub shader: String,
    pub bind_group_layouts: Vec<BindGroupLayout>,
    pub depth_format: Option<TextureFormat>,
    pub depth_write_enabled: bool,
    pub depth_compare: CompareFunction,
    pub stencil: StencilMode,
    pub color_targets: Vec<Option<ColorTargetState>>,
    pub no_vertex_buffers: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            label: "Default Pipeline".to_string(),
            shader: "lit".to_string(),
            bind_group_layouts: Vec::new(),
            depth_format: None,
            depth_write_enabled: true,
            depth_compare: CompareFunction::Less,
            stencil: StencilMode::Keep,
            color_targets: vec![Some(ColorTargetState {
                format: TextureFormat::Bgra8UnormSrgb,
                blend: Some(BlendState::REPLACE),
                write_mask: ColorWrites::ALL,
            })],
            no_vertex_buffers: false,
        }
    }
}

impl PipelineConfig {
    pub fn with_label(mut self, label: &str) -> Self {
        self.label = label.to_owned();
        self
    }

    /// Sets the shader for this pipeline (builder pattern)
    ///
    /// # Arguments
    /// * `shader` - Shader identifier
    pub fn with_shader(mut self, shader: &str) -> Self {
        self.shader = shader.to_string();
        self
    }

    /// Sets all bind group layouts at once (builder pattern)
    pub fn with_bind_group_layouts(mut self, layouts: Vec<BindGroupLayout>) -> Self {
        self.bind_group_layouts = layouts;
        self
    }

    /// Enables depth (and stencil) testing against an attachment of `format`
    pub fn with_depth_stencil(mut self, format: TextureFormat) -> Self {
        self.depth_format = Some(format);
        self
    }

    /// Overrides the depth comparison and whether depth is written
    pub fn with_depth_test(mut self, compare: CompareFunction, write: bool) -> Self {
        self.depth_compare = compare;
        self.depth_write_enabled = write;
        self
    }

    pub fn with_stencil(mut self, stencil: StencilMode) -> Self {
        self.stencil = stencil;
        self
    }

    /// Uses a single color target of `format` with the given blending
    pub fn with_color_target(mut self, format: TextureFormat, blend: BlendState) -> Self {
        self.color_targets = vec![Some(ColorTargetState {
            format,
            blend: Some(blend),
            write_mask: ColorWrites::ALL,
        })];
        self
    }

    /// Configures pipeline for fullscreen rendering (no vertex buffers needed)
    pub fn with_no_vertex_buffers(mut self) -> Self {
        self.no_vertex_buffers = true;
        self
    }
}

/// Additive blending, used for the fire sprite
pub const ADDITIVE_BLENDING: BlendState = BlendState {
    color: BlendComponent {
        src_factor: BlendFactor::One,
        dst_factor: BlendFactor::One,
        operation: BlendOperation::Add,
    },
    alpha: BlendComponent {
        src_factor: BlendFactor::One,
        dst_factor: BlendFactor::One,
        operation: BlendOperation::Add,
    },
};

/// Reads a WGSL file from `dir`
///
/// # Arguments
/// * `dir` - Shader directory
/// * `name` - Shader identifier; the file is `<name>.wgsl`
pub fn read_shader_source(dir: &Path, name: &str) -> Result<String, AssetError> {
    let path = dir.join(format!("{}.wgsl", name));
    let source = std::fs::read_to_string(&path).map_err(|source| AssetError::Shader {
        path: path.clone(),
        source,
    })?;
    log::info!("Loaded shader {}", path.display());
    Ok(source)
}

/// Compiles shaders and owns the named render pipelines
pub struct PipelineManager {
    device: Arc<Device>,
    pipelines: HashMap<String, RenderPipeline>,
    pipeline_configs: HashMap<String, PipelineConfig>,
    shader_modules: HashMap<String, ShaderModule>,
    pending_pipelines: Vec<String>,
}

impl PipelineManager {
    pub fn new(device: Arc<Device>) -> Self {
        Self {
            device,
            pipelines: HashMap::new(),
            pipeline_configs: HashMap::new(),
            shader_modules: HashMap::new(),
            pending_pipelines: Vec::new(),
        }
    }

    /// Registers a pipeline configuration without creating it
    ///
    /// # Arguments
    /// * `name` - Unique identifier for this pipeline
    /// * `config` - Pipeline configuration
    pub fn register_pipeline(&mut self, name: &str, config: PipelineConfig) {
        self.pipeline_configs.insert(name.to_string(), config);
        self.pending_pipelines.push(name.to_string());
    }

    /// Compiles a WGSL shader module under `name`
    pub fn load_shader(&mut self, name: &str, source: &str) {
        let shader_module = self.device.create_shader_module(ShaderModuleDescriptor {
            label: Some(name),
            source: ShaderSource::Wgsl(source.into()),
        });
        self.shader_modules.insert(name.to_string(), shader_module);
    }

    /// Reads and compiles `<dir>/<name>.wgsl`
    pub fn load_shader_file(&mut self, dir: &Path, name: &str) -> Result<(), AssetError> {
        let source = read_shader_source(dir, name)?;
        self.load_shader(name, &source);
        Ok(())
    }

    /// Returns a created pipeline by name
    pub fn pipeline(&self, name: &str) -> Option<&RenderPipeline> {
        self.pipelines.get(name)
    }

    /// Creates all pending pipelines immediately
    ///
    /// # Returns
    /// Result with vector of error messages if any pipelines failed to create
    pub fn create_all_pipelines(&mut self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();
        let pending = std::mem::take(&mut self.pending_pipelines);

        for name in pending {
            if let Some(config) = self.pipeline_configs.get(&name) {
                match self.create_pipeline_from_config(&name, config) {
                    Ok(pipeline) => {
                        self.pipelines.insert(name, pipeline);
                    }
                    Err(e) => {
                        errors.push(format!("Pipeline '{}': {}", name, e));
                        self.pending_pipelines.push(name);
                    }
                }
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Creates a render pipeline from configuration
    fn create_pipeline_from_config(
        &self,
        name: &str,
        config: &PipelineConfig,
    ) -> Result<RenderPipeline, String> {
        let shader = self
            .shader_modules
            .get(&config.shader)
            .ok_or_else(|| format!("Shader '{}' not found", config.shader))?;

        let bind_group_layout_refs: Vec<&BindGroupLayout> =
            config.bind_group_layouts.iter().collect();
        let pipeline_layout = self
            .device
            .create_pipeline_layout(&PipelineLayoutDescriptor {
                label: Some(&format!("{} Layout", name)),
                bind_group_layouts: &bind_group_layout_refs,
                push_constant_ranges: &[],
            });

        let vertex_buffers: &[VertexBufferLayout] = if config.no_vertex_buffers {
            &[]
        } else {
            &[Vertex3D::desc()]
        };

        let depth_stencil = config.depth_format.map(|format| DepthStencilState {
            format,
            depth_write_enabled: config.depth_write_enabled,
            depth_compare: config.depth_compare,
            stencil: config.stencil.state(),
            bias: DepthBiasState::default(),
        });

        let pipeline = self
            .device
            .create_render_pipeline(&RenderPipelineDescriptor {
                label: Some(&config.label),
                layout: Some(&pipeline_layout),
                vertex: VertexState {
                    module: shader,
                    entry_point: Some("vs_main"),
                    buffers: vertex_buffers,
                    compilation_options: PipelineCompilationOptions::default(),
                },
                fragment: Some(FragmentState {
                    module: shader,
                    entry_point: Some("fs_main"),
                    targets: &config.color_targets,
                    compilation_options: PipelineCompilationOptions::default(),
                }),
                primitive: PrimitiveState {
                    topology: PrimitiveTopology::TriangleList,
                    strip_index_format: None,
                    front_face: FrontFace::Ccw,
                    // OBJ winding is not consistent across the island meshes
                    cull_mode: None,
                    polygon_mode: PolygonMode::Fill,
                    unclipped_depth: false,
                    conservative: false,
                },
                depth_stencil,
                multisample: MultisampleState::default(),
                multiview: None,
                cache: None,
            });

        Ok(pipeline)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_keep_mode_never_writes() {
        let state = StencilMode::Keep.state();
        assert_eq!(state.write_mask, 0);
    }

    #[test]
    fn test_tag_mode_replaces_on_pass() {
        let state = StencilMode::Tag.state();
        assert_eq!(state.front.pass_op, StencilOperation::Replace);
        assert_eq!(state.front.compare, CompareFunction::Always);
        assert_eq!(state.front.depth_fail_op, StencilOperation::Keep);
        assert_eq!(state.write_mask, 0xff);
    }

    #[test]
    fn test_builder_options() {
        let config = PipelineConfig::default()
            .with_label("Billboard")
            .with_shader("billboard")
            .with_depth_stencil(TextureFormat::Depth24PlusStencil8)
            .with_depth_test(CompareFunction::Always, false)
            .with_stencil(StencilMode::Tag)
            .with_color_target(TextureFormat::Bgra8UnormSrgb, BlendState::ALPHA_BLENDING);
        assert_eq!(config.label, "Billboard");
        assert_eq!(config.depth_compare, CompareFunction::Always);
        assert!(!config.depth_write_enabled);
        assert_eq!(
            config.color_targets[0].as_ref().and_then(|t| t.blend),
            Some(BlendState::ALPHA_BLENDING)
        );
    }

    #[test]
    fn test_shader_source_from_dir() {
        let dir = tempfile::tempdir().unwrap();
        let mut file = std::fs::File::create(dir.path().join("lit.wgsl")).unwrap();
        file.write_all(b"// lit").unwrap();

        assert_eq!(read_shader_source(dir.path(), "lit").unwrap(), "// lit");
        match read_shader_source(dir.path(), "skybox") {
            Err(AssetError::Shader { path, .. }) => assert!(path.ends_with("skybox.wgsl")),
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
