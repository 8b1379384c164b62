// src/gfx/rendering/mod.rs
//! Core rendering functionality
//!
//! Builds the per-frame draw plan, owns the render pipelines and executes
//! frames on the GPU.

pub mod draw_plan;
pub mod pipeline_manager;
pub mod render_engine;
pub mod render_pass_ext;

// Re-export main types
pub use draw_plan::{build_draw_plan, DrawPass, PassKind};
pub use pipeline_manager::{PipelineConfig, PipelineManager, StencilMode};
pub use render_engine::RenderEngine;
