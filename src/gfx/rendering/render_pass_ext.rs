//! Render pass extensions for drawing uploaded meshes

use wgpu::*;

use crate::gfx::resources::GpuMesh;

/// Extension trait for RenderPass to draw a [`GpuMesh`] with its per-draw slot
pub trait DrawMesh {
    /// Binds the draw uniform slot (group 1) and the mesh texture (group 2), then draws
    fn draw_mesh(&mut self, mesh: &GpuMesh, draw_bind_group: &BindGroup, offset: DynamicOffset);
}

impl DrawMesh for RenderPass<'_> {
    fn draw_mesh(&mut self, mesh: &GpuMesh, draw_bind_group: &BindGroup, offset: DynamicOffset) {
        self.set_bind_group(1, draw_bind_group, &[offset]);
        self.set_bind_group(2, &mesh.texture_bind_group, &[]);
        self.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
        self.set_index_buffer(mesh.index_buffer.slice(..), IndexFormat::Uint32);
        self.draw_indexed(0..mesh.index_count, 0, 0..1);
    }
}
