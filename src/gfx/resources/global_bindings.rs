//! Global uniform bindings for per-frame camera and lighting state
//!
//! Bound to group 0 in every pipeline.

use cgmath::{Matrix4, Vector3};

use crate::{
    gfx::{camera::ViewProjection, scene::Scene},
    wgpu_utils::{binding_types, BindGroupBuilder, BindGroupLayoutBuilder, UniformBuffer},
};

/// Per-frame data shared by all draws
///
/// MUST match the `Globals` struct in the shaders exactly.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GlobalUniform {
    pub view: [[f32; 4]; 4],
    /// Inverse of projection times rotation-only view, for skybox rays
    pub skybox_inverse: [[f32; 4]; 4],
    /// Flashlight origin, follows the camera
    pub reflector_position: [f32; 4],
    pub reflector_direction: [f32; 4],
    /// Fire light position
    pub point_light_position: [f32; 4],
    /// sun_on, flashlight_on, point_light_on, fog_on
    pub flags: [f32; 4],
    /// x = scene time in seconds
    pub time: [f32; 4],
}
// 2 * 64 + 5 * 16 = 208 bytes

impl GlobalUniform {
    /// Collects the frame uniforms for `scene` seen through `view`
    pub fn from_scene(scene: &Scene, view: &ViewProjection) -> Self {
        let flag = |on: bool| if on { 1.0 } else { 0.0 };
        let point = |v: Vector3<f32>| [v.x, v.y, v.z, 1.0];
        let direction = |v: Vector3<f32>| [v.x, v.y, v.z, 0.0];

        let fire_position = scene
            .objects
            .fire
            .as_ref()
            .map(|fire| fire.position)
            .unwrap_or_else(|| Vector3::new(0.0, 0.0, 0.0));

        Self {
            view: view.view.into(),
            skybox_inverse: view.skybox_inverse().into(),
            reflector_position: point(scene.camera.eye_position()),
            reflector_direction: direction(scene.camera.eye_direction()),
            point_light_position: point(fire_position),
            flags: [
                flag(scene.state.sun_on),
                flag(scene.state.flashlight_on),
                flag(scene.state.fire_on),
                flag(scene.state.fog_on),
            ],
            time: [scene.state.elapsed, 0.0, 0.0, 0.0],
        }
    }
}

impl Default for GlobalUniform {
    fn default() -> Self {
        let identity: [[f32; 4]; 4] = Matrix4::from_scale(1.0).into();
        Self {
            view: identity,
            skybox_inverse: identity,
            reflector_position: [0.0; 4],
            reflector_direction: [0.0; 4],
            point_light_position: [0.0; 4],
            flags: [1.0, 0.0, 0.0, 0.0],
            time: [0.0; 4],
        }
    }
}

pub type GlobalUBO = UniformBuffer<GlobalUniform>;

/// Uniform buffer, layout and bind group for [`GlobalUniform`]
pub struct GlobalBindings {
    ubo: GlobalUBO,
    bind_group_layout: wgpu::BindGroupLayout,
    bind_group: wgpu::BindGroup,
}

impl GlobalBindings {
    pub fn new(device: &wgpu::Device) -> Self {
        let layout = BindGroupLayoutBuilder::new()
            .next_binding_rendering(binding_types::uniform())
            .create(device, "Globals Bind Group Layout");
        let ubo = GlobalUBO::new(device);
        let bind_group = BindGroupBuilder::new(&layout)
            .resource(ubo.binding_resource())
            .create(device, "Globals Bind Group");

        Self {
            ubo,
            bind_group_layout: layout.layout,
            bind_group,
        }
    }

    pub fn update(&mut self, queue: &wgpu::Queue, content: GlobalUniform) {
        self.ubo.update_content(queue, content);
    }

    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout
    }

    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }
}
