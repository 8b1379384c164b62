//! Phong materials and the per-draw uniform block
//!
//! Materials come from MTL files; some object kinds override parts of them.
//! Every draw gets one [`DrawUniform`] slot in a dynamic-offset buffer.

use std::path::PathBuf;

use cgmath::{Matrix, Matrix4, SquareMatrix};

use crate::gfx::scene::ObjectKind;

/// Phong material as read from an MTL file
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub ambient: [f32; 3],
    pub diffuse: [f32; 3],
    pub specular: [f32; 3],
    pub shininess: f32,
    /// Diffuse map, already resolved against the mesh directory
    pub diffuse_texture: Option<PathBuf>,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            ambient: [0.2, 0.2, 0.2],
            diffuse: [0.8, 0.8, 0.8],
            specular: [0.0, 0.0, 0.0],
            shininess: 1.0,
            diffuse_texture: None,
        }
    }
}

impl Material {
    /// Converts a tobj material, filling unset values from [`Material::default`]
    ///
    /// # Arguments
    /// * `mtl` - Parsed MTL entry
    /// * `base_dir` - Directory of the OBJ file, texture names are relative to it
    pub fn from_mtl(mtl: &tobj::Material, base_dir: &std::path::Path) -> Self {
        let defaults = Self::default();
        Self {
            ambient: mtl.ambient.unwrap_or(defaults.ambient),
            diffuse: mtl.diffuse.unwrap_or(defaults.diffuse),
            specular: mtl.specular.unwrap_or(defaults.specular),
            shininess: mtl.shininess.unwrap_or(defaults.shininess),
            diffuse_texture: mtl
                .diffuse_texture
                .as_ref()
                .filter(|name| !name.is_empty())
                .map(|name| base_dir.join(name)),
        }
    }

    /// Applies the per-kind shading overrides
    pub fn for_kind(mut self, kind: ObjectKind) -> Self {
        match kind {
            ObjectKind::GroundTile | ObjectKind::Duck => self.shininess = 3.0,
            ObjectKind::Snowman | ObjectKind::Sofa => self.shininess = 2.0,
            ObjectKind::Gem => {
                self.ambient = [0.0; 3];
                self.diffuse = [0.7; 3];
                self.specular = [1.0; 3];
                self.shininess = 3.0;
            }
            ObjectKind::Palm
            | ObjectKind::Flyer
            | ObjectKind::Fire
            | ObjectKind::Billboard => {}
        }
        self
    }
}

/// Per-draw uniform block; must match `DrawUniform` in the WGSL shaders
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct DrawUniform {
    pub pvm: [[f32; 4]; 4],
    pub model: [[f32; 4]; 4],
    pub normal: [[f32; 4]; 4],
    pub ambient: [f32; 4],
    pub diffuse: [f32; 4],
    pub specular: [f32; 4],
    /// shininess, use_texture, frame_duration, local_time
    pub params: [f32; 4],
}

impl DrawUniform {
    /// Builds the uniform for one draw
    ///
    /// # Arguments
    /// * `view_proj` - Projection times view of the pass
    /// * `model` - Model matrix
    /// * `material` - Shading parameters
    /// * `use_texture` - Whether the bound texture modulates the diffuse color
    /// * `frame_duration` - Seconds per sprite frame, zero when unused
    /// * `local_time` - Seconds since the object was created
    pub fn new(
        view_proj: Matrix4<f32>,
        model: Matrix4<f32>,
        material: &Material,
        use_texture: bool,
        frame_duration: f32,
        local_time: f32,
    ) -> Self {
        let normal = model
            .invert()
            .map(|inverse| inverse.transpose())
            .unwrap_or_else(Matrix4::identity);
        let extend = |c: [f32; 3]| [c[0], c[1], c[2], 1.0];

        Self {
            pvm: (view_proj * model).into(),
            model: model.into(),
            normal: normal.into(),
            ambient: extend(material.ambient),
            diffuse: extend(material.diffuse),
            specular: extend(material.specular),
            params: [
                material.shininess,
                if use_texture { 1.0 } else { 0.0 },
                frame_duration,
                local_time,
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::Vector3;
    use std::path::Path;

    #[test]
    fn test_uniform_fits_one_slot() {
        assert_eq!(std::mem::size_of::<DrawUniform>(), 256);
    }

    #[test]
    fn test_kind_overrides() {
        let base = Material::default();
        assert_eq!(base.clone().for_kind(ObjectKind::GroundTile).shininess, 3.0);
        assert_eq!(base.clone().for_kind(ObjectKind::Snowman).shininess, 2.0);
        assert_eq!(base.clone().for_kind(ObjectKind::Palm), base);

        let gem = base.for_kind(ObjectKind::Gem);
        assert_eq!(gem.ambient, [0.0; 3]);
        assert_eq!(gem.diffuse, [0.7; 3]);
        assert_eq!(gem.specular, [1.0; 3]);
        assert_eq!(gem.shininess, 3.0);
    }

    #[test]
    fn test_from_mtl_defaults_and_texture_path() {
        let mtl = tobj::Material {
            diffuse: Some([0.1, 0.2, 0.3]),
            diffuse_texture: Some("bark.png".to_string()),
            ..Default::default()
        };
        let material = Material::from_mtl(&mtl, Path::new("data/PalmTree"));
        assert_eq!(material.diffuse, [0.1, 0.2, 0.3]);
        assert_eq!(material.shininess, 1.0);
        assert_eq!(
            material.diffuse_texture,
            Some(Path::new("data/PalmTree").join("bark.png"))
        );
    }

    #[test]
    fn test_normal_matrix_undoes_nonuniform_scale() {
        let model = Matrix4::from_nonuniform_scale(2.0, 2.0, 0.5);
        let uniform = DrawUniform::new(
            Matrix4::identity(),
            model,
            &Material::default(),
            true,
            0.1,
            2.0,
        );
        let normal: Matrix4<f32> = uniform.normal.into();
        let n = normal * Vector3::new(0.0, 0.0, 1.0).extend(0.0);
        assert!((n.z - 2.0).abs() < 1e-6);
        assert_eq!(uniform.params, [1.0, 1.0, 0.1, 2.0]);
    }
}
