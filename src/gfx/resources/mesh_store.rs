//! OBJ mesh loading and GPU upload
//!
//! Meshes are read with tobj, normalized into the unit cube and uploaded once
//! at startup. A mesh that fails to load leaves its object kind undrawable.

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use cgmath::{InnerSpace, Vector3};
use wgpu::util::DeviceExt;

use super::{material::Material, texture_resource::TextureResource};
use crate::{
    error::AssetError,
    gfx::{
        geometry::{normalize_to_unit_cube, GeometryData},
        scene::ObjectKind,
    },
    wgpu_utils::{BindGroupBuilder, BindGroupLayoutWithDesc},
};

/// How a kind's mesh file is structured
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeshLayout {
    /// Exactly one mesh in the file
    Single,
    /// Several meshes sharing one normalization
    Group,
}

/// Mesh files loaded at startup
pub const MESH_SOURCES: [(ObjectKind, &str, MeshLayout); 6] = [
    (ObjectKind::GroundTile, "data/ground/ground.obj", MeshLayout::Single),
    (ObjectKind::Snowman, "data/snehulak/snehulak.obj", MeshLayout::Group),
    (ObjectKind::Flyer, "data/raider/raider.obj", MeshLayout::Single),
    (ObjectKind::Palm, "data/PalmTree/PalmTree.obj", MeshLayout::Single),
    (ObjectKind::Sofa, "data/gauc/gauc.obj", MeshLayout::Group),
    (ObjectKind::Duck, "data/rubberduck/rubberduck.obj", MeshLayout::Single),
];

/// CPU-side mesh with its material
#[derive(Debug, Clone, PartialEq)]
pub struct MeshPart {
    pub geometry: GeometryData,
    pub material: Material,
}

/// Loads an OBJ file into normalized parts
///
/// # Arguments
/// * `path` - OBJ file; its MTL library and textures are resolved next to it
/// * `layout` - Whether the file must hold exactly one mesh
pub fn load_obj_parts(
    path: impl AsRef<Path>,
    layout: MeshLayout,
) -> Result<Vec<MeshPart>, AssetError> {
    let path = path.as_ref();
    let (models, materials) = tobj::load_obj(
        path,
        &tobj::LoadOptions {
            triangulate: true,
            single_index: true,
            ..Default::default()
        },
    )
    .map_err(|source| AssetError::Mesh {
        path: path.to_path_buf(),
        source,
    })?;

    let materials = materials.unwrap_or_else(|err| {
        log::warn!("No usable materials for {}: {}", path.display(), err);
        Vec::new()
    });

    if models.is_empty() {
        return Err(AssetError::EmptyMesh {
            path: path.to_path_buf(),
        });
    }
    if layout == MeshLayout::Single && models.len() != 1 {
        return Err(AssetError::NotSingleMesh {
            path: path.to_path_buf(),
            count: models.len(),
        });
    }

    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut geometries: Vec<GeometryData> =
        models.iter().map(|m| geometry_from_tobj(&m.mesh)).collect();
    if geometries.iter().all(|g| g.indices.is_empty()) {
        return Err(AssetError::EmptyMesh {
            path: path.to_path_buf(),
        });
    }
    normalize_to_unit_cube(&mut geometries);

    let parts = models
        .iter()
        .zip(geometries)
        .map(|(model, geometry)| MeshPart {
            geometry,
            material: model
                .mesh
                .material_id
                .and_then(|id| materials.get(id))
                .map(|mtl| Material::from_mtl(mtl, base_dir))
                .unwrap_or_default(),
        })
        .collect::<Vec<_>>();

    log::info!(
        "Loaded mesh {} ({} parts, {} triangles)",
        path.display(),
        parts.len(),
        parts.iter().map(|p| p.geometry.triangle_count()).sum::<usize>()
    );
    Ok(parts)
}

fn geometry_from_tobj(mesh: &tobj::Mesh) -> GeometryData {
    let vertices: Vec<[f32; 3]> = mesh
        .positions
        .chunks_exact(3)
        .map(|p| [p[0], p[1], p[2]])
        .collect();
    let normals = if mesh.normals.len() == mesh.positions.len() {
        mesh.normals
            .chunks_exact(3)
            .map(|n| [n[0], n[1], n[2]])
            .collect()
    } else {
        vertex_normals(&vertices, &mesh.indices)
    };
    let tex_coords = mesh
        .texcoords
        .chunks_exact(2)
        .map(|t| [t[0], t[1]])
        .collect();

    GeometryData {
        vertices,
        tex_coords,
        normals,
        indices: mesh.indices.clone(),
    }
}

/// Area-weighted vertex normals for meshes without stored normals
fn vertex_normals(vertices: &[[f32; 3]], indices: &[u32]) -> Vec<[f32; 3]> {
    let mut sums = vec![Vector3::new(0.0f32, 0.0, 0.0); vertices.len()];
    for tri in indices.chunks_exact(3) {
        let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
        if a >= vertices.len() || b >= vertices.len() || c >= vertices.len() {
            continue;
        }
        let pa = Vector3::from(vertices[a]);
        let face = (Vector3::from(vertices[b]) - pa).cross(Vector3::from(vertices[c]) - pa);
        for i in [a, b, c] {
            sums[i] += face;
        }
    }
    sums.into_iter()
        .map(|n| {
            if n.magnitude2() > f32::EPSILON {
                n.normalize().into()
            } else {
                [0.0, 0.0, 1.0]
            }
        })
        .collect()
}

/// A mesh part on the GPU, ready to draw
pub struct GpuMesh {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub index_count: u32,
    pub material: Material,
    pub textured: bool,
    pub texture_bind_group: wgpu::BindGroup,
}

impl GpuMesh {
    /// Uploads geometry and binds its diffuse texture
    ///
    /// A texture that fails to load is logged and replaced with `fallback`.
    ///
    /// # Arguments
    /// * `label` - Debug label
    /// * `geometry` - Vertex data to upload
    /// * `material` - Shading parameters, possibly naming a diffuse map
    /// * `texture_layout` - Layout of the texture bind group (texture, sampler)
    /// * `fallback` - Texture bound when there is no usable diffuse map
    pub fn upload(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        label: &str,
        geometry: &GeometryData,
        material: Material,
        texture_layout: &BindGroupLayoutWithDesc,
        fallback: &TextureResource,
    ) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Vertex Buffer", label)),
            contents: bytemuck::cast_slice(&geometry.to_vertices()),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Index Buffer", label)),
            contents: bytemuck::cast_slice(&geometry.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        let loaded = material.diffuse_texture.as_ref().and_then(|path| {
            TextureResource::from_file(device, queue, path, wgpu::AddressMode::Repeat)
                .map_err(|err| log::error!("{}: {}", label, err))
                .ok()
        });
        let textured = loaded.is_some();
        let texture = loaded.as_ref().unwrap_or(fallback);

        let texture_bind_group = BindGroupBuilder::new(texture_layout)
            .texture(&texture.view)
            .sampler(&texture.sampler)
            .create(device, &format!("{} Texture Bind Group", label));

        Self {
            vertex_buffer,
            index_buffer,
            index_count: geometry.indices.len() as u32,
            material,
            textured,
            texture_bind_group,
        }
    }
}

/// GPU meshes keyed by the object kind that draws them
#[derive(Default)]
pub struct MeshStore {
    meshes: HashMap<ObjectKind, Vec<GpuMesh>>,
}

impl MeshStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads every file in [`MESH_SOURCES`] relative to `root`
    ///
    /// Failures are logged and leave that kind without a mesh.
    pub fn load_all(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        root: &Path,
        texture_layout: &BindGroupLayoutWithDesc,
        fallback: &TextureResource,
    ) -> Self {
        let mut store = Self::new();
        for (kind, file, layout) in MESH_SOURCES {
            let path: PathBuf = root.join(file);
            match load_obj_parts(&path, layout) {
                Ok(parts) => {
                    let meshes = parts
                        .into_iter()
                        .enumerate()
                        .map(|(i, part)| {
                            GpuMesh::upload(
                                device,
                                queue,
                                &format!("{} #{}", kind.name(), i),
                                &part.geometry,
                                part.material.for_kind(kind),
                                texture_layout,
                                fallback,
                            )
                        })
                        .collect();
                    store.insert(kind, meshes);
                }
                Err(err) => log::error!("{}; {} will not be drawn", err, kind.name()),
            }
        }
        store
    }

    pub fn insert(&mut self, kind: ObjectKind, meshes: Vec<GpuMesh>) {
        self.meshes.insert(kind, meshes);
    }

    pub fn get(&self, kind: ObjectKind) -> Option<&[GpuMesh]> {
        self.meshes.get(&kind).map(Vec::as_slice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const TWO_TRIANGLES: &str = "\
mtllib scene.mtl
o first
v 0 0 0
v 4 0 0
v 0 4 0
usemtl red
f 1 2 3
o second
v 0 0 2
v 4 0 2
v 0 4 2
f 4 5 6
";

    const MTL: &str = "\
newmtl red
Kd 1 0 0
Ns 12
map_Kd red.png
";

    fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
        let path = dir.join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_group_is_normalized_jointly() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "scene.mtl", MTL);
        let obj = write(dir.path(), "scene.obj", TWO_TRIANGLES);

        let parts = load_obj_parts(&obj, MeshLayout::Group).unwrap();
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0].geometry.vertices[0], [-1.0, -1.0, -0.5]);
        assert_eq!(parts[1].geometry.vertices[0], [-1.0, -1.0, 0.5]);

        assert_eq!(parts[0].material.diffuse, [1.0, 0.0, 0.0]);
        assert_eq!(parts[0].material.shininess, 12.0);
        assert_eq!(
            parts[0].material.diffuse_texture,
            Some(dir.path().join("red.png"))
        );
    }

    #[test]
    fn test_single_layout_rejects_groups() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "scene.mtl", MTL);
        let obj = write(dir.path(), "scene.obj", TWO_TRIANGLES);

        match load_obj_parts(&obj, MeshLayout::Single) {
            Err(AssetError::NotSingleMesh { count, .. }) => assert_eq!(count, 2),
            other => panic!("unexpected result: {:?}", other.map(|p| p.len())),
        }
    }

    #[test]
    fn test_missing_file_is_mesh_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_obj_parts(dir.path().join("nope.obj"), MeshLayout::Single);
        assert!(matches!(result, Err(AssetError::Mesh { .. })));
    }

    #[test]
    fn test_computed_normals_face_up() {
        let normals = vertex_normals(
            &[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
            &[0, 1, 2],
        );
        assert_eq!(normals, vec![[0.0, 0.0, 1.0]; 3]);
    }
}
