//! # Geometry
//!
//! CPU-side geometry shared by loaded meshes and the built-in shapes, plus the
//! per-kind model transforms used when drawing scene objects.
//!
//! - [`primitives`] - gem and textured quad
//! - [`transform`] - model matrices and the direction-to-orientation helper

pub mod primitives;
pub mod transform;

pub use primitives::*;
pub use transform::{front_direction_matrix, model_matrix};

use crate::gfx::scene::vertex::Vertex3D;

/// Represents generated or loaded geometry ready for GPU upload
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryData {
    /// Vertex positions (x, y, z)
    pub vertices: Vec<[f32; 3]>,
    /// Texture coordinates (u, v)
    pub tex_coords: Vec<[f32; 2]>,
    /// Normal vectors (x, y, z)
    pub normals: Vec<[f32; 3]>,
    /// Triangle indices (counter-clockwise winding)
    pub indices: Vec<u32>,
}

impl GeometryData {
    /// Create a new empty geometry data structure
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            tex_coords: Vec::new(),
            normals: Vec::new(),
            indices: Vec::new(),
        }
    }

    /// Get the number of triangles in this geometry
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Interleaves positions, normals and texture coordinates into GPU vertices
    pub fn to_vertices(&self) -> Vec<Vertex3D> {
        (0..self.vertices.len())
            .map(|i| Vertex3D {
                position: self.vertices[i],
                normal: self.normals.get(i).copied().unwrap_or([0.0, 0.0, 1.0]),
                tex_coords: self.tex_coords.get(i).copied().unwrap_or([0.0, 0.0]),
            })
            .collect()
    }

    /// Axis aligned bounds as (min, max), None when there are no vertices
    pub fn bounds(&self) -> Option<([f32; 3], [f32; 3])> {
        let first = *self.vertices.first()?;
        Some(self.vertices.iter().fold((first, first), |(mut min, mut max), v| {
            for axis in 0..3 {
                min[axis] = min[axis].min(v[axis]);
                max[axis] = max[axis].max(v[axis]);
            }
            (min, max)
        }))
    }
}

impl Default for GeometryData {
    fn default() -> Self {
        Self::new()
    }
}

/// Recenters and uniformly scales a set of parts so together they fit in [-1, 1]
///
/// Parts of a multi-mesh model are transformed with the same center and scale so
/// they keep their relative placement.
pub fn normalize_to_unit_cube(parts: &mut [GeometryData]) {
    let Some((min, max)) = parts
        .iter()
        .filter_map(GeometryData::bounds)
        .reduce(|(amin, amax), (bmin, bmax)| {
            (
                [amin[0].min(bmin[0]), amin[1].min(bmin[1]), amin[2].min(bmin[2])],
                [amax[0].max(bmax[0]), amax[1].max(bmax[1]), amax[2].max(bmax[2])],
            )
        })
    else {
        return;
    };

    let center = [
        (min[0] + max[0]) * 0.5,
        (min[1] + max[1]) * 0.5,
        (min[2] + max[2]) * 0.5,
    ];
    let extent = (0..3).map(|a| max[a] - min[a]).fold(0.0f32, f32::max);
    if extent <= f32::EPSILON {
        return;
    }
    let scale = 2.0 / extent;

    for part in parts.iter_mut() {
        for v in part.vertices.iter_mut() {
            for axis in 0..3 {
                v[axis] = (v[axis] - center[axis]) * scale;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_keeps_relative_placement() {
        let mut parts = vec![
            GeometryData {
                vertices: vec![[0.0, 0.0, 0.0], [2.0, 0.0, 0.0]],
                ..Default::default()
            },
            GeometryData {
                vertices: vec![[4.0, 1.0, 0.0]],
                ..Default::default()
            },
        ];
        normalize_to_unit_cube(&mut parts);
        assert_eq!(parts[0].vertices[0], [-1.0, -0.25, 0.0]);
        assert_eq!(parts[0].vertices[1], [0.0, -0.25, 0.0]);
        assert_eq!(parts[1].vertices[0], [1.0, 0.25, 0.0]);
    }

    #[test]
    fn test_normalize_empty_is_noop() {
        let mut parts = vec![GeometryData::new()];
        normalize_to_unit_cube(&mut parts);
        assert!(parts[0].vertices.is_empty());
    }

    #[test]
    fn test_to_vertices_fills_missing_attributes() {
        let data = GeometryData {
            vertices: vec![[1.0, 2.0, 3.0]],
            ..Default::default()
        };
        let vertices = data.to_vertices();
        assert_eq!(vertices[0].normal, [0.0, 0.0, 1.0]);
        assert_eq!(vertices[0].tex_coords, [0.0, 0.0]);
    }
}
