//! # Primitive Shape Generation
//!
//! Built-in shapes for objects that do not come from model files. All shapes
//! are generated with per-face normals and texture coordinates.

use super::GeometryData;

/// Generate the gem: an octahedron with unit radius centered at the origin
///
/// Faces are flat shaded, so every triangle gets its own three vertices.
pub fn generate_gem() -> GeometryData {
    let mut data = GeometryData::new();

    let top = [0.0, 0.0, 1.0];
    let bottom = [0.0, 0.0, -1.0];
    let ring = [
        [1.0, 0.0, 0.0],
        [0.0, 1.0, 0.0],
        [-1.0, 0.0, 0.0],
        [0.0, -1.0, 0.0],
    ];

    for i in 0..ring.len() {
        let a = ring[i];
        let b = ring[(i + 1) % ring.len()];
        let u0 = i as f32 / ring.len() as f32;
        let u1 = (i + 1) as f32 / ring.len() as f32;

        // Upper face, counter-clockwise seen from outside
        push_face(&mut data, [a, b, top], [[u0, 0.5], [u1, 0.5], [(u0 + u1) * 0.5, 1.0]]);
        // Lower face
        push_face(
            &mut data,
            [b, a, bottom],
            [[u1, 0.5], [u0, 0.5], [(u0 + u1) * 0.5, 0.0]],
        );
    }

    data
}

/// Generate a square in the xy plane spanning [-1, 1], facing +z
///
/// Used for the fire sprite and the moving billboard.
pub fn generate_quad() -> GeometryData {
    let mut data = GeometryData::new();
    data.vertices = vec![
        [-1.0, -1.0, 0.0],
        [1.0, -1.0, 0.0],
        [1.0, 1.0, 0.0],
        [-1.0, 1.0, 0.0],
    ];
    // v = 0 at the bottom edge, like OBJ texture coordinates
    data.tex_coords = vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];
    data.normals = vec![[0.0, 0.0, 1.0]; 4];
    data.indices = vec![0, 1, 2, 2, 3, 0];
    data
}

fn push_face(data: &mut GeometryData, corners: [[f32; 3]; 3], uvs: [[f32; 2]; 3]) {
    let normal = face_normal(corners[0], corners[1], corners[2]);
    let base = data.vertices.len() as u32;
    for (corner, uv) in corners.iter().zip(uvs.iter()) {
        data.vertices.push(*corner);
        data.normals.push(normal);
        data.tex_coords.push(*uv);
    }
    data.indices.extend_from_slice(&[base, base + 1, base + 2]);
}

fn face_normal(a: [f32; 3], b: [f32; 3], c: [f32; 3]) -> [f32; 3] {
    let ab = [b[0] - a[0], b[1] - a[1], b[2] - a[2]];
    let ac = [c[0] - a[0], c[1] - a[1], c[2] - a[2]];
    let n = [
        ab[1] * ac[2] - ab[2] * ac[1],
        ab[2] * ac[0] - ab[0] * ac[2],
        ab[0] * ac[1] - ab[1] * ac[0],
    ];
    let length = (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt();
    if length <= f32::EPSILON {
        return [0.0, 0.0, 1.0];
    }
    [n[0] / length, n[1] / length, n[2] / length]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gem_normals_point_outward() {
        let gem = generate_gem();
        assert_eq!(gem.triangle_count(), 8);
        for tri in gem.indices.chunks(3) {
            let centroid: [f32; 3] = std::array::from_fn(|axis| {
                tri.iter().map(|&i| gem.vertices[i as usize][axis]).sum::<f32>() / 3.0
            });
            let normal = gem.normals[tri[0] as usize];
            let dot: f32 = (0..3).map(|a| centroid[a] * normal[a]).sum();
            assert!(dot > 0.0);
        }
    }

    #[test]
    fn test_quad_faces_positive_z() {
        let quad = generate_quad();
        assert_eq!(quad.triangle_count(), 2);
        let v = &quad.vertices;
        let n = face_normal(v[0], v[1], v[2]);
        assert_eq!(n, [0.0, 0.0, 1.0]);
        assert_eq!(quad.tex_coords[0], [0.0, 0.0]);
        assert_eq!(quad.tex_coords[2], [1.0, 1.0]);
    }
}
