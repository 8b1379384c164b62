//! Model transforms for scene objects.

use cgmath::{Deg, InnerSpace, Matrix4, Vector3};

use crate::gfx::scene::object::{ObjectKind, SceneObject};

/// Builds a frame at `position` whose local -z looks along `forward`
///
/// Columns are right, up, back and position. A zero `forward` is treated as +x,
/// and when `forward` is parallel to `up` another world axis is used as the hint
/// so the basis stays orthonormal.
pub fn front_direction_matrix(
    position: Vector3<f32>,
    forward: Vector3<f32>,
    up: Vector3<f32>,
) -> Matrix4<f32> {
    let forward = if forward.magnitude2() > f32::EPSILON {
        forward
    } else {
        Vector3::unit_x()
    };
    let back = -forward.normalize();

    let mut right = up.cross(back);
    if right.magnitude2() <= f32::EPSILON {
        let hint = if back.x.abs() < 0.9 {
            Vector3::unit_x()
        } else {
            Vector3::unit_y()
        };
        right = hint.cross(back);
    }
    let right = right.normalize();
    let new_up = back.cross(right);

    Matrix4::from_cols(
        right.extend(0.0),
        new_up.extend(0.0),
        back.extend(0.0),
        position.extend(1.0),
    )
}

/// Model matrix for an object, by kind
///
/// The fire sprite additionally needs the camera rotation, see [`sprite_matrix`].
pub fn model_matrix(object: &SceneObject) -> Matrix4<f32> {
    let translation = Matrix4::from_translation(object.position);
    let scale = Matrix4::from_scale(object.size);
    let upright = Matrix4::from_angle_x(Deg(90.0));

    match object.kind {
        ObjectKind::GroundTile => {
            translation * Matrix4::from_nonuniform_scale(object.size, object.size, 0.2)
        }
        ObjectKind::Flyer => {
            front_direction_matrix(object.position, object.direction, Vector3::unit_z()) * scale
        }
        ObjectKind::Duck | ObjectKind::Snowman | ObjectKind::Sofa => {
            translation * scale * upright
        }
        ObjectKind::Palm | ObjectKind::Gem | ObjectKind::Fire | ObjectKind::Billboard => {
            translation * scale
        }
    }
}

/// Model matrix that keeps a quad facing the camera
///
/// # Arguments
/// * `object` - Sprite object
/// * `billboard_rotation` - Inverse of the view rotation
pub fn sprite_matrix(object: &SceneObject, billboard_rotation: Matrix4<f32>) -> Matrix4<f32> {
    Matrix4::from_translation(object.position)
        * billboard_rotation
        * Matrix4::from_scale(object.size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use cgmath::{SquareMatrix, Vector4, Zero};

    const EPS: f32 = 1e-5;

    fn spawn(kind: ObjectKind, position: Vector3<f32>) -> SceneObject {
        SceneObject::spawn(kind, position, 0.0, &Config::default())
    }

    #[test]
    fn test_front_direction_basis() {
        let m = front_direction_matrix(
            Vector3::new(1.0, 2.0, 3.0),
            Vector3::new(0.0, 2.0, 0.0),
            Vector3::unit_z(),
        );
        assert!((m.z.truncate() - Vector3::new(0.0, -1.0, 0.0)).magnitude() < EPS);
        assert!((m.x.truncate() - Vector3::new(1.0, 0.0, 0.0)).magnitude() < EPS);
        assert!((m.y.truncate() - Vector3::new(0.0, 0.0, 1.0)).magnitude() < EPS);
        assert_eq!(m.w, Vector4::new(1.0, 2.0, 3.0, 1.0));
    }

    #[test]
    fn test_front_direction_degenerate_stays_orthonormal() {
        for forward in [Vector3::unit_z(), -Vector3::unit_z(), Vector3::zero()] {
            let m = front_direction_matrix(Vector3::zero(), forward, Vector3::unit_z());
            let (x, y, z) = (m.x.truncate(), m.y.truncate(), m.z.truncate());
            for axis in [x, y, z] {
                assert!((axis.magnitude() - 1.0).abs() < EPS);
            }
            assert!(x.dot(y).abs() < EPS && y.dot(z).abs() < EPS && x.dot(z).abs() < EPS);
            assert!(m.determinant() > 0.0);
        }
    }

    #[test]
    fn test_ground_tile_is_flattened() {
        let tile = spawn(ObjectKind::GroundTile, Vector3::new(1.5, 0.0, -0.3));
        let m = model_matrix(&tile);
        let p = m * Vector4::new(1.0, 1.0, 1.0, 1.0);
        assert!((p - Vector4::new(2.5, 1.0, -0.1, 1.0)).magnitude() < EPS);
    }

    #[test]
    fn test_duck_is_stood_up() {
        let duck = spawn(ObjectKind::Duck, Vector3::new(0.4, 2.0, 0.0));
        let m = model_matrix(&duck);
        let up = m * Vector4::new(0.0, 1.0, 0.0, 0.0);
        assert!((up - Vector4::new(0.0, 0.0, duck.size, 0.0)).magnitude() < EPS);
    }

    #[test]
    fn test_palm_and_gem_translate_then_scale() {
        let palm = spawn(ObjectKind::Palm, Vector3::new(2.0, 0.0, 0.25));
        let p = model_matrix(&palm) * Vector4::new(0.0, 0.0, 1.0, 1.0);
        assert!((p - Vector4::new(2.0, 0.0, 0.25 + palm.size, 1.0)).magnitude() < EPS);

        let gem = spawn(ObjectKind::Gem, Vector3::zero());
        let g = model_matrix(&gem) * Vector4::new(1.0, 0.0, 0.0, 1.0);
        assert!((g - Vector4::new(-0.9, 0.0, 0.5, 1.0)).magnitude() < EPS);
    }

    #[test]
    fn test_sprite_matrix_without_rotation() {
        let fire = spawn(ObjectKind::Fire, Vector3::new(0.4, 2.0, 0.0));
        let m = sprite_matrix(&fire, Matrix4::identity());
        assert_eq!(m, model_matrix(&fire));
    }
}
