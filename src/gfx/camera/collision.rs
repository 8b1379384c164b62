// src/gfx/camera/collision.rs
//! Camera collision against a single spherical obstacle and scene bounds clamping.

use cgmath::{InnerSpace, Vector3};

use crate::settings::{CAMERA_COLLISION_RADIUS, SCENE_HEIGHT, SCENE_WIDTH};

/// Returns true when the camera sphere overlaps the obstacle sphere
///
/// # Arguments
/// * `camera` - Camera position
/// * `obstacle` - Obstacle center
/// * `obstacle_radius` - Obstacle radius without the camera padding
pub fn is_colliding(camera: Vector3<f32>, obstacle: Vector3<f32>, obstacle_radius: f32) -> bool {
    (camera - obstacle).magnitude() < obstacle_radius + CAMERA_COLLISION_RADIUS
}

/// Pushes the camera out to the obstacle surface when it is inside the bare radius
///
/// The padding used by [`is_colliding`] is intentionally absent here, so a camera
/// inside the padded band but outside `obstacle_radius` is returned unchanged.
pub fn adjusted_position(
    camera: Vector3<f32>,
    obstacle: Vector3<f32>,
    obstacle_radius: f32,
) -> Vector3<f32> {
    let offset = camera - obstacle;
    let distance = offset.magnitude();
    if distance >= obstacle_radius {
        return camera;
    }

    // Exactly at the center there is no outward direction; use +x.
    let outward = if distance > f32::EPSILON {
        offset / distance
    } else {
        Vector3::unit_x()
    };
    camera + outward * (obstacle_radius - distance)
}

/// Clamps x and y into the scene rectangle, z passes through
pub fn clamp_to_scene_bounds(position: Vector3<f32>) -> Vector3<f32> {
    Vector3::new(
        position.x.clamp(-SCENE_WIDTH, SCENE_WIDTH),
        position.y.clamp(-SCENE_HEIGHT, SCENE_HEIGHT),
        position.z,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    const EPS: f32 = 1e-5;

    #[test]
    fn test_colliding_uses_padded_radius() {
        let obstacle = Vector3::new(0.0, 0.0, 0.0);
        assert!(is_colliding(Vector3::new(1.1, 0.0, 0.0), obstacle, 0.7));
        assert!(!is_colliding(Vector3::new(1.3, 0.0, 0.0), obstacle, 0.7));
    }

    #[test]
    fn test_adjust_leaves_padded_band_alone() {
        let obstacle = Vector3::new(0.4, 2.0, 0.0);
        let camera = Vector3::new(0.4, 2.9, 0.0);
        assert!(is_colliding(camera, obstacle, 0.7));
        assert_eq!(adjusted_position(camera, obstacle, 0.7), camera);
    }

    #[test]
    fn test_adjust_pushes_to_surface() {
        let obstacle = Vector3::new(1.0, 1.0, 0.0);
        let camera = Vector3::new(1.2, 1.0, 0.0);
        let adjusted = adjusted_position(camera, obstacle, 0.7);
        assert!(((adjusted - obstacle).magnitude() - 0.7).abs() < EPS);
        assert!((adjusted.y - 1.0).abs() < EPS);
        assert!(adjusted.x > camera.x);
    }

    #[test]
    fn test_adjust_at_center_is_finite() {
        let obstacle = Vector3::new(0.0, 0.0, 0.0);
        let adjusted = adjusted_position(obstacle, obstacle, 0.7);
        assert!((adjusted.magnitude() - 0.7).abs() < EPS);
    }

    #[test]
    fn test_adjust_random_points_inside() {
        let mut rng = rand::rng();
        let obstacle = Vector3::new(0.4, 2.0, 0.0);
        for _ in 0..500 {
            let camera = obstacle
                + Vector3::new(
                    rng.random_range(-0.45..0.45),
                    rng.random_range(-0.45..0.45),
                    rng.random_range(-0.1..0.1),
                );
            let offset = camera - obstacle;
            if offset.magnitude() < 1e-3 {
                continue;
            }
            let adjusted = adjusted_position(camera, obstacle, 0.7);
            let pushed = adjusted - obstacle;
            assert!((pushed.magnitude() - 0.7).abs() < 1e-4);
            assert!(pushed.normalize().dot(offset.normalize()) > 0.9999);
        }
    }

    #[test]
    fn test_clamp_bounds_random() {
        let mut rng = rand::rng();
        for _ in 0..1000 {
            let p = Vector3::new(
                rng.random_range(-50.0..50.0),
                rng.random_range(-50.0..50.0),
                rng.random_range(-50.0..50.0),
            );
            let clamped = clamp_to_scene_bounds(p);
            assert!((-SCENE_WIDTH..=SCENE_WIDTH).contains(&clamped.x));
            assert!((-SCENE_HEIGHT..=SCENE_HEIGHT).contains(&clamped.y));
            assert_eq!(clamped.z, p.z);
        }
    }

    #[test]
    fn test_clamp_inside_is_identity() {
        let p = Vector3::new(1.0, -2.0, 5.0);
        assert_eq!(clamp_to_scene_bounds(p), p);
    }
}
