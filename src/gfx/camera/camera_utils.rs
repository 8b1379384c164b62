// src/gfx/camera/camera_utils.rs
//! Per-mode view and projection matrices.

use cgmath::{
    perspective, Deg, EuclideanSpace, InnerSpace, Matrix, Matrix4, Point3, SquareMatrix, Vector3,
    Vector4,
};

use super::camera::{facing_from_angle, Camera, CameraMode};
use crate::settings::{
    CAMERA_FAR, CAMERA_FOV_DEGREES, CAMERA_NEAR, SCENE_DEPTH, SCENE_HEIGHT, SCENE_WIDTH,
};

/// Maps OpenGL clip depth [-1, 1] onto the [0, 1] range wgpu expects.
#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

/// Projection and view for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewProjection {
    pub projection: Matrix4<f32>,
    pub view: Matrix4<f32>,
}

impl ViewProjection {
    /// Orthographic view straight down onto the island, +y up on screen
    pub fn top_down() -> Self {
        let projection = OPENGL_TO_WGPU_MATRIX
            * cgmath::ortho(
                -SCENE_WIDTH,
                SCENE_WIDTH,
                -SCENE_HEIGHT,
                SCENE_HEIGHT,
                -10.0 * SCENE_DEPTH,
                10.0 * SCENE_DEPTH,
            );
        let view = Matrix4::look_at_rh(
            Point3::new(0.0, 0.0, 1.0),
            Point3::new(0.0, 0.0, 0.0),
            Vector3::unit_y(),
        );
        Self { projection, view }
    }

    /// Builds the matrices for the active camera mode
    ///
    /// # Arguments
    /// * `mode` - Active camera mode
    /// * `camera` - Camera whose eye pose is used
    /// * `flyer_position` - Flyer position for the chase view
    /// * `aspect` - Surface width over height
    pub fn for_mode(
        mode: CameraMode,
        camera: &Camera,
        flyer_position: Option<Vector3<f32>>,
        aspect: f32,
    ) -> Self {
        let projection = OPENGL_TO_WGPU_MATRIX
            * perspective(Deg(CAMERA_FOV_DEGREES), aspect, CAMERA_NEAR, CAMERA_FAR);

        match (mode, flyer_position) {
            (CameraMode::TopDown, _) => Self::top_down(),
            (CameraMode::ChaseFlyer, Some(flyer)) => Self {
                projection,
                view: Matrix4::look_at_rh(
                    Point3::from_vec(flyer),
                    Point3::new(0.0, 0.0, 0.0),
                    Vector3::unit_z(),
                ),
            },
            _ => {
                let eye = camera.eye_position();
                let mut facing = camera.eye_direction();
                if facing.magnitude2() < f32::EPSILON {
                    facing = facing_from_angle(camera.view_angle);
                }
                Self {
                    projection,
                    view: Matrix4::look_at_rh(
                        Point3::from_vec(eye),
                        Point3::from_vec(eye + facing),
                        Vector3::unit_z(),
                    ),
                }
            }
        }
    }

    pub fn view_proj(&self) -> Matrix4<f32> {
        self.projection * self.view
    }

    /// View with its translation removed
    pub fn view_rotation(&self) -> Matrix4<f32> {
        let mut rotation = self.view;
        rotation.w = Vector4::new(0.0, 0.0, 0.0, 1.0);
        rotation
    }

    /// Inverse of projection times rotation-only view, used to unproject skybox rays
    pub fn skybox_inverse(&self) -> Matrix4<f32> {
        (self.projection * self.view_rotation())
            .invert()
            .unwrap_or_else(Matrix4::identity)
    }

    /// Rotation that turns a quad in the xy plane to face the viewer
    pub fn billboard_rotation(&self) -> Matrix4<f32> {
        self.view_rotation().transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::Zero;

    const EPS: f32 = 1e-4;

    #[test]
    fn test_free_look_view_looks_along_facing() {
        let camera = Camera::new(Vector3::new(1.0, 0.0, 0.0), 90.0);
        let vp = ViewProjection::for_mode(CameraMode::FreeLook, &camera, None, 1.25);
        let ahead = vp.view * Vector4::new(1.0, 1.0, 0.0, 1.0);
        assert!(ahead.x.abs() < EPS);
        assert!(ahead.y.abs() < EPS);
        assert!((ahead.z + 1.0).abs() < EPS);
    }

    #[test]
    fn test_zero_facing_falls_back_to_heading() {
        let mut camera = Camera::new(Vector3::zero(), 0.0);
        camera.pin(Vector3::zero(), Vector3::zero());
        let vp = ViewProjection::for_mode(CameraMode::FreeLook, &camera, None, 1.0);
        let ahead = vp.view * Vector4::new(1.0, 0.0, 0.0, 1.0);
        assert!((ahead.z + 1.0).abs() < EPS);
    }

    #[test]
    fn test_chase_looks_at_origin() {
        let camera = Camera::default();
        let flyer = Vector3::new(0.0, 1.0, 1.0);
        let vp = ViewProjection::for_mode(CameraMode::ChaseFlyer, &camera, Some(flyer), 1.0);
        let origin = vp.view * Vector4::new(0.0, 0.0, 0.0, 1.0);
        assert!(origin.x.abs() < EPS && origin.y.abs() < EPS);
        assert!((origin.z + 2.0f32.sqrt()).abs() < EPS);
    }

    #[test]
    fn test_top_down_maps_scene_edge_to_clip_edge() {
        let vp = ViewProjection::top_down();
        let corner = vp.view_proj() * Vector4::new(SCENE_WIDTH, SCENE_HEIGHT, 0.0, 1.0);
        assert!((corner.x / corner.w - 1.0).abs() < EPS);
        assert!((corner.y / corner.w - 1.0).abs() < EPS);
        let depth = corner.z / corner.w;
        assert!((0.0..=1.0).contains(&depth));
    }

    #[test]
    fn test_view_rotation_drops_translation() {
        let camera = Camera::new(Vector3::new(2.0, -1.0, 0.5), 45.0);
        let vp = ViewProjection::for_mode(CameraMode::FreeLook, &camera, None, 1.0);
        let rotation = vp.view_rotation();
        assert_eq!(rotation.w, Vector4::new(0.0, 0.0, 0.0, 1.0));
        let product = rotation * vp.billboard_rotation();
        let identity = Matrix4::<f32>::identity();
        for c in 0..4 {
            for r in 0..4 {
                assert!((product[c][r] - identity[c][r]).abs() < EPS);
            }
        }
    }
}
