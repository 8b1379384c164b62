// src/gfx/camera/camera.rs
//! First-person camera state and movement commands.
//!
//! The camera keeps two poses. `position`/`direction` are the planned pose that
//! movement commands write to; the eye is the pose actually rendered. Outside of
//! free-look both are pinned together, in free-look the eye eases toward the plan.

use cgmath::{InnerSpace, Vector3, Zero};

use super::collision::{adjusted_position, clamp_to_scene_bounds, is_colliding};
use crate::settings::{
    DUCK_OBSTACLE_RADIUS, FREE_LOOK_BLEND, FREE_LOOK_SNAP_THRESHOLD, MOVEMENT_SPEED,
};

/// Viewing modes selectable from keys and the context menu
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CameraMode {
    /// Orthographic top-down view over the whole island
    TopDown,
    /// Perspective view from the north east corner looking west
    Corner,
    /// Keyboard and pointer driven first-person camera
    FreeLook,
    /// Rides along with the orbiting flyer
    ChaseFlyer,
}

impl CameraMode {
    pub fn label(self) -> &'static str {
        match self {
            CameraMode::TopDown => "Camera 1",
            CameraMode::Corner => "Camera 2",
            CameraMode::FreeLook => "Free Camera",
            CameraMode::ChaseFlyer => "Raider Camera",
        }
    }
}

/// Camera movement commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Movement {
    Forward,
    Backward,
    Left,
    Right,
    TurnLeft,
    TurnRight,
}

/// Facing vector in the ground plane for a heading in degrees
pub fn facing_from_angle(degrees: f32) -> Vector3<f32> {
    let radians = degrees.to_radians();
    Vector3::new(radians.cos(), radians.sin(), 0.0)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub position: Vector3<f32>,
    pub direction: Vector3<f32>,
    /// Heading in degrees, kept in [0, 360)
    pub view_angle: f32,
    eye_position: Vector3<f32>,
    eye_direction: Vector3<f32>,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Vector3::zero(), 90.0)
    }
}

impl Camera {
    pub fn new(position: Vector3<f32>, view_angle: f32) -> Self {
        let direction = facing_from_angle(view_angle);
        Self {
            position,
            direction,
            view_angle,
            eye_position: position,
            eye_direction: direction,
        }
    }

    /// Position used for rendering
    pub fn eye_position(&self) -> Vector3<f32> {
        self.eye_position
    }

    /// Facing used for rendering
    pub fn eye_direction(&self) -> Vector3<f32> {
        self.eye_direction
    }

    /// Sets both the planned pose and the eye, skipping any easing
    pub fn pin(&mut self, position: Vector3<f32>, direction: Vector3<f32>) {
        self.position = position;
        self.direction = direction;
        self.eye_position = position;
        self.eye_direction = direction;
    }

    /// Clamps the planned pose and the eye to the scene rectangle
    pub fn clamp_to_bounds(&mut self) {
        self.position = clamp_to_scene_bounds(self.position);
        self.eye_position = clamp_to_scene_bounds(self.eye_position);
    }

    /// Applies one movement command to the planned pose
    ///
    /// Translations step by half the movement speed along or across the facing.
    /// Turns change the heading by `delta_degrees`. The result is pushed out of
    /// the obstacle (when one is given) and then clamped to the scene bounds.
    ///
    /// # Arguments
    /// * `movement` - Command to apply
    /// * `delta_degrees` - Turn amount, ignored for translations
    /// * `obstacle` - Center of the obstacle to avoid; its z is ignored
    pub fn apply_movement(
        &mut self,
        movement: Movement,
        delta_degrees: f32,
        obstacle: Option<Vector3<f32>>,
    ) {
        let step = MOVEMENT_SPEED * 0.5;
        let strafe = Vector3::new(-self.direction.y, self.direction.x, self.direction.z);
        let mut next = self.position;

        match movement {
            Movement::Forward => next += self.direction * step,
            Movement::Backward => next -= self.direction * step,
            Movement::Left => next += strafe * step,
            Movement::Right => next -= strafe * step,
            Movement::TurnLeft => {
                self.view_angle += delta_degrees;
                if self.view_angle >= 360.0 {
                    self.view_angle -= 360.0;
                }
                self.direction = facing_from_angle(self.view_angle);
            }
            Movement::TurnRight => {
                self.view_angle -= delta_degrees;
                if self.view_angle < 0.0 {
                    self.view_angle += 360.0;
                }
                self.direction = facing_from_angle(self.view_angle);
            }
        }

        if let Some(obstacle) = obstacle {
            let obstacle = Vector3::new(obstacle.x, obstacle.y, 0.0);
            if is_colliding(next, obstacle, DUCK_OBSTACLE_RADIUS) {
                next = adjusted_position(next, obstacle, DUCK_OBSTACLE_RADIUS);
            }
        }
        self.position = clamp_to_scene_bounds(next);
    }

    /// Eases the eye toward the planned pose by one tick
    pub fn ease_toward_plan(&mut self) {
        let position_gap = (self.position - self.eye_position).magnitude();
        let direction_gap = (self.direction - self.eye_direction).magnitude();

        if position_gap < FREE_LOOK_SNAP_THRESHOLD && direction_gap < FREE_LOOK_SNAP_THRESHOLD {
            self.eye_position = self.position;
            self.eye_direction = self.direction;
            return;
        }

        self.eye_position += (self.position - self.eye_position) * FREE_LOOK_BLEND;
        let blended = self.eye_direction + (self.direction - self.eye_direction) * FREE_LOOK_BLEND;
        self.eye_direction = if blended.magnitude2() > f32::EPSILON {
            blended.normalize()
        } else {
            self.direction
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    fn approx(a: Vector3<f32>, b: Vector3<f32>) -> bool {
        (a - b).magnitude() < EPS
    }

    #[test]
    fn test_turn_left_wraps() {
        let mut camera = Camera::new(Vector3::zero(), 350.0);
        camera.apply_movement(Movement::TurnLeft, 20.0, None);
        assert!((camera.view_angle - 10.0).abs() < EPS);
        assert!(approx(camera.direction, facing_from_angle(10.0)));
    }

    #[test]
    fn test_turn_left_without_wrap() {
        let mut camera = Camera::new(Vector3::zero(), 350.0);
        camera.apply_movement(Movement::TurnLeft, 5.0, None);
        assert!((camera.view_angle - 355.0).abs() < EPS);
    }

    #[test]
    fn test_turn_right_wraps() {
        let mut camera = Camera::new(Vector3::zero(), 5.0);
        camera.apply_movement(Movement::TurnRight, 10.0, None);
        assert!((camera.view_angle - 355.0).abs() < EPS);
    }

    #[test]
    fn test_forward_steps_half_speed() {
        let mut camera = Camera::new(Vector3::zero(), 0.0);
        camera.apply_movement(Movement::Forward, 0.0, None);
        assert!(approx(camera.position, Vector3::new(0.05, 0.0, 0.0)));
        camera.apply_movement(Movement::Backward, 0.0, None);
        assert!(approx(camera.position, Vector3::zero()));
    }

    #[test]
    fn test_strafe_is_perpendicular() {
        let mut camera = Camera::new(Vector3::zero(), 0.0);
        camera.apply_movement(Movement::Left, 0.0, None);
        assert!(approx(camera.position, Vector3::new(0.0, 0.05, 0.0)));
        camera.apply_movement(Movement::Right, 0.0, None);
        camera.apply_movement(Movement::Right, 0.0, None);
        assert!(approx(camera.position, Vector3::new(0.0, -0.05, 0.0)));
    }

    #[test]
    fn test_movement_clamped_to_bounds() {
        let mut camera = Camera::new(Vector3::new(3.79, 0.0, 0.0), 0.0);
        camera.apply_movement(Movement::Forward, 0.0, None);
        assert!((camera.position.x - 3.8).abs() < EPS);
    }

    #[test]
    fn test_movement_pushed_out_of_obstacle() {
        let obstacle = Vector3::new(0.4, 2.0, 0.3);
        let mut camera = Camera::new(Vector3::new(0.4, 1.4, 0.0), 90.0);
        camera.apply_movement(Movement::Forward, 0.0, Some(obstacle));
        let flat = Vector3::new(0.4, 2.0, 0.0);
        assert!(((camera.position - flat).magnitude() - 0.7).abs() < 1e-4);
    }

    #[test]
    fn test_eye_eases_then_snaps() {
        let mut camera = Camera::new(Vector3::zero(), 0.0);
        camera.apply_movement(Movement::Forward, 0.0, None);
        assert!(approx(camera.eye_position(), Vector3::zero()));

        camera.ease_toward_plan();
        assert!(approx(camera.eye_position(), Vector3::new(0.005, 0.0, 0.0)));

        for _ in 0..100 {
            camera.ease_toward_plan();
        }
        assert_eq!(camera.eye_position(), camera.position);
        assert_eq!(camera.eye_direction(), camera.direction);
    }

    #[test]
    fn test_eased_direction_stays_unit() {
        let mut camera = Camera::new(Vector3::zero(), 0.0);
        camera.apply_movement(Movement::TurnLeft, 120.0, None);
        for _ in 0..5 {
            camera.ease_toward_plan();
            assert!((camera.eye_direction().magnitude() - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_pin_skips_easing() {
        let mut camera = Camera::default();
        camera.pin(Vector3::new(3.0, 3.0, 0.0), Vector3::new(-1.0, 0.0, 0.0));
        assert_eq!(camera.eye_position(), Vector3::new(3.0, 3.0, 0.0));
        assert_eq!(camera.eye_direction(), Vector3::new(-1.0, 0.0, 0.0));
    }
}
