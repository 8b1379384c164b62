// src/gfx/camera/camera_controller.rs
//! Held movement keys and pointer-look for the free camera.

use winit::{event::ElementState, keyboard::KeyCode};

use super::camera::Movement;
use crate::settings::POINTER_LOOK_SENSITIVITY;

/// Order in which held keys are turned into moves each tick
const MOVE_ORDER: [Movement; 4] = [
    Movement::Forward,
    Movement::Backward,
    Movement::Right,
    Movement::Left,
];

/// Tracks which movement keys are down and whether pointer-look is active
#[derive(Debug, Default, Clone)]
pub struct CameraController {
    forward: bool,
    backward: bool,
    left: bool,
    right: bool,
    pointer_look: bool,
}

impl CameraController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Maps a physical key to the translation it drives, if any
    pub fn movement_for_key(key: KeyCode) -> Option<Movement> {
        match key {
            KeyCode::KeyW | KeyCode::ArrowUp => Some(Movement::Forward),
            KeyCode::KeyS | KeyCode::ArrowDown => Some(Movement::Backward),
            KeyCode::KeyA | KeyCode::ArrowLeft => Some(Movement::Left),
            KeyCode::KeyD | KeyCode::ArrowRight => Some(Movement::Right),
            _ => None,
        }
    }

    /// Records a key transition
    ///
    /// # Returns
    /// True if the key is a movement key
    pub fn process_key(&mut self, key: KeyCode, state: ElementState) -> bool {
        let Some(movement) = Self::movement_for_key(key) else {
            return false;
        };
        let pressed = state == ElementState::Pressed;
        match movement {
            Movement::Forward => self.forward = pressed,
            Movement::Backward => self.backward = pressed,
            Movement::Left => self.left = pressed,
            Movement::Right => self.right = pressed,
            Movement::TurnLeft | Movement::TurnRight => {}
        }
        true
    }

    pub fn is_held(&self, movement: Movement) -> bool {
        match movement {
            Movement::Forward => self.forward,
            Movement::Backward => self.backward,
            Movement::Left => self.left,
            Movement::Right => self.right,
            Movement::TurnLeft | Movement::TurnRight => false,
        }
    }

    /// Moves to apply this tick for the keys currently held
    pub fn held_movements(&self) -> impl Iterator<Item = Movement> + '_ {
        MOVE_ORDER.into_iter().filter(|m| self.is_held(*m))
    }

    /// Releases every movement key
    pub fn clear_keys(&mut self) {
        self.forward = false;
        self.backward = false;
        self.left = false;
        self.right = false;
    }

    pub fn set_pointer_look(&mut self, enabled: bool) {
        self.pointer_look = enabled;
    }

    pub fn pointer_look_enabled(&self) -> bool {
        self.pointer_look
    }

    /// Horizontal pixel the pointer is warped back to while pointer-look is on
    pub fn pointer_center(window_width: u32) -> u32 {
        window_width / 2
    }

    /// Converts a pointer position into a turn around the window's horizontal center
    ///
    /// # Arguments
    /// * `pointer_x` - Pointer x in physical pixels
    /// * `window_width` - Window width in physical pixels
    ///
    /// # Returns
    /// The turn command and its magnitude in degrees, or None when pointer-look
    /// is off or the pointer sits on the center line
    pub fn pointer_turn(&self, pointer_x: f64, window_width: u32) -> Option<(Movement, f32)> {
        if !self.pointer_look {
            return None;
        }
        let delta = POINTER_LOOK_SENSITIVITY * (pointer_x as f32 - Self::pointer_center(window_width) as f32);
        if delta == 0.0 {
            return None;
        }
        let turn = if delta < 0.0 {
            Movement::TurnLeft
        } else {
            Movement::TurnRight
        };
        Some((turn, delta.abs()))
    }
}
