// src/gfx/scene/layout.rs
//! Fixed placements for the island's props.

/// Palm placements; the configured palm count takes a prefix of this list.
pub const PALM_POSITIONS: [[f32; 3]; 16] = [
    [2.0, 0.0, 0.25],
    [-2.0, 0.0, 0.6],
    [0.0, -2.0, 0.6],
    [0.0, 2.0, 0.6],
    [-2.0, 2.0, 0.6],
    [2.0, -2.0, 0.6],
    [-2.0, -2.0, 0.6],
    [2.0, 2.0, 0.6],
    [3.3, 0.0, 0.6],
    [-3.4, 0.0, 0.6],
    [0.0, -3.3, 0.6],
    [0.0, 3.4, 0.6],
    [-3.4, 3.3, 0.6],
    [3.3, -3.4, 0.6],
    [-3.3, -3.3, 0.6],
    [3.3, 3.4, 0.6],
];

/// Ground tile placements on a 1.5 grid. The center tile appears twice.
pub const GROUND_TILE_POSITIONS: [[f32; 3]; 26] = [
    [1.5, 0.0, -0.3],
    [1.5, 1.5, -0.3],
    [0.0, 1.5, -0.3],
    [-1.5, 0.0, -0.3],
    [-1.5, -1.5, -0.3],
    [0.0, -1.5, -0.3],
    [-1.5, 1.5, -0.3],
    [1.5, -1.5, -0.3],
    [0.0, 0.0, -0.3],
    [3.0, 0.0, -0.3],
    [-3.0, 0.0, -0.3],
    [0.0, 3.0, -0.3],
    [0.0, -3.0, -0.3],
    [3.0, 3.0, -0.3],
    [-3.0, 3.0, -0.3],
    [3.0, -3.0, -0.3],
    [-3.0, -3.0, -0.3],
    [1.5, 3.0, -0.3],
    [-1.5, 3.0, -0.3],
    [3.0, 1.5, -0.3],
    [3.0, -1.5, -0.3],
    [-1.5, -3.0, -0.3],
    [1.5, -3.0, -0.3],
    [-3.0, 1.5, -0.3],
    [-3.0, -1.5, -0.3],
    [0.0, 0.0, -0.3],
];

pub const DUCK_POSITION: [f32; 3] = [0.4, 2.0, 0.0];
pub const GEM_POSITION: [f32; 3] = [-1.0, 0.0, 0.5];
pub const SOFA_POSITION: [f32; 3] = [1.0, 1.0, 0.0];
pub const SNOWMAN_POSITION: [f32; 3] = [2.0, 1.0, 0.1];
pub const FLYER_POSITION: [f32; 3] = [1.0, 0.0, 0.5];
pub const FIRE_POSITION: [f32; 3] = [0.4, 2.0, 0.0];
pub const BILLBOARD_POSITION: [f32; 3] = [0.0, 0.0, 0.0];

/// Camera position in the corner view
pub const CORNER_CAMERA_POSITION: [f32; 3] = [3.0, 3.0, 0.0];
/// Camera facing in the corner view
pub const CORNER_CAMERA_DIRECTION: [f32; 3] = [-1.0, 0.0, 0.0];
/// Heading the free camera starts with after a reset
pub const RESET_VIEW_ANGLE: f32 = 90.0;
