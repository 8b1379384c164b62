// src/gfx/scene/object.rs
//! Scene entities and the kind-keyed factory that creates them.

use cgmath::{Vector3, Zero};

use super::layout::GEM_POSITION;
use crate::{config::Config, gfx::camera::camera::facing_from_angle};

/// Every kind of prop the island can hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    GroundTile,
    Palm,
    Snowman,
    Flyer,
    Fire,
    Billboard,
    Sofa,
    Duck,
    Gem,
}

impl ObjectKind {
    pub const ALL: [ObjectKind; 9] = [
        ObjectKind::GroundTile,
        ObjectKind::Palm,
        ObjectKind::Snowman,
        ObjectKind::Flyer,
        ObjectKind::Fire,
        ObjectKind::Billboard,
        ObjectKind::Sofa,
        ObjectKind::Duck,
        ObjectKind::Gem,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ObjectKind::GroundTile => "ground-tile",
            ObjectKind::Palm => "palm",
            ObjectKind::Snowman => "snowman",
            ObjectKind::Flyer => "flyer",
            ObjectKind::Fire => "fire",
            ObjectKind::Billboard => "billboard",
            ObjectKind::Sofa => "sofa",
            ObjectKind::Duck => "duck",
            ObjectKind::Gem => "gem",
        }
    }

    /// Looks a kind up by name, logging names that match nothing
    pub fn from_name(name: &str) -> Option<Self> {
        let kind = Self::ALL.into_iter().find(|kind| kind.name() == name);
        if kind.is_none() {
            log::warn!("Unknown object kind '{}'", name);
        }
        kind
    }
}

/// One placed prop
#[derive(Debug, Clone, PartialEq)]
pub struct SceneObject {
    pub kind: ObjectKind,
    pub position: Vector3<f32>,
    /// Unit length or zero
    pub direction: Vector3<f32>,
    /// Uniform scale; zero hides the object
    pub size: f32,
    pub speed: f32,
    pub start_time: f32,
    pub current_time: f32,
    pub view_angle: f32,
    /// Seconds per sprite frame
    pub frame_duration: f32,
}

impl SceneObject {
    /// Creates an object of the given kind with its default parameters
    ///
    /// Big variants from the config change size and height of the duck, palm
    /// and snowman; the fire follows the duck's flag since it burns beside it.
    /// The gem ignores `position` and is always placed at its fixed spot.
    ///
    /// # Arguments
    /// * `kind` - Kind of object to create
    /// * `position` - Requested placement
    /// * `elapsed` - Scene clock in seconds, used for both timestamps
    /// * `config` - Active configuration
    pub fn spawn(kind: ObjectKind, position: Vector3<f32>, elapsed: f32, config: &Config) -> Self {
        let mut object = Self {
            kind,
            position,
            direction: Vector3::zero(),
            size: 1.0,
            speed: 0.0,
            start_time: elapsed,
            current_time: elapsed,
            view_angle: 0.0,
            frame_duration: 0.0,
        };

        match kind {
            ObjectKind::GroundTile => {}
            ObjectKind::Sofa => {
                object.size = 0.5;
                object.position.z = -0.07;
            }
            ObjectKind::Duck => {
                object.size = 0.4;
                if config.big_duck {
                    object.size = 0.8;
                    object.position.z = 0.3;
                }
            }
            ObjectKind::Snowman => {
                object.size = 0.5;
                object.direction = Vector3::unit_x();
                if config.big_snowman {
                    object.size = 0.8;
                    object.position.z = 0.3;
                }
            }
            ObjectKind::Palm => {
                object.size = if config.big_palms { 4.0 } else { 2.0 };
            }
            ObjectKind::Billboard => object.size = 3.0,
            ObjectKind::Gem => {
                object.size = 0.1;
                object.position = GEM_POSITION.into();
            }
            ObjectKind::Flyer => {
                object.view_angle = 0.0;
                object.direction = facing_from_angle(object.view_angle);
                object.size = 0.3;
                object.speed = 0.7;
            }
            ObjectKind::Fire => {
                object.size = if config.big_duck { 1.0 } else { 0.5 };
                object.frame_duration = 0.1;
            }
        }

        object
    }

    /// Name-keyed variant of [`SceneObject::spawn`]; unknown names yield None
    pub fn spawn_named(
        name: &str,
        position: Vector3<f32>,
        elapsed: f32,
        config: &Config,
    ) -> Option<Self> {
        ObjectKind::from_name(name).map(|kind| Self::spawn(kind, position, elapsed, config))
    }

    /// Seconds since the object was created
    pub fn local_time(&self) -> f32 {
        self.current_time - self.start_time
    }

    pub fn is_visible(&self) -> bool {
        self.size > 0.0
    }
}
