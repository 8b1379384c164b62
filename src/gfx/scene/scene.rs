// src/gfx/scene/scene.rs
//! Scene state, the fixed entity set and the per-tick update.

use std::path::PathBuf;

use cgmath::{InnerSpace, Vector3, Zero};

use super::{
    layout::{
        BILLBOARD_POSITION, CORNER_CAMERA_DIRECTION, CORNER_CAMERA_POSITION, DUCK_POSITION,
        FIRE_POSITION, FLYER_POSITION, GEM_POSITION, GROUND_TILE_POSITIONS, PALM_POSITIONS,
        RESET_VIEW_ANGLE, SNOWMAN_POSITION, SOFA_POSITION,
    },
    object::{ObjectKind, SceneObject},
};
use crate::{
    config::Config,
    gfx::{
        camera::{Camera, CameraController, CameraMode, Movement, ViewProjection},
        picking::PickTarget,
    },
};

/// The island's props. Singletons are optional so a missing one is simply skipped.
#[derive(Debug, Clone, Default)]
pub struct SceneObjects {
    pub ground_tiles: Vec<SceneObject>,
    pub palms: Vec<SceneObject>,
    pub snowman: Option<SceneObject>,
    pub flyer: Option<SceneObject>,
    pub sofa: Option<SceneObject>,
    pub duck: Option<SceneObject>,
    pub gem: Option<SceneObject>,
    pub fire: Option<SceneObject>,
    pub billboard: Option<SceneObject>,
}

/// Mode, clock and toggles
#[derive(Debug, Clone, PartialEq)]
pub struct SceneState {
    pub camera_mode: CameraMode,
    /// Set by the tick while free-look is active
    pub free_camera: bool,
    /// Scene clock in seconds
    pub elapsed: f32,
    pub flashlight_on: bool,
    pub sun_on: bool,
    pub fog_on: bool,
    pub fire_on: bool,
    pub billboard_on: bool,
    pub fullscreen: bool,
}

impl Default for SceneState {
    fn default() -> Self {
        Self {
            camera_mode: CameraMode::FreeLook,
            free_camera: false,
            elapsed: 0.0,
            flashlight_on: false,
            sun_on: true,
            fog_on: false,
            fire_on: false,
            billboard_on: false,
            fullscreen: false,
        }
    }
}

/// Actions triggered by keys, the context menu and picking
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneCommand {
    SetCameraMode(CameraMode),
    ToggleFlashlight,
    ToggleSun,
    ToggleFog,
    ToggleFire,
    ToggleBillboard,
    ToggleFullscreen,
    Reset,
    Exit,
}

/// Requests the scene hands back to the window host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostRequest {
    Exit,
    SetFullscreen(bool),
}

/// Where the configuration comes from on each reset
#[derive(Debug, Clone)]
enum ConfigSource {
    File(PathBuf),
    Fixed(Config),
}

/// Main scene containing props, camera and toggles
pub struct Scene {
    pub config: Config,
    config_source: ConfigSource,
    pub camera: Camera,
    pub controller: CameraController,
    pub state: SceneState,
    pub objects: SceneObjects,
}

impl Scene {
    /// Creates a scene whose configuration is read from `config_path` on every reset
    pub fn new(config_path: impl Into<PathBuf>) -> Self {
        Self::from_source(ConfigSource::File(config_path.into()))
    }

    /// Creates a scene with a fixed configuration
    pub fn with_config(config: Config) -> Self {
        Self::from_source(ConfigSource::Fixed(config))
    }

    fn from_source(config_source: ConfigSource) -> Self {
        let mut scene = Self {
            config: Config::default(),
            config_source,
            camera: Camera::default(),
            controller: CameraController::new(),
            state: SceneState::default(),
            objects: SceneObjects::default(),
        };
        scene.reset();
        scene
    }

    /// Rebuilds the scene from scratch
    ///
    /// Re-reads the configuration, drops every prop, returns to free-look at the
    /// origin and spawns the fixed layout again. The scene clock keeps running.
    pub fn reset(&mut self) {
        self.config = match &self.config_source {
            ConfigSource::File(path) => Config::load(path),
            ConfigSource::Fixed(config) => *config,
        };

        self.set_camera_mode(CameraMode::FreeLook);
        self.controller.clear_keys();
        self.camera = Camera::new(Vector3::zero(), RESET_VIEW_ANGLE);

        let elapsed = self.state.elapsed;
        let config = self.config;
        let spawn = |kind: ObjectKind, position: [f32; 3]| {
            SceneObject::spawn(kind, position.into(), elapsed, &config)
        };

        self.objects = SceneObjects {
            ground_tiles: GROUND_TILE_POSITIONS
                .iter()
                .map(|p| spawn(ObjectKind::GroundTile, *p))
                .collect(),
            palms: PALM_POSITIONS
                .iter()
                .map(|p| spawn(ObjectKind::Palm, *p))
                .collect(),
            snowman: Some(spawn(ObjectKind::Snowman, SNOWMAN_POSITION)),
            flyer: Some(spawn(ObjectKind::Flyer, FLYER_POSITION)),
            sofa: Some(spawn(ObjectKind::Sofa, SOFA_POSITION)),
            duck: Some(spawn(ObjectKind::Duck, DUCK_POSITION)),
            gem: Some(spawn(ObjectKind::Gem, GEM_POSITION)),
            fire: Some(spawn(ObjectKind::Fire, FIRE_POSITION)),
            billboard: None,
        };

        self.state = SceneState {
            camera_mode: self.state.camera_mode,
            free_camera: self.state.free_camera,
            elapsed,
            fullscreen: config.fullscreen,
            ..SceneState::default()
        };
        log::info!("Scene reset with {} palms drawn", self.config.palm_count);
    }

    /// Switches camera mode, dropping pointer-look until the next tick decides
    pub fn set_camera_mode(&mut self, mode: CameraMode) {
        log::debug!("Camera mode -> {:?}", mode);
        self.state.camera_mode = mode;
        self.state.free_camera = false;
        self.controller.set_pointer_look(false);
    }

    /// Applies one command
    ///
    /// # Returns
    /// A request for the host when the command affects the window
    pub fn apply(&mut self, command: SceneCommand) -> Option<HostRequest> {
        log::debug!("Scene command {:?}", command);
        match command {
            SceneCommand::SetCameraMode(mode) => self.set_camera_mode(mode),
            SceneCommand::ToggleFlashlight => self.state.flashlight_on ^= true,
            SceneCommand::ToggleSun => self.state.sun_on ^= true,
            SceneCommand::ToggleFog => self.state.fog_on ^= true,
            SceneCommand::ToggleFire => self.state.fire_on ^= true,
            SceneCommand::ToggleBillboard => self.state.billboard_on ^= true,
            SceneCommand::ToggleFullscreen => {
                self.state.fullscreen ^= true;
                return Some(HostRequest::SetFullscreen(self.state.fullscreen));
            }
            SceneCommand::Reset => {
                self.reset();
                return Some(HostRequest::SetFullscreen(self.state.fullscreen));
            }
            SceneCommand::Exit => return Some(HostRequest::Exit),
        }
        None
    }

    /// Reacts to a click on a tagged object
    pub fn pick(&mut self, target: PickTarget) {
        match target {
            PickTarget::Snowman => {
                self.apply(SceneCommand::ToggleFire);
            }
            PickTarget::Flyer => self.set_camera_mode(CameraMode::ChaseFlyer),
            PickTarget::Sofa => {
                if let Some(sofa) = self.objects.sofa.as_mut() {
                    sofa.size = 0.0;
                }
            }
            PickTarget::Palm | PickTarget::Duck | PickTarget::Gem | PickTarget::Billboard => {}
        }
    }

    /// Moves the planned camera pose, avoiding the duck
    pub fn move_camera(&mut self, movement: Movement, delta_degrees: f32) {
        let obstacle = self.objects.duck.as_ref().map(|duck| duck.position);
        self.camera.apply_movement(movement, delta_degrees, obstacle);
    }

    /// Turns the camera from a pointer position when pointer-look is active
    ///
    /// # Returns
    /// True when the host should warp the pointer back to the window center
    pub fn pointer_moved(&mut self, pointer_x: f64, window_width: u32) -> bool {
        if !self.controller.pointer_look_enabled() {
            return false;
        }
        if let Some((turn, degrees)) = self.controller.pointer_turn(pointer_x, window_width) {
            self.move_camera(turn, degrees);
        }
        true
    }

    /// One timer tick
    ///
    /// Applies held movement keys in free-look, runs [`Scene::update`], re-arms
    /// pointer-look and keeps the billboard alive while it is switched on.
    pub fn tick(&mut self, elapsed: f32) {
        self.state.elapsed = elapsed;

        if self.state.camera_mode == CameraMode::FreeLook {
            let moves: Vec<Movement> = self.controller.held_movements().collect();
            for movement in moves {
                self.move_camera(movement, 0.0);
            }
        }

        self.update();

        if self.state.free_camera {
            self.controller.set_pointer_look(true);
        }

        if self.state.billboard_on && self.objects.billboard.is_none() {
            self.objects.billboard = Some(SceneObject::spawn(
                ObjectKind::Billboard,
                BILLBOARD_POSITION.into(),
                elapsed,
                &self.config,
            ));
        }
        if let Some(billboard) = self.objects.billboard.as_mut() {
            billboard.current_time = elapsed;
        }
    }

    /// Reconciles the camera with its mode and advances the animated props
    pub fn update(&mut self) {
        match self.state.camera_mode {
            CameraMode::TopDown => {
                self.camera.pin(Vector3::zero(), Vector3::zero());
                self.state.free_camera = false;
                self.controller.set_pointer_look(false);
            }
            CameraMode::Corner => {
                self.camera
                    .pin(CORNER_CAMERA_POSITION.into(), CORNER_CAMERA_DIRECTION.into());
                self.state.free_camera = false;
                self.controller.set_pointer_look(false);
            }
            CameraMode::ChaseFlyer => {
                self.state.flashlight_on = false;
                self.state.free_camera = false;
                if let Some(flyer) = &self.objects.flyer {
                    self.camera.pin(flyer.position, flyer.direction);
                }
            }
            CameraMode::FreeLook => {
                self.state.free_camera = true;
                self.camera.ease_toward_plan();
            }
        }

        self.camera.clamp_to_bounds();

        let elapsed = self.state.elapsed;
        if let Some(flyer) = self.objects.flyer.as_mut() {
            let phase = elapsed * flyer.speed;
            flyer.position = Vector3::new(phase.sin(), phase.cos(), 1.0);
            flyer.direction = Vector3::new(-phase.cos(), phase.sin(), 0.0).normalize();
            flyer.current_time = elapsed;
        }

        if let Some(fire) = self.objects.fire.as_mut() {
            fire.current_time = elapsed;
        }
    }

    /// Palms that are actually drawn
    pub fn drawn_palms(&self) -> &[SceneObject] {
        let count = self.config.palm_count.min(self.objects.palms.len());
        &self.objects.palms[..count]
    }

    /// View and projection for the current mode
    pub fn view_projection(&self, aspect: f32) -> ViewProjection {
        ViewProjection::for_mode(
            self.state.camera_mode,
            &self.camera,
            self.objects.flyer.as_ref().map(|flyer| flyer.position),
            aspect,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::{event::ElementState, keyboard::KeyCode};

    const EPS: f32 = 1e-5;

    fn scene() -> Scene {
        Scene::with_config(Config::default())
    }

    fn approx(a: Vector3<f32>, b: Vector3<f32>) -> bool {
        (a - b).magnitude() < EPS
    }

    #[test]
    fn test_reset_layout() {
        let scene = scene();
        assert_eq!(scene.objects.ground_tiles.len(), 26);
        assert_eq!(scene.objects.palms.len(), 16);
        assert!(scene.objects.billboard.is_none());
        assert_eq!(scene.state.camera_mode, CameraMode::FreeLook);
        assert!(scene.state.sun_on);
        assert!(!scene.state.fog_on && !scene.state.fire_on && !scene.state.flashlight_on);
        assert_eq!(scene.camera.view_angle, 90.0);
        assert!(approx(scene.camera.direction, Vector3::new(0.0, 1.0, 0.0)));
        assert_eq!(
            scene.objects.flyer.as_ref().unwrap().position,
            Vector3::new(1.0, 0.0, 0.5)
        );
    }

    #[test]
    fn test_fixed_modes_pin_camera() {
        let mut scene = scene();
        scene.camera = Camera::new(Vector3::new(-2.0, 1.0, 0.0), 33.0);
        scene.apply(SceneCommand::SetCameraMode(CameraMode::TopDown));
        scene.tick(1.0);
        assert_eq!(scene.camera.position, Vector3::zero());
        assert_eq!(scene.camera.direction, Vector3::zero());
        assert!(!scene.state.free_camera);

        scene.apply(SceneCommand::SetCameraMode(CameraMode::Corner));
        scene.tick(2.0);
        assert_eq!(scene.camera.position, Vector3::new(3.0, 3.0, 0.0));
        assert_eq!(scene.camera.direction, Vector3::new(-1.0, 0.0, 0.0));
        assert_eq!(scene.camera.eye_position(), Vector3::new(3.0, 3.0, 0.0));
    }

    #[test]
    fn test_fixed_modes_ignore_held_keys() {
        let mut scene = scene();
        scene.set_camera_mode(CameraMode::Corner);
        scene.controller.process_key(KeyCode::KeyW, ElementState::Pressed);
        scene.tick(0.5);
        assert_eq!(scene.camera.position, Vector3::new(3.0, 3.0, 0.0));
    }

    #[test]
    fn test_chase_copies_flyer_and_kills_flashlight() {
        let mut scene = scene();
        scene.state.flashlight_on = true;
        let before = scene.objects.flyer.clone().unwrap();
        scene.pick(PickTarget::Flyer);
        assert_eq!(scene.state.camera_mode, CameraMode::ChaseFlyer);
        scene.tick(0.0);
        assert_eq!(scene.camera.position, before.position);
        assert_eq!(scene.camera.direction, before.direction);
        assert!(!scene.state.flashlight_on);

        let flyer = scene.objects.flyer.clone().unwrap();
        scene.tick(1.0);
        assert_eq!(scene.camera.position, flyer.position);
        assert_eq!(scene.camera.direction, flyer.direction);
    }

    #[test]
    fn test_flyer_orbit_closed_form() {
        let mut scene = scene();
        scene.tick(0.0);
        let flyer = scene.objects.flyer.as_ref().unwrap();
        assert!(approx(flyer.position, Vector3::new(0.0, 1.0, 1.0)));
        assert!(approx(flyer.direction, Vector3::new(-1.0, 0.0, 0.0)));

        for t in [0.3f32, 4.0, 17.25] {
            scene.tick(t);
            let phase = t * 0.7;
            let flyer = scene.objects.flyer.as_ref().unwrap();
            assert!(approx(
                flyer.position,
                Vector3::new(phase.sin(), phase.cos(), 1.0)
            ));
            assert!(approx(
                flyer.direction,
                Vector3::new(-phase.cos(), phase.sin(), 0.0)
            ));
        }
    }

    #[test]
    fn test_free_look_applies_held_keys() {
        let mut scene = scene();
        scene.controller.process_key(KeyCode::KeyW, ElementState::Pressed);
        scene.tick(0.033);
        assert!(approx(scene.camera.position, Vector3::new(0.0, 0.05, 0.0)));
        assert!(scene.state.free_camera);
        assert!(scene.controller.pointer_look_enabled());
    }

    #[test]
    fn test_free_look_stays_in_bounds() {
        let mut scene = scene();
        scene.controller.process_key(KeyCode::KeyW, ElementState::Pressed);
        for i in 0..200 {
            scene.tick(i as f32 * 0.033);
        }
        assert!(scene.camera.position.y <= 3.8 + EPS);
        assert!(scene.camera.eye_position().y <= 3.8 + EPS);
    }

    #[test]
    fn test_menu_mode_change_drops_pointer_look() {
        let mut scene = scene();
        scene.tick(0.0);
        assert!(scene.controller.pointer_look_enabled());
        scene.apply(SceneCommand::SetCameraMode(CameraMode::FreeLook));
        assert!(!scene.controller.pointer_look_enabled());
        scene.tick(0.033);
        assert!(scene.controller.pointer_look_enabled());
    }

    #[test]
    fn test_pointer_turns_only_in_free_look() {
        let mut scene = scene();
        assert!(!scene.pointer_moved(100.0, 1000));
        scene.tick(0.0);
        assert!(scene.pointer_moved(480.0, 1000));
        assert!((scene.camera.view_angle - 100.0).abs() < EPS);
    }

    #[test]
    fn test_resting_pointer_does_not_drift_on_odd_width() {
        let mut scene = scene();
        scene.tick(0.0);
        for _ in 0..40 {
            scene.pointer_moved(500.0, 1001);
        }
        assert!((scene.camera.view_angle - 90.0).abs() < EPS);
    }

    #[test]
    fn test_billboard_lazily_created() {
        let mut scene = scene();
        scene.apply(SceneCommand::ToggleBillboard);
        assert!(scene.objects.billboard.is_none());
        scene.tick(3.0);
        let billboard = scene.objects.billboard.as_ref().unwrap();
        assert_eq!(billboard.start_time, 3.0);
        scene.tick(4.5);
        assert_eq!(scene.objects.billboard.as_ref().unwrap().local_time(), 1.5);
    }

    #[test]
    fn test_fire_clock_advances() {
        let mut scene = scene();
        scene.tick(2.0);
        assert_eq!(scene.objects.fire.as_ref().unwrap().current_time, 2.0);
    }

    #[test]
    fn test_picks() {
        let mut scene = scene();
        scene.pick(PickTarget::Snowman);
        assert!(scene.state.fire_on);
        scene.pick(PickTarget::Snowman);
        assert!(!scene.state.fire_on);

        scene.pick(PickTarget::Sofa);
        assert!(!scene.objects.sofa.as_ref().unwrap().is_visible());

        let before = scene.state.clone();
        scene.pick(PickTarget::Duck);
        assert_eq!(scene.state, before);
    }

    #[test]
    fn test_toggles_and_host_requests() {
        let mut scene = scene();
        assert_eq!(scene.apply(SceneCommand::ToggleFog), None);
        assert!(scene.state.fog_on);
        assert_eq!(scene.apply(SceneCommand::ToggleSun), None);
        assert!(!scene.state.sun_on);
        assert_eq!(
            scene.apply(SceneCommand::ToggleFullscreen),
            Some(HostRequest::SetFullscreen(true))
        );
        assert_eq!(scene.apply(SceneCommand::Exit), Some(HostRequest::Exit));
    }

    #[test]
    fn test_reset_restores_defaults() {
        let mut scene = scene();
        scene.apply(SceneCommand::ToggleFog);
        scene.apply(SceneCommand::ToggleBillboard);
        scene.pick(PickTarget::Sofa);
        scene.set_camera_mode(CameraMode::TopDown);
        scene.tick(5.0);
        assert!(scene.objects.billboard.is_some());

        scene.apply(SceneCommand::Reset);
        assert!(!scene.state.fog_on);
        assert!(!scene.state.billboard_on);
        assert!(scene.objects.billboard.is_none());
        assert!(scene.objects.sofa.as_ref().unwrap().is_visible());
        assert_eq!(scene.state.camera_mode, CameraMode::FreeLook);
        assert_eq!(scene.state.elapsed, 5.0);
        assert_eq!(scene.objects.duck.as_ref().unwrap().start_time, 5.0);
    }

    #[test]
    fn test_drawn_palms_follow_config() {
        let scene = Scene::with_config(Config {
            palm_count: 4,
            ..Config::default()
        });
        assert_eq!(scene.drawn_palms().len(), 4);
        assert_eq!(scene.drawn_palms()[0].position, Vector3::new(2.0, 0.0, 0.25));
    }
}
