// src/app.rs
//! Window host: owns the event loop, drives the 33 ms scene tick and routes
//! input to the scene, the picker and the context menu.

use anyhow::Context as _;
use std::{
    path::PathBuf,
    sync::Arc,
    time::{Duration, Instant},
};
use winit::{
    application::ApplicationHandler,
    dpi::{LogicalSize, PhysicalPosition, PhysicalSize},
    event::{ElementState, KeyEvent, MouseButton, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Fullscreen, Window, WindowAttributes, WindowId},
};

use crate::{
    gfx::{
        camera::{CameraController, CameraMode},
        rendering::RenderEngine,
        scene::{HostRequest, Scene, SceneCommand},
    },
    settings::{TICK_PERIOD_MS, WINDOW_HEIGHT, WINDOW_TITLE, WINDOW_WIDTH},
    ui::UiManager,
};

/// Command bound to a key, fired when the key is released
pub fn release_command(key: KeyCode) -> Option<SceneCommand> {
    match key {
        KeyCode::KeyF => Some(SceneCommand::ToggleFlashlight),
        KeyCode::KeyG => Some(SceneCommand::ToggleFog),
        KeyCode::KeyB => Some(SceneCommand::ToggleBillboard),
        KeyCode::KeyH => Some(SceneCommand::ToggleSun),
        KeyCode::KeyJ => Some(SceneCommand::ToggleFire),
        KeyCode::KeyP => Some(SceneCommand::ToggleFullscreen),
        KeyCode::KeyR => Some(SceneCommand::Reset),
        KeyCode::F1 => Some(SceneCommand::SetCameraMode(CameraMode::TopDown)),
        KeyCode::F2 => Some(SceneCommand::SetCameraMode(CameraMode::Corner)),
        KeyCode::F3 => Some(SceneCommand::SetCameraMode(CameraMode::FreeLook)),
        KeyCode::F4 => Some(SceneCommand::SetCameraMode(CameraMode::ChaseFlyer)),
        _ => None,
    }
}

fn fullscreen_mode(on: bool) -> Option<Fullscreen> {
    on.then_some(Fullscreen::Borderless(None))
}

pub struct WildIslandApp {
    event_loop: Option<EventLoop<()>>,
    app_state: AppState,
}

struct AppState {
    window: Option<Arc<Window>>,
    render_engine: Option<RenderEngine>,
    ui_manager: Option<UiManager>,
    scene: Scene,
    asset_root: PathBuf,
    started: Instant,
    next_tick: Instant,
    cursor: PhysicalPosition<f64>,
    init_error: Option<anyhow::Error>,
}

impl WildIslandApp {
    /// Creates the application and builds the initial scene
    ///
    /// # Arguments
    /// * `config_path` - Configuration file, re-read on every scene reset
    /// * `asset_root` - Directory holding `data/` and `shaders/`
    pub fn new(config_path: impl Into<PathBuf>, asset_root: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let event_loop = EventLoop::new().context("failed to create event loop")?;
        let now = Instant::now();

        Ok(Self {
            event_loop: Some(event_loop),
            app_state: AppState {
                window: None,
                render_engine: None,
                ui_manager: None,
                scene: Scene::new(config_path),
                asset_root: asset_root.into(),
                started: now,
                next_tick: now,
                cursor: PhysicalPosition::new(0.0, 0.0),
                init_error: None,
            },
        })
    }

    /// Runs the event loop until the window closes
    pub fn run(mut self) -> anyhow::Result<()> {
        let event_loop = self
            .event_loop
            .take()
            .context("event loop already consumed")?;
        event_loop.set_control_flow(ControlFlow::WaitUntil(self.app_state.next_tick));

        event_loop
            .run_app(&mut self.app_state)
            .context("event loop terminated abnormally")?;

        match self.app_state.init_error.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl AppState {
    fn init(&mut self, event_loop: &ActiveEventLoop) -> anyhow::Result<()> {
        let window = event_loop
            .create_window(
                WindowAttributes::default()
                    .with_title(WINDOW_TITLE)
                    .with_inner_size(LogicalSize::new(WINDOW_WIDTH, WINDOW_HEIGHT))
                    .with_fullscreen(fullscreen_mode(self.scene.state.fullscreen)),
            )
            .context("failed to create window")?;
        let window = Arc::new(window);
        let (width, height) = window.inner_size().into();

        let renderer = pollster::block_on(RenderEngine::new(
            window.clone(),
            width,
            height,
            &self.asset_root,
        ))
        .context("failed to initialize renderer")?;

        let ui_manager = UiManager::new(
            renderer.device(),
            renderer.queue(),
            renderer.surface_format(),
            &window,
        );

        self.ui_manager = Some(ui_manager);
        self.render_engine = Some(renderer);
        self.window = Some(window);
        Ok(())
    }

    fn run_command(&mut self, command: SceneCommand, event_loop: &ActiveEventLoop) {
        let Some(request) = self.scene.apply(command) else {
            return;
        };
        match request {
            HostRequest::Exit => event_loop.exit(),
            HostRequest::SetFullscreen(on) => {
                if let Some(window) = &self.window {
                    window.set_fullscreen(fullscreen_mode(on));
                }
            }
        }
    }

    fn handle_key(&mut self, event: &KeyEvent, event_loop: &ActiveEventLoop) {
        let PhysicalKey::Code(key) = event.physical_key else {
            return;
        };

        if key == KeyCode::Escape && event.state == ElementState::Pressed {
            event_loop.exit();
            return;
        }

        if self.scene.controller.process_key(key, event.state) {
            return;
        }

        if event.state == ElementState::Released {
            if let Some(command) = release_command(key) {
                self.run_command(command, event_loop);
            }
        }
    }

    fn handle_cursor(&mut self, position: PhysicalPosition<f64>) {
        self.cursor = position;
        let Some(window) = &self.window else {
            return;
        };
        let size = window.inner_size();
        if self.scene.pointer_moved(position.x, size.width) {
            let center = PhysicalPosition::new(
                CameraController::pointer_center(size.width),
                size.height / 2,
            );
            if let Err(err) = window.set_cursor_position(center) {
                log::debug!("Cursor warp unavailable: {}", err);
            }
        }
    }

    fn handle_mouse(&mut self, button: MouseButton, state: ElementState) {
        if state != ElementState::Pressed {
            return;
        }
        match button {
            MouseButton::Left => {
                if let Some(engine) = self.render_engine.as_mut() {
                    engine.request_pick(self.cursor.x.max(0.0) as u32, self.cursor.y.max(0.0) as u32);
                }
            }
            MouseButton::Right => {
                if let Some(ui) = self.ui_manager.as_mut() {
                    ui.open_menu();
                }
            }
            _ => {}
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let (Some(engine), Some(window)) = (self.render_engine.as_mut(), self.window.as_ref())
        else {
            return;
        };

        let mut choice = None;
        let ui_manager = &mut self.ui_manager;
        let picked = engine.render_frame(
            &self.scene,
            Some(|device: &wgpu::Device, queue: &wgpu::Queue, encoder: &mut wgpu::CommandEncoder, view: &wgpu::TextureView| {
                if let Some(ui) = ui_manager.as_mut() {
                    choice = ui.draw(device, queue, encoder, window, view);
                }
            }),
        );

        if let Some(target) = picked {
            log::debug!("Picked {:?}", target);
            self.scene.pick(target);
        }
        if let Some(choice) = choice {
            self.run_command(choice.command(), event_loop);
        }
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(err) = self.init(event_loop) {
            log::error!("{:#}", err);
            self.init_error = Some(err);
            event_loop.exit();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, window_id: WindowId, event: WindowEvent) {
        if let (Some(ui), Some(window)) = (self.ui_manager.as_mut(), self.window.as_ref()) {
            if ui.handle_input(window, window_id, &event) {
                window.request_redraw();
                return;
            }
        }

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(PhysicalSize { width, height }) => {
                if let Some(engine) = self.render_engine.as_mut() {
                    engine.resize(width, height);
                }
                if let Some(ui) = self.ui_manager.as_mut() {
                    ui.update_display_size(width, height);
                }
            }
            WindowEvent::KeyboardInput { event, .. } => self.handle_key(&event, event_loop),
            WindowEvent::CursorMoved { position, .. } => self.handle_cursor(position),
            WindowEvent::MouseInput { state, button, .. } => self.handle_mouse(button, state),
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let now = Instant::now();
        if now >= self.next_tick {
            self.scene.tick(self.started.elapsed().as_secs_f32());
            self.next_tick = now + Duration::from_millis(TICK_PERIOD_MS);
            if let Some(window) = &self.window {
                window.request_redraw();
            }
        }
        event_loop.set_control_flow(ControlFlow::WaitUntil(self.next_tick));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_release_bindings() {
        assert_eq!(release_command(KeyCode::KeyF), Some(SceneCommand::ToggleFlashlight));
        assert_eq!(release_command(KeyCode::KeyG), Some(SceneCommand::ToggleFog));
        assert_eq!(release_command(KeyCode::KeyB), Some(SceneCommand::ToggleBillboard));
        assert_eq!(release_command(KeyCode::KeyH), Some(SceneCommand::ToggleSun));
        assert_eq!(release_command(KeyCode::KeyJ), Some(SceneCommand::ToggleFire));
        assert_eq!(release_command(KeyCode::KeyP), Some(SceneCommand::ToggleFullscreen));
        assert_eq!(release_command(KeyCode::KeyR), Some(SceneCommand::Reset));
        assert_eq!(
            release_command(KeyCode::F4),
            Some(SceneCommand::SetCameraMode(CameraMode::ChaseFlyer))
        );
    }

    #[test]
    fn test_movement_and_escape_are_not_release_commands() {
        for key in [
            KeyCode::KeyW,
            KeyCode::KeyA,
            KeyCode::KeyS,
            KeyCode::KeyD,
            KeyCode::ArrowUp,
            KeyCode::Escape,
        ] {
            assert_eq!(release_command(key), None);
        }
    }

    #[test]
    fn test_fullscreen_mode() {
        assert!(fullscreen_mode(false).is_none());
        assert!(matches!(fullscreen_mode(true), Some(Fullscreen::Borderless(None))));
    }
}
