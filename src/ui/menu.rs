// src/ui/menu.rs
//! Right-click context menu
//!
//! Every entry carries a numeric code; codes map one to one onto
//! [`SceneCommand`]s so the menu can be driven without a UI in tests.

use crate::gfx::{camera::CameraMode, scene::SceneCommand};

const POPUP_ID: &str = "scene_context_menu";

/// Entries of the context menu
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MenuChoice {
    TopDownCamera,
    CornerCamera,
    Exit,
    FreeCamera,
    ChaseCamera,
    ToggleFlashlight,
    ToggleSun,
    ToggleFog,
    ToggleFire,
    ToggleBillboard,
    Reset,
}

/// Entries of the "Camera" submenu, in display order
pub const CAMERA_ENTRIES: [MenuChoice; 4] = [
    MenuChoice::TopDownCamera,
    MenuChoice::CornerCamera,
    MenuChoice::FreeCamera,
    MenuChoice::ChaseCamera,
];

/// Top-level entries below the submenu, in display order
pub const MAIN_ENTRIES: [MenuChoice; 7] = [
    MenuChoice::ToggleSun,
    MenuChoice::ToggleFlashlight,
    MenuChoice::ToggleFog,
    MenuChoice::ToggleFire,
    MenuChoice::ToggleBillboard,
    MenuChoice::Reset,
    MenuChoice::Exit,
];

impl MenuChoice {
    pub fn code(self) -> u8 {
        match self {
            MenuChoice::TopDownCamera => 1,
            MenuChoice::CornerCamera => 2,
            MenuChoice::Exit => 3,
            MenuChoice::FreeCamera => 4,
            MenuChoice::ChaseCamera => 5,
            MenuChoice::ToggleFlashlight => 6,
            MenuChoice::ToggleSun => 7,
            MenuChoice::ToggleFog => 8,
            MenuChoice::ToggleFire => 9,
            MenuChoice::ToggleBillboard => 10,
            MenuChoice::Reset => 11,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(MenuChoice::TopDownCamera),
            2 => Some(MenuChoice::CornerCamera),
            3 => Some(MenuChoice::Exit),
            4 => Some(MenuChoice::FreeCamera),
            5 => Some(MenuChoice::ChaseCamera),
            6 => Some(MenuChoice::ToggleFlashlight),
            7 => Some(MenuChoice::ToggleSun),
            8 => Some(MenuChoice::ToggleFog),
            9 => Some(MenuChoice::ToggleFire),
            10 => Some(MenuChoice::ToggleBillboard),
            11 => Some(MenuChoice::Reset),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MenuChoice::TopDownCamera => CameraMode::TopDown.label(),
            MenuChoice::CornerCamera => CameraMode::Corner.label(),
            MenuChoice::FreeCamera => CameraMode::FreeLook.label(),
            MenuChoice::ChaseCamera => CameraMode::ChaseFlyer.label(),
            MenuChoice::ToggleFlashlight => "Toggle Flashlight",
            MenuChoice::ToggleSun => "Toggle Sun",
            MenuChoice::ToggleFog => "Toggle Fog",
            MenuChoice::ToggleFire => "Toggle Fire",
            MenuChoice::ToggleBillboard => "Toggle Banner",
            MenuChoice::Reset => "Reset Scene",
            MenuChoice::Exit => "Exit",
        }
    }

    pub fn command(self) -> SceneCommand {
        match self {
            MenuChoice::TopDownCamera => SceneCommand::SetCameraMode(CameraMode::TopDown),
            MenuChoice::CornerCamera => SceneCommand::SetCameraMode(CameraMode::Corner),
            MenuChoice::FreeCamera => SceneCommand::SetCameraMode(CameraMode::FreeLook),
            MenuChoice::ChaseCamera => SceneCommand::SetCameraMode(CameraMode::ChaseFlyer),
            MenuChoice::ToggleFlashlight => SceneCommand::ToggleFlashlight,
            MenuChoice::ToggleSun => SceneCommand::ToggleSun,
            MenuChoice::ToggleFog => SceneCommand::ToggleFog,
            MenuChoice::ToggleFire => SceneCommand::ToggleFire,
            MenuChoice::ToggleBillboard => SceneCommand::ToggleBillboard,
            MenuChoice::Reset => SceneCommand::Reset,
            MenuChoice::Exit => SceneCommand::Exit,
        }
    }
}

/// Popup state between the right click and the next UI frame
#[derive(Debug, Default)]
pub struct ContextMenu {
    open_requested: bool,
}

impl ContextMenu {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens the popup at the pointer on the next UI frame
    pub fn request_open(&mut self) {
        self.open_requested = true;
    }

    /// Builds the popup for this frame and returns the clicked entry
    pub fn build(&mut self, ui: &imgui::Ui) -> Option<MenuChoice> {
        if std::mem::take(&mut self.open_requested) {
            ui.open_popup(POPUP_ID);
        }

        let mut chosen = None;
        if let Some(_popup) = ui.begin_popup(POPUP_ID) {
            if let Some(_camera_menu) = ui.begin_menu("Camera") {
                for entry in CAMERA_ENTRIES {
                    if ui.menu_item(entry.label()) {
                        chosen = Some(entry);
                    }
                }
            }
            for entry in MAIN_ENTRIES {
                if ui.menu_item(entry.label()) {
                    chosen = Some(entry);
                }
            }
        }

        if let Some(choice) = chosen {
            log::debug!("Menu entry {} ({})", choice.code(), choice.label());
        }
        chosen
    }
}
