//! # User Interface Module
//!
//! Dear ImGui overlay for the right-click context menu.
//!
//! - [`UiManager`] - ImGui integration with winit and wgpu
//! - [`menu`] - menu entries, their numeric codes and the scene commands they issue
//!
//! While the menu is open the overlay captures the pointer, so clicks on menu
//! entries never reach picking or pointer-look.

pub mod manager;
pub mod menu;

// Re-export main types
pub use manager::UiManager;
pub use menu::{ContextMenu, MenuChoice};
