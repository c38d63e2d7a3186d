//! Tray menu.
//!
//! A fixed three-item menu (Search, Configure, Quit) and the controller that
//! routes each item to the shell. Rendering belongs to the shell's
//! [`TrayIcon`](crate::shell::TrayIcon) implementation.

pub mod actions;
pub mod controller;

pub use actions::{action_from_command, action_from_menu_id, MenuEntry, TrayAction, MENU};
pub use controller::{TrayController, TrayHost};
