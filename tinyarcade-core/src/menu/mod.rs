//! Grid menu

pub mod items;
pub mod navigator;

pub use items::{MenuAction, MenuItem, DEFAULT_ITEMS, SPLASH_IMAGE};
pub use navigator::{MenuEvent, MenuNavigator};
