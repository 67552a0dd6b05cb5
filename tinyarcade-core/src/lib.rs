//! Board-agnostic core logic for the tinyarcade handheld
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Drawing and asset seams (`Canvas`, `AssetStore`)
//! - 5-6-5 colors and window clamping
//! - Debounced input sampling
//! - The obstacle game engine
//! - The grid menu
//! - The application flow tying splash, menu and game together
//! - Configuration type definitions

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod app;
pub mod color;
pub mod config;
pub mod game;
pub mod geometry;
pub mod input;
pub mod menu;
pub mod traits;
