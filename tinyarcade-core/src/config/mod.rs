//! Configuration types
//!
//! Board-agnostic configuration structures. The firmware build script
//! deserializes them from `device.toml` (feature `serde`) and embeds the
//! validated result as a constant.

pub mod types;

pub use types::*;
