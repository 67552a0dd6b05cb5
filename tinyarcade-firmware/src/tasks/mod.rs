//! Embassy async tasks
//!
//! The application runs as one cooperative loop; input, game and drawing
//! all happen on its tick.

pub mod app;

pub use app::app_task;
