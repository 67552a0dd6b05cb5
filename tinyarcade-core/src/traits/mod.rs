//! Hardware abstraction traits
//!
//! These traits define the interface between the application logic
//! and the panel driver.

pub mod canvas;

pub use canvas::{AssetStore, Canvas, CanvasExt, DrawError, NoAssets};
