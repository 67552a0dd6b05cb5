//! Board input lines

pub mod gpio;

pub use gpio::{LinePins, LineReader};
