//! Color panel display
//!
//! - [`bus`]: command/data transport to the panel controller
//! - [`st7789`]: the panel driver with both buffering policies
//! - [`font`]: the 8x8 bitmap font used for text

pub mod bus;
pub mod font;
pub mod st7789;

pub use bus::{DisplayBus, SpiDisplayBus};
pub use st7789::Display;

/// Display driver errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    /// Transport rejected a write
    Bus,
    /// Controller bring-up sequence was not accepted
    InitFailed,
    /// Pixel buffer is too small for the panel and policy
    BufferSize,
}
