//! 5-6-5 packed colors
//!
//! Every pixel that reaches the panel is a 16-bit value with red in the
//! top five bits, green in the middle six and blue in the low five. On the
//! wire each pixel is sent big-endian (high byte first).

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A 16-bit RGB565 color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Color(u16);

impl Color {
    pub const BLACK: Color = Color(0x0000);
    pub const WHITE: Color = Color(0xFFFF);
    pub const RED: Color = Color(0xF800);
    pub const GREEN: Color = Color(0x07E0);
    pub const BLUE: Color = Color(0x001F);

    /// Wrap an already packed 5-6-5 value
    pub const fn from_raw(raw: u16) -> Self {
        Self(raw)
    }

    /// Raw packed value
    pub const fn raw(self) -> u16 {
        self.0
    }

    /// Bytes in panel order (big-endian)
    pub const fn to_be_bytes(self) -> [u8; 2] {
        self.0.to_be_bytes()
    }
}

impl From<Color> for u16 {
    fn from(color: Color) -> Self {
        color.0
    }
}
