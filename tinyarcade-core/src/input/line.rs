//! Named digital input lines

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Number of input lines
pub const LINE_COUNT: usize = 9;

/// The fixed set of digital inputs on the board
///
/// Four joystick directions, the joystick press, and four face buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Line {
    Up,
    Down,
    Left,
    Right,
    /// Joystick press (confirm/select)
    Select,
    /// Face button A (pause/resume in game)
    A,
    /// Face button B (high score in game)
    B,
    /// Face button X (restart / play again)
    X,
    /// Face button Y (exit)
    Y,
}

impl Line {
    /// All lines in index order
    pub const ALL: [Line; LINE_COUNT] = [
        Line::Up,
        Line::Down,
        Line::Left,
        Line::Right,
        Line::Select,
        Line::A,
        Line::B,
        Line::X,
        Line::Y,
    ];

    /// Stable index of this line (0..LINE_COUNT)
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Snapshot of every line's level, `true` = pressed
///
/// Polarity is already normalized: whatever reads the pins turns
/// active-low levels into `pressed = true` before building this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LineLevels(u16);

impl LineLevels {
    /// Nothing pressed
    pub const fn none() -> Self {
        Self(0)
    }

    /// Levels with exactly the given lines pressed
    pub fn pressed(lines: &[Line]) -> Self {
        let mut levels = Self::none();
        for &line in lines {
            levels.set(line, true);
        }
        levels
    }

    /// Set one line's level
    pub fn set(&mut self, line: Line, pressed: bool) {
        if pressed {
            self.0 |= 1 << line.index();
        } else {
            self.0 &= !(1 << line.index());
        }
    }

    /// Read one line's level
    pub const fn is_pressed(&self, line: Line) -> bool {
        self.0 & (1 << line.index()) != 0
    }
}
