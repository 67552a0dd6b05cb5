//! GPIO input lines
//!
//! Reads the joystick and face buttons straight from input pins. The board
//! wires every line to ground through the switch with the internal pull-up
//! enabled, so a pressed line reads low; the reader can also be built for
//! active-high wiring.

use embedded_hal::digital::InputPin;

use tinyarcade_core::input::{Line, LineLevels, LINE_COUNT};

/// Pins for every line, in [`Line::ALL`] order
pub struct LinePins<P> {
    pub up: P,
    pub down: P,
    pub left: P,
    pub right: P,
    pub select: P,
    pub a: P,
    pub b: P,
    pub x: P,
    pub y: P,
}

/// Samples all input lines into a [`LineLevels`] snapshot
pub struct LineReader<P> {
    pins: [P; LINE_COUNT],
    /// If true, pressed = pin LOW
    active_low: bool,
}

impl<P: InputPin> LineReader<P> {
    /// Create a reader over the board's input pins
    ///
    /// # Arguments
    /// - `pins`: One pin per line
    /// - `active_low`: If true, a line is pressed when its pin reads LOW
    pub fn new(pins: LinePins<P>, active_low: bool) -> Self {
        let LinePins {
            up,
            down,
            left,
            right,
            select,
            a,
            b,
            x,
            y,
        } = pins;
        Self {
            pins: [up, down, left, right, select, a, b, x, y],
            active_low,
        }
    }

    /// Create a reader for pull-up wiring (pressed = LOW)
    pub fn new_active_low(pins: LinePins<P>) -> Self {
        Self::new(pins, true)
    }

    /// Read every line once
    ///
    /// A pin that fails to read counts as released.
    pub fn read(&mut self) -> LineLevels {
        let mut levels = LineLevels::none();
        for (line, pin) in Line::ALL.into_iter().zip(self.pins.iter_mut()) {
            let pressed = match pin.is_high() {
                // Normal: high = pressed; inverted: low = pressed
                Ok(high) => high != self.active_low,
                Err(_) => false,
            };
            levels.set(line, pressed);
        }
        levels
    }

    /// Give the pins back, in [`Line::ALL`] order
    pub fn release(self) -> [P; LINE_COUNT] {
        self.pins
    }
}
