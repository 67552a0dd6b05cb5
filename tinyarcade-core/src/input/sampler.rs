//! Debounced edge detection over polled line levels
//!
//! The sampler is fed one [`LineLevels`] snapshot per poll together with
//! the poll time. A press edge is reported when a line goes from released
//! in the previous poll to pressed in this one, and only if at least the
//! debounce window has passed since the last accepted edge on that line.
//! Holding a line produces no further edges; continuous actions read the
//! level instead.

use heapless::Vec;

use super::line::{Line, LineLevels, LINE_COUNT};

/// Direction of a line transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EdgeKind {
    Pressed,
    Released,
}

/// One accepted transition on one line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InputEdge {
    pub line: Line,
    pub kind: EdgeKind,
}

/// Polls lines and reports debounced edges
#[derive(Debug, Clone)]
pub struct InputSampler {
    /// Minimum time between accepted edges on one line
    debounce_ms: u32,
    /// Accepted level of each line
    levels: LineLevels,
    /// Time of the last accepted edge per line
    last_edge_ms: [Option<u32>; LINE_COUNT],
    /// Edges accepted by the most recent poll
    edges: Vec<InputEdge, LINE_COUNT>,
}

impl InputSampler {
    /// Create a sampler with all lines released
    pub fn new(debounce_ms: u32) -> Self {
        Self {
            debounce_ms,
            levels: LineLevels::none(),
            last_edge_ms: [None; LINE_COUNT],
            edges: Vec::new(),
        }
    }

    /// Take one sample of every line
    ///
    /// Returns the accepted levels after debouncing. A change that arrives
    /// inside the debounce window is ignored for this poll; if the line is
    /// still in the new state at a later poll the edge is accepted then.
    pub fn poll(&mut self, raw: LineLevels, now_ms: u32) -> LineLevels {
        self.edges.clear();

        for line in Line::ALL {
            let was = self.levels.is_pressed(line);
            let is = raw.is_pressed(line);
            if was == is {
                continue;
            }

            let settled = match self.last_edge_ms[line.index()] {
                Some(last) => now_ms.wrapping_sub(last) >= self.debounce_ms,
                None => true,
            };
            if !settled {
                continue;
            }

            self.levels.set(line, is);
            self.last_edge_ms[line.index()] = Some(now_ms);
            let kind = if is {
                EdgeKind::Pressed
            } else {
                EdgeKind::Released
            };
            // Capacity equals the line count, one edge per line per poll
            let _ = self.edges.push(InputEdge { line, kind });
        }

        self.levels
    }

    /// Whether `line` was pressed (released -> pressed) in the last poll
    pub fn debounced_edge(&self, line: Line) -> bool {
        self.edges
            .iter()
            .any(|e| e.line == line && e.kind == EdgeKind::Pressed)
    }

    /// Level read: is `line` currently held
    pub fn is_pressed(&self, line: Line) -> bool {
        self.levels.is_pressed(line)
    }

    /// Current debounced levels
    pub fn levels(&self) -> LineLevels {
        self.levels
    }

    /// Edges accepted by the last poll
    pub fn edges(&self) -> &[InputEdge] {
        &self.edges
    }

    /// Forget pending edges
    ///
    /// Used when control passes to another screen so a press that ended one
    /// screen is not seen again by the next.
    pub fn consume(&mut self) {
        self.edges.clear();
    }
}
