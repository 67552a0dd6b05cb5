//! Rectangles and clamped panel windows
//!
//! Drawing code works in signed coordinates so callers can pass rectangles
//! that hang off any edge. Before anything reaches the panel the rectangle
//! is turned into a [`Window`], which is always non-empty and always inside
//! the panel.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A signed, possibly out-of-bounds rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// Square of side `size` at (x, y)
    pub const fn square(x: i32, y: i32, size: i32) -> Self {
        Self::new(x, y, size, size)
    }

    /// Axis-aligned overlap test
    ///
    /// Touching edges do not count as overlap.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.x.saturating_add(other.w)
            && self.x.saturating_add(self.w) > other.x
            && self.y < other.y.saturating_add(other.h)
            && self.y.saturating_add(self.h) > other.y
    }

    /// Whether the rectangle covers no pixels
    pub fn is_empty(&self) -> bool {
        self.w <= 0 || self.h <= 0
    }
}

/// Inclusive, clamped pixel rectangle on a `width` x `height` panel
///
/// Invariant: `x0 <= x1 < width` and `y0 <= y1 < height`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Window {
    pub x0: u16,
    pub y0: u16,
    pub x1: u16,
    pub y1: u16,
}

impl Window {
    /// Window covering the whole panel
    ///
    /// Returns `None` for a zero-sized panel.
    pub fn full(width: u16, height: u16) -> Option<Self> {
        if width == 0 || height == 0 {
            return None;
        }
        Some(Self {
            x0: 0,
            y0: 0,
            x1: width - 1,
            y1: height - 1,
        })
    }

    /// Clamp inclusive corners to the panel
    ///
    /// Returns `None` when nothing of the rectangle lies on the panel or the
    /// corners are reversed.
    pub fn clamped(x0: i32, y0: i32, x1: i32, y1: i32, width: u16, height: u16) -> Option<Self> {
        if width == 0 || height == 0 {
            return None;
        }
        let max_x = i32::from(width) - 1;
        let max_y = i32::from(height) - 1;

        let cx0 = x0.max(0);
        let cy0 = y0.max(0);
        let cx1 = x1.min(max_x);
        let cy1 = y1.min(max_y);

        if cx0 > cx1 || cy0 > cy1 {
            return None;
        }

        Some(Self {
            x0: cx0 as u16,
            y0: cy0 as u16,
            x1: cx1 as u16,
            y1: cy1 as u16,
        })
    }

    /// Clip an origin + size rectangle to the panel
    ///
    /// Overflowing `x + w` / `y + h` saturate instead of wrapping.
    pub fn from_rect(rect: Rect, width: u16, height: u16) -> Option<Self> {
        if rect.is_empty() {
            return None;
        }
        let x1 = rect.x.saturating_add(rect.w - 1);
        let y1 = rect.y.saturating_add(rect.h - 1);
        Self::clamped(rect.x, rect.y, x1, y1, width, height)
    }

    /// Overlap of two windows
    pub fn intersect(&self, other: &Window) -> Option<Window> {
        let x0 = self.x0.max(other.x0);
        let y0 = self.y0.max(other.y0);
        let x1 = self.x1.min(other.x1);
        let y1 = self.y1.min(other.y1);
        if x0 > x1 || y0 > y1 {
            return None;
        }
        Some(Window { x0, y0, x1, y1 })
    }

    /// Width in pixels (at least 1)
    pub const fn width(&self) -> u16 {
        self.x1 - self.x0 + 1
    }

    /// Height in pixels (at least 1)
    pub const fn height(&self) -> u16 {
        self.y1 - self.y0 + 1
    }

    /// Whether row `y` is inside the window
    pub const fn contains_row(&self, y: u16) -> bool {
        y >= self.y0 && y <= self.y1
    }

    /// Window restricted to a single row, if the row is covered
    pub fn row(&self, y: u16) -> Option<Window> {
        if !self.contains_row(y) {
            return None;
        }
        Some(Window {
            x0: self.x0,
            y0: y,
            x1: self.x1,
            y1: y,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_full_overlap_collides() {
        let player = Rect::square(50, 50, 10);
        let obstacle = Rect::square(50, 50, 10);
        assert!(player.overlaps(&obstacle));
    }

    #[test]
    fn test_disjoint_does_not_collide() {
        let player = Rect::square(50, 50, 10);
        let obstacle = Rect::square(70, 70, 10);
        assert!(!player.overlaps(&obstacle));
    }

    #[test]
    fn test_touching_edges_do_not_collide() {
        let a = Rect::square(0, 0, 10);
        let b = Rect::square(10, 0, 10);
        assert!(!a.overlaps(&b));
    }

    #[test]
    fn test_clamped_inside() {
        let w = Window::clamped(10, 20, 30, 40, 240, 240).unwrap();
        assert_eq!((w.x0, w.y0, w.x1, w.y1), (10, 20, 30, 40));
        assert_eq!(w.width(), 21);
        assert_eq!(w.height(), 21);
    }

    #[test]
    fn test_clamped_overhanging() {
        let w = Window::clamped(-5, -5, 500, 10, 240, 240).unwrap();
        assert_eq!((w.x0, w.y0, w.x1, w.y1), (0, 0, 239, 10));
    }

    #[test]
    fn test_clamped_offscreen_is_empty() {
        assert_eq!(Window::clamped(300, 0, 400, 10, 240, 240), None);
        assert_eq!(Window::clamped(0, -20, 10, -1, 240, 240), None);
    }

    #[test]
    fn test_reversed_corners_are_empty() {
        assert_eq!(Window::clamped(20, 0, 10, 10, 240, 240), None);
    }

    #[test]
    fn test_from_rect_overflow_saturates() {
        let w = Window::from_rect(Rect::new(200, 200, i32::MAX, i32::MAX), 240, 240).unwrap();
        assert_eq!((w.x0, w.y0, w.x1, w.y1), (200, 200, 239, 239));
    }

    #[test]
    fn test_from_rect_negative_size_is_empty() {
        assert_eq!(Window::from_rect(Rect::new(10, 10, -4, 5), 240, 240), None);
        assert_eq!(Window::from_rect(Rect::new(10, 10, 5, 0), 240, 240), None);
    }

    #[test]
    fn test_intersect() {
        let a = Window::clamped(0, 0, 99, 99, 240, 240).unwrap();
        let b = Window::clamped(50, 80, 200, 200, 240, 240).unwrap();
        let i = a.intersect(&b).unwrap();
        assert_eq!((i.x0, i.y0, i.x1, i.y1), (50, 80, 99, 99));

        let c = Window::clamped(150, 150, 160, 160, 240, 240).unwrap();
        assert_eq!(a.intersect(&c), None);
    }

    proptest! {
        #[test]
        fn prop_clamped_window_is_inside_panel(
            x0 in any::<i32>(),
            y0 in any::<i32>(),
            x1 in any::<i32>(),
            y1 in any::<i32>(),
            width in 1u16..400,
            height in 1u16..400,
        ) {
            if let Some(w) = Window::clamped(x0, y0, x1, y1, width, height) {
                prop_assert!(w.x0 <= w.x1);
                prop_assert!(w.y0 <= w.y1);
                prop_assert!(w.x1 < width);
                prop_assert!(w.y1 < height);
            }
        }

        #[test]
        fn prop_rect_window_is_inside_panel(
            x in any::<i32>(),
            y in any::<i32>(),
            w in any::<i32>(),
            h in any::<i32>(),
            width in 1u16..400,
            height in 1u16..400,
        ) {
            if let Some(win) = Window::from_rect(Rect::new(x, y, w, h), width, height) {
                prop_assert!(win.x0 <= win.x1 && win.x1 < width);
                prop_assert!(win.y0 <= win.y1 && win.y1 < height);
                prop_assert!(u32::from(win.width()) <= w.max(0) as u32);
                prop_assert!(u32::from(win.height()) <= h.max(0) as u32);
            }
        }
    }
}
