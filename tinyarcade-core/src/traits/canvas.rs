//! Drawing surface trait
//!
//! The game, the menu and the application screens draw through this trait.
//! The panel driver implements it; tests implement it with a recorder.

use crate::color::Color;

/// Errors a drawing call can report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DrawError {
    /// Image data missing or shorter than its declared size
    ResourceUnavailable,
}

/// Pixel drawing surface
///
/// Coordinates are signed; anything off the surface is clipped by the
/// implementation and never reported as an error.
pub trait Canvas {
    /// Surface size in pixels (width, height)
    fn size(&self) -> (u16, u16);

    /// Fill the whole surface
    fn clear(&mut self, color: Color);

    /// Fill a `w` x `h` rectangle with its top-left corner at (x, y)
    fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: Color);

    /// Draw text with the 8x8 font, left to right, no wrapping
    fn draw_text(&mut self, text: &str, x: i32, y: i32, color: Color);

    /// Copy a raw big-endian RGB565 image of `w` x `h` pixels to (x, y)
    fn blit_raw(&mut self, data: &[u8], x: i32, y: i32, w: u16, h: u16)
        -> Result<(), DrawError>;

    /// Draw a one-pixel rectangle outline
    fn draw_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: Color) {
        if w <= 0 || h <= 0 {
            return;
        }
        self.fill_rect(x, y, w, 1, color);
        self.fill_rect(x, y + h - 1, w, 1, color);
        self.fill_rect(x, y, 1, h, color);
        self.fill_rect(x + w - 1, y, 1, h, color);
    }
}

/// Source of named raw images (splash, menu icons)
pub trait AssetStore {
    /// Raw RGB565 bytes for `name`, if the asset exists
    fn get(&self, name: &str) -> Option<&[u8]>;
}

/// Asset store with nothing in it
///
/// Every lookup misses, so every image renders its placeholder.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAssets;

impl AssetStore for NoAssets {
    fn get(&self, _name: &str) -> Option<&[u8]> {
        None
    }
}

impl AssetStore for [(&str, &[u8])] {
    fn get(&self, name: &str) -> Option<&[u8]> {
        self.iter()
            .find(|(asset, _)| *asset == name)
            .map(|(_, data)| *data)
    }
}

/// Helpers built on the primitives
pub trait CanvasExt: Canvas {
    /// Draw a named image, or a red outlined box with a `?` marker
    ///
    /// Returns `true` if the real image was drawn.
    fn draw_asset_or_placeholder<A: AssetStore + ?Sized>(
        &mut self,
        assets: &A,
        name: &str,
        x: i32,
        y: i32,
        w: u16,
        h: u16,
    ) -> bool {
        let drawn = match assets.get(name) {
            Some(data) => self.blit_raw(data, x, y, w, h).is_ok(),
            None => false,
        };

        if !drawn {
            self.draw_placeholder(x, y, i32::from(w), i32::from(h));
        }
        drawn
    }

    /// Missing-asset marker: blank box, red outline, centered `?`
    ///
    /// The box is blanked first so nothing drawn under it shows through.
    fn draw_placeholder(&mut self, x: i32, y: i32, w: i32, h: i32) {
        self.fill_rect(x, y, w, h, Color::WHITE);
        self.draw_rect(x, y, w, h, Color::RED);
        self.draw_text("?", x + w / 2 - 4, y + h / 2 - 4, Color::RED);
    }

    /// Draw text horizontally centered on the surface
    fn draw_text_centered(&mut self, text: &str, y: i32, color: Color) {
        let (width, _) = self.size();
        let text_w = text.chars().count() as i32 * 8;
        self.draw_text(text, (i32::from(width) - text_w) / 2, y, color);
    }
}

// Blanket implementation for all Canvas types
impl<T: Canvas + ?Sized> CanvasExt for T {}
