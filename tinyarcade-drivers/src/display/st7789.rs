//! ST7789 color panel driver
//!
//! Driver for ST7789-based RGB565 panels (240x240 on the target board) over
//! a command/data bus. Drawing happens in RAM; `present` moves pixels to the
//! panel through a column/row address window followed by a memory write.
//!
//! Two buffering policies share one set of primitives:
//!
//! - Full frame: the buffer holds every pixel, `present` sends all of it.
//! - Line streamed: the buffer holds one scan line, the cursor row.
//!   Primitives only touch pixels on that row and `present` sends it and
//!   advances the cursor, wrapping at the panel height.
//!
//! [`Display::render_frame`] hides the difference: it runs the caller's
//! drawing once (full frame) or once per row (line streamed) and presents
//! after each pass.

use tinyarcade_core::color::Color;
use tinyarcade_core::config::{BufferingPolicy, PanelConfig};
use tinyarcade_core::geometry::{Rect, Window};
use tinyarcade_core::traits::{Canvas, DrawError};

use super::bus::DisplayBus;
use super::font::{self, GLYPH_WIDTH};
use super::DisplayError;

/// ST7789 commands
#[allow(dead_code)]
pub mod cmd {
    pub const SLPOUT: u8 = 0x11;
    pub const INVON: u8 = 0x21;
    pub const DISPOFF: u8 = 0x28;
    pub const DISPON: u8 = 0x29;
    /// Column address set
    pub const CASET: u8 = 0x2A;
    /// Row address set
    pub const RASET: u8 = 0x2B;
    /// Memory write
    pub const RAMWR: u8 = 0x2C;
    /// Memory data access control (scan direction, RGB order)
    pub const MADCTL: u8 = 0x36;
    /// Interface pixel format
    pub const COLMOD: u8 = 0x3A;
    pub const PORCTRL: u8 = 0xB2;
    pub const GCTRL: u8 = 0xB7;
    pub const VCOMS: u8 = 0xBB;
    pub const LCMCTRL: u8 = 0xC0;
    pub const VDVVRHEN: u8 = 0xC2;
    pub const VRHS: u8 = 0xC3;
    pub const VDVS: u8 = 0xC4;
    pub const FRCTRL2: u8 = 0xC6;
    pub const PWCTRL1: u8 = 0xD0;
    /// Positive voltage gamma
    pub const PVGAMCTRL: u8 = 0xE0;
    /// Negative voltage gamma
    pub const NVGAMCTRL: u8 = 0xE1;
}

/// Reset line hold time for each level of the reset pulse
const RESET_PULSE_MS: u32 = 100;

/// Bring-up sequence: command, parameters, settle time in ms
const INIT_SEQUENCE: &[(u8, &[u8], u32)] = &[
    (cmd::MADCTL, &[0x70], 0),
    (cmd::COLMOD, &[0x05], 0), // 16 bits per pixel
    (cmd::PORCTRL, &[0x0C, 0x0C, 0x00, 0x33, 0x33], 0),
    (cmd::GCTRL, &[0x35], 0),
    (cmd::VCOMS, &[0x19], 0),
    (cmd::LCMCTRL, &[0x2C], 0),
    (cmd::VDVVRHEN, &[0x01], 0),
    (cmd::VRHS, &[0x12], 0),
    (cmd::VDVS, &[0x20], 0),
    (cmd::FRCTRL2, &[0x0F], 0),
    (cmd::PWCTRL1, &[0xA4, 0xA1], 0),
    (
        cmd::PVGAMCTRL,
        &[
            0xD0, 0x04, 0x0D, 0x11, 0x13, 0x2B, 0x3F, 0x54, 0x4C, 0x18, 0x0D, 0x0B, 0x1F, 0x23,
        ],
        0,
    ),
    (
        cmd::NVGAMCTRL,
        &[
            0xD0, 0x04, 0x0C, 0x11, 0x13, 0x2C, 0x3F, 0x44, 0x51, 0x2F, 0x1F, 0x1F, 0x20, 0x23,
        ],
        0,
    ),
    (cmd::INVON, &[], 0),
    (cmd::SLPOUT, &[], 100),
    (cmd::DISPON, &[], 100),
];

/// ST7789 panel driver
pub struct Display<'a, B> {
    bus: B,
    /// Pixel bytes, big-endian RGB565, sized for the policy
    buffer: &'a mut [u8],
    width: u16,
    height: u16,
    policy: BufferingPolicy,
    /// Whole-panel window
    panel: Window,
    /// Pixel writes and partial presents stay inside this window
    window: Window,
    /// Row held by the buffer in line-streamed mode
    cursor_row: u16,
    initialized: bool,
}

impl<'a, B: DisplayBus> Display<'a, B> {
    /// Create a driver over a caller-owned buffer
    ///
    /// The buffer must hold at least `width * height * 2` bytes for a full
    /// frame or `width * 2` bytes for line streaming; any excess is unused.
    pub fn new(bus: B, buffer: &'a mut [u8], panel: &PanelConfig) -> Result<Self, DisplayError> {
        let full = Window::full(panel.width, panel.height).ok_or(DisplayError::BufferSize)?;
        let buffer = buffer
            .get_mut(..panel.buffer_len())
            .ok_or(DisplayError::BufferSize)?;

        Ok(Self {
            bus,
            buffer,
            width: panel.width,
            height: panel.height,
            policy: panel.buffering,
            panel: full,
            window: full,
            cursor_row: 0,
            initialized: false,
        })
    }

    pub fn policy(&self) -> BufferingPolicy {
        self.policy
    }

    /// Row the line buffer currently represents
    pub fn cursor_row(&self) -> u16 {
        self.cursor_row
    }

    /// Window that bounds drawing and [`Display::present_window`]
    pub fn window(&self) -> Window {
        self.window
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Give the bus back
    pub fn release(self) -> B {
        self.bus
    }

    /// Run the controller bring-up sequence
    ///
    /// Sent once; later calls return immediately. Any bus failure during
    /// bring-up is reported as [`DisplayError::InitFailed`].
    pub fn initialize(&mut self) -> Result<(), DisplayError> {
        if self.initialized {
            return Ok(());
        }

        self.bring_up().map_err(|_e| {
            #[cfg(feature = "defmt")]
            defmt::error!("ST7789 bring-up failed: {}", _e);
            DisplayError::InitFailed
        })?;

        self.initialized = true;
        Ok(())
    }

    fn bring_up(&mut self) -> Result<(), DisplayError> {
        for level in [true, false, true] {
            self.bus.set_reset(level)?;
            self.bus.delay_ms(RESET_PULSE_MS);
        }

        for &(command, params, settle_ms) in INIT_SEQUENCE {
            self.bus.write_command(command)?;
            if !params.is_empty() {
                self.bus.write_data(params)?;
            }
            if settle_ms > 0 {
                self.bus.delay_ms(settle_ms);
            }
        }
        Ok(())
    }

    /// Turn the panel output on or off (pixels are kept)
    pub fn set_display_on(&mut self, on: bool) -> Result<(), DisplayError> {
        self.bus
            .write_command(if on { cmd::DISPON } else { cmd::DISPOFF })
    }

    /// Restrict later pixel writes and partial presents to a window
    ///
    /// Corners are inclusive and clamped to the panel. A request with no
    /// area on the panel is ignored and the current window stays; the
    /// whole panel is the window until the first accepted request.
    pub fn set_window(&mut self, x0: i32, y0: i32, x1: i32, y1: i32) -> Option<Window> {
        let window = Window::clamped(x0, y0, x1, y1, self.width, self.height);
        match window {
            Some(window) => self.window = window,
            None => {
                #[cfg(feature = "defmt")]
                defmt::debug!("zero-area window ({}, {})-({}, {}) ignored", x0, y0, x1, y1);
            }
        }
        window
    }

    /// Address a window on the panel and open a memory write
    fn address(&mut self, window: Window) -> Result<(), DisplayError> {
        let [x0_hi, x0_lo] = window.x0.to_be_bytes();
        let [x1_hi, x1_lo] = window.x1.to_be_bytes();
        let [y0_hi, y0_lo] = window.y0.to_be_bytes();
        let [y1_hi, y1_lo] = window.y1.to_be_bytes();

        self.bus.write_command(cmd::CASET)?;
        self.bus.write_data(&[x0_hi, x0_lo, x1_hi, x1_lo])?;
        self.bus.write_command(cmd::RASET)?;
        self.bus.write_data(&[y0_hi, y0_lo, y1_hi, y1_lo])?;
        self.bus.write_command(cmd::RAMWR)
    }

    /// Bytes of panel row `y`, if the buffer holds it
    fn row_mut(&mut self, y: i32) -> Option<&mut [u8]> {
        if y < 0 || y >= i32::from(self.height) {
            return None;
        }
        let stride = usize::from(self.width) * 2;
        let start = match self.policy {
            BufferingPolicy::FullFrame => y as usize * stride,
            BufferingPolicy::LineStreamed if y as u16 == self.cursor_row => 0,
            BufferingPolicy::LineStreamed => return None,
        };
        self.buffer.get_mut(start..start + stride)
    }

    /// Part of `area` a write may touch: inside the window and, when line
    /// streaming, on the cursor row
    fn writable(&self, area: Window) -> Option<Window> {
        let area = area.intersect(&self.window)?;
        match self.policy {
            BufferingPolicy::FullFrame => Some(area),
            BufferingPolicy::LineStreamed => area.row(self.cursor_row),
        }
    }

    /// Copy the columns of `area` on panel row `y` from an image row whose
    /// first pixel lands at column `x`
    fn copy_row(&mut self, pixels: &[u8], x: i32, y: u16, area: Window) {
        let len = usize::from(area.width()) * 2;
        let src_start = (i32::from(area.x0) - x) as usize * 2;
        let dst_start = usize::from(area.x0) * 2;

        let src = pixels.get(src_start..src_start + len);
        let dst = self
            .row_mut(i32::from(y))
            .and_then(|row| row.get_mut(dst_start..dst_start + len));
        if let (Some(src), Some(dst)) = (src, dst) {
            dst.copy_from_slice(src);
        }
    }

    /// Set a single pixel; pixels off the panel or outside the window are
    /// ignored
    pub fn set_pixel(&mut self, x: i32, y: i32, color: Color) {
        let Some(px) = Window::clamped(x, y, x, y, self.width, self.height)
            .and_then(|px| self.writable(px))
        else {
            return;
        };
        let i = usize::from(px.x0) * 2;
        if let Some(bytes) = self
            .row_mut(i32::from(px.y0))
            .and_then(|row| row.get_mut(i..i + 2))
        {
            bytes.copy_from_slice(&color.to_be_bytes());
        }
    }

    /// Draw one 8x8 glyph with its top-left corner at (x, y)
    ///
    /// Characters outside the font draw the fallback glyph. Only set bits
    /// are drawn; the background is left alone.
    pub fn draw_glyph(&mut self, ch: char, x: i32, y: i32, color: Color) {
        let bitmap = font::glyph(ch);
        for (dy, bits) in bitmap.iter().enumerate() {
            if *bits == 0 {
                continue;
            }
            for dx in 0..GLYPH_WIDTH {
                if *bits & (0x80u8 >> dx) != 0 {
                    self.set_pixel(x.saturating_add(dx), y.saturating_add(dy as i32), color);
                }
            }
        }
    }

    /// Send the buffer to the panel
    ///
    /// Full frame: one transfer covering the whole panel. Line streamed:
    /// the cursor row, then the cursor moves down one row, wrapping to 0.
    pub fn present(&mut self) -> Result<(), DisplayError> {
        match self.policy {
            BufferingPolicy::FullFrame => {
                self.address(self.panel)?;
                self.bus.write_data(self.buffer)
            }
            BufferingPolicy::LineStreamed => {
                if let Some(row) = self.panel.row(self.cursor_row) {
                    self.address(row)?;
                    self.bus.write_data(self.buffer)?;
                }
                self.advance_cursor();
                Ok(())
            }
        }
    }

    /// Send only the pixels inside the current window
    ///
    /// In line-streamed mode this sends the part of the cursor row inside
    /// the window (if any) and advances the cursor like `present`.
    pub fn present_window(&mut self) -> Result<(), DisplayError> {
        let window = self.window;
        let stride = usize::from(self.width) * 2;
        let x0 = usize::from(window.x0) * 2;
        let x1 = (usize::from(window.x1) + 1) * 2;

        match self.policy {
            BufferingPolicy::FullFrame => {
                self.address(window)?;
                for y in window.y0..=window.y1 {
                    let start = usize::from(y) * stride;
                    if let Some(bytes) = self.buffer.get(start + x0..start + x1) {
                        self.bus.write_data(bytes)?;
                    }
                }
            }
            BufferingPolicy::LineStreamed => {
                if let Some(row) = window.row(self.cursor_row) {
                    self.address(row)?;
                    if let Some(bytes) = self.buffer.get(x0..x1) {
                        self.bus.write_data(bytes)?;
                    }
                }
                self.advance_cursor();
            }
        }
        Ok(())
    }

    fn advance_cursor(&mut self) {
        self.cursor_row = (self.cursor_row + 1) % self.height;
    }

    /// Draw a complete frame and send it to the panel
    ///
    /// `draw` must paint the whole frame each time it is called. It runs
    /// once in full-frame mode and once per row in line-streamed mode.
    pub fn render_frame<F>(&mut self, mut draw: F) -> Result<(), DisplayError>
    where
        F: FnMut(&mut Self),
    {
        match self.policy {
            BufferingPolicy::FullFrame => {
                draw(self);
                self.present()
            }
            BufferingPolicy::LineStreamed => {
                self.cursor_row = 0;
                for _ in 0..self.height {
                    draw(self);
                    self.present()?;
                }
                Ok(())
            }
        }
    }
}

impl<B: DisplayBus> Canvas for Display<'_, B> {
    fn size(&self) -> (u16, u16) {
        (self.width, self.height)
    }

    /// Fills the window, which is the whole panel unless narrowed
    fn clear(&mut self, color: Color) {
        self.fill_rect(0, 0, i32::from(self.width), i32::from(self.height), color);
    }

    fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: Color) {
        let Some(area) = Window::from_rect(Rect::new(x, y, w, h), self.width, self.height)
            .and_then(|area| self.writable(area))
        else {
            return;
        };

        let bytes = color.to_be_bytes();
        let span = usize::from(area.x0) * 2..(usize::from(area.x1) + 1) * 2;
        for y in area.y0..=area.y1 {
            if let Some(pixels) = self
                .row_mut(i32::from(y))
                .and_then(|row| row.get_mut(span.clone()))
            {
                for px in pixels.chunks_exact_mut(2) {
                    px.copy_from_slice(&bytes);
                }
            }
        }
    }

    fn draw_text(&mut self, text: &str, x: i32, y: i32, color: Color) {
        let width = i32::from(self.width);
        let mut gx = x;
        for ch in text.chars() {
            if gx >= width {
                break;
            }
            self.draw_glyph(ch, gx, y, color);
            gx = gx.saturating_add(GLYPH_WIDTH);
        }
    }

    /// Copy a raw big-endian RGB565 image, `w * 2` bytes per row
    ///
    /// An image shorter than `w * h * 2` bytes is rejected before anything
    /// is written, under either buffering policy. Only the rows the buffer
    /// holds are read. Pixels off the panel or outside the window are
    /// clipped.
    fn blit_raw(&mut self, data: &[u8], x: i32, y: i32, w: u16, h: u16) -> Result<(), DrawError> {
        let stride = usize::from(w) * 2;
        if data.len() < stride * usize::from(h) {
            #[cfg(feature = "defmt")]
            defmt::warn!("raw image short: {} of {} bytes", data.len(), stride * usize::from(h));
            return Err(DrawError::ResourceUnavailable);
        }

        let Some(area) = Window::from_rect(
            Rect::new(x, y, i32::from(w), i32::from(h)),
            self.width,
            self.height,
        )
        .and_then(|area| self.writable(area)) else {
            return Ok(());
        };

        for row in area.y0..=area.y1 {
            let start = (i32::from(row) - y) as usize * stride;
            if let Some(pixels) = data.get(start..start + stride) {
                self.copy_row(pixels, x, row, area);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::vec;
    use std::vec::Vec;
    use tinyarcade_core::traits::CanvasExt;

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Op {
        Reset(bool),
        Cmd(u8),
        Data(Vec<u8>),
        Delay(u32),
    }

    /// Bus that records every call, optionally failing on one command
    #[derive(Default)]
    struct RecordingBus {
        ops: Vec<Op>,
        fail_on: Option<u8>,
    }

    impl RecordingBus {
        /// Pixel payloads only (data following RAMWR)
        fn pixel_data(&self) -> Vec<u8> {
            let mut out = Vec::new();
            let mut in_write = false;
            for op in &self.ops {
                match op {
                    Op::Cmd(c) => in_write = *c == cmd::RAMWR,
                    Op::Data(d) if in_write => out.extend_from_slice(d),
                    _ => {}
                }
            }
            out
        }
    }

    impl DisplayBus for RecordingBus {
        fn set_reset(&mut self, high: bool) -> Result<(), DisplayError> {
            self.ops.push(Op::Reset(high));
            Ok(())
        }

        fn write_command(&mut self, command: u8) -> Result<(), DisplayError> {
            if self.fail_on == Some(command) {
                return Err(DisplayError::Bus);
            }
            self.ops.push(Op::Cmd(command));
            Ok(())
        }

        fn write_data(&mut self, data: &[u8]) -> Result<(), DisplayError> {
            self.ops.push(Op::Data(data.to_vec()));
            Ok(())
        }

        fn delay_ms(&mut self, ms: u32) {
            self.ops.push(Op::Delay(ms));
        }
    }

    const W: u16 = 16;
    const H: u16 = 8;

    fn panel(buffering: BufferingPolicy) -> PanelConfig {
        PanelConfig {
            width: W,
            height: H,
            buffering,
            spi_frequency_hz: 1_000_000,
        }
    }

    fn full(buf: &mut [u8]) -> Display<'_, RecordingBus> {
        Display::new(RecordingBus::default(), buf, &panel(BufferingPolicy::FullFrame)).unwrap()
    }

    fn line(buf: &mut [u8]) -> Display<'_, RecordingBus> {
        Display::new(RecordingBus::default(), buf, &panel(BufferingPolicy::LineStreamed)).unwrap()
    }

    fn pixel(d: &Display<'_, RecordingBus>, x: usize, y: usize) -> u16 {
        let i = (y * W as usize + x) * 2;
        u16::from_be_bytes([d.buffer[i], d.buffer[i + 1]])
    }

    #[test]
    fn test_init_sequence_bytes() {
        let mut buf = [0u8; 256];
        let mut d = full(&mut buf);
        d.initialize().unwrap();

        let expected = vec![
            Op::Reset(true),
            Op::Delay(100),
            Op::Reset(false),
            Op::Delay(100),
            Op::Reset(true),
            Op::Delay(100),
            Op::Cmd(0x36),
            Op::Data(vec![0x70]),
            Op::Cmd(0x3A),
            Op::Data(vec![0x05]),
            Op::Cmd(0xB2),
            Op::Data(vec![0x0C, 0x0C, 0x00, 0x33, 0x33]),
            Op::Cmd(0xB7),
            Op::Data(vec![0x35]),
            Op::Cmd(0xBB),
            Op::Data(vec![0x19]),
            Op::Cmd(0xC0),
            Op::Data(vec![0x2C]),
            Op::Cmd(0xC2),
            Op::Data(vec![0x01]),
            Op::Cmd(0xC3),
            Op::Data(vec![0x12]),
            Op::Cmd(0xC4),
            Op::Data(vec![0x20]),
            Op::Cmd(0xC6),
            Op::Data(vec![0x0F]),
            Op::Cmd(0xD0),
            Op::Data(vec![0xA4, 0xA1]),
            Op::Cmd(0xE0),
            Op::Data(vec![
                0xD0, 0x04, 0x0D, 0x11, 0x13, 0x2B, 0x3F, 0x54, 0x4C, 0x18, 0x0D, 0x0B, 0x1F,
                0x23,
            ]),
            Op::Cmd(0xE1),
            Op::Data(vec![
                0xD0, 0x04, 0x0C, 0x11, 0x13, 0x2C, 0x3F, 0x44, 0x51, 0x2F, 0x1F, 0x1F, 0x20,
                0x23,
            ]),
            Op::Cmd(0x21),
            Op::Cmd(0x11),
            Op::Delay(100),
            Op::Cmd(0x29),
            Op::Delay(100),
        ];
        assert_eq!(d.bus.ops, expected);
    }

    #[test]
    fn test_initialize_runs_once() {
        let mut buf = [0u8; 256];
        let mut d = full(&mut buf);
        d.initialize().unwrap();
        let sent = d.bus.ops.len();
        d.initialize().unwrap();
        assert_eq!(d.bus.ops.len(), sent);
        assert!(d.is_initialized());
    }

    #[test]
    fn test_init_failure_is_reported() {
        let mut buf = [0u8; 256];
        let bus = RecordingBus {
            fail_on: Some(cmd::SLPOUT),
            ..Default::default()
        };
        let mut d = Display::new(bus, &mut buf, &panel(BufferingPolicy::FullFrame)).unwrap();
        assert_eq!(d.initialize(), Err(DisplayError::InitFailed));
        assert!(!d.is_initialized());
    }

    #[test]
    fn test_buffer_size_checked() {
        let mut small = [0u8; 255];
        let result = Display::new(
            RecordingBus::default(),
            &mut small,
            &panel(BufferingPolicy::FullFrame),
        );
        assert!(matches!(result, Err(DisplayError::BufferSize)));

        // One line is enough for line streaming
        let mut one_line = [0u8; 32];
        assert!(Display::new(
            RecordingBus::default(),
            &mut one_line,
            &panel(BufferingPolicy::LineStreamed)
        )
        .is_ok());
    }

    #[test]
    fn test_full_frame_present() {
        let mut buf = [0u8; 256];
        let mut d = full(&mut buf);
        d.present().unwrap();

        assert_eq!(d.bus.ops[0], Op::Cmd(cmd::CASET));
        assert_eq!(d.bus.ops[1], Op::Data(vec![0x00, 0x00, 0x00, 0x0F]));
        assert_eq!(d.bus.ops[2], Op::Cmd(cmd::RASET));
        assert_eq!(d.bus.ops[3], Op::Data(vec![0x00, 0x00, 0x00, 0x07]));
        assert_eq!(d.bus.ops[4], Op::Cmd(cmd::RAMWR));
        assert_eq!(d.bus.ops[5], Op::Data(vec![0u8; 256]));
        assert_eq!(d.bus.ops.len(), 6);
    }

    #[test]
    fn test_present_is_idempotent() {
        let mut buf = [0u8; 256];
        let mut d = full(&mut buf);
        d.fill_rect(2, 2, 5, 3, Color::GREEN);
        d.draw_text("Hi", 0, 0, Color::WHITE);

        d.present().unwrap();
        let first = core::mem::take(&mut d.bus.ops);
        d.present().unwrap();
        assert_eq!(d.bus.ops, first);
    }

    #[test]
    fn test_fill_rect_clips_overflow() {
        let mut buf = [0u8; 256];
        let mut d = full(&mut buf);
        d.fill_rect(12, 6, i32::MAX, i32::MAX, Color::RED);

        for y in 0..H as usize {
            for x in 0..W as usize {
                let expected = if x >= 12 && y >= 6 { 0xF800 } else { 0 };
                assert_eq!(pixel(&d, x, y), expected, "pixel ({}, {})", x, y);
            }
        }
    }

    #[test]
    fn test_fill_rect_negative_origin() {
        let mut buf = [0u8; 256];
        let mut d = full(&mut buf);
        d.fill_rect(-5, -5, 7, 7, Color::BLUE);
        assert_eq!(pixel(&d, 0, 0), 0x001F);
        assert_eq!(pixel(&d, 1, 1), 0x001F);
        assert_eq!(pixel(&d, 2, 1), 0);
        assert_eq!(pixel(&d, 1, 2), 0);

        // Entirely off panel or empty: nothing drawn
        d.fill_rect(100, 0, 5, 5, Color::WHITE);
        d.fill_rect(0, 0, 0, 5, Color::WHITE);
        d.fill_rect(0, 0, -3, 5, Color::WHITE);
        assert_eq!(pixel(&d, 3, 3), 0);
    }

    #[test]
    fn test_set_window_clamps_and_ignores_empty() {
        let mut buf = [0u8; 256];
        let mut d = full(&mut buf);

        let w = d.set_window(-4, 2, 100, 5).unwrap();
        assert_eq!((w.x0, w.y0, w.x1, w.y1), (0, 2, 15, 5));

        // Zero-area requests leave the window alone
        assert_eq!(d.set_window(20, 0, 30, 4), None);
        assert_eq!(d.set_window(5, 5, 4, 4), None);
        assert_eq!(d.window(), w);

        d.present_window().unwrap();
        assert_eq!(d.bus.ops[3], Op::Data(vec![0x00, 0x02, 0x00, 0x05]));
        assert_eq!(d.bus.pixel_data().len(), 16 * 4 * 2);
    }

    #[test]
    fn test_window_restricts_writes() {
        let mut buf = [0u8; 256];
        let mut d = full(&mut buf);
        d.set_window(0, 0, 3, 3);

        d.fill_rect(8, 4, 2, 2, Color::RED);
        assert!(d.buffer.iter().all(|b| *b == 0));

        // Straddling the window edge: only the inside part lands
        d.fill_rect(2, 2, 4, 4, Color::RED);
        assert_eq!(pixel(&d, 2, 2), 0xF800);
        assert_eq!(pixel(&d, 3, 3), 0xF800);
        assert_eq!(pixel(&d, 4, 3), 0);
        assert_eq!(pixel(&d, 3, 4), 0);

        d.set_pixel(5, 0, Color::BLUE);
        assert_eq!(pixel(&d, 5, 0), 0);
        d.draw_text("W", 0, 4, Color::WHITE);
        assert!(d.buffer[4 * W as usize * 2..].iter().all(|b| *b == 0));

        let image = [0x12u8; 6 * 2 * 2];
        Canvas::blit_raw(&mut d, &image, 1, 0, 6, 2).unwrap();
        assert_eq!(pixel(&d, 3, 1), 0x1212);
        assert_eq!(pixel(&d, 4, 1), 0);

        d.clear(Color::GREEN);
        assert_eq!(pixel(&d, 0, 0), 0x07E0);
        assert_eq!(pixel(&d, 3, 3), 0x07E0);
        assert_eq!(pixel(&d, 4, 0), 0);
        assert_eq!(pixel(&d, 15, 7), 0);
    }

    #[test]
    fn test_window_restricts_line_writes() {
        let mut buf = [0u8; 32];
        let mut d = line(&mut buf);
        d.set_window(0, 0, 3, 3);

        d.fill_rect(0, 0, 16, 8, Color::RED);
        assert!(d.buffer[..8].chunks(2).all(|px| px == [0xF8, 0x00]));
        assert!(d.buffer[8..].iter().all(|b| *b == 0));
    }

    #[test]
    fn test_present_window_sends_only_window() {
        let mut buf = [0u8; 256];
        let mut d = full(&mut buf);
        d.fill_rect(0, 0, 16, 8, Color::WHITE);
        d.fill_rect(4, 2, 2, 2, Color::RED);
        d.set_window(4, 2, 5, 3);
        d.present_window().unwrap();

        assert_eq!(d.bus.ops[1], Op::Data(vec![0x00, 0x04, 0x00, 0x05]));
        assert_eq!(d.bus.ops[3], Op::Data(vec![0x00, 0x02, 0x00, 0x03]));
        assert_eq!(d.bus.pixel_data(), vec![0xF8, 0x00, 0xF8, 0x00, 0xF8, 0x00, 0xF8, 0x00]);
    }

    #[test]
    fn test_line_present_advances_and_wraps() {
        let mut buf = [0u8; 32];
        let mut d = line(&mut buf);
        assert_eq!(d.cursor_row(), 0);

        d.present().unwrap();
        assert_eq!(d.bus.ops[3], Op::Data(vec![0x00, 0x00, 0x00, 0x00]));
        assert_eq!(d.bus.ops[5].clone(), Op::Data(vec![0u8; 32]));
        assert_eq!(d.cursor_row(), 1);

        for _ in 1..H {
            d.present().unwrap();
        }
        assert_eq!(d.cursor_row(), 0);
        // Last present addressed row 7
        let raset: Vec<_> = d
            .bus
            .ops
            .iter()
            .filter_map(|op| match op {
                Op::Data(d) if d.len() == 4 && d[0] == 0 && d[2] == 0 && d[1] == d[3] => Some(d[1]),
                _ => None,
            })
            .collect();
        assert!(raset.contains(&7));
    }

    #[test]
    fn test_line_primitives_touch_only_cursor_row() {
        let mut buf = [0u8; 32];
        let mut d = line(&mut buf);
        d.present().unwrap();
        d.present().unwrap();
        assert_eq!(d.cursor_row(), 2);

        d.fill_rect(0, 0, 4, 2, Color::RED);
        assert!(d.buffer.iter().all(|b| *b == 0));

        d.fill_rect(1, 0, 2, 8, Color::RED);
        assert_eq!(&d.buffer[..6], &[0, 0, 0xF8, 0x00, 0xF8, 0x00]);
        assert_eq!(&d.buffer[6..8], &[0, 0]);
    }

    #[test]
    fn test_render_frame_same_pixels_both_policies() {
        fn scene<C: Canvas>(c: &mut C) {
            c.clear(Color::BLACK);
            c.fill_rect(3, 1, 6, 5, Color::GREEN);
            c.draw_rect(0, 0, 16, 8, Color::RED);
            c.draw_text("A?", 1, 0, Color::WHITE);
        }

        let mut fbuf = [0u8; 256];
        let mut f = full(&mut fbuf);
        f.render_frame(|d| scene(d)).unwrap();

        let mut lbuf = [0u8; 32];
        let mut l = line(&mut lbuf);
        l.render_frame(|d| scene(d)).unwrap();

        assert_eq!(l.bus.pixel_data(), f.bus.pixel_data());
        assert_eq!(l.cursor_row(), 0);
    }

    #[test]
    fn test_unknown_glyph_draws_fallback() {
        let mut a = [0u8; 256];
        let mut b = [0u8; 256];
        let mut da = full(&mut a);
        let mut db = full(&mut b);
        da.draw_glyph('\u{2603}', 0, 0, Color::WHITE);
        db.draw_glyph('?', 0, 0, Color::WHITE);
        assert_eq!(da.buffer, db.buffer);
        assert!(da.buffer.iter().any(|b| *b != 0));
    }

    #[test]
    fn test_text_clipped_at_edge() {
        let mut buf = [0u8; 256];
        let mut d = full(&mut buf);
        d.draw_text("WWWWWWWW", 10, 4, Color::WHITE);
        d.draw_text("x", -6, -6, Color::WHITE);
        d.draw_text("y", i32::MAX - 2, i32::MAX - 2, Color::WHITE);
    }

    #[test]
    fn test_blit_raw_places_pixels() {
        let mut buf = [0u8; 256];
        let mut d = full(&mut buf);
        let image: [u8; 8] = [0x11, 0x11, 0x22, 0x22, 0x33, 0x33, 0x44, 0x44];
        Canvas::blit_raw(&mut d, &image, 14, 6, 2, 2).unwrap();
        assert_eq!(pixel(&d, 14, 6), 0x1111);
        assert_eq!(pixel(&d, 15, 6), 0x2222);
        assert_eq!(pixel(&d, 14, 7), 0x3333);
        assert_eq!(pixel(&d, 15, 7), 0x4444);
    }

    #[test]
    fn test_blit_raw_clips_left() {
        let mut buf = [0u8; 256];
        let mut d = full(&mut buf);
        let image: [u8; 6] = [0xAA, 0xAA, 0xBB, 0xBB, 0xCC, 0xCC];
        Canvas::blit_raw(&mut d, &image, -2, 0, 3, 1).unwrap();
        assert_eq!(pixel(&d, 0, 0), 0xCCCC);
        assert_eq!(pixel(&d, 1, 0), 0);
    }

    #[test]
    fn test_blit_raw_short_source() {
        let mut buf = [0u8; 256];
        let mut d = full(&mut buf);
        // Two full rows and half of the third
        let image = [0xFFu8; 4 * 2 * 2 + 4];
        let result = Canvas::blit_raw(&mut d, &image, 0, 0, 4, 3);
        assert_eq!(result, Err(DrawError::ResourceUnavailable));
        // Rejected before any row is written
        assert!(d.buffer.iter().all(|b| *b == 0));
        assert!(d.bus.ops.is_empty());
    }

    #[test]
    fn test_blit_raw_line_mode_uses_cursor_row() {
        let mut buf = [0u8; 32];
        let mut d = line(&mut buf);
        d.present().unwrap();
        assert_eq!(d.cursor_row(), 1);

        // Row 0 = 0x0101, row 1 = 0x0202
        let image = [0x01u8, 0x01, 0x02, 0x02];
        Canvas::blit_raw(&mut d, &image, 0, 0, 1, 2).unwrap();
        assert_eq!(&d.buffer[..2], &[0x02, 0x02]);

        // Short even though the cursor row's bytes are present
        let mut d2buf = [0u8; 32];
        let mut d2 = line(&mut d2buf);
        let result = Canvas::blit_raw(&mut d2, &image[..2], 0, 0, 1, 2);
        assert_eq!(result, Err(DrawError::ResourceUnavailable));
        assert_eq!(&d2.buffer[..2], &[0, 0]);
    }

    #[test]
    fn test_short_asset_same_pixels_both_policies() {
        // Declared 16x8 but only four rows long
        let short = [0x12u8; 16 * 4 * 2];
        let assets: [(&str, &[u8]); 1] = [("splash", &short)];

        let mut fbuf = [0u8; 256];
        let mut f = full(&mut fbuf);
        let mut full_drawn = vec![];
        f.render_frame(|d| {
            full_drawn.push(d.draw_asset_or_placeholder(&assets[..], "splash", 0, 0, 16, 8))
        })
        .unwrap();

        let mut lbuf = [0u8; 32];
        let mut l = line(&mut lbuf);
        let mut line_drawn = vec![];
        l.render_frame(|d| {
            line_drawn.push(d.draw_asset_or_placeholder(&assets[..], "splash", 0, 0, 16, 8))
        })
        .unwrap();

        assert_eq!(full_drawn, vec![false]);
        assert_eq!(line_drawn, vec![false; H as usize]);
        assert_eq!(l.bus.pixel_data(), f.bus.pixel_data());
        // Placeholder box, not image rows
        assert_eq!(pixel(&f, 1, 1), 0xFFFF);
        assert_eq!(pixel(&f, 0, 1), 0xF800);
    }

    #[test]
    fn test_placeholder_on_missing_asset() {
        let mut buf = [0u8; 256];
        let mut d = full(&mut buf);
        let drawn = d.draw_asset_or_placeholder(&tinyarcade_core::traits::NoAssets, "icon", 0, 0, 16, 8);
        assert!(!drawn);
        // Red outline at the corner
        assert_eq!(pixel(&d, 0, 0), 0xF800);
        assert_eq!(pixel(&d, 15, 7), 0xF800);
    }
}
