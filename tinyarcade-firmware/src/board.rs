//! Board wiring and device constants
//!
//! The constants and `take_board_io` are generated by build.rs from
//! device.toml.

use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::peripherals::SPI1;
use embassy_rp::spi::{self, Blocking, Spi};
use embassy_rp::Peripherals;

use tinyarcade_core::config::{
    BufferingPolicy, DeviceConfig, GameConfig, InputConfig, MenuConfig, PanelConfig, TimingConfig,
};
use tinyarcade_drivers::input::LinePins;

/// Peripherals claimed for the panel, backlight and input lines
pub struct BoardIo {
    pub spi: Spi<'static, SPI1, Blocking>,
    pub cs: Output<'static>,
    pub dc: Output<'static>,
    pub rst: Output<'static>,
    pub backlight: Output<'static>,
    pub lines: LinePins<Input<'static>>,
}

include!(concat!(env!("OUT_DIR"), "/board.rs"));
