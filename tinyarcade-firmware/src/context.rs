//! Device context
//!
//! Everything the application loop owns after bring-up, with the concrete
//! peripheral types spelled out once.

use embassy_rp::gpio::{Input, Output};
use embassy_rp::peripherals::SPI1;
use embassy_rp::spi::{Blocking, Spi};
use embassy_time::Delay;
use embedded_hal_bus::spi::{ExclusiveDevice, NoDelay};

use tinyarcade_drivers::display::{Display, SpiDisplayBus};
use tinyarcade_drivers::input::LineReader;

/// Panel SPI with its chip select
pub type PanelSpi = ExclusiveDevice<Spi<'static, SPI1, Blocking>, Output<'static>, NoDelay>;

/// Panel transport: SPI, data/command pin, reset pin
pub type PanelBus = SpiDisplayBus<PanelSpi, Output<'static>, Output<'static>, Delay>;

/// Initialized hardware handed to the application task
pub struct DeviceContext {
    pub display: Display<'static, PanelBus>,
    pub lines: LineReader<Input<'static>>,
    pub backlight: Output<'static>,
}
