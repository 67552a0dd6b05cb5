//! tinyarcade - Handheld Arcade Firmware
//!
//! Main firmware binary for an RP2040 board with a 240x240 ST7789 panel,
//! a five-way joystick and four face buttons. Boots to a splash image,
//! then an icon menu from which the obstacle game is started.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::spi;
use embassy_time::{Delay, Instant};
use embedded_hal_bus::spi::ExclusiveDevice;
use static_cell::ConstStaticCell;
use {defmt_rtt as _, panic_probe as _};

use tinyarcade_drivers::display::{Display, SpiDisplayBus};
use tinyarcade_drivers::input::LineReader;

use crate::board::{BUFFER_LEN, DEVICE_CONFIG};
use crate::context::DeviceContext;

mod assets;
mod board;
mod context;
mod tasks;

// Pixel buffer, sized for the buffering policy in device.toml.
// Zero-initialized in .bss so the frame never passes through the stack.
static FRAME_BUFFER: ConstStaticCell<[u8; BUFFER_LEN]> = ConstStaticCell::new([0; BUFFER_LEN]);

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("tinyarcade firmware starting...");

    // Initialize RP2040 peripherals
    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let config = DEVICE_CONFIG;

    // Panel is driven in SPI mode 3
    let mut spi_config = spi::Config::default();
    spi_config.frequency = config.panel.spi_frequency_hz;
    spi_config.polarity = spi::Polarity::IdleHigh;
    spi_config.phase = spi::Phase::CaptureOnSecondTransition;

    let io = board::take_board_io(p, spi_config);
    info!(
        "Panel on SPI1: SCK=GPIO{}, MOSI=GPIO{}, CS=GPIO{}, DC=GPIO{}, RST=GPIO{}, BL=GPIO{}",
        board::PIN_SCK,
        board::PIN_MOSI,
        board::PIN_CS,
        board::PIN_DC,
        board::PIN_RST,
        board::PIN_BACKLIGHT
    );
    info!(
        "Lines: up={} down={} left={} right={} select={} a={} b={} x={} y={}",
        board::PIN_UP,
        board::PIN_DOWN,
        board::PIN_LEFT,
        board::PIN_RIGHT,
        board::PIN_SELECT,
        board::PIN_A,
        board::PIN_B,
        board::PIN_X,
        board::PIN_Y
    );

    let spi = unwrap!(ExclusiveDevice::new_no_delay(io.spi, io.cs));
    let bus = SpiDisplayBus::new(spi, io.dc, io.rst, Delay);

    let buffer = FRAME_BUFFER.take();
    let mut display = match Display::new(bus, buffer, &config.panel) {
        Ok(display) => display,
        Err(e) => {
            error!("Display buffer rejected: {}", e);
            halt();
        }
    };

    if let Err(e) = display.initialize() {
        // No recovery from a panel that refuses bring-up
        error!("Display initialization failed: {}", e);
        halt();
    }
    info!(
        "Display initialized: {}x{}, {}",
        config.panel.width,
        config.panel.height,
        display.policy()
    );

    let mut backlight = io.backlight;
    backlight.set_high();

    let lines = LineReader::new(io.lines, config.input.active_low);

    let ctx = DeviceContext {
        display,
        lines,
        backlight,
    };

    // Bring-up time varies with the panel reset and SPI clock
    let seed = Instant::now().as_ticks() as u32;

    unwrap!(spawner.spawn(tasks::app_task(ctx, seed)));
    info!("App task spawned, firmware running");
}

/// Stop here after a fatal error; the debugger still sees the log
fn halt() -> ! {
    loop {
        cortex_m::asm::wfi();
    }
}
