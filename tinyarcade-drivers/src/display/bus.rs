//! Panel bus transport
//!
//! The panel takes two kinds of bytes on one serial line: commands (DC
//! low) and their parameter or pixel data (DC high). The driver only ever
//! talks to the panel through this trait.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiDevice;

use super::DisplayError;

/// Command/data byte transport to the panel controller
pub trait DisplayBus {
    /// Drive the controller's reset line (`true` = released)
    fn set_reset(&mut self, high: bool) -> Result<(), DisplayError>;

    /// Send one command byte
    fn write_command(&mut self, command: u8) -> Result<(), DisplayError>;

    /// Send parameter or pixel bytes for the last command
    fn write_data(&mut self, data: &[u8]) -> Result<(), DisplayError>;

    /// Block for `ms` milliseconds
    fn delay_ms(&mut self, ms: u32);
}

/// 4-wire SPI transport: SPI device plus data/command and reset pins
///
/// Chip select is owned by the `SpiDevice`.
pub struct SpiDisplayBus<SPI, DC, RST, D> {
    spi: SPI,
    dc: DC,
    rst: RST,
    delay: D,
}

impl<SPI, DC, RST, D> SpiDisplayBus<SPI, DC, RST, D>
where
    SPI: SpiDevice,
    DC: OutputPin,
    RST: OutputPin,
    D: DelayNs,
{
    pub fn new(spi: SPI, dc: DC, rst: RST, delay: D) -> Self {
        Self {
            spi,
            dc,
            rst,
            delay,
        }
    }

    /// Give the peripherals back
    pub fn release(self) -> (SPI, DC, RST, D) {
        (self.spi, self.dc, self.rst, self.delay)
    }
}

impl<SPI, DC, RST, D> DisplayBus for SpiDisplayBus<SPI, DC, RST, D>
where
    SPI: SpiDevice,
    DC: OutputPin,
    RST: OutputPin,
    D: DelayNs,
{
    fn set_reset(&mut self, high: bool) -> Result<(), DisplayError> {
        if high {
            self.rst.set_high().map_err(|_| DisplayError::Bus)
        } else {
            self.rst.set_low().map_err(|_| DisplayError::Bus)
        }
    }

    fn write_command(&mut self, command: u8) -> Result<(), DisplayError> {
        self.dc.set_low().map_err(|_| DisplayError::Bus)?;
        self.spi.write(&[command]).map_err(|_| DisplayError::Bus)
    }

    fn write_data(&mut self, data: &[u8]) -> Result<(), DisplayError> {
        self.dc.set_high().map_err(|_| DisplayError::Bus)?;
        self.spi.write(data).map_err(|_| DisplayError::Bus)
    }

    fn delay_ms(&mut self, ms: u32) {
        self.delay.delay_ms(ms);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;
    use embedded_hal::digital::ErrorType as PinErrorType;
    use embedded_hal::spi::{ErrorKind, ErrorType as SpiErrorType, Operation};
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::vec::Vec;

    /// Wire-level event seen by the mocks
    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Wire {
        Dc(bool),
        Rst(bool),
        Bytes(Vec<u8>),
        Delay(u32),
    }

    type Log = Rc<RefCell<Vec<Wire>>>;

    struct MockSpi {
        log: Log,
        fail: bool,
    }

    impl SpiErrorType for MockSpi {
        type Error = ErrorKind;
    }

    impl SpiDevice for MockSpi {
        fn transaction(&mut self, operations: &mut [Operation<'_, u8>]) -> Result<(), ErrorKind> {
            if self.fail {
                return Err(ErrorKind::Other);
            }
            for op in operations {
                if let Operation::Write(bytes) = op {
                    self.log.borrow_mut().push(Wire::Bytes(bytes.to_vec()));
                }
            }
            Ok(())
        }
    }

    struct MockPin {
        log: Log,
        is_dc: bool,
    }

    impl PinErrorType for MockPin {
        type Error = Infallible;
    }

    impl OutputPin for MockPin {
        fn set_low(&mut self) -> Result<(), Infallible> {
            let event = if self.is_dc { Wire::Dc(false) } else { Wire::Rst(false) };
            self.log.borrow_mut().push(event);
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Infallible> {
            let event = if self.is_dc { Wire::Dc(true) } else { Wire::Rst(true) };
            self.log.borrow_mut().push(event);
            Ok(())
        }
    }

    struct MockDelay {
        log: Log,
    }

    impl DelayNs for MockDelay {
        fn delay_ns(&mut self, ns: u32) {
            self.log.borrow_mut().push(Wire::Delay(ns / 1_000_000));
        }

        fn delay_ms(&mut self, ms: u32) {
            self.log.borrow_mut().push(Wire::Delay(ms));
        }
    }

    fn bus(fail: bool) -> (SpiDisplayBus<MockSpi, MockPin, MockPin, MockDelay>, Log) {
        let log: Log = Rc::new(RefCell::new(Vec::new()));
        let bus = SpiDisplayBus::new(
            MockSpi { log: log.clone(), fail },
            MockPin { log: log.clone(), is_dc: true },
            MockPin { log: log.clone(), is_dc: false },
            MockDelay { log: log.clone() },
        );
        (bus, log)
    }

    #[test]
    fn test_command_drives_dc_low() {
        let (mut bus, log) = bus(false);
        bus.write_command(0x2A).unwrap();
        assert_eq!(
            *log.borrow(),
            vec![Wire::Dc(false), Wire::Bytes(vec![0x2A])]
        );
    }

    #[test]
    fn test_data_drives_dc_high() {
        let (mut bus, log) = bus(false);
        bus.write_data(&[0x00, 0xEF]).unwrap();
        assert_eq!(
            *log.borrow(),
            vec![Wire::Dc(true), Wire::Bytes(vec![0x00, 0xEF])]
        );
    }

    #[test]
    fn test_reset_and_delay() {
        let (mut bus, log) = bus(false);
        bus.set_reset(false).unwrap();
        bus.delay_ms(100);
        bus.set_reset(true).unwrap();
        assert_eq!(
            *log.borrow(),
            vec![Wire::Rst(false), Wire::Delay(100), Wire::Rst(true)]
        );
    }

    #[test]
    fn test_spi_error_maps_to_bus() {
        let (mut bus, _log) = bus(true);
        assert_eq!(bus.write_command(0x29), Err(DisplayError::Bus));
        assert_eq!(bus.write_data(&[1]), Err(DisplayError::Bus));
    }
}
