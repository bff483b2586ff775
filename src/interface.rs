//! The bus abstraction the panel driver talks through.
//!
//! The RM690B0 has no D/C line. Every transaction is framed by chip-select, and the first byte
//! of a frame tells the controller whether the frame is a register write (`0x02`) or a pixel
//! stream (`0x32`). Header and parameter bytes go through `write_command`, pixel bytes through
//! `write_data`, so a quad-capable host can clock the latter over all four lanes.

use core::fmt::Debug;

use hal::blocking::delay::DelayMs;

pub trait DisplayInterface {
    type Error: Debug;

    /// Assert chip-select, opening a frame.
    fn select(&mut self) -> Result<(), Self::Error>;

    /// Release chip-select, closing the frame.
    fn deselect(&mut self) -> Result<(), Self::Error>;

    /// Send header or parameter bytes on the command lane.
    fn write_command(&mut self, bytes: &[u8]) -> Result<(), Self::Error>;

    /// Send pixel bytes.
    fn write_data(&mut self, buf: &[u8]) -> Result<(), Self::Error>;

    /// Send `count` copies of the pixel `raw` (1 to 4 bytes).
    fn write_data_repeat(&mut self, raw: &[u8], count: u32) -> Result<(), Self::Error> {
        if raw.is_empty() || raw.len() > 4 {
            return Ok(());
        }
        // 48 is a multiple of every supported pixel width.
        let mut buf = [0u8; 48];
        let per_chunk = buf.len() / raw.len();
        for px in buf.chunks_exact_mut(raw.len()) {
            px.copy_from_slice(raw);
        }
        let mut remaining = count as usize;
        while remaining > 0 {
            let n = remaining.min(per_chunk);
            self.write_data(&buf[..n * raw.len()])?;
            remaining -= n;
        }
        Ok(())
    }

    /// Poll for completion of any outstanding transfer.
    fn flush(&mut self) -> nb::Result<(), Self::Error> {
        Ok(())
    }

    fn begin_transaction(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn end_transaction(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Queue pixel bytes for a DMA transfer. Implementations without DMA write them directly.
    fn add_dma_queue(&mut self, buf: &[u8]) -> Result<(), Self::Error> {
        self.write_data(buf)
    }

    /// Start the transfers queued by `add_dma_queue`.
    fn exec_dma_queue(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Pulse the controller's reset line, if the interface owns one.
    fn reset<D: DelayMs<u8>>(&mut self, _delay: &mut D) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Errors raised by `spi::SpiInterface`.
#[derive(Debug)]
pub enum InterfaceError<SpiE, PinE> {
    /// The SPI peripheral failed to write.
    Spi(SpiE),
    /// Driving the chip-select or reset pin failed.
    Pin(PinE),
}

impl<SpiE: Debug, PinE: Debug> core::fmt::Display for InterfaceError<SpiE, PinE> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            InterfaceError::Spi(e) => write!(f, "SPI error: {:?}", e),
            InterfaceError::Pin(e) => write!(f, "Pin error: {:?}", e),
        }
    }
}

#[cfg(feature = "std")]
impl<SpiE: Debug, PinE: Debug> std::error::Error for InterfaceError<SpiE, PinE> {}

pub mod spi {
    //! A `DisplayInterface` over a plain embedded-hal blocking SPI master with a GPIO
    //! chip-select. Every byte is clocked on whichever lanes the SPI peripheral was configured
    //! for; hosts with a real quad peripheral can implement `DisplayInterface` directly to put
    //! pixel data on all four lanes.

    use core::fmt::Debug;

    use hal::blocking::delay::DelayMs;
    use hal::blocking::spi::Write;
    use hal::digital::v2::OutputPin;

    use super::{DisplayInterface, InterfaceError};

    pub struct SpiInterface<SPI, CS, RST> {
        /// The SPI master connected to the RM690B0.
        spi: SPI,
        /// Chip-select, active low.
        cs: CS,
        /// Reset, active low. Boards that tie reset to a supervisor pass `None`.
        rst: Option<RST>,
    }

    impl<SPI, CS, RST, PinE> SpiInterface<SPI, CS, RST>
    where
        SPI: Write<u8>,
        CS: OutputPin<Error = PinE>,
        RST: OutputPin<Error = PinE>,
    {
        /// Create a new interface from the SPI master `spi`, the chip-select pin `cs` and an
        /// optional reset pin `rst`.
        pub fn new(spi: SPI, cs: CS, rst: Option<RST>) -> Self {
            Self { spi, cs, rst }
        }

        /// Tear the interface down, handing back the peripherals.
        pub fn release(self) -> (SPI, CS, Option<RST>) {
            (self.spi, self.cs, self.rst)
        }
    }

    impl<SPI, CS, RST, PinE> DisplayInterface for SpiInterface<SPI, CS, RST>
    where
        SPI: Write<u8>,
        SPI::Error: Debug,
        CS: OutputPin<Error = PinE>,
        RST: OutputPin<Error = PinE>,
        PinE: Debug,
    {
        type Error = InterfaceError<SPI::Error, PinE>;

        fn select(&mut self) -> Result<(), Self::Error> {
            self.cs.set_low().map_err(InterfaceError::Pin)
        }

        fn deselect(&mut self) -> Result<(), Self::Error> {
            self.cs.set_high().map_err(InterfaceError::Pin)
        }

        fn write_command(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
            self.spi.write(bytes).map_err(InterfaceError::Spi)
        }

        fn write_data(&mut self, buf: &[u8]) -> Result<(), Self::Error> {
            self.spi.write(buf).map_err(InterfaceError::Spi)
        }

        fn reset<D: DelayMs<u8>>(&mut self, delay: &mut D) -> Result<(), Self::Error> {
            if let Some(rst) = self.rst.as_mut() {
                rst.set_high().map_err(InterfaceError::Pin)?;
                delay.delay_ms(64);
                rst.set_low().map_err(InterfaceError::Pin)?;
                delay.delay_ms(4);
                rst.set_high().map_err(InterfaceError::Pin)?;
                delay.delay_ms(64);
            }
            Ok(())
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use std::cell::RefCell;
        use std::rc::Rc;
        use std::vec::Vec;

        #[derive(Clone, Debug, PartialEq)]
        enum Wire {
            Spi(Vec<u8>),
            Cs(bool),
            Rst(bool),
            Delay(u8),
        }

        type Log = Rc<RefCell<Vec<Wire>>>;

        struct MockSpi(Log);
        struct MockPin(Log, fn(bool) -> Wire);
        struct MockDelay(Log);

        impl Write<u8> for MockSpi {
            type Error = ();
            fn write(&mut self, words: &[u8]) -> Result<(), ()> {
                self.0.borrow_mut().push(Wire::Spi(words.to_vec()));
                Ok(())
            }
        }

        impl OutputPin for MockPin {
            type Error = ();
            fn set_low(&mut self) -> Result<(), ()> {
                self.0.borrow_mut().push((self.1)(false));
                Ok(())
            }
            fn set_high(&mut self) -> Result<(), ()> {
                self.0.borrow_mut().push((self.1)(true));
                Ok(())
            }
        }

        impl DelayMs<u8> for MockDelay {
            fn delay_ms(&mut self, ms: u8) {
                self.0.borrow_mut().push(Wire::Delay(ms));
            }
        }

        fn build(log: &Log, with_reset: bool) -> SpiInterface<MockSpi, MockPin, MockPin> {
            let rst = if with_reset {
                Some(MockPin(log.clone(), Wire::Rst))
            } else {
                None
            };
            SpiInterface::new(MockSpi(log.clone()), MockPin(log.clone(), Wire::Cs), rst)
        }

        #[test]
        fn frame_drives_cs_around_writes() {
            let log: Log = Rc::new(RefCell::new(Vec::new()));
            let mut iface = build(&log, false);
            iface.select().unwrap();
            iface.write_command(&[0x02, 0x00, 0x11, 0x00]).unwrap();
            iface.write_data(&[0xAA, 0x55]).unwrap();
            iface.deselect().unwrap();
            assert_eq!(
                &log.borrow()[..],
                &[
                    Wire::Cs(false),
                    Wire::Spi(vec![0x02, 0x00, 0x11, 0x00]),
                    Wire::Spi(vec![0xAA, 0x55]),
                    Wire::Cs(true),
                ]
            );
        }

        #[test]
        fn reset_pulses_pin() {
            let log: Log = Rc::new(RefCell::new(Vec::new()));
            let mut iface = build(&log, true);
            let mut delay = MockDelay(log.clone());
            iface.reset(&mut delay).unwrap();
            assert_eq!(
                &log.borrow()[..],
                &[
                    Wire::Rst(true),
                    Wire::Delay(64),
                    Wire::Rst(false),
                    Wire::Delay(4),
                    Wire::Rst(true),
                    Wire::Delay(64),
                ]
            );
        }

        #[test]
        fn reset_without_pin_is_silent() {
            let log: Log = Rc::new(RefCell::new(Vec::new()));
            let mut iface = build(&log, false);
            let mut delay = MockDelay(log.clone());
            iface.reset(&mut delay).unwrap();
            assert!(log.borrow().is_empty());
        }

        #[test]
        fn repeat_splits_into_chunks() {
            let log: Log = Rc::new(RefCell::new(Vec::new()));
            let mut iface = build(&log, false);
            iface.write_data_repeat(&[0x12, 0x34, 0x56], 20).unwrap();
            let log = log.borrow();
            assert_eq!(log.len(), 2);
            match (&log[0], &log[1]) {
                (Wire::Spi(a), Wire::Spi(b)) => {
                    assert_eq!(a.len(), 48);
                    assert_eq!(b.len(), 12);
                    assert!(a.chunks(3).chain(b.chunks(3)).all(|px| px == [0x12, 0x34, 0x56]));
                }
                other => panic!("unexpected writes {:?}", other),
            }
        }
    }
}
