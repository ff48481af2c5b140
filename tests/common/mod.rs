//! Simulated MAX31855 for host tests.
//!
//! One `SimChip` backs both a hardware `SpiDevice` and three bit-bang GPIOs,
//! so the two transports can be driven from the exact same conversion word.
#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{self, ErrorType as PinErrorType, InputPin, OutputPin};
use embedded_hal::spi::{self, Operation, SpiDevice};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimError;

impl digital::Error for SimError {
    fn kind(&self) -> digital::ErrorKind {
        digital::ErrorKind::Other
    }
}

impl spi::Error for SimError {
    fn kind(&self) -> spi::ErrorKind {
        spi::ErrorKind::Other
    }
}

#[derive(Debug, Default)]
pub struct SimChip {
    /// Word returned by the next conversion
    pub word: u32,
    /// Number of framed reads (CS falling edges / SPI transactions)
    pub acquisitions: usize,
    /// Fail every MISO read after this many bits
    pub fail_after_bits: Option<u32>,
    selected: bool,
    sck_high: bool,
    bit: u32,
    bits_read: u32,
    cs_log: Vec<bool>,
    delay_ns: u64,
}

impl SimChip {
    pub fn is_selected(&self) -> bool {
        self.selected
    }

    /// Chip select levels written, oldest first (`true` = high)
    pub fn cs_log(&self) -> &[bool] {
        &self.cs_log
    }

    pub fn total_delay_ns(&self) -> u64 {
        self.delay_ns
    }

    fn select(&mut self, low: bool) {
        self.cs_log.push(!low);
        if low && !self.selected {
            self.acquisitions += 1;
            self.bit = 31;
            self.bits_read = 0;
        }
        self.selected = low;
    }

    fn clock(&mut self, high: bool) {
        // Falling edge shifts out the next bit
        if self.selected && self.sck_high && !high {
            self.bit = self.bit.wrapping_sub(1);
        }
        self.sck_high = high;
    }

    fn sample_miso(&mut self) -> Result<bool, SimError> {
        if let Some(limit) = self.fail_after_bits {
            if self.bits_read >= limit {
                return Err(SimError);
            }
        }
        self.bits_read += 1;
        if !self.selected || self.bit > 31 {
            // SO is high impedance; the pull-up reads high
            return Ok(true);
        }
        Ok((self.word >> self.bit) & 1 == 1)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Sim(Rc<RefCell<SimChip>>);

impl Sim {
    pub fn new(word: u32) -> Self {
        let sim = Self::default();
        sim.set_word(word);
        sim
    }

    pub fn set_word(&self, word: u32) {
        self.0.borrow_mut().word = word;
    }

    pub fn chip(&self) -> std::cell::Ref<'_, SimChip> {
        self.0.borrow()
    }

    pub fn chip_mut(&self) -> std::cell::RefMut<'_, SimChip> {
        self.0.borrow_mut()
    }

    pub fn acquisitions(&self) -> usize {
        self.0.borrow().acquisitions
    }

    pub fn sck(&self) -> SimSck {
        SimSck(self.clone())
    }

    pub fn cs(&self) -> SimCs {
        SimCs(self.clone())
    }

    pub fn miso(&self) -> SimMiso {
        SimMiso(self.clone())
    }

    pub fn delay(&self) -> SimDelay {
        SimDelay(self.clone())
    }

    pub fn spi(&self) -> SimSpi {
        SimSpi(self.clone())
    }
}

pub struct SimSck(Sim);
pub struct SimCs(Sim);
pub struct SimMiso(Sim);
pub struct SimDelay(Sim);
pub struct SimSpi(Sim);

impl PinErrorType for SimSck {
    type Error = SimError;
}

impl OutputPin for SimSck {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.0.chip_mut().clock(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.0.chip_mut().clock(true);
        Ok(())
    }
}

impl PinErrorType for SimCs {
    type Error = SimError;
}

impl OutputPin for SimCs {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.0.chip_mut().select(true);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.0.chip_mut().select(false);
        Ok(())
    }
}

impl PinErrorType for SimMiso {
    type Error = SimError;
}

impl InputPin for SimMiso {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        self.0.chip_mut().sample_miso()
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        self.is_high().map(|high| !high)
    }
}

impl DelayNs for SimDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.0.chip_mut().delay_ns += u64::from(ns);
    }
}

impl spi::ErrorType for SimSpi {
    type Error = SimError;
}

impl SpiDevice for SimSpi {
    fn transaction(&mut self, operations: &mut [Operation<'_, u8>]) -> Result<(), Self::Error> {
        let mut chip = self.0.chip_mut();
        chip.select(true);

        let bytes = chip.word.to_be_bytes();
        let mut offset = 0;
        for op in operations.iter_mut() {
            if let Operation::Read(buffer) = op {
                for byte in buffer.iter_mut() {
                    *byte = bytes.get(offset).copied().unwrap_or(0xFF);
                    offset += 1;
                }
            }
        }

        chip.select(false);
        Ok(())
    }
}
