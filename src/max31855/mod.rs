pub mod decode;
pub mod registers;
pub mod transport;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};
use embedded_hal::spi::SpiDevice;

pub use decode::{sign_extend, FaultStatus, Reading, Unit};
pub use transport::{BitBang, BitBangConfig, BitBangError, HardwareSpi, Transport};

/// MAX31855 driver holding the last conversion result.
///
/// The first read after construction or [`invalidate`](Max31855::invalidate)
/// performs one bus transaction; every read after that decodes the cached word
/// without touching the bus.
pub struct Max31855<T> {
    transport: T,
    sample: Option<u32>,
}

impl<T> Max31855<T>
where
    T: Transport,
{
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            sample: None,
        }
    }

    pub fn release(self) -> T {
        self.transport
    }

    /// The cached raw word, if any. Never touches the bus.
    pub fn cached_sample(&self) -> Option<u32> {
        self.sample
    }

    pub fn is_cached(&self) -> bool {
        self.sample.is_some()
    }

    /// Forget the cached word so the next read acquires a new one
    pub fn invalidate(&mut self) {
        if self.sample.take().is_some() {
            debug!("MAX31855 sample invalidated");
        }
    }

    fn sample(&mut self) -> Result<u32, T::Error> {
        if let Some(raw) = self.sample {
            return Ok(raw);
        }

        let raw = self.transport.acquire()?;
        self.sample = Some(raw);
        Ok(raw)
    }

    /// Decoded view of the cached sample, acquiring one first if needed
    pub fn read(&mut self) -> Result<Reading, T::Error> {
        self.sample().map(Reading::from_raw)
    }

    /// Thermocouple temperature in °C.
    ///
    /// Returns `f32::NAN` when the chip reports a fault; use
    /// [`read_fault_code`](Max31855::read_fault_code) or
    /// [`read_faults`](Max31855::read_faults) to find out which one.
    pub fn read_celsius(&mut self) -> Result<f32, T::Error> {
        let reading = self.read()?;
        if reading.has_fault() {
            debug!("MAX31855 fault code {}", reading.fault_code());
        }
        Ok(reading.thermocouple_celsius())
    }

    /// Thermocouple temperature in °F, NaN on fault
    pub fn read_fahrenheit(&mut self) -> Result<f32, T::Error> {
        self.read_celsius().map(|c| Unit::Fahrenheit.convert(c))
    }

    pub fn read_thermocouple(&mut self, unit: Unit) -> Result<f32, T::Error> {
        self.read_celsius().map(|c| unit.convert(c))
    }

    /// Reference junction (die) temperature in °C. Unaffected by faults.
    pub fn read_internal(&mut self) -> Result<f32, T::Error> {
        self.read().map(|r| r.internal_celsius())
    }

    /// Fault bits D[2:0]: bit 0 open circuit, bit 1 short to GND, bit 2 short to VCC
    pub fn read_fault_code(&mut self) -> Result<u8, T::Error> {
        self.read().map(|r| r.fault_code())
    }

    pub fn read_faults(&mut self) -> Result<FaultStatus, T::Error> {
        self.read().map(|r| r.faults())
    }
}

impl<SPI> Max31855<HardwareSpi<SPI>>
where
    SPI: SpiDevice,
{
    pub fn new_spi(spi: SPI) -> Self {
        Self::new(HardwareSpi::new(spi))
    }
}

impl<SCK, CS, MISO, D> Max31855<BitBang<SCK, CS, MISO, D>>
where
    SCK: OutputPin,
    CS: OutputPin,
    MISO: InputPin,
    D: DelayNs,
{
    pub fn new_bit_bang(
        sck: SCK,
        cs: CS,
        miso: MISO,
        delay: D,
    ) -> Result<Self, BitBangError<SCK::Error, CS::Error, MISO::Error>> {
        BitBang::new(sck, cs, miso, delay).map(Self::new)
    }
}
