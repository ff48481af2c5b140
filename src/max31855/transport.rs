use crate::max31855::registers::*;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};
use embedded_hal::spi::{SpiBus, SpiDevice};
use embedded_hal_bus::spi::{ExclusiveDevice, NoDelay};

/// Produces one fresh 32-bit conversion result per call.
///
/// Implementations frame the read with chip select, assemble the word
/// most-significant byte first and hand it back without validating it.
pub trait Transport {
    type Error;

    fn acquire(&mut self) -> Result<u32, Self::Error>;
}

/// Hardware SPI transport: a single 4-byte read on an `SpiDevice`.
///
/// The device owns chip select; the bus should be set up with
/// [`SPI_MODE`](crate::max31855::registers::SPI_MODE), MSB first, at no more than
/// [`SPI_FREQUENCY_HZ`](crate::max31855::registers::SPI_FREQUENCY_HZ).
pub struct HardwareSpi<SPI> {
    spi: SPI,
}

impl<SPI> HardwareSpi<SPI>
where
    SPI: SpiDevice,
{
    pub fn new(spi: SPI) -> Self {
        Self { spi }
    }

    pub fn release(self) -> SPI {
        self.spi
    }
}

impl<BUS, CS> HardwareSpi<ExclusiveDevice<BUS, CS, NoDelay>>
where
    BUS: SpiBus,
    CS: OutputPin,
{
    /// Build from a bus this chip has to itself plus its chip select pin.
    /// Chip select is driven high (idle) before returning.
    pub fn exclusive(bus: BUS, cs: CS) -> Result<Self, CS::Error> {
        Ok(Self::new(ExclusiveDevice::new_no_delay(bus, cs)?))
    }
}

impl<SPI> Transport for HardwareSpi<SPI>
where
    SPI: SpiDevice,
{
    type Error = SPI::Error;

    fn acquire(&mut self) -> Result<u32, Self::Error> {
        let mut buffer = [0u8; SAMPLE_BYTES];
        self.spi.read(&mut buffer)?;

        let raw = u32::from_be_bytes(buffer);
        trace!("MAX31855 raw sample (spi): {:08X}", raw);
        Ok(raw)
    }
}

/// Error from one of the bit-banged lines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BitBangError<SckE, CsE, MisoE> {
    Clock(SckE),
    ChipSelect(CsE),
    Data(MisoE),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BitBangConfig {
    /// Delay after every clock or select edge, in nanoseconds
    pub half_period_ns: u32,
}

impl Default for BitBangConfig {
    fn default() -> Self {
        Self {
            half_period_ns: DEFAULT_HALF_PERIOD_NS,
        }
    }
}

/// Holds chip select asserted (low) for as long as it lives.
///
/// [`release`](SelectGuard::release) deasserts it and reports the pin error;
/// if the guard is dropped on an error path it deasserts on a best-effort basis.
struct SelectGuard<'a, CS>
where
    CS: OutputPin,
{
    cs: Option<&'a mut CS>,
}

impl<'a, CS> SelectGuard<'a, CS>
where
    CS: OutputPin,
{
    fn assert(cs: &'a mut CS) -> Result<Self, CS::Error> {
        let mut guard = Self { cs: Some(cs) };
        if let Some(cs) = guard.cs.as_mut() {
            cs.set_low()?;
        }
        Ok(guard)
    }

    fn release(mut self) -> Result<(), CS::Error> {
        match self.cs.take() {
            Some(cs) => cs.set_high(),
            None => Ok(()),
        }
    }
}

impl<CS> Drop for SelectGuard<'_, CS>
where
    CS: OutputPin,
{
    fn drop(&mut self) {
        if let Some(cs) = self.cs.take() {
            let _ = cs.set_high();
        }
    }
}

/// Software SPI transport: clocks the 32 bits in by toggling GPIOs.
pub struct BitBang<SCK, CS, MISO, D> {
    sck: SCK,
    cs: CS,
    miso: MISO,
    delay: D,
    config: BitBangConfig,
}

impl<SCK, CS, MISO, D> BitBang<SCK, CS, MISO, D>
where
    SCK: OutputPin,
    CS: OutputPin,
    MISO: InputPin,
    D: DelayNs,
{
    pub fn new(
        sck: SCK,
        cs: CS,
        miso: MISO,
        delay: D,
    ) -> Result<Self, BitBangError<SCK::Error, CS::Error, MISO::Error>> {
        Self::with_config(sck, cs, miso, delay, BitBangConfig::default())
    }

    /// Takes the pins and leaves the bus idle: select high, clock low.
    pub fn with_config(
        mut sck: SCK,
        mut cs: CS,
        miso: MISO,
        delay: D,
        config: BitBangConfig,
    ) -> Result<Self, BitBangError<SCK::Error, CS::Error, MISO::Error>> {
        cs.set_high().map_err(BitBangError::ChipSelect)?;
        sck.set_low().map_err(BitBangError::Clock)?;

        Ok(Self {
            sck,
            cs,
            miso,
            delay,
            config,
        })
    }

    pub fn config(&self) -> BitBangConfig {
        self.config
    }

    pub fn release(self) -> (SCK, CS, MISO, D) {
        (self.sck, self.cs, self.miso, self.delay)
    }
}

impl<SCK, CS, MISO, D> Transport for BitBang<SCK, CS, MISO, D>
where
    SCK: OutputPin,
    CS: OutputPin,
    MISO: InputPin,
    D: DelayNs,
{
    type Error = BitBangError<SCK::Error, CS::Error, MISO::Error>;

    fn acquire(&mut self) -> Result<u32, Self::Error> {
        let Self {
            sck,
            cs,
            miso,
            delay,
            config,
        } = self;
        let half_period = config.half_period_ns;

        sck.set_low().map_err(BitBangError::Clock)?;
        delay.delay_ns(half_period);

        let selected = SelectGuard::assert(cs).map_err(BitBangError::ChipSelect)?;
        delay.delay_ns(half_period);

        // D31 is on MISO once CS falls; each falling SCK edge shifts out the next bit
        let mut raw = 0u32;
        for _ in 0..SAMPLE_BITS {
            sck.set_low().map_err(BitBangError::Clock)?;
            delay.delay_ns(half_period);

            raw <<= 1;
            if miso.is_high().map_err(BitBangError::Data)? {
                raw |= 1;
            }

            sck.set_high().map_err(BitBangError::Clock)?;
            delay.delay_ns(half_period);
        }

        selected.release().map_err(BitBangError::ChipSelect)?;

        trace!("MAX31855 raw sample (bit-bang): {:08X}", raw);
        Ok(raw)
    }
}
