//! Blocking driver for the MAX31855 cold-junction compensated
//! thermocouple-to-digital converter, built on the [`embedded-hal`] 1.0 traits.
//!
//! The chip is read-only: every conversion result is a single 32-bit word
//! carrying the thermocouple temperature, the reference junction temperature
//! and three fault flags. [`Max31855`] fetches that word once, caches it, and
//! decodes any number of values from it until [`Max31855::invalidate`] is called.
//!
//! Two transports are provided:
//! - [`HardwareSpi`]: a 4-byte read on any [`SpiDevice`](embedded_hal::spi::SpiDevice)
//!   (SPI mode 0, MSB first, up to 5 MHz).
//! - [`BitBang`]: clocks the word in on three GPIOs with a configurable delay.
//!
//! ```ignore
//! let mut sensor = Max31855::new_spi(spi_device);
//! let probe = sensor.read_celsius()?; // bus transaction
//! let die = sensor.read_internal()?; // cached
//! if probe.is_nan() {
//!     log_faults(1, &sensor.read_faults()?);
//! }
//! sensor.invalidate();
//! ```
//!
//! ## Features
//!
//! - `defmt`: log through `defmt` and derive `defmt::Format` on public types.
//! - `log`: log through the `log` facade.
//!
//! [`embedded-hal`]: https://github.com/rust-embedded/embedded-hal

#![no_std]
#![deny(unsafe_code)]

#[cfg(all(feature = "defmt", feature = "log"))]
compile_error!("Features \"defmt\" and \"log\" are mutually exclusive and cannot be enabled together");

#[cfg(test)]
#[macro_use]
extern crate std;

mod fmt;

pub mod max31855;

pub use max31855::registers::{SPI_FREQUENCY_HZ, SPI_MODE};
pub use max31855::{
    BitBang, BitBangConfig, BitBangError, FaultStatus, HardwareSpi, Max31855, Reading, Transport,
    Unit,
};

/// Log faults for a sensor
pub fn log_faults(sensor_num: u8, faults: &FaultStatus) {
    if faults.open_circuit {
        warn!("Sensor {} - Open circuit fault", sensor_num);
    }
    if faults.short_to_gnd {
        warn!("Sensor {} - Thermocouple shorted to GND", sensor_num);
    }
    if faults.short_to_vcc {
        warn!("Sensor {} - Thermocouple shorted to VCC", sensor_num);
    }
}

/// Read one sensor and log its faults, returning the thermocouple temperature
/// in °C (NaN on fault) and the reference junction temperature.
///
/// Invalidates first so the values always come from a fresh conversion.
pub fn sample_and_log<T>(sensor: &mut Max31855<T>, sensor_num: u8) -> Result<(f32, f32), T::Error>
where
    T: Transport,
{
    sensor.invalidate();

    let reading = sensor.read()?;
    if reading.has_fault() {
        log_faults(sensor_num, &reading.faults());
    }

    let probe = reading.thermocouple_celsius();
    let internal = reading.internal_celsius();
    info!("Sensor {} - TC={} CJ={}", sensor_num, probe, internal);

    Ok((probe, internal))
}
