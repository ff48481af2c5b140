use crate::max31855::registers::*;

/// Extract the `width`-bit field starting at bit `lsb` of `raw` and sign-extend
/// it as two's complement.
///
/// The field is left-aligned to bit 31 and shifted back with an arithmetic
/// shift, so the field's top bit becomes the sign of the result.
pub const fn sign_extend(raw: u32, lsb: u32, width: u32) -> i32 {
    let shift = u32::BITS - width;
    (((raw >> lsb) << shift) as i32) >> shift
}

/// Temperature unit used when converting a thermocouple reading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Unit {
    Celsius,
    Fahrenheit,
    Kelvin,
}

impl Unit {
    /// Convert degrees Celsius into this unit. NaN stays NaN.
    pub fn convert(&self, celsius: f32) -> f32 {
        match self {
            Unit::Celsius => celsius,
            Unit::Fahrenheit => celsius * 9.0 / 5.0 + 32.0,
            Unit::Kelvin => celsius + 273.15,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FaultStatus {
    pub open_circuit: bool, // Thermocouple open (no connection)
    pub short_to_gnd: bool, // Thermocouple shorted to GND
    pub short_to_vcc: bool, // Thermocouple shorted to VCC
}

impl FaultStatus {
    pub fn from_code(code: u8) -> Self {
        Self {
            open_circuit: (code & FAULT_OC) != 0,
            short_to_gnd: (code & FAULT_SCG) != 0,
            short_to_vcc: (code & FAULT_SCV) != 0,
        }
    }

    /// The 3-bit fault code these flags were decoded from
    pub fn code(&self) -> u8 {
        let mut code = 0;
        if self.open_circuit {
            code |= FAULT_OC;
        }
        if self.short_to_gnd {
            code |= FAULT_SCG;
        }
        if self.short_to_vcc {
            code |= FAULT_SCV;
        }
        code
    }

    pub fn has_fault(&self) -> bool {
        self.open_circuit || self.short_to_gnd || self.short_to_vcc
    }
}

/// A decoded view of one raw 32-bit conversion result.
///
/// Every accessor recomputes its value from the raw word; nothing is stored
/// besides the sample itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Reading {
    raw: u32,
}

impl Reading {
    pub const fn from_raw(raw: u32) -> Self {
        Self { raw }
    }

    /// The undecoded sample, bit-exact as clocked out of the chip
    pub const fn raw(&self) -> u32 {
        self.raw
    }

    /// Thermocouple temperature in ADC counts (0.25°C each).
    /// Returned as-is even when a fault is flagged.
    pub const fn thermocouple_raw(&self) -> i16 {
        sign_extend(self.raw, TC_LSB, TC_WIDTH) as i16
    }

    /// Reference junction temperature in ADC counts (0.0625°C each)
    pub const fn internal_raw(&self) -> i16 {
        sign_extend(self.raw, CJ_LSB, CJ_WIDTH) as i16
    }

    /// Fault bits D[2:0], unmodified
    pub const fn fault_code(&self) -> u8 {
        (self.raw & FAULT_MASK) as u8
    }

    pub fn faults(&self) -> FaultStatus {
        FaultStatus::from_code(self.fault_code())
    }

    pub const fn has_fault(&self) -> bool {
        self.fault_code() != 0
    }

    /// Thermocouple temperature in °C, or `f32::NAN` if any fault bit is set
    pub fn thermocouple_celsius(&self) -> f32 {
        if self.has_fault() {
            return f32::NAN;
        }
        self.thermocouple_raw() as f32 * TC_RESOLUTION
    }

    pub fn thermocouple_fahrenheit(&self) -> f32 {
        Unit::Fahrenheit.convert(self.thermocouple_celsius())
    }

    pub fn thermocouple(&self, unit: Unit) -> f32 {
        unit.convert(self.thermocouple_celsius())
    }

    /// Reference junction temperature in °C. The fault bits do not affect it.
    pub fn internal_celsius(&self) -> f32 {
        self.internal_raw() as f32 * CJ_RESOLUTION
    }
}

impl From<u32> for Reading {
    fn from(raw: u32) -> Self {
        Self::from_raw(raw)
    }
}
