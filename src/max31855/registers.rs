#![allow(dead_code)]
use embedded_hal::spi::{Mode, MODE_0};

// MAX31855 32-bit output word, MSB first
pub const SAMPLE_BYTES: usize = 4; // One conversion result is 4 bytes
pub const SAMPLE_BITS: u32 = 32;

// Thermocouple temperature, D[31:18], signed, 0.25°C per LSB
pub const TC_LSB: u32 = 18;
pub const TC_WIDTH: u32 = 14;
pub const TC_RESOLUTION: f32 = 0.25;

// D17 is reserved, D16 is the summary fault bit (set when any of D[2:0] is set)
pub const RESERVED_BIT_17: u32 = 1 << 17;
pub const SUMMARY_FAULT_BIT: u32 = 1 << 16;

// Internal (cold-junction) temperature, D[15:4], signed, 0.0625°C per LSB
pub const CJ_LSB: u32 = 4;
pub const CJ_WIDTH: u32 = 12;
pub const CJ_RESOLUTION: f32 = 0.0625;

// D3 is reserved

// Fault bits, D[2:0]
pub const FAULT_MASK: u32 = 0b111;
pub const FAULT_OC: u8 = 1 << 0; // Thermocouple open circuit
pub const FAULT_SCG: u8 = 1 << 1; // Thermocouple shorted to GND
pub const FAULT_SCV: u8 = 1 << 2; // Thermocouple shorted to VCC

// Hardware SPI settings
pub const SPI_MODE: Mode = MODE_0; // CPOL = 0, CPHA = 0, data sampled on rising SCK
pub const SPI_FREQUENCY_HZ: u32 = 4_000_000; // Chip maximum is 5 MHz

// Bit-banged SPI timing
pub const DEFAULT_HALF_PERIOD_NS: u32 = 1_000; // SCK high/low minimum is 100 ns
