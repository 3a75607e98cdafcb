//! Configuration types for the I2C master

use alloc::string::String;

use crate::constants::{
    DEFAULT_CLOCK_PRESCALE, MAX_POLL_RETRIES, POLL_INTERVAL_US, PRESCALE_DIVISOR,
};
use crate::error::{ConfigError, ConfigResult};

// =============================================================================
// Clock Prescale
// =============================================================================

/// 16-bit clock prescale latched into the `ps_hi`/`ps_lo` registers
///
/// `prescale = input_clock / (5 * scl_frequency) - 1`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ClockPrescale(u16);

impl ClockPrescale {
    /// Wrap a raw prescale value
    pub const fn new(raw: u16) -> Self {
        Self(raw)
    }

    /// Assemble from the high/low register bytes
    pub const fn from_bytes(high: u8, low: u8) -> Self {
        Self(((high as u16) << 8) | low as u16)
    }

    /// Compute from the ratio `input_clock / scl_frequency`
    pub const fn from_ratio(ratio: u32) -> ConfigResult<Self> {
        let divided = ratio / PRESCALE_DIVISOR;
        if divided == 0 || divided - 1 > u16::MAX as u32 {
            return Err(ConfigError::PrescaleOutOfRange);
        }
        Ok(Self((divided - 1) as u16))
    }

    /// Compute from the input clock and the wanted SCL frequency
    pub const fn from_frequencies(input_hz: u32, scl_hz: u32) -> ConfigResult<Self> {
        if scl_hz == 0 {
            return Err(ConfigError::InvalidFrequency);
        }
        Self::from_ratio(input_hz / scl_hz)
    }

    /// Raw 16-bit value
    pub const fn raw(self) -> u16 {
        self.0
    }

    /// Value for the `ps_hi` register
    pub const fn high(self) -> u8 {
        (self.0 >> 8) as u8
    }

    /// Value for the `ps_lo` register
    pub const fn low(self) -> u8 {
        (self.0 & 0xFF) as u8
    }
}

impl Default for ClockPrescale {
    fn default() -> Self {
        Self(DEFAULT_CLOCK_PRESCALE)
    }
}

// =============================================================================
// Master Configuration
// =============================================================================

/// Configuration of one I2C master
///
/// Read by [`I2cMaster::reset`](crate::I2cMaster::reset) every time it runs;
/// nothing is latched into hardware at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MasterConfig {
    /// Identifier reported in every error raised by this master
    pub bus_id: String,
    /// Clock prescale programmed on the next full reset
    pub prescale: ClockPrescale,
    /// Status polls before a transfer times out
    pub max_retries: u32,
    /// Sleep before each status poll, in microseconds
    pub poll_interval_us: u32,
}

impl Default for MasterConfig {
    fn default() -> Self {
        Self::new("i2c")
    }
}

impl MasterConfig {
    /// Create a configuration with defaults for the named bus
    #[must_use]
    pub fn new(bus_id: &str) -> Self {
        Self {
            bus_id: String::from(bus_id),
            prescale: ClockPrescale::default(),
            max_retries: MAX_POLL_RETRIES,
            poll_interval_us: POLL_INTERVAL_US,
        }
    }

    /// Set the clock prescale directly
    #[must_use]
    pub fn with_prescale(mut self, prescale: ClockPrescale) -> Self {
        self.prescale = prescale;
        self
    }

    /// Set the clock prescale from `input_clock / scl_frequency`
    pub fn with_frequency_ratio(mut self, ratio: u32) -> ConfigResult<Self> {
        self.prescale = ClockPrescale::from_ratio(ratio)?;
        Ok(self)
    }

    /// Set the clock prescale from the input clock and SCL frequencies
    pub fn with_frequencies(mut self, input_hz: u32, scl_hz: u32) -> ConfigResult<Self> {
        self.prescale = ClockPrescale::from_frequencies(input_hz, scl_hz)?;
        Ok(self)
    }

    /// Set the completion poll budget
    #[must_use]
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Set the sleep before each status poll
    #[must_use]
    pub fn with_poll_interval_us(mut self, interval_us: u32) -> Self {
        self.poll_interval_us = interval_us;
        self
    }
}
