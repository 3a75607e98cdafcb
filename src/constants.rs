//! Centralized Constants
//!
//! This module provides a single source of truth for the magic numbers used
//! by the I2C master engine.
//!
//! # Organization
//!
//! Constants are grouped by category:
//! - **Clock**: Prescale defaults and the prescale formula divisor
//! - **Timing**: Completion poll budget and interval
//! - **Addressing**: 7-bit slave address limits
//! - **Control register**: Core enable values
//!
//! # Note
//!
//! Command and status register bits live in [`crate::driver::command`] as
//! typed bit sets.

// =============================================================================
// Clock
// =============================================================================

/// Default 16-bit clock prescale
///
/// `input_clock / 5 / 0x41` gives ≈96 kHz from a 31.25 MHz register bus
/// clock, inside the 100 kHz standard mode.
pub const DEFAULT_CLOCK_PRESCALE: u16 = 0x40;

/// Divisor in the prescale formula `prescale = input / (5 * target) - 1`
pub const PRESCALE_DIVISOR: u32 = 5;

// =============================================================================
// Timing
// =============================================================================

/// Number of status polls before a transfer is declared timed out
pub const MAX_POLL_RETRIES: u32 = 20;

/// Sleep before each status poll, in microseconds
pub const POLL_INTERVAL_US: u32 = 10;

// =============================================================================
// Addressing
// =============================================================================

/// Mask applied to configured slave addresses (7-bit addressing)
pub const ADDRESS_MASK: u32 = 0x7F;

/// Highest address tried by a bus scan
pub const MAX_SCAN_ADDRESS: u8 = 0x7E;

/// R/W bit of the address byte: set when reading from the slave
pub const ADDRESS_READ_BIT: u8 = 0x01;

// =============================================================================
// Control Register
// =============================================================================

/// Control register value enabling the core
pub const CTRL_CORE_ENABLE: u32 = 0x80;

/// Control register value disabling the core
pub const CTRL_CORE_DISABLE: u32 = 0x00;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_prescale_targets_standard_mode() {
        // 31.25 MHz register bus clock
        let input_hz = 31_250_000u32;
        let scl_hz = input_hz / (PRESCALE_DIVISOR * (DEFAULT_CLOCK_PRESCALE as u32 + 1));
        assert!(scl_hz <= 100_000);
        assert!(scl_hz > 90_000);
    }

    #[test]
    fn scan_range_stays_inside_seven_bits() {
        assert!(u32::from(MAX_SCAN_ADDRESS) < ADDRESS_MASK);
    }

    #[test]
    fn timeout_budget() {
        assert_eq!(MAX_POLL_RETRIES * POLL_INTERVAL_US, 200);
    }
}
