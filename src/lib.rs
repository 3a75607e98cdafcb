//! Register-Mapped I2C Master
//!
//! A `no_std` (with `alloc`) Rust implementation of an I2C bus master for
//! OpenCores-style command/status cores that sit behind a batched register
//! interface.
//!
//! The engine does not own the transport to the core. It queues register
//! reads and writes on a [`RegisterInterface`] and commits them in batches,
//! so the same code runs against a core mapped into the address space
//! ([`MmioRegisters`]) or one reached over a remote register-access link.
//!
//! # Architecture
//!
//! The crate is organized into three layers:
//!
//! 1. **Register Layer** ([`register`]): Register names, deferred reads and
//!    the [`RegisterInterface`] contract
//! 2. **Protocol Layer** ([`driver`]): [`I2cMaster`] command sequencing,
//!    completion polling, block transfers, ping and scan
//! 3. **Device Layer** ([`I2cBus`], [`I2cSlave`]): Name-addressed handles and
//!    register-style access for chip drivers
//!
//! ## Command/Status Core
//!
//! | Register   | Offset | Access                              |
//! |------------|--------|-------------------------------------|
//! | `ps_lo`    | 0      | Clock prescale, low byte            |
//! | `ps_hi`    | 1      | Clock prescale, high byte           |
//! | `ctrl`     | 2      | Core enable                         |
//! | `data`     | 3      | Transmit on write, receive on read  |
//! | `cmd_stat` | 4      | Command on write, status on read    |
//!
//! # Features
//!
//! - `defmt`: Enable defmt formatting for public types and register-traffic
//!   logging
//! - `critical-section`: Enable the ISR-safe [`SharedI2cMaster`] wrapper
//!
//! # Example
//!
//! ```ignore
//! use regmap_i2c::{I2cBus, I2cMaster, MasterConfig, MmioRegisters};
//!
//! // Core mapped at 0x4000_1000, one register per 32-bit word
//! let regs = unsafe { MmioRegisters::new(0x4000_1000, 4) };
//!
//! // 31.25 MHz bus clock, 100 kHz SCL
//! let config = MasterConfig::new("pll_i2c").with_frequencies(31_250_000, 100_000)?;
//!
//! let mut i2c = I2cMaster::with_slaves(
//!     regs,
//!     delay,
//!     config,
//!     [("SI5345", "0x68"), ("SFP_EEProm", "0x50")],
//! )?;
//!
//! // Scan the bus
//! for address in i2c.scan() {
//!     // ...
//! }
//!
//! // Talk to a named device
//! let mut pll = i2c.slave("SI5345")?;
//! pll.write_register(0x01, 0x00, true)?;
//! let status = pll.read_register(0x0C)?;
//! ```
//!
//! # Errors
//!
//! Every bus failure is fatal to the transaction in flight and is reported
//! with the bus identifier ([`Error::Bus`]). The master never retries on its
//! own; callers decide whether to reissue.

#![cfg_attr(not(test), no_std)]
#![deny(missing_docs)]
#![allow(unsafe_code)]
#![deny(unsafe_op_in_unsafe_fn)]
// Clippy lint levels live here; thresholds and config are in Cargo.toml.
#![deny(clippy::correctness)]
#![warn(
    clippy::suspicious,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::cloned_instead_of_copied,
    clippy::explicit_iter_loop,
    clippy::implicit_clone,
    clippy::inconsistent_struct_constructor,
    clippy::manual_assert,
    clippy::manual_let_else,
    clippy::match_same_arms,
    clippy::needless_pass_by_value,
    clippy::semicolon_if_nothing_returned,
    clippy::uninlined_format_args,
    clippy::unnested_or_patterns,
    clippy::std_instead_of_core,
    clippy::std_instead_of_alloc,
    clippy::alloc_instead_of_core
)]
#![allow(
    clippy::mod_module_files,
    clippy::self_named_module_files,
    clippy::similar_names,
    clippy::struct_excessive_bools,
    clippy::fn_params_excessive_bools,
    clippy::must_use_candidate,
    clippy::assertions_on_constants,
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_sign_loss,
    clippy::cast_lossless,
    clippy::panic_in_result_fn,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::module_name_repetitions,
    clippy::wildcard_imports,
    clippy::items_after_statements
)]

extern crate alloc;

// =============================================================================
// Modules
// =============================================================================

pub mod constants;
pub mod driver;
pub mod error;
pub mod integration;
pub mod register;

#[cfg(feature = "critical-section")]
#[cfg_attr(docsrs, doc(cfg(feature = "critical-section")))]
pub mod sync;

// Test utilities (only available during testing)
#[cfg(test)]
pub mod test_utils;

// =============================================================================
// Re-exports
// =============================================================================

pub use driver::{
    ClockPrescale, Command, I2cBus, I2cMaster, I2cSlave, MasterConfig, ResetKind, SlaveRegistry,
    Status, parse_slave_address,
};
pub use error::{
    BusError, ConfigError, ConfigResult, DispatchError, DispatchResult, Error, Result,
};
pub use register::{MmioRegisters, Register, RegisterInterface, ValWord};

// Re-export sync types when critical-section is enabled
#[cfg(feature = "critical-section")]
pub use sync::{CriticalSectionCell, SharedI2cMaster};
