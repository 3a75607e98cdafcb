//! Core driver components for the I2C master.
//!
//! This module contains the building blocks of the protocol engine:
//!
//! - [`bus`] - The [`I2cBus`] capability chip drivers program against
//! - [`command`] - Command and status register bits
//! - [`config`] - Clock prescale and master configuration
//! - [`master`] - The [`I2cMaster`] protocol engine
//! - [`registry`] - Name to address map of configured slaves
//! - [`slave`] - Borrowed per-device handles
//!
//! # Example
//!
//! ```ignore
//! use regmap_i2c::driver::{I2cBus, I2cMaster, MasterConfig};
//!
//! let mut i2c = I2cMaster::with_slaves(regs, delay, MasterConfig::new("i2c"), slaves)?;
//! let found = i2c.scan();
//! ```

// Submodules
pub mod bus;
pub mod command;
pub mod config;
pub mod master;
pub mod registry;
pub mod slave;

// Re-exports for convenience
pub use bus::I2cBus;
pub use command::{Command, Status};
pub use config::{ClockPrescale, MasterConfig};
pub use master::{I2cMaster, ResetKind};
pub use registry::{SlaveRegistry, parse_slave_address};
pub use slave::I2cSlave;
