//! Synchronization and Concurrency Support
//!
//! The master itself has no internal locking; callers sharing one bus must
//! serialize access. This module provides that serialization:
//!
//! - **Primitives** (`primitives`): Low-level synchronization types
//!   - [`CriticalSectionCell`] - ISR-safe interior mutability
//!
//! - **Shared Wrappers** (`shared`): ISR-safe master slot
//!   - [`SharedI2cMaster`] - Critical-section protected I2C master
//!
//! # Feature Flags
//!
//! - `critical-section`: Enables this module
//!
//! # Example
//!
//! ```ignore
//! use regmap_i2c::sync::SharedI2cMaster;
//!
//! static I2C: SharedI2cMaster<MmioRegisters, Delay> = SharedI2cMaster::new();
//!
//! fn main() {
//!     I2C.install(I2cMaster::new(regs, delay, MasterConfig::new("i2c")));
//!
//!     let found = I2C.with(|i2c| i2c.scan()).unwrap_or_default();
//! }
//! ```

mod primitives;

pub use primitives::CriticalSectionCell;

mod shared;

pub use shared::SharedI2cMaster;
