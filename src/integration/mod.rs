//! External Stack Integrations
//!
//! This module provides integrations with external traits:
//!
//! - **embedded-hal** (`embedded_hal`): Implements `embedded_hal::i2c::I2c`
//!   for [`I2cMaster`](crate::I2cMaster)
//!   - Transaction framing with repeated starts
//!   - `embedded_hal::i2c::Error` kinds for the crate error
//!
//! # Example
//!
//! ```ignore
//! use embedded_hal::i2c::I2c;
//!
//! let mut buf = [0u8; 1];
//! i2c.write_read(0x50, &[0x00], &mut buf)?;
//! ```

pub mod embedded_hal;
