//! I2C bus capability
//!
//! [`I2cBus`] is what chip drivers program against. Implementors provide
//! the two block primitives; register-style access is built on top of them
//! once, here.

use alloc::vec::Vec;

use crate::error::{Error, Result};

/// Block-level access to devices on one I2C bus
///
/// Addresses are 7-bit. Register addresses are the first byte written to
/// the device, as used by EEPROMs, PLLs, DACs and I/O expanders.
pub trait I2cBus {
    /// Write `data` to the device at `address`
    ///
    /// With `send_stop` false the bus is left open after the last byte so
    /// that a following read starts with a repeated start.
    fn write_block(&mut self, address: u8, data: &[u8], send_stop: bool) -> Result<()>;

    /// Read `count` bytes from the device at `address`
    ///
    /// The last byte is NACKed and followed by a stop.
    fn read_block(&mut self, address: u8, count: usize) -> Result<Vec<u8>>;

    /// Read one register
    ///
    /// Fails with [`Error::ShortRead`] if `read_block` hands back no byte.
    fn read_register(&mut self, address: u8, register: u8) -> Result<u8> {
        let bytes = self.read_registers(address, register, 1)?;
        bytes.first().copied().ok_or(Error::ShortRead {
            address,
            expected: 1,
            received: 0,
        })
    }

    /// Write one register
    fn write_register(
        &mut self,
        address: u8,
        register: u8,
        value: u8,
        send_stop: bool,
    ) -> Result<()> {
        self.write_registers(address, register, &[value], send_stop)
    }

    /// Read `count` consecutive registers starting at `register`
    ///
    /// The register address goes out as its own stopped write, then the
    /// data is read back in a second transaction.
    fn read_registers(&mut self, address: u8, register: u8, count: usize) -> Result<Vec<u8>> {
        self.write_block(address, &[register], true)?;
        self.read_block(address, count)
    }

    /// Write consecutive registers starting at `register`
    ///
    /// Register address and payload go out as one block.
    fn write_registers(
        &mut self,
        address: u8,
        register: u8,
        data: &[u8],
        send_stop: bool,
    ) -> Result<()> {
        let mut block = Vec::with_capacity(data.len() + 1);
        block.push(register);
        block.extend_from_slice(data);
        self.write_block(address, &block, send_stop)
    }
}

impl<B: I2cBus + ?Sized> I2cBus for &mut B {
    fn write_block(&mut self, address: u8, data: &[u8], send_stop: bool) -> Result<()> {
        (**self).write_block(address, data, send_stop)
    }

    fn read_block(&mut self, address: u8, count: usize) -> Result<Vec<u8>> {
        (**self).read_block(address, count)
    }
}
