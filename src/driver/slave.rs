//! Slave handle
//!
//! An [`I2cSlave`] is a view of one device: it binds an address to a bus
//! and forwards every transfer with that address. It adds no protocol of
//! its own, so chip drivers built on it run on any [`I2cBus`].

use alloc::vec::Vec;

use crate::constants::ADDRESS_MASK;
use crate::driver::bus::I2cBus;
use crate::error::Result;

/// One addressed device on an I2C bus
#[derive(Debug)]
pub struct I2cSlave<'a, B: I2cBus + ?Sized> {
    bus: &'a mut B,
    address: u8,
}

impl<'a, B: I2cBus + ?Sized> I2cSlave<'a, B> {
    /// Bind `address` (masked to 7 bits) on `bus`
    pub fn new(bus: &'a mut B, address: u8) -> Self {
        Self {
            bus,
            address: address & ADDRESS_MASK as u8,
        }
    }

    /// The device's 7-bit bus address
    pub fn address(&self) -> u8 {
        self.address
    }

    /// Access the underlying bus
    pub fn bus(&mut self) -> &mut B {
        &mut *self.bus
    }

    /// Read one register
    pub fn read_register(&mut self, register: u8) -> Result<u8> {
        self.bus.read_register(self.address, register)
    }

    /// Write one register
    pub fn write_register(&mut self, register: u8, value: u8, send_stop: bool) -> Result<()> {
        self.bus.write_register(self.address, register, value, send_stop)
    }

    /// Read `count` consecutive registers starting at `register`
    pub fn read_registers(&mut self, register: u8, count: usize) -> Result<Vec<u8>> {
        self.bus.read_registers(self.address, register, count)
    }

    /// Write consecutive registers starting at `register`
    pub fn write_registers(&mut self, register: u8, data: &[u8], send_stop: bool) -> Result<()> {
        self.bus
            .write_registers(self.address, register, data, send_stop)
    }

    /// Write raw bytes, without a register address
    pub fn write_block(&mut self, data: &[u8], send_stop: bool) -> Result<()> {
        self.bus.write_block(self.address, data, send_stop)
    }

    /// Read raw bytes, without a register address
    pub fn read_block(&mut self, count: usize) -> Result<Vec<u8>> {
        self.bus.read_block(self.address, count)
    }
}
