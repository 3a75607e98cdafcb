//! I2C master engine
//!
//! [`I2cMaster`] drives an OpenCores-style I2C core through the five
//! registers of a [`RegisterInterface`]. Every byte on the bus is one
//! command: the data register is loaded (for writes), the command register
//! is written, and the status register is polled until the transfer
//! finishes.
//!
//! # Transfer Sequence
//!
//! ```text
//! reset ──► START|WRITE addr ──► WRITE b0 ──► ... ──► STOP|WRITE bN
//!       └─► START|WRITE addr|1 ─► READ ──► ... ──► STOP|ACK|READ
//! ```
//!
//! Every command is followed by a completion wait: a bounded number of
//! sleep-then-read-status polls. Arbitration loss aborts the wait at once;
//! the acknowledge and bus-idle checks only run after the transfer is done.

use alloc::string::String;
use alloc::vec::Vec;

use embedded_hal::delay::DelayNs;

use crate::constants::{
    ADDRESS_MASK, ADDRESS_READ_BIT, CTRL_CORE_DISABLE, CTRL_CORE_ENABLE, MAX_SCAN_ADDRESS,
};
use crate::driver::bus::I2cBus;
use crate::driver::command::{Command, Status};
use crate::driver::config::{ClockPrescale, MasterConfig};
use crate::driver::registry::SlaveRegistry;
use crate::driver::slave::I2cSlave;
use crate::error::{BusError, DispatchError, Error, Result};
use crate::register::{Register, RegisterInterface, ValWord};

// =============================================================================
// Reset Outcome
// =============================================================================

/// What [`I2cMaster::reset`] had to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ResetKind {
    /// Prescale differed: core disabled, reprogrammed and re-enabled
    Full,
    /// Prescale already latched: only data and command were cleared
    Light,
}

// =============================================================================
// Address Bytes
// =============================================================================

/// First byte of a write transaction for `address`
const fn write_address(address: u8) -> u8 {
    (address << 1) & !ADDRESS_READ_BIT
}

/// First byte of a read transaction for `address`
const fn read_address(address: u8) -> u8 {
    (address << 1) | ADDRESS_READ_BIT
}

// =============================================================================
// I2C Master
// =============================================================================

/// Master of one I2C bus
///
/// # Type Parameters
///
/// * `R` - Register interface reaching the core
/// * `D` - Delay used for the completion poll interval
///
/// # Example
///
/// ```ignore
/// use regmap_i2c::{I2cBus, I2cMaster, MasterConfig, MmioRegisters};
///
/// let regs = unsafe { MmioRegisters::new(0x4000_1000, 4) };
/// let config = MasterConfig::new("pll_i2c").with_frequency_ratio(1250)?;
/// let mut i2c = I2cMaster::with_slaves(regs, delay, config, [("SI5345", "0x68")])?;
///
/// let mut pll = i2c.slave("SI5345")?;
/// let id = pll.read_register(0x02)?;
/// ```
#[derive(Debug)]
pub struct I2cMaster<R: RegisterInterface, D: DelayNs> {
    registers: R,
    delay: D,
    config: MasterConfig,
    slaves: SlaveRegistry,
}

impl<R: RegisterInterface, D: DelayNs> I2cMaster<R, D> {
    /// Create a master with no registered slaves
    ///
    /// Nothing is written to the core until the first transfer resets it.
    pub fn new(registers: R, delay: D, config: MasterConfig) -> Self {
        Self {
            registers,
            delay,
            config,
            slaves: SlaveRegistry::default(),
        }
    }

    /// Create a master and populate its registry from `(name, address)` pairs
    ///
    /// Addresses are decimal or `0x` hex strings, masked to 7 bits.
    pub fn with_slaves<I, K, V>(registers: R, delay: D, config: MasterConfig, slaves: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let slaves = SlaveRegistry::from_config(slaves)?;

        #[cfg(feature = "defmt")]
        defmt::debug!(
            "i2c master '{=str}': {=usize} slaves, prescale {=u16:#06x}",
            config.bus_id.as_str(),
            slaves.len(),
            config.prescale.raw()
        );

        Ok(Self {
            registers,
            delay,
            config,
            slaves,
        })
    }

    // -------------------------------------------------------------------------
    // Configuration
    // -------------------------------------------------------------------------

    /// Identifier carried by every error this master raises
    pub fn bus_id(&self) -> &str {
        &self.config.bus_id
    }

    /// Current configuration
    pub fn config(&self) -> &MasterConfig {
        &self.config
    }

    /// Prescale the next reset will make sure is latched
    pub fn clock_prescale(&self) -> ClockPrescale {
        self.config.prescale
    }

    /// Set the prescale from the ratio `input_clock / scl_frequency`
    ///
    /// Only the configuration changes; the core is reprogrammed by the next
    /// reset, which will be a full one.
    pub fn configure(&mut self, ratio: u32) -> Result<()> {
        self.config.prescale = ClockPrescale::from_ratio(ratio)?;
        Ok(())
    }

    /// Set the prescale directly
    pub fn set_clock_prescale(&mut self, prescale: ClockPrescale) {
        self.config.prescale = prescale;
    }

    // -------------------------------------------------------------------------
    // Slave Registry
    // -------------------------------------------------------------------------

    /// Name to address map of the devices on this bus
    pub fn registry(&self) -> &SlaveRegistry {
        &self.slaves
    }

    /// Registered device names, sorted
    pub fn slave_names(&self) -> Vec<String> {
        self.slaves.names().map(String::from).collect()
    }

    /// Address registered for `name`
    pub fn slave_address(&self, name: &str) -> Result<u8> {
        self.slaves.address(name).ok_or_else(|| Error::DeviceNotFound {
            bus: self.config.bus_id.clone(),
            name: String::from(name),
        })
    }

    /// Handle on the device registered as `name`
    pub fn slave(&mut self, name: &str) -> Result<I2cSlave<'_, Self>> {
        let address = self.slave_address(name)?;
        Ok(I2cSlave::new(self, address))
    }

    // -------------------------------------------------------------------------
    // Owned Resources
    // -------------------------------------------------------------------------

    /// Access the register interface
    pub fn registers(&self) -> &R {
        &self.registers
    }

    /// Mutable access to the register interface
    pub fn registers_mut(&mut self) -> &mut R {
        &mut self.registers
    }

    /// Give back the register interface and delay
    pub fn release(self) -> (R, D) {
        (self.registers, self.delay)
    }

    // -------------------------------------------------------------------------
    // Protocol Engine
    // -------------------------------------------------------------------------

    /// Bring the core to a known state before a transaction
    ///
    /// The latched prescale is read back and compared with the configured
    /// one. Only when they differ is the core disabled, reprogrammed and
    /// re-enabled; otherwise the data and command registers are cleared.
    pub fn reset(&mut self) -> Result<ResetKind> {
        #[cfg_attr(not(feature = "defmt"), allow(unused_variables))]
        let control = self.registers.read(Register::Control);
        let prescale_high = self.registers.read(Register::PrescaleHigh);
        let prescale_low = self.registers.read(Register::PrescaleLow);
        self.commit()?;

        let latched = ClockPrescale::from_bytes(
            Self::resolved(&prescale_high)? as u8,
            Self::resolved(&prescale_low)? as u8,
        );
        let wanted = self.config.prescale;

        #[cfg(feature = "defmt")]
        defmt::debug!(
            "i2c reset: ctrl={=u32:#04x} latched={=u16:#06x} wanted={=u16:#06x}",
            control.value().unwrap_or_default(),
            latched.raw(),
            wanted.raw()
        );

        if latched == wanted {
            self.clear_data_and_command();
            self.commit()?;
            return Ok(ResetKind::Light);
        }

        self.registers.write(Register::Control, CTRL_CORE_DISABLE);
        self.commit()?;

        self.registers
            .write(Register::PrescaleHigh, u32::from(wanted.high()));
        self.registers
            .write(Register::PrescaleLow, u32::from(wanted.low()));
        self.clear_data_and_command();
        self.commit()?;

        self.registers.write(Register::Control, CTRL_CORE_ENABLE);
        self.commit()?;

        Ok(ResetKind::Full)
    }

    /// Issue a write command carrying `data`
    ///
    /// The write flag is added to `command`. The slave must acknowledge the
    /// byte, and when `command` carries STOP the bus must be idle afterwards.
    ///
    /// # Panics
    ///
    /// Panics if `command` carries the read flag.
    pub fn send_command_and_write_data(&mut self, command: Command, data: u8) -> Result<()> {
        assert!(
            !command.contains(Command::READ),
            "write command must not carry the read flag"
        );
        let command = command | Command::WRITE;

        #[cfg(feature = "defmt")]
        defmt::debug!(">> sending write cmd={=u8:#04x} data={=u8:#04x}", command.bits(), data);

        self.registers.write(Register::TRANSMIT, u32::from(data));
        self.registers
            .write(Register::COMMAND, u32::from(command.bits()));
        self.commit()?;

        self.wait_until_finished(true, command.contains(Command::STOP))
    }

    /// Issue a read command and return the received byte
    ///
    /// The read flag is added to `command`. Acknowledgement is not checked.
    /// When `command` carries STOP the bus must be idle afterwards.
    ///
    /// # Panics
    ///
    /// Panics if `command` carries the write flag.
    pub fn send_command_and_read_data(&mut self, command: Command) -> Result<u8> {
        assert!(
            !command.contains(Command::WRITE),
            "read command must not carry the write flag"
        );
        let command = command | Command::READ;

        #[cfg(feature = "defmt")]
        defmt::debug!(">> sending read cmd={=u8:#04x}", command.bits());

        self.registers
            .write(Register::COMMAND, u32::from(command.bits()));
        self.commit()?;

        self.wait_until_finished(false, command.contains(Command::STOP))?;

        let received = self.registers.read(Register::RECEIVE);
        self.commit()?;
        let data = (Self::resolved(&received)? & 0xFF) as u8;

        #[cfg(feature = "defmt")]
        defmt::debug!("<< receive data={=u8:#04x}", data);

        Ok(data)
    }

    /// Poll the status register until the transfer in progress finishes
    ///
    /// Each attempt sleeps for the poll interval, then reads status.
    /// Arbitration loss fails immediately. After the transfer is done,
    /// `require_ack` checks the slave acknowledged and `require_idle` checks
    /// the bus is no longer busy.
    pub fn wait_until_finished(&mut self, require_ack: bool, require_idle: bool) -> Result<()> {
        let mut finished = None;

        for _attempt in 0..self.config.max_retries {
            self.delay.delay_us(self.config.poll_interval_us);

            let word = self.registers.read(Register::STATUS);
            self.commit()?;
            let status = Status::from_register(Self::resolved(&word)?);

            if status.arbitration_lost() {
                return Err(self.bus_error(BusError::ArbitrationLost));
            }
            if !status.transfer_in_progress() {
                finished = Some(status);
                break;
            }
        }

        let Some(status) = finished else {
            return Err(self.bus_error(BusError::TransactionTimeout));
        };

        if require_ack && !status.ack_received() {
            return Err(self.bus_error(BusError::NoAcknowledgeReceived));
        }
        if require_idle && status.busy() {
            return Err(self.bus_error(BusError::TransferFinishedBusStillBusy));
        }
        Ok(())
    }

    /// Whether a device acknowledges `address`
    ///
    /// Resets the core, then performs a one-byte read. Every failure,
    /// including register dispatch failures, reads as "no device".
    pub fn ping(&mut self, address: u8) -> bool {
        let address = address & ADDRESS_MASK as u8;
        let outcome = self
            .reset()
            .and_then(|_| self.read_one_byte_from(address));

        #[cfg(feature = "defmt")]
        if let Err(e) = &outcome {
            defmt::trace!("i2c ping {=u8:#04x}: {}", address, e);
        }

        outcome.is_ok()
    }

    /// Addresses in `0x00..=0x7E` that answer a one-byte read, ascending
    ///
    /// The core is reset once up front. If that reset fails, nothing is
    /// reported as present.
    pub fn scan(&mut self) -> Vec<u8> {
        if let Err(_e) = self.reset() {
            #[cfg(feature = "defmt")]
            defmt::warn!("i2c scan '{=str}': reset failed: {}", self.config.bus_id.as_str(), _e);
            return Vec::new();
        }

        let found: Vec<u8> = (0..=MAX_SCAN_ADDRESS)
            .filter(|&address| {
                let outcome = self.read_one_byte_from(address);
                #[cfg(feature = "defmt")]
                if let Err(e) = &outcome {
                    defmt::trace!("i2c scan {=u8:#04x}: {}", address, e);
                }
                outcome.is_ok()
            })
            .collect();

        #[cfg(feature = "defmt")]
        defmt::info!("i2c scan '{=str}': {=[u8]:x}", self.config.bus_id.as_str(), found.as_slice());

        found
    }

    // -------------------------------------------------------------------------
    // Helpers
    // -------------------------------------------------------------------------

    /// Address `address` for reading and take one byte, without a reset
    fn read_one_byte_from(&mut self, address: u8) -> Result<u8> {
        self.send_command_and_write_data(Command::START, read_address(address))?;
        self.send_command_and_read_data(Command::STOP | Command::ACK)
    }

    fn clear_data_and_command(&mut self) {
        self.registers.write(Register::Data, 0);
        self.registers.write(Register::COMMAND, 0);
    }

    fn commit(&mut self) -> Result<()> {
        self.registers.commit()?;
        Ok(())
    }

    fn resolved(word: &ValWord) -> Result<u32> {
        word.value()
            .ok_or(Error::Dispatch(DispatchError::Unresolved))
    }

    fn bus_error(&self, kind: BusError) -> Error {
        Error::bus(&self.config.bus_id, kind)
    }
}

impl<R: RegisterInterface, D: DelayNs> I2cBus for I2cMaster<R, D> {
    /// Reset, address the device for writing, then send `data`
    ///
    /// Only the last byte carries STOP, and only when `send_stop` is set.
    fn write_block(&mut self, address: u8, data: &[u8], send_stop: bool) -> Result<()> {
        let address = address & ADDRESS_MASK as u8;
        self.reset()?;
        self.send_command_and_write_data(Command::START, write_address(address))?;

        let last = data.len().saturating_sub(1);
        for (index, &byte) in data.iter().enumerate() {
            let command = if send_stop && index == last {
                Command::STOP
            } else {
                Command::empty()
            };
            self.send_command_and_write_data(command, byte)?;
        }
        Ok(())
    }

    /// Reset, address the device for reading, then read `count` bytes
    ///
    /// The last read carries STOP and the master NACK.
    fn read_block(&mut self, address: u8, count: usize) -> Result<Vec<u8>> {
        let address = address & ADDRESS_MASK as u8;
        self.reset()?;
        self.send_command_and_write_data(Command::START, read_address(address))?;

        (0..count)
            .map(|index| {
                let command = if index + 1 == count {
                    Command::STOP | Command::ACK
                } else {
                    Command::empty()
                };
                self.send_command_and_read_data(command)
            })
            .collect()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
