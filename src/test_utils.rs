//! Testing utilities and mock implementations
//!
//! This module provides a register-level simulation of the I2C
//! command/status core and a mock delay, so the master can be tested on the
//! host without hardware access.
//!
//! Only available when running `cargo test`.

// Note: The #[cfg(test)] attribute is applied in lib.rs where this module is declared
#![allow(missing_docs)]
#![allow(clippy::std_instead_of_core, clippy::std_instead_of_alloc)]

use std::collections::{BTreeMap, VecDeque};
use std::vec::Vec;

use crate::constants::CTRL_CORE_ENABLE;
use crate::driver::command::{Command, Status};
use crate::driver::config::ClockPrescale;
use crate::error::{DispatchError, DispatchResult};
use crate::register::{Register, RegisterInterface, ValWord};

// =============================================================================
// Simulated Slaves
// =============================================================================

/// Device attached to the simulated bus
#[derive(Debug, Clone)]
pub enum SimSlave {
    /// Returns written bytes in order on later reads (0xFF when drained)
    Echo(VecDeque<u8>),
    /// 256-byte register file; the first byte of a write sets the pointer
    RegisterFile {
        memory: [u8; 256],
        pointer: u8,
        pointer_pending: bool,
    },
}

impl SimSlave {
    pub fn echo() -> Self {
        SimSlave::Echo(VecDeque::new())
    }

    pub fn register_file() -> Self {
        SimSlave::RegisterFile {
            memory: [0; 256],
            pointer: 0,
            pointer_pending: false,
        }
    }

    /// Register file preloaded with `(register, value)` pairs
    pub fn register_file_with(contents: &[(u8, u8)]) -> Self {
        let mut slave = Self::register_file();
        if let SimSlave::RegisterFile { memory, .. } = &mut slave {
            for &(register, value) in contents {
                memory[register as usize] = value;
            }
        }
        slave
    }

    /// Register file content, `None` for echo slaves
    pub fn memory(&self, register: u8) -> Option<u8> {
        match self {
            SimSlave::RegisterFile { memory, .. } => Some(memory[register as usize]),
            SimSlave::Echo(_) => None,
        }
    }

    fn start(&mut self, read: bool) {
        if let SimSlave::RegisterFile {
            pointer_pending, ..
        } = self
        {
            *pointer_pending = !read;
        }
    }

    fn write(&mut self, byte: u8) {
        match self {
            SimSlave::Echo(fifo) => fifo.push_back(byte),
            SimSlave::RegisterFile {
                memory,
                pointer,
                pointer_pending,
            } => {
                if *pointer_pending {
                    *pointer = byte;
                    *pointer_pending = false;
                } else {
                    memory[*pointer as usize] = byte;
                    *pointer = pointer.wrapping_add(1);
                }
            }
        }
    }

    fn read(&mut self) -> u8 {
        match self {
            SimSlave::Echo(fifo) => fifo.pop_front().unwrap_or(0xFF),
            SimSlave::RegisterFile {
                memory, pointer, ..
            } => {
                let value = memory[*pointer as usize];
                *pointer = pointer.wrapping_add(1);
                value
            }
        }
    }
}

// =============================================================================
// Simulated Command/Status Core
// =============================================================================

/// Register access seen by the simulated core
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegOp {
    Write(Register, u32),
    Read(Register),
    Commit,
}

#[derive(Debug)]
enum Pending {
    Write(Register, u32),
    Read(Register, ValWord),
}

/// Register-level model of the command/status I2C core
///
/// Commands execute when the commit carrying the command write runs.
/// Every queued operation and commit is logged for order assertions.
///
/// # Example
///
/// ```ignore
/// let mut core = SimulatedCore::new().with_slave(0x50, SimSlave::echo());
/// core.set_latched_prescale(ClockPrescale::default());
///
/// let mut master = I2cMaster::new(core, MockDelay::new(), MasterConfig::new("i2c"));
/// assert!(master.ping(0x50));
/// ```
#[derive(Debug, Default)]
pub struct SimulatedCore {
    prescale_low: u32,
    prescale_high: u32,
    control: u32,
    transmit: u32,
    receive: u32,
    rx_nack: bool,
    bus_busy: bool,
    selected: Option<(u8, bool)>,
    slaves: BTreeMap<u8, SimSlave>,
    queue: Vec<Pending>,
    log: Vec<RegOp>,
    commands: Vec<u8>,
    /// Status polls that still report transfer-in-progress after a command
    in_progress_polls: u32,
    tip_remaining: u32,
    arbitration_lost: bool,
    /// Status poll on which arbitration loss first shows, counted from 1
    arbitration_lost_after: Option<u32>,
    status_polls: u32,
    stuck_in_progress: bool,
    hold_busy: bool,
    fail_commits: bool,
}

impl SimulatedCore {
    /// Core with nothing latched (prescale 0, disabled) and no slaves
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a slave at `address`
    #[must_use]
    pub fn with_slave(mut self, address: u8, slave: SimSlave) -> Self {
        self.slaves.insert(address, slave);
        self
    }

    pub fn slave(&self, address: u8) -> Option<&SimSlave> {
        self.slaves.get(&address)
    }

    /// Pretend an earlier full reset latched `prescale` and enabled the core
    pub fn set_latched_prescale(&mut self, prescale: ClockPrescale) {
        self.prescale_high = u32::from(prescale.high());
        self.prescale_low = u32::from(prescale.low());
        self.control = CTRL_CORE_ENABLE;
    }

    pub fn latched_prescale(&self) -> ClockPrescale {
        ClockPrescale::from_bytes(self.prescale_high as u8, self.prescale_low as u8)
    }

    pub fn control(&self) -> u32 {
        self.control
    }

    pub fn bus_busy(&self) -> bool {
        self.bus_busy
    }

    pub fn log(&self) -> &[RegOp] {
        &self.log
    }

    pub fn clear_log(&mut self) {
        self.log.clear();
        self.commands.clear();
    }

    /// All queued writes, in order
    pub fn writes(&self) -> Vec<(Register, u32)> {
        self.log
            .iter()
            .filter_map(|op| match op {
                RegOp::Write(register, value) => Some((*register, *value)),
                _ => None,
            })
            .collect()
    }

    pub fn commit_count(&self) -> usize {
        self.log.iter().filter(|op| **op == RegOp::Commit).count()
    }

    /// Reads of the command/status register, i.e. completion polls
    pub fn status_reads(&self) -> usize {
        self.log
            .iter()
            .filter(|op| **op == RegOp::Read(Register::STATUS))
            .count()
    }

    /// Non-zero command bytes executed, in order
    pub fn commands(&self) -> Vec<u8> {
        self.commands.iter().copied().filter(|c| *c != 0).collect()
    }

    pub fn set_in_progress_polls(&mut self, polls: u32) {
        self.in_progress_polls = polls;
    }

    pub fn set_arbitration_lost(&mut self, lost: bool) {
        self.arbitration_lost = lost;
    }

    /// Report arbitration loss from the `polls`-th status read onwards
    pub fn set_arbitration_lost_after(&mut self, polls: u32) {
        self.arbitration_lost_after = Some(polls);
        self.status_polls = 0;
    }

    pub fn set_stuck_in_progress(&mut self, stuck: bool) {
        self.stuck_in_progress = stuck;
    }

    /// Keep the busy flag set after a stop
    pub fn set_hold_busy(&mut self, hold: bool) {
        self.hold_busy = hold;
    }

    pub fn set_fail_commits(&mut self, fail: bool) {
        self.fail_commits = fail;
    }

    fn status(&mut self) -> u32 {
        let in_progress = self.stuck_in_progress || self.tip_remaining > 0;
        self.tip_remaining = self.tip_remaining.saturating_sub(1);
        self.status_polls += 1;
        let arbitration_lost = self.arbitration_lost
            || self
                .arbitration_lost_after
                .is_some_and(|polls| self.status_polls >= polls);

        let mut status = Status::empty();
        status.set(Status::RX_NACK, self.rx_nack);
        status.set(Status::BUSY, self.bus_busy);
        status.set(Status::ARBITRATION_LOST, arbitration_lost);
        status.set(Status::TRANSFER_IN_PROGRESS, in_progress);
        u32::from(status.bits())
    }

    fn register_value(&mut self, register: Register) -> u32 {
        match register {
            Register::PrescaleLow => self.prescale_low,
            Register::PrescaleHigh => self.prescale_high,
            Register::Control => self.control,
            Register::Data => self.receive,
            Register::CommandStatus => self.status(),
        }
    }

    fn store(&mut self, register: Register, value: u32) {
        match register {
            Register::PrescaleLow => self.prescale_low = value,
            Register::PrescaleHigh => self.prescale_high = value,
            Register::Control => self.control = value,
            Register::Data => self.transmit = value,
            Register::CommandStatus => self.execute(value as u8),
        }
    }

    fn execute(&mut self, value: u8) {
        self.commands.push(value);
        let command = Command::from_bits_truncate(value);
        if command.is_empty() || self.control & CTRL_CORE_ENABLE == 0 {
            return;
        }

        if command.contains(Command::START) {
            self.bus_busy = true;
            self.selected = None;
        }

        if command.contains(Command::WRITE) {
            let byte = self.transmit as u8;
            let acked = if command.contains(Command::START) {
                let address = byte >> 1;
                let read = byte & 0x01 != 0;
                match self.slaves.get_mut(&address) {
                    Some(slave) => {
                        slave.start(read);
                        self.selected = Some((address, read));
                        true
                    }
                    None => false,
                }
            } else {
                match self.selected {
                    Some((address, false)) => match self.slaves.get_mut(&address) {
                        Some(slave) => {
                            slave.write(byte);
                            true
                        }
                        None => false,
                    },
                    _ => false,
                }
            };
            self.rx_nack = !acked;
        }

        if command.contains(Command::READ) {
            self.receive = match self.selected {
                Some((address, true)) => self
                    .slaves
                    .get_mut(&address)
                    .map_or(0xFF, |slave| slave.read()),
                _ => 0xFF,
            }
            .into();
        }

        if command.contains(Command::STOP) {
            self.bus_busy = self.hold_busy;
            self.selected = None;
        }

        self.tip_remaining = self.in_progress_polls;
    }
}

impl RegisterInterface for SimulatedCore {
    fn write(&mut self, register: Register, value: u32) {
        self.log.push(RegOp::Write(register, value));
        self.queue.push(Pending::Write(register, value));
    }

    fn read(&mut self, register: Register) -> ValWord {
        let word = ValWord::pending();
        self.log.push(RegOp::Read(register));
        self.queue.push(Pending::Read(register, word.clone()));
        word
    }

    fn commit(&mut self) -> DispatchResult<()> {
        self.log.push(RegOp::Commit);
        let queue = core::mem::take(&mut self.queue);
        if self.fail_commits {
            return Err(DispatchError::Failed);
        }
        for op in queue {
            match op {
                Pending::Write(register, value) => self.store(register, value),
                Pending::Read(register, word) => word.resolve(self.register_value(register)),
            }
        }
        Ok(())
    }
}

// =============================================================================
// Mock Delay
// =============================================================================

/// Mock delay for testing without actual timing
///
/// Records delays for verification without actually waiting.
#[derive(Debug, Default)]
pub struct MockDelay {
    calls: u32,
    total_ns: u64,
}

impl MockDelay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of delay calls
    pub fn calls(&self) -> u32 {
        self.calls
    }

    /// Total nanoseconds that were "delayed"
    pub fn total_ns(&self) -> u64 {
        self.total_ns
    }

    /// Total microseconds that were "delayed"
    pub fn total_us(&self) -> u64 {
        self.total_ns / 1_000
    }
}

impl embedded_hal::delay::DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.calls += 1;
        self.total_ns += u64::from(ns);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simulated_core_logs_and_resolves_in_order() {
        let mut core = SimulatedCore::new();
        core.write(Register::PrescaleHigh, 0x01);
        let hi = core.read(Register::PrescaleHigh);
        assert!(!hi.is_valid());

        core.commit().unwrap();
        assert_eq!(hi.value(), Some(0x01));
        assert_eq!(
            core.log(),
            [
                RegOp::Write(Register::PrescaleHigh, 0x01),
                RegOp::Read(Register::PrescaleHigh),
                RegOp::Commit,
            ]
        );
    }

    #[test]
    fn commands_ignored_while_disabled() {
        let mut core = SimulatedCore::new().with_slave(0x10, SimSlave::echo());
        core.write(Register::TRANSMIT, 0x20);
        core.write(Register::COMMAND, 0x90);
        core.commit().unwrap();

        assert!(!core.bus_busy());
    }

    #[test]
    fn address_phase_acks_present_slave() {
        let mut core = SimulatedCore::new().with_slave(0x10, SimSlave::echo());
        core.set_latched_prescale(ClockPrescale::default());

        core.write(Register::TRANSMIT, 0x20);
        core.write(Register::COMMAND, 0x90);
        let status = core.read(Register::STATUS);
        core.commit().unwrap();

        let status = Status::from_register(status.value().unwrap());
        assert!(status.ack_received());
        assert!(status.busy());
    }

    #[test]
    fn register_file_pointer_then_data() {
        let mut slave = SimSlave::register_file();
        slave.start(false);
        slave.write(0x10);
        slave.write(0xAB);
        slave.write(0xCD);
        assert_eq!(slave.memory(0x10), Some(0xAB));
        assert_eq!(slave.memory(0x11), Some(0xCD));

        slave.start(false);
        slave.write(0x10);
        slave.start(true);
        assert_eq!(slave.read(), 0xAB);
        assert_eq!(slave.read(), 0xCD);
    }

    #[test]
    fn tip_counts_down_per_status_read() {
        let mut core = SimulatedCore::new();
        core.tip_remaining = 2;

        assert!(Status::from_register(core.status()).transfer_in_progress());
        assert!(Status::from_register(core.status()).transfer_in_progress());
        assert!(!Status::from_register(core.status()).transfer_in_progress());
    }

    #[test]
    fn mock_delay_tracking() {
        let mut delay = MockDelay::new();

        embedded_hal::delay::DelayNs::delay_us(&mut delay, 10);
        embedded_hal::delay::DelayNs::delay_us(&mut delay, 10);

        assert_eq!(delay.total_us(), 20);
    }
}
