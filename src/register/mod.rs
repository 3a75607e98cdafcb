//! Register interface of the I2C command/status core
//!
//! The engine never touches hardware directly. It queues register reads and
//! writes on a [`RegisterInterface`] and flushes them with
//! [`RegisterInterface::commit`]. Reads return a [`ValWord`] that only holds
//! a value once the commit that carried it has completed.
//!
//! Operations queued between two commits are applied in enqueue order, so
//! a read queued after a write observes that write.

mod mmio;

pub use mmio::MmioRegisters;

use alloc::sync::Arc;
use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use crate::error::DispatchResult;

// =============================================================================
// Register Names
// =============================================================================

/// Registers of the command/status core
///
/// Transmit/receive data share one register, as do command/status: writes
/// go to the first, reads come from the second.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Register {
    /// Clock prescale, low byte
    PrescaleLow,
    /// Clock prescale, high byte
    PrescaleHigh,
    /// Control (core enable)
    Control,
    /// Transmit data on write, received data on read
    Data,
    /// Command on write, status on read
    CommandStatus,
}

impl Register {
    /// Transmit data register
    pub const TRANSMIT: Self = Register::Data;
    /// Receive data register
    pub const RECEIVE: Self = Register::Data;
    /// Command register
    pub const COMMAND: Self = Register::CommandStatus;
    /// Status register
    pub const STATUS: Self = Register::CommandStatus;

    /// All registers, in address order
    pub const ALL: [Register; 5] = [
        Register::PrescaleLow,
        Register::PrescaleHigh,
        Register::Control,
        Register::Data,
        Register::CommandStatus,
    ];

    /// Node name of the register in the board address table
    pub const fn name(self) -> &'static str {
        match self {
            Register::PrescaleLow => "ps_lo",
            Register::PrescaleHigh => "ps_hi",
            Register::Control => "ctrl",
            Register::Data => "data",
            Register::CommandStatus => "cmd_stat",
        }
    }

    /// Word offset of the register inside the core
    pub const fn offset(self) -> usize {
        match self {
            Register::PrescaleLow => 0,
            Register::PrescaleHigh => 1,
            Register::Control => 2,
            Register::Data => 3,
            Register::CommandStatus => 4,
        }
    }

    /// Look a register up by its address-table node name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.name() == name)
    }
}

// =============================================================================
// Deferred Read Handle
// =============================================================================

/// Deferred result of a queued register read
///
/// Cloning shares the slot: the register interface keeps one clone and
/// resolves it during [`RegisterInterface::commit`].
///
/// The slot is atomic, so a register interface holding queued reads stays
/// `Send` and can be shared behind a critical section.
#[derive(Debug, Clone, Default)]
pub struct ValWord {
    slot: Arc<Slot>,
}

#[derive(Debug, Default)]
struct Slot {
    value: AtomicU32,
    valid: AtomicBool,
}

impl ValWord {
    /// Create an unresolved handle
    pub fn pending() -> Self {
        Self::default()
    }

    /// Store the value read from hardware
    pub fn resolve(&self, value: u32) {
        self.slot.value.store(value, Ordering::Relaxed);
        self.slot.valid.store(true, Ordering::Release);
    }

    /// The value, if the carrying commit has completed
    pub fn value(&self) -> Option<u32> {
        self.slot
            .valid
            .load(Ordering::Acquire)
            .then(|| self.slot.value.load(Ordering::Relaxed))
    }

    /// Whether the value is available
    pub fn is_valid(&self) -> bool {
        self.value().is_some()
    }
}

// =============================================================================
// Register Interface Trait
// =============================================================================

/// Batched access to the core's registers
///
/// Implementations exist for directly mapped cores ([`MmioRegisters`]) and
/// can be written for remote transports that ship a whole queue per
/// round-trip.
pub trait RegisterInterface {
    /// Queue a register write
    fn write(&mut self, register: Register, value: u32);

    /// Queue a register read
    fn read(&mut self, register: Register) -> ValWord;

    /// Apply all queued operations in order and resolve their reads
    fn commit(&mut self) -> DispatchResult<()>;
}

impl<T: RegisterInterface + ?Sized> RegisterInterface for &mut T {
    fn write(&mut self, register: Register, value: u32) {
        (**self).write(register, value);
    }

    fn read(&mut self, register: Register) -> ValWord {
        (**self).read(register)
    }

    fn commit(&mut self) -> DispatchResult<()> {
        (**self).commit()
    }
}
