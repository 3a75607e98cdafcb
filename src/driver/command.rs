//! Command and status register bits
//!
//! Command register (write side of `cmd_stat`):
//!
//! | Bit | Meaning                                     |
//! |-----|---------------------------------------------|
//! | 7   | Generate start condition                    |
//! | 6   | Generate stop condition                     |
//! | 5   | Read from slave                             |
//! | 4   | Write to slave                              |
//! | 3   | ACK field sent after a read (set = NACK)    |
//! | 0   | Interrupt acknowledge                       |
//!
//! Status register (read side of `cmd_stat`):
//!
//! | Bit | Meaning                                     |
//! |-----|---------------------------------------------|
//! | 7   | Received ACK, inverted: clear = ACK         |
//! | 6   | Bus busy (start seen, no stop yet)          |
//! | 5   | Arbitration lost                            |
//! | 1   | Transfer in progress                        |
//! | 0   | Interrupt pending                           |

use bitflags::bitflags;

bitflags! {
    /// Command byte written to the command register
    ///
    /// Exists only for one write/poll cycle.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Command: u8 {
        /// Generate (repeated) start condition
        const START = 1 << 7;
        /// Generate stop condition
        const STOP = 1 << 6;
        /// Read a byte from the slave
        const READ = 1 << 5;
        /// Write the data register to the slave
        const WRITE = 1 << 4;
        /// ACK field after a read; set on the final byte of a read
        const ACK = 1 << 3;
        /// Clear a pending interrupt
        const INTERRUPT_ACK = 1 << 0;
    }
}

bitflags! {
    /// Decoded status register
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Status: u8 {
        /// No acknowledge from the slave (inverted polarity)
        const RX_NACK = 1 << 7;
        /// Bus busy
        const BUSY = 1 << 6;
        /// Arbitration lost
        const ARBITRATION_LOST = 1 << 5;
        /// Transfer in progress
        const TRANSFER_IN_PROGRESS = 1 << 1;
        /// Interrupt pending
        const INTERRUPT = 1 << 0;
    }
}

impl Status {
    /// Decode the low byte of a status register read
    pub const fn from_register(value: u32) -> Self {
        Self::from_bits_truncate(value as u8)
    }

    /// Whether the slave acknowledged the last byte
    pub const fn ack_received(self) -> bool {
        !self.contains(Self::RX_NACK)
    }

    /// Whether the bus is still held between start and stop
    pub const fn busy(self) -> bool {
        self.contains(Self::BUSY)
    }

    /// Whether another master won the bus
    pub const fn arbitration_lost(self) -> bool {
        self.contains(Self::ARBITRATION_LOST)
    }

    /// Whether the current byte transfer is still running
    pub const fn transfer_in_progress(self) -> bool {
        self.contains(Self::TRANSFER_IN_PROGRESS)
    }
}
