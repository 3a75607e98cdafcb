//! Memory-mapped register interface
//!
//! Queues operations and applies them with volatile accesses on commit.

use alloc::vec::Vec;

use super::{Register, RegisterInterface, ValWord};
use crate::error::DispatchResult;

/// Queued operation
#[derive(Debug)]
enum Pending {
    Write(Register, u32),
    Read(Register, ValWord),
}

/// Register interface for a core mapped directly into the address space
///
/// Register `r` lives at `base + r.offset() * stride`. All accesses are
/// 32-bit volatile.
#[derive(Debug)]
pub struct MmioRegisters {
    base: usize,
    stride: usize,
    queue: Vec<Pending>,
}

impl MmioRegisters {
    /// Create a register interface for a core at `base`
    ///
    /// # Safety
    ///
    /// `base + offset * stride` must be a valid, 4-byte aligned register
    /// address for every [`Register`], for as long as this value is used,
    /// and nothing else may access those registers concurrently.
    pub const unsafe fn new(base: usize, stride: usize) -> Self {
        Self {
            base,
            stride,
            queue: Vec::new(),
        }
    }

    /// Number of operations waiting for the next commit
    pub fn queued(&self) -> usize {
        self.queue.len()
    }

    #[inline(always)]
    fn address(&self, register: Register) -> usize {
        self.base + register.offset() * self.stride
    }
}

/// Read a 32-bit register at the given address
///
/// # Safety
/// The caller must ensure the address is valid and properly aligned.
#[inline(always)]
unsafe fn read_reg(addr: usize) -> u32 {
    unsafe { core::ptr::read_volatile(addr as *const u32) }
}

/// Write a 32-bit value to a register at the given address
///
/// # Safety
/// The caller must ensure the address is valid and properly aligned.
#[inline(always)]
unsafe fn write_reg(addr: usize, value: u32) {
    unsafe { core::ptr::write_volatile(addr as *mut u32, value) }
}

impl RegisterInterface for MmioRegisters {
    fn write(&mut self, register: Register, value: u32) {
        self.queue.push(Pending::Write(register, value));
    }

    fn read(&mut self, register: Register) -> ValWord {
        let word = ValWord::pending();
        self.queue.push(Pending::Read(register, word.clone()));
        word
    }

    fn commit(&mut self) -> DispatchResult<()> {
        let queue = core::mem::take(&mut self.queue);
        for op in queue {
            match op {
                Pending::Write(register, value) => {
                    // SAFETY: address validity guaranteed by the constructor contract
                    unsafe { write_reg(self.address(register), value) }
                }
                Pending::Read(register, word) => {
                    // SAFETY: address validity guaranteed by the constructor contract
                    word.resolve(unsafe { read_reg(self.address(register)) });
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operations_wait_for_commit() {
        let mut block = [0u32; 5];
        // SAFETY: `block` outlives `regs` and holds one word per register
        let mut regs = unsafe { MmioRegisters::new(block.as_mut_ptr() as usize, 4) };

        regs.write(Register::Control, 0x80);
        let ctrl = regs.read(Register::Control);
        assert_eq!(regs.queued(), 2);
        assert!(!ctrl.is_valid());

        regs.commit().unwrap();
        assert_eq!(regs.queued(), 0);
        // Read queued after the write observes it
        assert_eq!(ctrl.value(), Some(0x80));
        assert_eq!(block[Register::Control.offset()], 0x80);
    }

    #[test]
    fn stride_spaces_registers() {
        let mut block = [0u32; 10];
        // SAFETY: `block` outlives `regs`; stride 8 keeps offset 4 in bounds
        let mut regs = unsafe { MmioRegisters::new(block.as_mut_ptr() as usize, 8) };

        regs.write(Register::PrescaleHigh, 0x12);
        regs.write(Register::CommandStatus, 0x34);
        regs.commit().unwrap();

        assert_eq!(block[2], 0x12);
        assert_eq!(block[8], 0x34);
    }

    #[test]
    fn commit_applies_in_enqueue_order() {
        let mut block = [0u32; 5];
        // SAFETY: `block` outlives `regs` and holds one word per register
        let mut regs = unsafe { MmioRegisters::new(block.as_mut_ptr() as usize, 4) };

        let before = regs.read(Register::Data);
        regs.write(Register::Data, 7);
        let after = regs.read(Register::Data);
        regs.commit().unwrap();

        assert_eq!(before.value(), Some(0));
        assert_eq!(after.value(), Some(7));
    }
}
