//! ISR-safe master wrapper using critical sections.
//!
//! Provides [`SharedI2cMaster`] for callers that share one bus between
//! tasks or interrupt handlers.

use embedded_hal::delay::DelayNs;

use super::primitives::CriticalSectionCell;
use crate::driver::master::I2cMaster;
use crate::register::RegisterInterface;

/// ISR-safe I2C master slot using critical sections.
///
/// The slot starts empty so it can live in a `static`; [`install`] moves a
/// master in once its register interface exists. All access goes through
/// `critical_section::with()`, so a whole transaction runs with interrupts
/// disabled and two clients can never interleave on the bus.
///
/// [`install`]: SharedI2cMaster::install
///
/// # Example
///
/// ```ignore
/// static I2C: SharedI2cMaster<MmioRegisters, Delay> = SharedI2cMaster::new();
///
/// I2C.install(I2cMaster::new(regs, delay, MasterConfig::new("i2c")));
///
/// let present = I2C.with(|i2c| i2c.ping(0x50)).unwrap_or(false);
/// ```
pub struct SharedI2cMaster<R: RegisterInterface, D: DelayNs> {
    inner: CriticalSectionCell<Option<I2cMaster<R, D>>>,
}

impl<R: RegisterInterface, D: DelayNs> SharedI2cMaster<R, D> {
    /// Create an empty slot (const, suitable for static initialization).
    pub const fn new() -> Self {
        Self {
            inner: CriticalSectionCell::new(None),
        }
    }

    /// Create a slot already holding `master`.
    pub fn from_master(master: I2cMaster<R, D>) -> Self {
        Self {
            inner: CriticalSectionCell::new(Some(master)),
        }
    }

    /// Move `master` into the slot, returning the one it replaces.
    pub fn install(&self, master: I2cMaster<R, D>) -> Option<I2cMaster<R, D>> {
        self.inner.with(|slot| slot.replace(master))
    }

    /// Move the master out, leaving the slot empty.
    pub fn take(&self) -> Option<I2cMaster<R, D>> {
        self.inner.with(Option::take)
    }

    /// Whether a master is installed.
    pub fn is_installed(&self) -> bool {
        self.inner.with(|slot| slot.is_some())
    }

    /// Execute a closure with exclusive access to the master.
    ///
    /// Returns `None` when no master is installed. Interrupts are disabled
    /// for the duration of the closure.
    #[inline]
    pub fn with<T, F>(&self, f: F) -> Option<T>
    where
        F: FnOnce(&mut I2cMaster<R, D>) -> T,
    {
        self.inner.with(|slot| slot.as_mut().map(f))
    }

    /// Try to execute a closure, returning `None` if already borrowed or
    /// empty.
    #[inline]
    pub fn try_with<T, F>(&self, f: F) -> Option<T>
    where
        F: FnOnce(&mut I2cMaster<R, D>) -> T,
    {
        self.inner
            .try_with(|slot| slot.as_mut().map(f))
            .flatten()
    }
}

impl<R: RegisterInterface, D: DelayNs> Default for SharedI2cMaster<R, D> {
    fn default() -> Self {
        Self::new()
    }
}
