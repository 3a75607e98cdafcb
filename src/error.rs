//! Error types for the I2C master engine
//!
//! Errors are organized by domain for better diagnostics:
//! - [`BusError`]: I2C protocol failures observed in the status register
//! - [`DispatchError`]: Register interface commit failures
//! - [`ConfigError`]: Clock prescale configuration failures
//!
//! The unified [`Error`] enum wraps all domain errors together with the
//! identifying context (bus id, device name) and is returned by most
//! master methods.

use alloc::string::String;

// =============================================================================
// Bus Errors
// =============================================================================

/// I2C bus protocol errors
///
/// Each one is fatal to the transaction in flight. The master never retries
/// on its own; retry policy belongs to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusError {
    /// Another master won control of the bus
    ArbitrationLost,
    /// Transfer-in-progress never cleared within the retry budget
    TransactionTimeout,
    /// Slave did not acknowledge a written byte
    NoAcknowledgeReceived,
    /// Transfer finished but the bus did not return idle after a stop
    TransferFinishedBusStillBusy,
}

impl core::fmt::Display for BusError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl BusError {
    /// Returns a human-readable description of the error
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            BusError::ArbitrationLost => "bus arbitration lost",
            BusError::TransactionTimeout => "transaction timed out",
            BusError::NoAcknowledgeReceived => "no acknowledge received",
            BusError::TransferFinishedBusStillBusy => "transfer finished but bus still busy",
        }
    }
}

// =============================================================================
// Dispatch Errors
// =============================================================================

/// Register interface errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DispatchError {
    /// The queued register operations could not be committed
    Failed,
    /// A deferred read was still invalid after a successful commit
    Unresolved,
}

impl core::fmt::Display for DispatchError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl DispatchError {
    /// Returns a human-readable description of the error
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            DispatchError::Failed => "register dispatch failed",
            DispatchError::Unresolved => "deferred read not resolved by dispatch",
        }
    }
}

// =============================================================================
// Configuration Errors
// =============================================================================

/// Clock configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Target I2C frequency is zero
    InvalidFrequency,
    /// Computed prescale does not fit the 16-bit prescale registers
    PrescaleOutOfRange,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ConfigError {
    /// Returns a human-readable description of the error
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            ConfigError::InvalidFrequency => "invalid target frequency",
            ConfigError::PrescaleOutOfRange => "clock prescale out of range",
        }
    }
}

// =============================================================================
// Unified Error Type
// =============================================================================

/// This enum wraps all domain-specific errors for unified error handling.
///
/// Match on the variant for specific handling:
/// ```ignore
/// match result {
///     Err(Error::Bus { kind: BusError::NoAcknowledgeReceived, .. }) => { /* ... */ }
///     Err(Error::DeviceNotFound { name, .. }) => { /* optional device */ }
///     Err(e) => return Err(e),
///     Ok(v) => { /* ... */ }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Bus protocol failure on the named bus
    Bus {
        /// Identifier of the master that observed the failure
        bus: String,
        /// What went wrong
        kind: BusError,
    },
    /// Requested device name is absent from the slave registry
    DeviceNotFound {
        /// Identifier of the master that was asked
        bus: String,
        /// The requested device name
        name: String,
    },
    /// Slave address string in the configuration could not be parsed
    InvalidSlaveAddress {
        /// Device name the address was configured for
        name: String,
        /// The offending address string
        value: String,
    },
    /// A bus returned fewer bytes than were requested
    ShortRead {
        /// Device address that was read
        address: u8,
        /// Bytes requested
        expected: usize,
        /// Bytes returned
        received: usize,
    },
    /// Configuration error
    Config(ConfigError),
    /// Register interface error
    Dispatch(DispatchError),
}

impl Error {
    /// Returns the bus error kind, if this is a bus protocol failure
    pub const fn bus_error(&self) -> Option<BusError> {
        match self {
            Error::Bus { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    /// Whether this is a bus protocol failure
    pub const fn is_bus_error(&self) -> bool {
        matches!(self, Error::Bus { .. })
    }

    pub(crate) fn bus(bus: &str, kind: BusError) -> Self {
        Error::Bus {
            bus: String::from(bus),
            kind,
        }
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::Bus { bus, kind } => write!(f, "i2c bus '{bus}': {}", kind.as_str()),
            Error::DeviceNotFound { bus, name } => {
                write!(f, "i2c bus '{bus}': device '{name}' not found")
            }
            Error::InvalidSlaveAddress { name, value } => {
                write!(f, "config: invalid address '{value}' for device '{name}'")
            }
            Error::ShortRead {
                address,
                expected,
                received,
            } => write!(
                f,
                "i2c device {address:#04x}: read returned {received} of {expected} bytes"
            ),
            Error::Config(e) => write!(f, "config: {}", e.as_str()),
            Error::Dispatch(e) => write!(f, "dispatch: {}", e.as_str()),
        }
    }
}

impl core::error::Error for Error {}

// From impls for automatic conversion
impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Error::Config(e)
    }
}

impl From<DispatchError> for Error {
    fn from(e: DispatchError) -> Self {
        Error::Dispatch(e)
    }
}

/// Result type alias for master operations
pub type Result<T> = core::result::Result<T, Error>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = core::result::Result<T, ConfigError>;

/// Result type alias for register interface operations
pub type DispatchResult<T> = core::result::Result<T, DispatchError>;

// =============================================================================
// Unit Tests
// =============================================================================
