//! Slave address registry
//!
//! Maps device names to 7-bit bus addresses. Built once from the board
//! configuration when the master is constructed and read-only afterwards.

use alloc::collections::BTreeMap;
use alloc::string::String;

use crate::constants::ADDRESS_MASK;
use crate::error::{Error, Result};

/// Parse a configured address string into a 7-bit address
///
/// Accepts decimal or `0x`-prefixed hexadecimal. Values above 0x7F are
/// masked, not rejected: `"200"` yields `0x48`. Board configuration files
/// depend on this truncation.
pub fn parse_slave_address(value: &str) -> Option<u8> {
    let value = value.trim();
    let parsed = match value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
    {
        Some(hex) => u32::from_str_radix(hex, 16).ok()?,
        None => value.parse::<u32>().ok()?,
    };
    Some((parsed & ADDRESS_MASK) as u8)
}

/// Name to address map of the devices on one bus
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlaveRegistry {
    addresses: BTreeMap<String, u8>,
}

impl SlaveRegistry {
    /// Build from `(name, address string)` pairs
    ///
    /// A repeated name keeps the last address given for it.
    pub fn from_config<I, K, V>(slaves: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut addresses = BTreeMap::new();
        for (name, value) in slaves {
            let (name, value) = (name.as_ref(), value.as_ref());
            let Some(address) = parse_slave_address(value) else {
                return Err(Error::InvalidSlaveAddress {
                    name: String::from(name),
                    value: String::from(value),
                });
            };
            addresses.insert(String::from(name), address);
        }
        Ok(Self { addresses })
    }

    /// Address registered for `name`
    pub fn address(&self, name: &str) -> Option<u8> {
        self.addresses.get(name).copied()
    }

    /// Whether `name` is registered
    pub fn contains(&self, name: &str) -> bool {
        self.addresses.contains_key(name)
    }

    /// Registered names, sorted
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.addresses.keys().map(String::as_str)
    }

    /// `(name, address)` pairs, sorted by name
    pub fn iter(&self) -> impl Iterator<Item = (&str, u8)> {
        self.addresses.iter().map(|(name, addr)| (name.as_str(), *addr))
    }

    /// Number of registered devices
    pub fn len(&self) -> usize {
        self.addresses.len()
    }

    /// Whether no device is registered
    pub fn is_empty(&self) -> bool {
        self.addresses.is_empty()
    }
}
