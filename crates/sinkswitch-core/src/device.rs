//! Bluetooth device identity.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DeviceError;

/// A validated Bluetooth MAC address (`AA:BB:CC:DD:EE:FF`).
///
/// Case is preserved as reported by the adapter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MacAddress(String);

impl MacAddress {
    /// Length of the textual form, six two-digit groups and five colons.
    pub const LEN: usize = 17;

    /// Get the address as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn is_valid(s: &str) -> bool {
        s.len() == Self::LEN
            && s.split(':').count() == 6
            && s.split(':').all(|group| {
                group.len() == 2 && group.bytes().all(|b| b.is_ascii_hexdigit())
            })
    }
}

impl FromStr for MacAddress {
    type Err = DeviceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if Self::is_valid(s) {
            Ok(Self(s.to_string()))
        } else {
            Err(DeviceError::InvalidMac(s.to_string()))
        }
    }
}

impl TryFrom<String> for MacAddress {
    type Error = DeviceError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if Self::is_valid(&value) { Ok(Self(value)) } else { Err(DeviceError::InvalidMac(value)) }
    }
}

impl From<MacAddress> for String {
    fn from(mac: MacAddress) -> Self {
        mac.0
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A connected Bluetooth device as reported by discovery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BluetoothDevice {
    /// Device address
    pub mac: MacAddress,
    /// Name shown by the adapter, if any
    pub display_name: Option<String>,
}

impl BluetoothDevice {
    /// Create a device with an optional display name.
    #[must_use]
    pub fn new(mac: MacAddress, display_name: Option<String>) -> Self {
        Self { mac, display_name }
    }
}
