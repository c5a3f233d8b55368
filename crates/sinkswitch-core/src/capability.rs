//! Device-level capabilities the controllers drive.
//!
//! Implementations live outside the core (process invocation, config
//! files, service managers) so the state machines stay testable.

use crate::device::{BluetoothDevice, MacAddress};
use crate::error::DeviceResult;

/// Bluetooth adapter control.
#[cfg_attr(test, mockall::automock)]
pub trait BluetoothAdapter {
    /// List currently connected devices in adapter order. Read-only.
    ///
    /// # Errors
    /// Returns an error if the discovery command itself fails.
    fn list_connected(&self) -> DeviceResult<Vec<BluetoothDevice>>;

    /// Ask the adapter to connect a device. Returns once the command is
    /// issued, not when the link is up.
    ///
    /// # Errors
    /// Returns an error if the connect command fails.
    fn connect(&self, mac: &MacAddress) -> DeviceResult<()>;

    /// Ask the adapter to disconnect a device.
    ///
    /// # Errors
    /// Returns an error if the disconnect command fails.
    fn disconnect(&self, mac: &MacAddress) -> DeviceResult<()>;
}

/// Writes which physical device the Bluetooth output stream binds to.
#[cfg_attr(test, mockall::automock)]
pub trait SinkConfigWriter {
    /// Bind the Bluetooth stream to `mac`, replacing any previous binding.
    ///
    /// # Errors
    /// Returns an error if the config cannot be read or written.
    fn bind_device(&self, mac: &MacAddress) -> DeviceResult<()>;
}

/// Starts and stops system services by unit name.
///
/// Both operations are expected to be idempotent.
#[cfg_attr(test, mockall::automock)]
pub trait ServiceManager {
    /// Start a service unit.
    ///
    /// # Errors
    /// Returns an error if the service manager reports a failure.
    fn start(&self, unit: &str) -> DeviceResult<()>;

    /// Stop a service unit.
    ///
    /// # Errors
    /// Returns an error if the service manager reports a failure.
    fn stop(&self, unit: &str) -> DeviceResult<()>;
}
