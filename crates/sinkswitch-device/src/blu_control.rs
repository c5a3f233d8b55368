//! Bluetooth adapter backed by the player's `blu-control` script.
//!
//! Flags used: `-c` lists connected devices, `-C <mac>` connects and
//! `-d <mac>` disconnects.

use sinkswitch_core::capability::BluetoothAdapter;
use sinkswitch_core::device::{BluetoothDevice, MacAddress};
use sinkswitch_core::discovery::parse_device_list;
use sinkswitch_core::error::DeviceResult;
use tracing::{debug, info};

use crate::command::CommandLine;

/// Default location of the control script.
pub const DEFAULT_BLU_CONTROL: &str = "/var/www/util/blu-control.sh";

/// `blu-control` backed adapter.
#[derive(Debug, Clone)]
pub struct BluControl {
    command: CommandLine,
}

impl BluControl {
    /// Create an adapter running the given command line.
    #[must_use]
    pub fn new(command: CommandLine) -> Self {
        Self { command }
    }
}

impl BluetoothAdapter for BluControl {
    fn list_connected(&self) -> DeviceResult<Vec<BluetoothDevice>> {
        let output = self.command.run(&["-c"])?;
        let devices = parse_device_list(&output);
        debug!(count = devices.len(), "Listed connected Bluetooth devices");
        Ok(devices)
    }

    fn connect(&self, mac: &MacAddress) -> DeviceResult<()> {
        self.command.run(&["-C", mac.as_str()])?;
        info!(%mac, "Connect command sent");
        Ok(())
    }

    fn disconnect(&self, mac: &MacAddress) -> DeviceResult<()> {
        self.command.run(&["-d", mac.as_str()])?;
        info!(%mac, "Disconnect command sent");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use sinkswitch_core::error::DeviceError;

    fn script(body: &str) -> BluControl {
        BluControl::new(
            CommandLine::new(vec!["sh".into(), "-c".into(), body.into(), "blu-control".into()])
                .unwrap(),
        )
    }

    #[test]
    fn test_list_connected_parses_output() {
        let adapter = script(
            r#"test "$1" = "-c" || exit 9
echo "Connected devices"
echo "================="
echo "** AA:BB:CC:DD:EE:01 Kitchen"
echo "** AA:BB:CC:DD:EE:02 Desk""#,
        );

        let devices = adapter.list_connected().unwrap();
        assert_eq!(devices.len(), 2);
        assert_eq!(devices[0].mac.as_str(), "AA:BB:CC:DD:EE:01");
        assert_eq!(devices[0].display_name.as_deref(), Some("Kitchen"));
    }

    #[test]
    fn test_list_connected_empty() {
        let adapter = script(r#"echo "Connected devices""#);
        assert!(adapter.list_connected().unwrap().is_empty());
    }

    #[test]
    fn test_connect_passes_flag_and_mac() {
        let adapter = script(r#"test "$1" = "-C" && test "$2" = "AA:BB:CC:DD:EE:01""#);
        let mac: MacAddress = "AA:BB:CC:DD:EE:01".parse().unwrap();
        adapter.connect(&mac).unwrap();
    }

    #[test]
    fn test_disconnect_failure_surfaces() {
        let adapter = script(r#"test "$1" = "-d" && exit 1"#);
        let mac: MacAddress = "AA:BB:CC:DD:EE:01".parse().unwrap();
        assert_matches!(adapter.disconnect(&mac), Err(DeviceError::CommandFailed { .. }));
    }
}
