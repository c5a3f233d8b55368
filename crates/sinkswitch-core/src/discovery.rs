//! Parsing of Bluetooth adapter device listings.
//!
//! The control tool prints one device per line in the form
//! `** AA:BB:CC:DD:EE:FF Device Name`, mixed with header and status lines.
//! Only lines carrying the two-character marker followed by a MAC address
//! are devices; everything else is ignored.

use std::sync::OnceLock;

use regex::Regex;
use tracing::{debug, warn};

use crate::device::{BluetoothDevice, MacAddress};

const DEVICE_LINE_PATTERN: &str =
    r"^\*\*\s*((?:[0-9A-Fa-f]{2}:){5}[0-9A-Fa-f]{2})(?:\s+(.*?))?\s*$";

fn device_line_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| match Regex::new(DEVICE_LINE_PATTERN) {
        Ok(re) => Some(re),
        Err(e) => {
            warn!(error = %e, "Invalid device line pattern");
            None
        }
    })
    .as_ref()
}

/// Parse a single listing line into a device, if it is a device line.
#[must_use]
pub fn parse_device_line(line: &str) -> Option<BluetoothDevice> {
    let caps = device_line_regex()?.captures(line)?;
    let mac: MacAddress = caps.get(1)?.as_str().parse().ok()?;
    let display_name =
        caps.get(2).map(|m| m.as_str().trim()).filter(|s| !s.is_empty()).map(str::to_string);

    Some(BluetoothDevice::new(mac, display_name))
}

/// Parse a full listing, keeping the adapter's line order.
///
/// Callers that need a single device take the first entry.
#[must_use]
pub fn parse_device_list(output: &str) -> Vec<BluetoothDevice> {
    let devices: Vec<_> = output.lines().filter_map(parse_device_line).collect();
    debug!(count = devices.len(), "Parsed Bluetooth device listing");
    devices
}
