//! Controllers running against the SQLite session store.

use std::cell::RefCell;
use std::time::Duration;

use sinkswitch_core::error::{DeviceError, DeviceResult};
use sinkswitch_core::{
    BluetoothAdapter, BluetoothDevice, MacAddress, OutputSwitchController, OutputTarget,
    RendererController, RendererUnits, ServiceManager, Session, SinkConfigWriter, SwitchError,
    SwitchOutcome,
};
use sinkswitch_db::Database;

const SESSION: &str = "9f8e7d";

/// Records every device call in order.
#[derive(Default)]
struct Recorder {
    calls: RefCell<Vec<String>>,
    connected: RefCell<Vec<BluetoothDevice>>,
    fail_bind: bool,
}

impl Recorder {
    fn with_devices(macs: &[&str]) -> Self {
        let devices = macs
            .iter()
            .map(|mac| BluetoothDevice::new(mac.parse().unwrap(), None))
            .collect();
        Self { connected: RefCell::new(devices), ..Self::default() }
    }

    fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }
}

impl BluetoothAdapter for &Recorder {
    fn list_connected(&self) -> DeviceResult<Vec<BluetoothDevice>> {
        self.calls.borrow_mut().push("list".into());
        Ok(self.connected.borrow().clone())
    }

    fn connect(&self, mac: &MacAddress) -> DeviceResult<()> {
        self.calls.borrow_mut().push(format!("connect {mac}"));
        Ok(())
    }

    fn disconnect(&self, mac: &MacAddress) -> DeviceResult<()> {
        self.calls.borrow_mut().push(format!("disconnect {mac}"));
        self.connected.borrow_mut().retain(|d| &d.mac != mac);
        Ok(())
    }
}

impl SinkConfigWriter for &Recorder {
    fn bind_device(&self, mac: &MacAddress) -> DeviceResult<()> {
        self.calls.borrow_mut().push(format!("bind {mac}"));
        if self.fail_bind {
            let denied = std::io::Error::from(std::io::ErrorKind::PermissionDenied);
            return Err(DeviceError::Io(denied));
        }
        Ok(())
    }
}

impl ServiceManager for &Recorder {
    fn start(&self, unit: &str) -> DeviceResult<()> {
        self.calls.borrow_mut().push(format!("start {unit}"));
        Ok(())
    }

    fn stop(&self, unit: &str) -> DeviceResult<()> {
        self.calls.borrow_mut().push(format!("stop {unit}"));
        Ok(())
    }
}

fn database() -> Database {
    let db = Database::open_in_memory().unwrap();
    db.create_session(SESSION).unwrap();
    db.set_active_session(SESSION).unwrap();
    db
}

fn switch(
    db: &mut Database,
    devices: &Recorder,
    target: &str,
) -> Result<SwitchOutcome, SwitchError> {
    let ctl = OutputSwitchController::new(devices, devices).with_settle(Duration::ZERO);
    let id = db.active_session_id().unwrap().unwrap();
    let mut session = db.open_session(&id).unwrap();
    let result = ctl.switch_output_named(&mut session, target);
    session.close().unwrap();
    result
}

#[test]
fn test_round_trip_local_bluetooth_local() {
    let mut db = database();
    let devices = Recorder::with_devices(&["AA:BB:CC:DD:EE:01", "AA:BB:CC:DD:EE:02"]);

    let outcome = switch(&mut db, &devices, "Bluetooth").unwrap();
    assert_eq!(
        outcome,
        SwitchOutcome::Switched { from: OutputTarget::Local, to: OutputTarget::Bluetooth }
    );
    assert_eq!(db.system_value("audioout").unwrap().as_deref(), Some("Bluetooth"));

    let outcome = switch(&mut db, &devices, "Bluetooth").unwrap();
    assert_eq!(outcome, SwitchOutcome::AlreadySet { target: OutputTarget::Bluetooth });

    let outcome = switch(&mut db, &devices, "Local").unwrap();
    assert_eq!(
        outcome,
        SwitchOutcome::Switched { from: OutputTarget::Bluetooth, to: OutputTarget::Local }
    );
    assert_eq!(db.system_value("audioout").unwrap().as_deref(), Some("Local"));

    assert_eq!(
        devices.calls(),
        vec![
            "list",
            "bind AA:BB:CC:DD:EE:01",
            "connect AA:BB:CC:DD:EE:01",
            "list",
            "disconnect AA:BB:CC:DD:EE:01",
        ]
    );
}

#[test]
fn test_no_device_keeps_local_in_database() {
    let mut db = database();
    let devices = Recorder::default();

    let result = switch(&mut db, &devices, "Bluetooth");

    assert!(matches!(result, Err(SwitchError::NoBluetoothDeviceAvailable)));
    assert_eq!(db.system_value("audioout").unwrap().as_deref(), Some("Local"));
    assert_eq!(devices.calls(), vec!["list"]);
}

#[test]
fn test_bind_failure_keeps_local_in_database() {
    let mut db = database();
    let devices = Recorder { fail_bind: true, ..Recorder::with_devices(&["AA:BB:CC:DD:EE:01"]) };

    let result = switch(&mut db, &devices, "Bluetooth");

    assert!(matches!(result, Err(SwitchError::ConfigWriteFailure(_))));
    assert_eq!(db.system_value("audioout").unwrap().as_deref(), Some("Local"));
    assert_eq!(devices.calls(), vec!["list", "bind AA:BB:CC:DD:EE:01"]);
}

#[test]
fn test_renderer_flags_persist() {
    let mut db = database();
    let services = Recorder::default();
    let ctl = RendererController::new(&services, RendererUnits::default());

    let mut session = db.open_session(SESSION).unwrap();
    ctl.toggle_named(&mut session, "bluetooth", "on").unwrap();
    ctl.toggle_named(&mut session, "upnp", "off").unwrap();
    assert!(ctl.toggle_named(&mut session, "tidal", "on").is_err());
    session.close().unwrap();

    assert_eq!(db.system_value("btsvc").unwrap().as_deref(), Some("1"));
    assert_eq!(db.system_value("upnpsvc").unwrap().as_deref(), Some("0"));
    assert_eq!(services.calls(), vec!["start bluetooth", "start bluealsa", "stop upmpdcli"]);

    let session = db.open_session(SESSION).unwrap();
    let flags = ctl.status(&session).unwrap();
    assert!(flags.bluetooth);
    assert!(!flags.upnp);
    assert_eq!(session.id(), SESSION);
}
