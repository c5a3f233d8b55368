//! Output switch state machine.
//!
//! A switch request moves the player between the local output and a
//! Bluetooth device. Device actions always run before the new output is
//! written to the session, so a failed activation never leaves the session
//! pointing at an output that is not actually active.
//!
//! Entering Bluetooth is strict: any failure aborts the request and leaves
//! the session untouched. Leaving Bluetooth still needs discovery to
//! succeed, but the disconnect itself is best-effort and its failure does
//! not block switching to Local.

use std::time::Duration;

use tracing::{debug, info, warn};

use crate::capability::{BluetoothAdapter, SinkConfigWriter};
use crate::device::BluetoothDevice;
use crate::error::SwitchError;
use crate::output::{OutputTarget, SwitchOutcome};
use crate::session::{AUDIO_OUT_FIELD, Session};

/// Default pause after a connect or disconnect command.
pub const DEFAULT_SETTLE: Duration = Duration::from_secs(1);

/// Switches the active audio output.
pub struct OutputSwitchController<A, W> {
    adapter: A,
    config: W,
    settle: Duration,
}

impl<A: BluetoothAdapter, W: SinkConfigWriter> OutputSwitchController<A, W> {
    /// Create a controller with the default settle delay.
    #[must_use]
    pub fn new(adapter: A, config: W) -> Self {
        Self { adapter, config, settle: DEFAULT_SETTLE }
    }

    /// Set the pause applied after connect and disconnect commands.
    ///
    /// The adapter gives no completion signal, so this is the only wait
    /// between issuing a command and reporting the switch as done.
    #[must_use]
    pub fn with_settle(mut self, settle: Duration) -> Self {
        self.settle = settle;
        self
    }

    /// The configured settle delay.
    #[must_use]
    pub fn settle(&self) -> Duration {
        self.settle
    }

    /// Read the active output, `Local` if none was recorded.
    ///
    /// # Errors
    /// Returns an error if the session cannot be read.
    pub fn current(&self, session: &dyn Session) -> Result<OutputTarget, SwitchError> {
        Ok(Self::stored_output(session)?.unwrap_or_default())
    }

    /// Validate a target name, then switch to it.
    ///
    /// An unknown name fails with [`SwitchError::InvalidTarget`] before the
    /// session is read.
    ///
    /// # Errors
    /// See [`Self::switch_output`].
    pub fn switch_output_named(
        &self,
        session: &mut dyn Session,
        requested: &str,
    ) -> Result<SwitchOutcome, SwitchError> {
        let target: OutputTarget = requested.parse()?;
        self.switch_output(session, target)
    }

    /// Switch the active output to `target`.
    ///
    /// # Errors
    /// - [`SwitchError::NoBluetoothDeviceAvailable`] if entering Bluetooth
    ///   with no device connected
    /// - [`SwitchError::DiscoveryAdapterFailure`] if listing connected
    ///   devices fails, in either direction
    /// - [`SwitchError::ConfigWriteFailure`] / [`SwitchError::ConnectCommandFailure`]
    ///   if a device action fails while entering Bluetooth
    /// - [`SwitchError::Store`] if the session cannot be read or written
    ///
    /// The session is never written when an error is returned.
    pub fn switch_output(
        &self,
        session: &mut dyn Session,
        target: OutputTarget,
    ) -> Result<SwitchOutcome, SwitchError> {
        let stored = Self::stored_output(session)?;

        if stored == Some(target) {
            debug!(%target, "Output already set");
            return Ok(SwitchOutcome::AlreadySet { target });
        }

        let current = stored.unwrap_or_default();
        info!(from = %current, to = %target, session = %session.id(), "Switching output");

        match target {
            OutputTarget::Bluetooth => self.enter_bluetooth()?,
            OutputTarget::Local if current == OutputTarget::Bluetooth => self.leave_bluetooth()?,
            OutputTarget::Local => {}
        }

        session.write_field(AUDIO_OUT_FIELD, target.as_str())?;
        info!(output = %target, "Output switched");

        Ok(SwitchOutcome::Switched { from: current, to: target })
    }

    /// Read the stored output. A missing field reads as `Local`; an
    /// unrecognised value reads as `None` so any request rewrites it.
    fn stored_output(session: &dyn Session) -> Result<Option<OutputTarget>, SwitchError> {
        match session.read_field(AUDIO_OUT_FIELD)? {
            None => Ok(Some(OutputTarget::default())),
            Some(value) => match value.parse() {
                Ok(target) => Ok(Some(target)),
                Err(_) => {
                    warn!(value = %value, "Unrecognised stored output");
                    Ok(None)
                }
            },
        }
    }

    fn first_connected(&self) -> Result<Option<BluetoothDevice>, SwitchError> {
        let devices =
            self.adapter.list_connected().map_err(SwitchError::DiscoveryAdapterFailure)?;
        debug!(count = devices.len(), "Connected Bluetooth devices");
        Ok(devices.into_iter().next())
    }

    fn enter_bluetooth(&self) -> Result<(), SwitchError> {
        let device = self.first_connected()?.ok_or(SwitchError::NoBluetoothDeviceAvailable)?;
        let mac = &device.mac;

        self.config.bind_device(mac).map_err(SwitchError::ConfigWriteFailure)?;
        info!(%mac, name = ?device.display_name, "Bluetooth stream bound to device");

        self.adapter.connect(mac).map_err(SwitchError::ConnectCommandFailure)?;
        info!(%mac, "Bluetooth connect issued");
        self.wait_settle();

        Ok(())
    }

    fn leave_bluetooth(&self) -> Result<(), SwitchError> {
        let Some(device) = self.first_connected()? else {
            debug!("No Bluetooth device connected, skipping disconnect");
            return Ok(());
        };

        match self.adapter.disconnect(&device.mac) {
            Ok(()) => {
                info!(mac = %device.mac, "Bluetooth disconnect issued");
                self.wait_settle();
            }
            Err(e) => {
                warn!(mac = %device.mac, error = %e, "Bluetooth disconnect failed");
            }
        }
        Ok(())
    }

    fn wait_settle(&self) {
        if !self.settle.is_zero() {
            debug!(settle_ms = self.settle.as_millis(), "Waiting for device to settle");
            std::thread::sleep(self.settle);
        }
    }
}
