//! Service manager backed by `systemctl`.

use sinkswitch_core::capability::ServiceManager;
use sinkswitch_core::error::DeviceResult;
use tracing::info;

use crate::command::CommandLine;

/// Runs `<command> start|stop <unit>`.
#[derive(Debug, Clone)]
pub struct Systemctl {
    command: CommandLine,
}

impl Systemctl {
    /// Create a service manager running the given command line.
    #[must_use]
    pub fn new(command: CommandLine) -> Self {
        Self { command }
    }
}

impl ServiceManager for Systemctl {
    fn start(&self, unit: &str) -> DeviceResult<()> {
        self.command.run(&["start", unit])?;
        info!(unit, "Service started");
        Ok(())
    }

    fn stop(&self, unit: &str) -> DeviceResult<()> {
        self.command.run(&["stop", unit])?;
        info!(unit, "Service stopped");
        Ok(())
    }
}
