//! Running external control commands.

use std::process::Command;

use sinkswitch_core::error::{DeviceError, DeviceResult};
use tracing::debug;

/// An external program plus leading arguments, e.g. `["sudo", "/usr/bin/tool"]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    argv: Vec<String>,
}

impl CommandLine {
    /// Create a command line from its argv prefix.
    ///
    /// # Errors
    /// Returns an error if `argv` is empty.
    pub fn new(argv: Vec<String>) -> DeviceResult<Self> {
        if argv.is_empty() {
            return Err(DeviceError::Spawn {
                program: String::new(),
                source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "empty command"),
            });
        }
        Ok(Self { argv })
    }

    /// Program name used in errors and logs.
    #[must_use]
    pub fn program(&self) -> &str {
        &self.argv[0]
    }

    /// Run with extra arguments and return stdout.
    ///
    /// # Errors
    /// Returns an error if the program cannot be spawned or exits non-zero.
    pub fn run(&self, args: &[&str]) -> DeviceResult<String> {
        let program = self.program();
        debug!(program, ?args, "Running command");

        let output = Command::new(program)
            .args(&self.argv[1..])
            .args(args)
            .output()
            .map_err(|source| DeviceError::Spawn { program: program.to_string(), source })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(DeviceError::CommandFailed {
                program: program.to_string(),
                code: output.status.code(),
                stderr,
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
