//! Bluetooth stream ALSA config (`btstream.conf`).
//!
//! The stream binds to a device through a single `device "<MAC>"` line.
//! Rebinding replaces that line in place; a file without one is an error.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use sinkswitch_core::capability::SinkConfigWriter;
use sinkswitch_core::device::MacAddress;
use sinkswitch_core::error::{DeviceError, DeviceResult};
use tracing::{debug, info};

/// Default location of the Bluetooth stream config.
pub const DEFAULT_STREAM_CONFIG: &str = "/etc/alsa/conf.d/btstream.conf";

/// Config field holding the bound device.
pub const DEVICE_FIELD: &str = "device";

/// Writer for the Bluetooth stream config file.
#[derive(Debug, Clone)]
pub struct BtStreamConfig {
    path: PathBuf,
}

impl BtStreamConfig {
    /// Create a writer for the config at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the config file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replace every `device` line in `content`, keeping indentation.
    ///
    /// Returns `None` if no line carries the field.
    fn rewrite(content: &str, mac: &MacAddress) -> Option<String> {
        let mut replaced = 0usize;
        let mut out = String::with_capacity(content.len());

        for line in content.split_inclusive('\n') {
            let body = line.trim_end_matches(['\r', '\n']);
            let ending = &line[body.len()..];
            let trimmed = body.trim_start();

            if trimmed.split_whitespace().next() == Some(DEVICE_FIELD) {
                let indent = &body[..body.len() - trimmed.len()];
                out.push_str(indent);
                out.push_str(&format!("{DEVICE_FIELD} \"{mac}\""));
                out.push_str(ending);
                replaced += 1;
            } else {
                out.push_str(line);
            }
        }

        (replaced > 0).then_some(out)
    }

    fn write_atomic(&self, content: &str) -> DeviceResult<()> {
        let dir = self.path.parent().unwrap_or_else(|| Path::new("."));
        let permissions = fs::metadata(&self.path)?.permissions();

        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        tmp.write_all(content.as_bytes())?;
        tmp.as_file().sync_all()?;
        fs::set_permissions(tmp.path(), permissions)?;
        tmp.persist(&self.path).map_err(|e| DeviceError::Io(e.error))?;

        Ok(())
    }
}

impl SinkConfigWriter for BtStreamConfig {
    fn bind_device(&self, mac: &MacAddress) -> DeviceResult<()> {
        let content = fs::read_to_string(&self.path)?;

        let updated =
            Self::rewrite(&content, mac).ok_or_else(|| DeviceError::ConfigFieldMissing {
                field: DEVICE_FIELD.to_string(),
                path: self.path.display().to_string(),
            })?;

        if updated == content {
            debug!(path = ?self.path, %mac, "Stream config already bound");
            return Ok(());
        }

        self.write_atomic(&updated)?;
        info!(path = ?self.path, %mac, "Stream config rewritten");
        Ok(())
    }
}
