//! Toggle configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use sinkswitch_core::RendererUnits;
use sinkswitch_device::blu_control::DEFAULT_BLU_CONTROL;
use sinkswitch_device::stream_config::DEFAULT_STREAM_CONFIG;
use tracing::info;

/// Database of the player this tool normally runs on.
pub const PLAYER_DATABASE: &str = "/var/local/www/db/moode-sqlite3.db";

/// Toggle configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// General settings
    #[serde(default)]
    pub general: GeneralConfig,
    /// Database settings
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Bluetooth settings
    #[serde(default)]
    pub bluetooth: BluetoothConfig,
    /// Renderer settings
    #[serde(default)]
    pub renderers: RenderersConfig,
}

/// Logging output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// General settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Log format
    #[serde(default)]
    pub log_format: LogFormat,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self { log_level: default_log_level(), log_format: LogFormat::default() }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Database settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DatabaseConfig {
    /// Database path (optional, uses the player database or the data dir)
    pub path: Option<PathBuf>,
}

impl DatabaseConfig {
    /// Resolve the database to open.
    ///
    /// # Errors
    /// Returns an error if no path is configured, the player database is
    /// absent and no data directory can be determined.
    pub fn resolve_path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.path {
            return Ok(path.clone());
        }

        let player = Path::new(PLAYER_DATABASE);
        if player.exists() {
            return Ok(player.to_path_buf());
        }

        sinkswitch_db::Database::default_path().context("Could not determine database path")
    }
}

/// Bluetooth settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BluetoothConfig {
    /// Control command and leading arguments
    #[serde(default = "default_control_command")]
    pub control_command: Vec<String>,
    /// ALSA config binding the Bluetooth stream to a device
    #[serde(default = "default_stream_config")]
    pub stream_config: PathBuf,
    /// Pause after connect/disconnect, in milliseconds
    #[serde(default = "default_settle_ms")]
    pub settle_ms: u64,
}

impl Default for BluetoothConfig {
    fn default() -> Self {
        Self {
            control_command: default_control_command(),
            stream_config: default_stream_config(),
            settle_ms: default_settle_ms(),
        }
    }
}

impl BluetoothConfig {
    /// Settle delay as a duration.
    #[must_use]
    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }
}

fn default_control_command() -> Vec<String> {
    vec![DEFAULT_BLU_CONTROL.to_string()]
}

fn default_stream_config() -> PathBuf {
    PathBuf::from(DEFAULT_STREAM_CONFIG)
}

fn default_settle_ms() -> u64 {
    1000
}

/// Renderer settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderersConfig {
    /// Service manager command and leading arguments
    #[serde(default = "default_service_command")]
    pub service_command: Vec<String>,
    /// Units backing each renderer
    #[serde(flatten)]
    pub units: RendererUnits,
}

impl Default for RenderersConfig {
    fn default() -> Self {
        Self { service_command: default_service_command(), units: RendererUnits::default() }
    }
}

fn default_service_command() -> Vec<String> {
    vec!["systemctl".to_string()]
}

/// Load configuration from `path`, or from the default location.
///
/// An explicit path must exist; a missing default file means defaults.
///
/// # Errors
/// Returns an error if the file cannot be read or parsed.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let config_path = match path {
        Some(p) => p.to_path_buf(),
        None => {
            let default = config_path()?;
            if !default.exists() {
                info!(config_path = ?default, "Config file not found, using defaults");
                return Ok(Config::default());
            }
            default
        }
    };

    let content = std::fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read config file: {config_path:?}"))?;
    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {config_path:?}"))?;
    Ok(config)
}

/// Get the configuration file path.
fn config_path() -> Result<PathBuf> {
    let dirs = ProjectDirs::from("org", "sinkswitch", "Sinkswitch")
        .context("Could not determine config directory")?;
    Ok(dirs.config_dir().join("config.toml"))
}
