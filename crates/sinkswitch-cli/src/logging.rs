//! Log setup for the toggles.
//!
//! Logs go to stderr; stdout carries only the status line.

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use crate::config::{GeneralConfig, LogFormat};

/// Build the filter: `RUST_LOG` wins, then `--verbose`, then the config level.
fn env_filter(general: &GeneralConfig, verbose: bool) -> Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }

    let level = if verbose { "debug" } else { general.log_level.as_str() };
    Ok(EnvFilter::new("warn")
        .add_directive(format!("sinkswitch_core={level}").parse()?)
        .add_directive(format!("sinkswitch_device={level}").parse()?)
        .add_directive(format!("sinkswitch_db={level}").parse()?)
        .add_directive(format!("sinkswitch_cli={level}").parse()?))
}

/// Install the global subscriber.
///
/// # Errors
/// Returns an error if the configured level is not a valid directive.
pub fn init(general: &GeneralConfig, verbose: bool) -> Result<()> {
    let filter = env_filter(general, verbose)?;
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr);

    match general.log_format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
    Ok(())
}
