use std::ffi::OsStr;
use std::path::PathBuf;

use clap::error::ErrorKind;
use clap::{Args, Parser};

use crate::status::{Report, StatusTag};

/// Options shared by both toggles.
#[derive(Args, Debug, Clone, Default)]
pub struct CommonArgs {
    /// Config file (defaults to the user config dir)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long)]
    pub verbose: bool,

    /// Print the status line as JSON
    #[arg(long)]
    pub json: bool,
}

/// Switch the audio output between the local device and Bluetooth.
#[derive(Parser, Debug)]
#[command(name = "audioout-toggle", version)]
pub struct AudioOutArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Target output: Local or Bluetooth
    pub target: String,
}

/// Turn a renderer on or off, or print the renderer flags.
#[derive(Parser, Debug)]
#[command(name = "renderer-toggle", version)]
pub struct RendererArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Renderer (bluetooth, airplay, upnp), or `status`
    pub service: String,

    /// on or off
    pub action: Option<String>,
}

/// What `renderer-toggle` was asked to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RendererCommand<'a> {
    Toggle { service: &'a str, action: &'a str },
    Status,
}

impl RendererArgs {
    /// Classify the positional arguments.
    ///
    /// # Errors
    /// Returns a `[RENDERER_USAGE]` report when the action is missing.
    pub fn command(&self) -> Result<RendererCommand<'_>, Report> {
        match (self.service.as_str(), self.action.as_deref()) {
            ("status", None) => Ok(RendererCommand::Status),
            (service, Some(action)) => Ok(RendererCommand::Toggle { service, action }),
            (_, None) => {
                eprintln!("Usage: renderer-toggle <bluetooth|airplay|upnp> <on|off>");
                Err(Report::new(StatusTag::RendererUsage))
            }
        }
    }
}

/// Whether `--json` appears among the raw arguments.
///
/// Used to format a usage report when parsing itself failed.
pub fn json_requested<I, T>(args: I) -> bool
where
    I: IntoIterator<Item = T>,
    T: AsRef<OsStr>,
{
    args.into_iter().any(|arg| arg.as_ref() == "--json")
}

/// Parse arguments, turning parse failures into a usage report.
///
/// `--help` and `--version` print and exit as usual. Other parse errors
/// are printed on stderr; stdout only gets the status line.
///
/// # Errors
/// Returns a report tagged `usage` for missing or extra arguments.
pub fn parse_args<P, I, T>(args: I, usage: StatusTag) -> Result<P, Report>
where
    P: Parser,
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    P::try_parse_from(args).map_err(|e| match e.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => e.exit(),
        _ => {
            let _ = e.print();
            Report::new(usage)
        }
    })
}
