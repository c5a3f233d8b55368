//! Sinkswitch CLI - the `audioout-toggle` and `renderer-toggle` commands.
//!
//! Each binary parses its arguments, loads the config, sets up logging
//! and prints exactly one status line on stdout.

pub mod cli;
pub mod config;
pub mod logging;
pub mod runner;
pub mod status;

use std::process::ExitCode;

use crate::status::{Report, StatusTag};

/// Print a report as text or JSON and return its exit code.
#[must_use]
pub fn emit(report: &Report, json: bool) -> ExitCode {
    if json {
        println!("{}", report.to_json());
    } else {
        println!("{report}");
    }
    report.exit_code()
}

/// Turn a setup failure into an error report, logging the full chain.
#[must_use]
pub fn failure_report(tag: StatusTag, err: &anyhow::Error) -> Report {
    tracing::error!(error = ?err, "Toggle failed");
    Report::with_detail(tag, format!("{err:#}"))
}
