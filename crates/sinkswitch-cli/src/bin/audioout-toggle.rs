//! Switch the audio output between the local device and Bluetooth.

use std::process::ExitCode;

use sinkswitch_cli::cli::{AudioOutArgs, json_requested, parse_args};
use sinkswitch_cli::status::StatusTag;
use sinkswitch_cli::{config, emit, failure_report, logging, runner};
use tracing::info;

fn main() -> ExitCode {
    let argv: Vec<_> = std::env::args_os().collect();
    let args: AudioOutArgs = match parse_args(argv.iter().cloned(), StatusTag::AudiooutUsage) {
        Ok(args) => args,
        Err(report) => return emit(&report, json_requested(&argv)),
    };
    let json = args.common.json;

    let config = match config::load_config(args.common.config.as_deref()) {
        Ok(config) => config,
        Err(e) => return emit(&failure_report(StatusTag::AudiooutError, &e), json),
    };
    if let Err(e) = logging::init(&config.general, args.common.verbose) {
        eprintln!("Failed to initialise logging: {e:#}");
    }

    info!(version = env!("CARGO_PKG_VERSION"), target = %args.target, "audioout-toggle");

    let report = runner::switch_output(&config, &args.target)
        .unwrap_or_else(|e| failure_report(StatusTag::AudiooutError, &e));
    emit(&report, json)
}
