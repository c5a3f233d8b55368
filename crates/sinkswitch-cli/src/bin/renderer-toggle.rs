//! Turn a renderer on or off, or print the renderer flags.

use std::process::ExitCode;

use sinkswitch_cli::cli::{RendererArgs, RendererCommand, json_requested, parse_args};
use sinkswitch_cli::status::StatusTag;
use sinkswitch_cli::{config, emit, failure_report, logging, runner};
use tracing::info;

fn main() -> ExitCode {
    let argv: Vec<_> = std::env::args_os().collect();
    let args: RendererArgs = match parse_args(argv.iter().cloned(), StatusTag::RendererUsage) {
        Ok(args) => args,
        Err(report) => return emit(&report, json_requested(&argv)),
    };
    let json = args.common.json;

    let command = match args.command() {
        Ok(command) => command,
        Err(report) => return emit(&report, json),
    };

    let config = match config::load_config(args.common.config.as_deref()) {
        Ok(config) => config,
        Err(e) => return emit(&failure_report(StatusTag::RendererError, &e), json),
    };
    if let Err(e) = logging::init(&config.general, args.common.verbose) {
        eprintln!("Failed to initialise logging: {e:#}");
    }

    info!(version = env!("CARGO_PKG_VERSION"), ?command, "renderer-toggle");

    match command {
        RendererCommand::Toggle { service, action } => {
            let report = runner::toggle_renderer(&config, service, action)
                .unwrap_or_else(|e| failure_report(StatusTag::RendererError, &e));
            emit(&report, json)
        }
        RendererCommand::Status => match runner::renderer_status(&config) {
            Ok(flags) => match serde_json::to_string(&flags) {
                Ok(line) => {
                    println!("{line}");
                    ExitCode::SUCCESS
                }
                Err(e) => emit(&failure_report(StatusTag::RendererError, &e.into()), json),
            },
            Err(e) => emit(&failure_report(StatusTag::RendererError, &e), json),
        },
    }
}
