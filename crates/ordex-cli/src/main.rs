//! `ordex` command-line entry point.

use clap::{ColorChoice, Parser};
use ordex_cli::logging::{LogConfig, LogFormat, init_logging};
use std::io::{self, IsTerminal};
use tracing::level_filters::LevelFilter;

mod cli;
mod commands;
mod summary;

use crate::cli::{Cli, Command, LogFormatArg, LogLevelArg};
use crate::commands::{run_carriers, run_export_command, run_invoice_command, run_states};
use crate::summary::{print_export_summary, print_invoice_summary, print_json};

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let exit_code = match cli.command {
        Command::Export(args) => match run_export_command(&args) {
            Ok(outcome) => {
                let printed = if args.delivery.json {
                    print_json(&outcome)
                } else {
                    print_export_summary(&outcome);
                    Ok(())
                };
                exit_code(printed, outcome.delivery.is_failed())
            }
            Err(error) => report(&error),
        },
        Command::Invoice(args) => match run_invoice_command(&args) {
            Ok(outcome) => {
                let printed = if args.delivery.json {
                    print_json(&outcome)
                } else {
                    print_invoice_summary(&outcome);
                    Ok(())
                };
                exit_code(printed, outcome.delivery.is_failed())
            }
            Err(error) => report(&error),
        },
        Command::States => {
            run_states();
            0
        }
        Command::Carriers(args) => match run_carriers(&args) {
            Ok(()) => 0,
            Err(error) => report(&error),
        },
    };
    std::process::exit(exit_code);
}

fn exit_code(printed: anyhow::Result<()>, failed: bool) -> i32 {
    match printed {
        Ok(()) if failed => 1,
        Ok(()) => 0,
        Err(error) => report(&error),
    }
}

fn report(error: &anyhow::Error) -> i32 {
    eprintln!("error: {error:#}");
    1
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let mut config = LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        ..LogConfig::default()
    };
    config.use_env_filter = !(cli.verbosity.is_present() || cli.log_level.is_some());
    if let Some(level) = cli.log_level {
        config.level_filter = match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        };
    }
    config.format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    config.log_file = cli.log_file.clone();
    config.log_data = cli.log_data;
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}
