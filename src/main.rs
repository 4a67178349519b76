// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use dnsupdater::{
    config::Config,
    constants::DEFAULT_CONFIG_PATH,
    runner::{build_updater, insert_zones, InsertOptions},
    updater::Updater,
};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info, warn};

/// Insert DNS records into their zones with RFC 2136 dynamic updates.
#[derive(Debug, Parser)]
#[command(name = "dnsupdater", version, about)]
struct Cli {
    /// Record file to read
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Load and validate the record file without sending anything
    Check,
    /// Insert every configured record
    Insert {
        /// Records per update; 0 sends one update per configured record
        #[arg(long, default_value_t = 0)]
        batch: usize,
        /// Stop at the first failed update
        #[arg(long)]
        exit_error: bool,
    },
    /// Print a shell completion script
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Command::Completions { shell } = cli.command {
        clap_complete::generate(shell, &mut Cli::command(), "dnsupdater", &mut std::io::stdout());
        return ExitCode::SUCCESS;
    }

    initialize_logging();

    let config = match Config::load(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            error!("Error loading config: {e}");
            return ExitCode::from(1);
        }
    };

    match cli.command {
        Command::Check => {
            info!(
                path = %cli.config.display(),
                zones = config.zones.len(),
                servers = config.servers.len(),
                "Config is valid"
            );
            ExitCode::SUCCESS
        }
        Command::Insert { batch, exit_error } => {
            let updater = match build_updater(&config) {
                Ok(updater) => updater,
                Err(e) => {
                    error!("Error creating updater: {e:#}");
                    return ExitCode::from(1);
                }
            };

            let report = insert_zones(
                &updater,
                &config.zones,
                InsertOptions {
                    batch_size: batch,
                    exit_on_error: exit_error,
                },
            );
            if let Err(e) = updater.close() {
                warn!("Error closing updater: {e}");
            }

            info!(
                succeeded = report.succeeded,
                failed = report.failed,
                "Finished inserting records"
            );
            ExitCode::from(report.exit_code())
        }
        Command::Completions { .. } => ExitCode::SUCCESS,
    }
}

/// Log to stderr so completion scripts and other stdout output stay clean.
///
/// Respects `RUST_LOG` (default `info`) and `RUST_LOG_FORMAT` (`json` or text).
fn initialize_logging() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let log_format = std::env::var("RUST_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    match log_format.to_lowercase().as_str() {
        "json" => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .with_file(true)
                .with_line_number(true)
                .with_target(false)
                .json()
                .init();
        }
        _ => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .with_file(true)
                .with_line_number(true)
                .with_target(false)
                .with_ansi(true)
                .compact()
                .init();
        }
    }
}
