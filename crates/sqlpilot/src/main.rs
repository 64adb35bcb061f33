// SPDX-FileCopyrightText: 2026 sqlpilot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! sqlpilot - natural-language to SQL with validation and one corrective retry.
//!
//! This is the binary entry point.

mod app;
mod ask;
mod serve;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use sqlpilot_config::SqlPilotConfig;

/// sqlpilot - natural-language to SQL.
#[derive(Parser, Debug)]
#[command(name = "sqlpilot", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the XDG hierarchy.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the HTTP API server.
    Serve,
    /// Turn one natural-language request into SQL and print the result.
    Ask {
        /// The request, e.g. "show all customers".
        message: String,
        /// Conversation to record the turn under.
        #[arg(long, default_value = "cli")]
        session: String,
        /// Schema to query against instead of the cached default.
        #[arg(long)]
        schema_file: Option<String>,
    },
    /// Run the SQL safety check offline. Exits non-zero when rejected.
    Validate {
        /// The SQL text to check.
        sql: String,
    },
    /// Print the effective configuration.
    Config,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Validation needs no configuration or provider.
    if let Some(Commands::Validate { sql }) = &cli.command {
        return match ask::run_validate(sql) {
            Ok(true) => ExitCode::SUCCESS,
            Ok(false) => ExitCode::from(1),
            Err(e) => {
                eprintln!("error: {e}");
                ExitCode::from(2)
            }
        };
    }

    let config = match load_config(cli.config.as_deref()) {
        Some(config) => config,
        None => return ExitCode::from(2),
    };
    init_tracing(&config.service.log_level);

    let outcome = match cli.command {
        Some(Commands::Serve) => serve::run_serve(config).await,
        Some(Commands::Ask {
            message,
            session,
            schema_file,
        }) => ask::run_ask(&config, &message, &session, schema_file.as_deref()).await,
        Some(Commands::Config) => ask::render_config(&config).map(|rendered| print!("{rendered}")),
        Some(Commands::Validate { .. }) => Ok(()),
        None => {
            println!("sqlpilot: use --help for available commands");
            Ok(())
        }
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "command failed");
            eprintln!("error: {e}");
            ExitCode::from(1)
        }
    }
}

/// Load and validate configuration, rendering diagnostics on failure.
fn load_config(path: Option<&std::path::Path>) -> Option<SqlPilotConfig> {
    let loaded = match path {
        Some(path) => sqlpilot_config::load_and_validate_path(path),
        None => sqlpilot_config::load_and_validate(),
    };
    match loaded {
        Ok(config) => Some(config),
        Err(errors) => {
            sqlpilot_config::render_errors(&errors);
            None
        }
    }
}

/// Logs go to stderr so `ask` and `config` output stays machine-readable.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("sqlpilot={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .init();
}
