// SPDX-FileCopyrightText: 2026 GP2GP Transfers Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! gp2gp - classify GP2GP record transfers from an interchange message log.

mod classify;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use gp2gp_config::{ConfigError, Gp2gpConfig};

/// gp2gp - classify GP2GP record transfers from an interchange message log.
#[derive(Parser, Debug)]
#[command(name = "gp2gp", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the default hierarchy.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Classify every conversation in a JSON-lines message file.
    Classify {
        /// One JSON message per line.
        #[arg(long)]
        input: PathBuf,

        /// Override `engine.cutoff_hours`.
        #[arg(long)]
        cutoff_hours: Option<u64>,

        /// Number of blocking workers conversations are spread across.
        #[arg(long, default_value_t = 4)]
        workers: usize,
    },
    /// Validate configuration and print any problems.
    CheckConfig,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(errors) => {
            gp2gp_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.logging.level);

    match cli.command {
        Commands::Classify {
            input,
            cutoff_hours,
            workers,
        } => {
            let options = classify::ClassifyOptions {
                input,
                cutoff_hours,
                workers,
            };
            if let Err(e) = classify::run(&config, options).await {
                eprintln!("error: {e}");
                std::process::exit(1);
            }
        }
        Commands::CheckConfig => {
            eprintln!(
                "gp2gp: config ok (cutoff_hours={:?}, sla_threshold_days={})",
                config.engine.cutoff_hours, config.engine.sla_threshold_days
            );
        }
    }
}

fn load_config(cli: &Cli) -> Result<Gp2gpConfig, Vec<ConfigError>> {
    match &cli.config {
        Some(path) => gp2gp_config::load_and_validate_path(path),
        None => gp2gp_config::load_and_validate(),
    }
}

/// Logs go to stderr so stdout carries only transfer records.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "gp2gp={log_level},gp2gp_transfer={log_level},warn"
        ))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}
