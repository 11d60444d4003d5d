//! Guardianctl - terminal dashboard for Factory Guardian
//!
//! Polls the backend for machine and alert status and falls back to built-in
//! sample data when the backend is unreachable.

use anyhow::Result;
use clap::{Parser, Subcommand};
use guardian_common::{GuardianConfig, Locale};
use guardianctl::commands::{self, WatchOptions};
use guardianctl::errors::EXIT_CONFIG_ERROR;
use guardianctl::logging;
use guardianctl::render::RenderOptions;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::time::Duration;
use tracing::error;

#[derive(Parser)]
#[command(name = "guardianctl")]
#[command(about = "Factory Guardian - machine safety dashboard", long_about = None)]
#[command(version)]
struct Cli {
    /// Config file (default: ~/.config/factory-guardian/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Backend base URL (overrides API_BASE_URL)
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Display language: en or ur
    #[arg(long, global = true)]
    locale: Option<Locale>,

    /// Disable ANSI colors
    #[arg(long, global = true)]
    no_color: bool,

    /// Debug logging
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Poll the backend and redraw on every update
    Watch {
        /// Poll interval in milliseconds (overrides POLL_INTERVAL_MS)
        #[arg(long)]
        interval_ms: Option<u64>,

        /// Log critical alerts instead of speaking them
        #[arg(long)]
        no_speech: bool,
    },

    /// Fetch once and print the dashboard
    Status {
        /// Print snapshot and derived state as JSON
        #[arg(long)]
        json: bool,
    },

    /// Acknowledge an alert
    Ack {
        /// Alert id, e.g. alert-001
        alert_id: String,
    },

    /// Check whether the backend is reachable
    Health,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let mut config = match GuardianConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            std::process::exit(EXIT_CONFIG_ERROR);
        }
    };
    if let Some(url) = cli.base_url {
        config.api_base_url = guardian_common::config::trim_base_url(&url);
    }
    if let Some(locale) = cli.locale {
        config.locale = locale;
    }

    let render = RenderOptions {
        locale: config.locale,
        color: !cli.no_color && std::io::stdout().is_terminal(),
    };

    let code = match cli.command {
        Commands::Watch {
            interval_ms,
            no_speech,
        } => {
            let interval_ms = interval_ms.unwrap_or(config.poll_interval_ms);
            if interval_ms == 0 {
                error!("Poll interval must be a positive number of milliseconds");
                std::process::exit(EXIT_CONFIG_ERROR);
            }
            let opts = WatchOptions {
                interval: Duration::from_millis(interval_ms),
                speech: !no_speech,
                render,
            };
            commands::watch(&config, opts).await?
        }
        Commands::Status { json } => commands::status(&config, render, json).await?,
        Commands::Ack { alert_id } => commands::ack(&config, &alert_id).await?,
        Commands::Health => commands::health(&config).await?,
    };

    std::process::exit(code);
}
