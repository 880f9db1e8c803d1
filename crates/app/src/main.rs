//! Pulse - team status and task dashboard
//!
//! Headless driver for the dashboard core. Each invocation rehydrates the
//! saved snapshot, runs one command, and persists whatever changed.

use chrono::{Local, Utc};
use clap::Parser;
use pulse_core::{Rehydrated, SeedReason};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod cli;
mod commands;
mod config;
mod state;

fn main() {
    let cli = cli::Cli::parse();

    let config = match config::Config::load(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("pulse: {}", e);
            std::process::exit(2);
        }
    };

    // Initialize logging; RUST_LOG wins over the configured filter
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_filter));
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    tracing::debug!(data = ?config.data, "Starting Pulse");

    let now = Utc::now();
    let mut app_state = match state::AppState::new(&config, now) {
        Ok(state) => state,
        Err(e) => {
            tracing::error!("Failed to initialize application: {}", e);
            std::process::exit(1);
        }
    };

    if let Rehydrated::Seeded(reason) = &app_state.source {
        if *reason != SeedReason::Missing {
            eprintln!("pulse: saved data could not be used ({:?}); starting from the sample team", reason);
        }
    }

    let mut stdout = std::io::stdout().lock();
    if let Err(e) = commands::run(&mut app_state.board, cli.command, now, &Local, &mut stdout) {
        eprintln!("pulse: {}", e);
        std::process::exit(1);
    }
}
