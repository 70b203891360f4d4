// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! lockbreak - break locks held by dead clients, fencing them first

mod commands;
mod output;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use commands::{break_lock, status};
use lb_core::{LockbreakConfig, LogConfig};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[command(
    name = "lockbreak",
    version,
    about = "Break exclusive locks held by dead or partitioned clients"
)]
struct Cli {
    /// Configuration file (default: <config dir>/lockbreak/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Break the lock on an object, fencing its holder first
    Break(break_lock::BreakArgs),
    /// Show locks, watchers and blocklist entries in a cluster snapshot
    Status(status::StatusArgs),
}

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<ExitCode> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;
    setup_logging(&config.log)?;

    match cli.command {
        Commands::Break(args) => break_lock::handle(args, &config.break_lock).await,
        Commands::Status(args) => {
            status::handle(args)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// An explicit `--config` must exist; the default location is optional
fn load_config(explicit: Option<&Path>) -> Result<LockbreakConfig> {
    if let Some(path) = explicit {
        return Ok(LockbreakConfig::load(path)?);
    }
    match dirs::config_dir() {
        Some(dir) => Ok(LockbreakConfig::load_or_default(
            &dir.join("lockbreak").join("config.toml"),
        )?),
        None => Ok(LockbreakConfig::default()),
    }
}

fn setup_logging(log: &LogConfig) -> Result<()> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&log.filter)
            .with_context(|| format!("invalid log filter '{}'", log.filter))?,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    Ok(())
}
