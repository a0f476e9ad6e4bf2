// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! crowd - controller for the crowdsim participant simulator

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod commands;
mod controller;
mod env;
mod output;
mod sim_process;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{logs, start, status, stop};
use output::OutputFormat;

#[derive(Parser)]
#[command(
    name = "crowd",
    version,
    about = "Start, stop and inspect a background crowdsim run"
)]
struct Cli {
    /// Output format
    #[arg(
        short = 'o',
        long = "output",
        value_enum,
        default_value_t,
        global = true
    )]
    output: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Launch the simulator in the background
    Start(crowd_sim::RunArgs),
    /// Send SIGTERM to the running simulator
    Stop(stop::StopArgs),
    /// Show whether a simulation is running and tail its log
    Status(status::StatusArgs),
    /// View the record log or simulator console output
    Logs(logs::LogsArgs),
}

#[tokio::main]
async fn main() {
    let log_guard = setup_logging();
    if let Err(e) = run().await {
        drop(log_guard);
        let msg = format_error(&e);
        if !msg.is_empty() {
            eprintln!("Error: {}", msg);
        }
        std::process::exit(1);
    }
}

/// Format an anyhow error, deduplicating the chain.
///
/// When the top-level message already contains every cause (common with
/// `#[error("... {source}")]`), the chain is skipped.
fn format_error(err: &anyhow::Error) -> String {
    let top = err.to_string();

    let chain_redundant = err
        .chain()
        .skip(1)
        .all(|cause| top.contains(&cause.to_string()));

    if chain_redundant {
        return top;
    }

    let mut buf = top;
    for (i, cause) in err.chain().skip(1).enumerate() {
        buf.push_str(&format!("\n\nCaused by:\n    {}: {}", i, cause));
    }
    buf
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let format = cli.output;

    match cli.command {
        Commands::Start(args) => start::handle(args, format).await,
        Commands::Stop(args) => stop::handle(args, format).await,
        Commands::Status(args) => status::handle(args, format).await,
        Commands::Logs(args) => logs::handle(args, format).await,
    }
}

/// Controller diagnostics go to stderr; stdout carries command output.
fn setup_logging() -> tracing_appender::non_blocking::WorkerGuard {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let (non_blocking, guard) = tracing_appender::non_blocking(std::io::stderr());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .init();

    guard
}

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;
