// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! crowdsim - CPU-bound meeting participant simulator
//!
//! Spawns one worker process per participant. Each worker connects, burns
//! CPU for the work duration, idles for the rest of its stay and leaves,
//! appending one JSON record to the log file. No meeting platform is
//! contacted.

use std::sync::Arc;

use clap::{Parser, Subcommand};
use crowd_sim::{run_participant, ParticipantArgs, RunArgs, RunOutcome, StdoutSink, Supervisor};
use tokio::signal::unix::{signal, SignalKind};
use tokio::sync::Notify;
use tracing::info;

#[derive(Parser)]
#[command(
    name = "crowdsim",
    version,
    about = "CPU-bound meeting participant simulator (no meeting platform calls)",
    args_conflicts_with_subcommands = true
)]
struct Cli {
    #[command(flatten)]
    run: RunArgs,

    #[command(subcommand)]
    command: Option<Internal>,
}

#[derive(Subcommand)]
enum Internal {
    /// Run a single participant (used by the supervisor)
    #[command(hide = true)]
    Participant(ParticipantArgs),
}

fn main() {
    let cli = Cli::parse();
    let log_guard = setup_logging();

    if let Err(e) = run(cli) {
        drop(log_guard);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Workers run their blocking lifecycle on the main thread; only the
/// supervisor needs a runtime.
fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Some(Internal::Participant(args)) => {
            let plan = args.to_plan()?;
            run_participant(&plan, &StdoutSink);
            Ok(())
        }
        None => tokio::runtime::Runtime::new()?.block_on(simulate(cli.run)),
    }
}

async fn simulate(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = args.to_config()?;

    if let Some(parent) = config.log_path.as_deref().and_then(|p| p.parent()) {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let program = crowd_sim::spawn::worker_program()?;
    let shutdown = Arc::new(Notify::new());
    forward_signals(Arc::clone(&shutdown))?;

    let report = Supervisor::new(config, program).run(shutdown).await?;

    // Interrupted runs exit 0 like completed ones
    match report.outcome {
        RunOutcome::Completed => info!(left = report.left, "simulation finished"),
        RunOutcome::Interrupted { terminated } => {
            info!(terminated, left = report.left, "simulation interrupted")
        }
    }
    Ok(())
}

/// Turn SIGINT and SIGTERM into a shutdown notification.
fn forward_signals(shutdown: Arc<Notify>) -> std::io::Result<()> {
    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;
    tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = sigterm.recv() => info!("Received SIGTERM, shutting down..."),
                _ = sigint.recv() => info!("Received SIGINT, shutting down..."),
            }
            shutdown.notify_one();
        }
    });
    Ok(())
}

/// Diagnostics go to stderr; stdout is reserved for monitor output and, in
/// worker processes, the status stream.
fn setup_logging() -> tracing_appender::non_blocking::WorkerGuard {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let (non_blocking, guard) = tracing_appender::non_blocking(std::io::stderr());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .init();

    guard
}
