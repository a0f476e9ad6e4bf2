// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `crowd status` - liveness of the tracked simulator plus a log tail

use anyhow::Result;
use clap::Args;

use crate::commands::logs::resolve_log_path;
use crate::controller::Controller;
use crate::output::{last_lines, OutputFormat, LOG_NOT_FOUND};

#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Number of log lines to show
    #[arg(short = 'n', long, default_value_t = 400)]
    pub lines: usize,

    /// Record log to read (defaults to the tracked run's log)
    #[arg(long)]
    pub log: Option<String>,
}

pub async fn handle(args: StatusArgs, format: OutputFormat) -> Result<()> {
    let controller = Controller::from_env()?;
    let tracked = controller.tracked()?;
    let running = controller.running()?;

    let log_path = resolve_log_path(args.log.as_deref(), tracked.as_ref());
    let lines = match log_path.as_deref().filter(|p| p.exists()) {
        Some(path) => Some(last_lines(path, args.lines)?),
        None => None,
    };

    match format {
        OutputFormat::Text => {
            match &running {
                Some(run) => println!("Simulation running (pid={})", run.pid),
                None => println!("No simulation running"),
            }
            println!();
            match (&log_path, &lines) {
                (None, _) => println!("Record logging is disabled for this run"),
                (Some(_), None) => println!("{}", LOG_NOT_FOUND),
                (Some(path), Some(lines)) => {
                    println!("Log tail ({}):", path.display());
                    for line in lines {
                        println!("{}", line);
                    }
                }
            }
        }
        OutputFormat::Json => {
            let obj = serde_json::json!({
                "status": if running.is_some() { "running" } else { "not_running" },
                "pid": running.as_ref().map(|r| r.pid),
                "started_at": running.as_ref().map(|r| r.started_at),
                "log_path": log_path,
                "lines": lines.unwrap_or_default(),
            });
            println!("{}", serde_json::to_string_pretty(&obj)?);
        }
    }
    Ok(())
}
