// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `crowd logs` - view the record log or the simulator console

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use crowd_core::config::log_path;
use crowd_core::DEFAULT_LOG_PATH;

use crate::controller::{Controller, TrackedRun};
use crate::output::{display_log, last_lines, OutputFormat, LOG_NOT_FOUND};

#[derive(Args, Debug)]
pub struct LogsArgs {
    /// Number of recent lines to show
    #[arg(short = 'n', long, default_value_t = 400)]
    pub lines: usize,

    /// Follow log output
    #[arg(long, short)]
    pub follow: bool,

    /// Show the simulator's console output instead of the record log
    #[arg(long)]
    pub console: bool,

    /// Record log to read (defaults to the tracked run's log)
    #[arg(long, conflicts_with = "console")]
    pub log: Option<String>,
}

/// Record log to display: `--log` > tracked run > default path.
///
/// `None` when logging is disabled for the selected run.
pub fn resolve_log_path(explicit: Option<&str>, tracked: Option<&TrackedRun>) -> Option<PathBuf> {
    match (explicit, tracked) {
        (Some(raw), _) => log_path(raw),
        (None, Some(run)) => run.log_path.clone(),
        (None, None) => Some(PathBuf::from(DEFAULT_LOG_PATH)),
    }
}

pub async fn handle(args: LogsArgs, format: OutputFormat) -> Result<()> {
    let controller = Controller::from_env()?;
    let path = if args.console {
        Some(controller.console_path())
    } else {
        resolve_log_path(args.log.as_deref(), controller.tracked()?.as_ref())
    };

    let Some(path) = path else {
        println!("Record logging is disabled for this run");
        return Ok(());
    };
    if !path.exists() {
        match format {
            OutputFormat::Text => println!("{}", LOG_NOT_FOUND),
            OutputFormat::Json => {
                let obj = serde_json::json!({
                    "log_path": path.to_string_lossy(),
                    "lines": [],
                });
                println!("{}", serde_json::to_string_pretty(&obj)?);
            }
        }
        return Ok(());
    }

    let lines = last_lines(&path, args.lines)?;
    display_log(&path, &lines, args.follow, format).await
}

#[cfg(test)]
#[path = "logs_tests.rs"]
mod tests;
