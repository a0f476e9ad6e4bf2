// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `crowd start` - launch the simulator in the background

use anyhow::Result;
use crowd_sim::RunArgs;

use crate::controller::{Controller, StartOutcome};
use crate::output::OutputFormat;

pub async fn handle(args: RunArgs, format: OutputFormat) -> Result<()> {
    let controller = Controller::from_env()?;
    let outcome = controller.start(&args)?;

    match format {
        OutputFormat::Text => match &outcome {
            StartOutcome::Started(run) => {
                println!("Started simulation (pid={})", run.pid);
                if let Some(log) = &run.log_path {
                    println!("Records: {}", log.display());
                }
                println!("Console: {}", run.console_path.display());
            }
            StartOutcome::AlreadyRunning(run) => {
                println!("Simulation already running (pid={})", run.pid);
            }
        },
        OutputFormat::Json => {
            let (status, run) = match &outcome {
                StartOutcome::Started(run) => ("started", run),
                StartOutcome::AlreadyRunning(run) => ("already_running", run),
            };
            let obj = serde_json::json!({
                "status": status,
                "pid": run.pid,
                "log_path": run.log_path,
                "console_path": run.console_path,
                "started_at": run.started_at,
            });
            println!("{}", serde_json::to_string_pretty(&obj)?);
        }
    }
    Ok(())
}
