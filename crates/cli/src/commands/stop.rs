// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `crowd stop` - terminate the tracked simulator

use anyhow::Result;
use clap::Args;

use crate::controller::{Controller, StopOutcome};
use crate::output::OutputFormat;

#[derive(Args, Debug)]
pub struct StopArgs {
    /// Wait for the simulator to exit after sending SIGTERM
    #[arg(long)]
    pub wait: bool,
}

pub async fn handle(args: StopArgs, format: OutputFormat) -> Result<()> {
    let controller = Controller::from_env()?;
    let wait = args.wait.then(crate::env::timeout_exit);
    let outcome = controller.stop(wait).await?;

    match format {
        OutputFormat::Text => match outcome {
            StopOutcome::Stopped { .. } => println!("Stopped simulation"),
            StopOutcome::StillRunning { pid } => {
                println!("Sent SIGTERM but simulation is still running (pid={})", pid)
            }
            StopOutcome::NotRunning => println!("No running simulation detected"),
        },
        OutputFormat::Json => {
            let obj = match outcome {
                StopOutcome::Stopped { pid } => {
                    serde_json::json!({ "status": "stopped", "pid": pid })
                }
                StopOutcome::StillRunning { pid } => {
                    serde_json::json!({ "status": "still_running", "pid": pid })
                }
                StopOutcome::NotRunning => serde_json::json!({ "status": "not_running" }),
            };
            println!("{}", serde_json::to_string_pretty(&obj)?);
        }
    }
    Ok(())
}
