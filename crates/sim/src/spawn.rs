// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Launching participant worker processes.
//!
//! Each worker is the simulator binary re-executed with the hidden
//! `participant` subcommand. Its stdout carries the status stream; stderr is
//! inherited so worker diagnostics land wherever the simulator's go.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use tokio::process::Command;

use crate::lifecycle::ParticipantPlan;

/// Name of the hidden worker subcommand.
pub const PARTICIPANT_SUBCOMMAND: &str = "participant";

/// Binary to re-execute for workers: `CROWD_WORKER_BINARY` or this executable.
pub fn worker_program() -> std::io::Result<PathBuf> {
    match crate::env::worker_binary() {
        Some(path) => Ok(PathBuf::from(path)),
        None => std::env::current_exe(),
    }
}

/// Arguments for one worker, subcommand first.
pub fn worker_args(plan: &ParticipantPlan) -> Vec<String> {
    let mut args = vec![
        PARTICIPANT_SUBCOMMAND.to_string(),
        "--name".to_string(),
        plan.name.to_string(),
        "--meeting".to_string(),
        plan.meeting_code.clone(),
        "--stay".to_string(),
        plan.stay.as_secs_f64().to_string(),
        "--work".to_string(),
        plan.work.as_secs_f64().to_string(),
        "--delay".to_string(),
        plan.start_delay.as_secs_f64().to_string(),
    ];
    if let Some(log) = &plan.log_path {
        args.push("--log".to_string());
        args.push(log.to_string_lossy().into_owned());
    }
    args
}

/// Command that runs `plan` in a separate process.
///
/// The child is killed if its handle is dropped before it is waited on.
pub fn worker_command(program: &Path, plan: &ParticipantPlan) -> Command {
    let mut cmd = Command::new(program);
    cmd.args(worker_args(plan))
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::inherit())
        .kill_on_drop(true);
    cmd
}

#[cfg(test)]
#[path = "spawn_tests.rs"]
mod tests;
