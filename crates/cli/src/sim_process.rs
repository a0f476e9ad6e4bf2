// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Simulator process management utilities.
//!
//! Launching `crowdsim` detached from the controller, probing liveness with
//! signal 0 and signalling it by pid.

use std::fs::File;
use std::os::unix::process::CommandExt;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::time::{Duration, Instant};

/// Start the simulator in its own process group with stdin closed and
/// stdout/stderr appended to `console`.
pub fn start_sim_background(
    binary: &Path,
    argv: &[String],
    console: &Path,
) -> std::io::Result<Child> {
    let out = File::options().create(true).append(true).open(console)?;
    let err = out.try_clone()?;

    Command::new(binary)
        .args(argv)
        .stdin(Stdio::null())
        .stdout(Stdio::from(out))
        .stderr(Stdio::from(err))
        .process_group(0)
        .spawn()
}

/// Wait for a process to exit, polling its liveness.
///
/// Returns false on timeout or Ctrl+C. A timeout too large for the clock
/// waits without limit.
pub async fn wait_for_exit(pid: u32, timeout: Duration, interval: Duration) -> bool {
    let deadline = Instant::now().checked_add(timeout);
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        if !process_exists(pid) {
            return true;
        }
        if deadline.is_some_and(|d| Instant::now() >= d) {
            return false;
        }
        tokio::select! {
            _ = tokio::time::sleep(interval) => {}
            _ = &mut ctrl_c => return false,
        }
    }
}

/// Find the crowdsim binary
pub fn find_sim_binary() -> PathBuf {
    if let Some(path) = crate::env::sim_binary() {
        return PathBuf::from(path);
    }

    if let Some(sibling) = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join("crowdsim")))
    {
        if sibling.exists() {
            return sibling;
        }
    }

    PathBuf::from("crowdsim")
}

/// Execute kill command with the given signal and PID
fn kill_signal(signal: &str, pid: u32) -> bool {
    Command::new("kill")
        .args([signal, &pid.to_string()])
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

/// Check if a process with the given PID exists.
///
/// Exited-but-unreaped processes count as gone.
pub fn process_exists(pid: u32) -> bool {
    kill_signal("-0", pid) && !is_zombie(pid)
}

/// Ask a process to terminate (SIGTERM)
pub fn terminate(pid: u32) -> bool {
    kill_signal("-15", pid)
}

fn is_zombie(pid: u32) -> bool {
    std::fs::read_to_string(format!("/proc/{pid}/stat"))
        .ok()
        .and_then(|stat| parse_stat_state(&stat))
        .is_some_and(|state| state == 'Z')
}

/// State letter from a `/proc/<pid>/stat` line. The command name may contain
/// spaces and parentheses, so scan from the last `)`.
fn parse_stat_state(stat: &str) -> Option<char> {
    let (_, rest) = stat.rsplit_once(')')?;
    rest.trim_start().chars().next()
}

#[cfg(test)]
#[path = "sim_process_tests.rs"]
mod tests;
