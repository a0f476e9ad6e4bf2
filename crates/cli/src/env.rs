// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the controller.

use std::path::PathBuf;
use std::time::Duration;

use crate::controller::ControlError;

fn parse_duration_ms(var: &str) -> Option<Duration> {
    std::env::var(var)
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
}

// --- State directory ---

/// Resolve state directory: CROWD_STATE_DIR > XDG_STATE_HOME/crowd > ~/.local/state/crowd
pub fn state_dir() -> Result<PathBuf, ControlError> {
    if let Some(dir) = non_empty("CROWD_STATE_DIR") {
        return Ok(PathBuf::from(dir));
    }
    if let Some(xdg) = non_empty("XDG_STATE_HOME") {
        return Ok(PathBuf::from(xdg).join("crowd"));
    }
    let home = non_empty("HOME").ok_or(ControlError::NoStateDir)?;
    Ok(PathBuf::from(home).join(".local/state/crowd"))
}

fn non_empty(var: &str) -> Option<String> {
    std::env::var(var).ok().filter(|s| !s.is_empty())
}

// --- Simulator binary ---

pub fn sim_binary() -> Option<String> {
    non_empty("CROWD_SIM_BINARY")
}

// --- Timeouts ---

/// How long `stop --wait` waits for the simulator to exit.
pub fn timeout_exit() -> Duration {
    parse_duration_ms("CROWD_TIMEOUT_EXIT_MS").unwrap_or(Duration::from_secs(10))
}

/// Interval between liveness probes while waiting.
pub fn poll_interval() -> Duration {
    parse_duration_ms("CROWD_POLL_MS").unwrap_or(Duration::from_millis(50))
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
