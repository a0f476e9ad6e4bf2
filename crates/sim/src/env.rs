// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the simulator crate.

use std::time::Duration;

/// Supervisor liveness poll interval override
pub fn monitor_poll_ms() -> Option<Duration> {
    std::env::var("CROWD_MONITOR_POLL_MS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
}

/// Worker binary override (defaults to the running executable)
pub fn worker_binary() -> Option<String> {
    std::env::var("CROWD_WORKER_BINARY")
        .ok()
        .filter(|s| !s.is_empty())
}
