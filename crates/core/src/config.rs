// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Run configuration shared by the simulator and the controller.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Meeting label used when none is given.
pub const DEFAULT_MEETING_CODE: &str = "SIM-MEET-123";

/// Record log written when no path is given.
pub const DEFAULT_LOG_PATH: &str = "crowdsim.log";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("participant count must be at least 1")]
    NoParticipants,
    #[error("{field} must be a finite, non-negative number of seconds (got {value})")]
    InvalidSeconds { field: &'static str, value: f64 },
}

/// Immutable configuration for one simulation run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub participants: usize,
    /// Opaque label copied into every log record
    pub meeting_code: String,
    /// Logged at startup, never used
    pub passcode: String,
    /// Total time each participant stays, work included
    pub stay: Duration,
    /// Wall-clock budget for CPU-bound work
    pub work: Duration,
    /// Delay between consecutive participants' connection times
    pub stagger: Duration,
    /// Where to append per-participant records; `None` disables them
    pub log_path: Option<PathBuf>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            participants: 10,
            meeting_code: DEFAULT_MEETING_CODE.to_string(),
            passcode: String::new(),
            stay: Duration::from_secs(120),
            work: Duration::from_secs(20),
            stagger: Duration::from_millis(500),
            log_path: Some(PathBuf::from(DEFAULT_LOG_PATH)),
        }
    }
}

impl RunConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.participants == 0 {
            return Err(ConfigError::NoParticipants);
        }
        Ok(())
    }

    /// Start delay for the participant at zero-based `index`.
    pub fn start_delay(&self, index: usize) -> Duration {
        let factor = u32::try_from(index).unwrap_or(u32::MAX);
        self.stagger.saturating_mul(factor)
    }

    /// Idle time each participant spends after its work finishes.
    pub fn idle(&self) -> Duration {
        idle_duration(self.stay, self.work)
    }
}

/// Remaining presence after work: `max(0, stay - work)`.
pub fn idle_duration(stay: Duration, work: Duration) -> Duration {
    stay.saturating_sub(work)
}

/// Convert a user-supplied seconds value into a [`Duration`].
pub fn seconds(field: &'static str, value: f64) -> Result<Duration, ConfigError> {
    Duration::try_from_secs_f64(value).map_err(|_| ConfigError::InvalidSeconds { field, value })
}

/// Treat an empty path as "no record log".
pub fn log_path(raw: &str) -> Option<PathBuf> {
    if raw.trim().is_empty() {
        None
    } else {
        Some(PathBuf::from(raw))
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
