// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Command-line arguments shared by `crowdsim` and `crowd start`.

use std::path::PathBuf;

use clap::Args;
use crowd_core::config::{log_path, seconds};
use crowd_core::{ConfigError, ParticipantName, RunConfig, DEFAULT_LOG_PATH, DEFAULT_MEETING_CODE};

use crate::lifecycle::ParticipantPlan;

/// Run configuration flags
#[derive(Args, Debug, Clone, PartialEq)]
pub struct RunArgs {
    /// Number of simulated participants
    #[arg(long, default_value_t = 10)]
    pub users: usize,

    /// Meeting code (just for logs)
    #[arg(long, default_value = DEFAULT_MEETING_CODE)]
    pub meeting: String,

    /// Passcode (for logs only)
    #[arg(long, default_value = "")]
    pub passcode: String,

    /// Seconds each participant stays connected (including work)
    #[arg(long, default_value_t = 120.0)]
    pub stay: f64,

    /// Seconds of CPU-bound work per participant
    #[arg(long, default_value_t = 20.0)]
    pub work: f64,

    /// Seconds to stagger start between participants
    #[arg(long, default_value_t = 0.5)]
    pub stagger: f64,

    /// File to append per-participant JSON records to (empty disables)
    #[arg(long, default_value = DEFAULT_LOG_PATH)]
    pub log: String,
}

impl Default for RunArgs {
    fn default() -> Self {
        Self {
            users: 10,
            meeting: DEFAULT_MEETING_CODE.to_string(),
            passcode: String::new(),
            stay: 120.0,
            work: 20.0,
            stagger: 0.5,
            log: DEFAULT_LOG_PATH.to_string(),
        }
    }
}

impl RunArgs {
    pub fn to_config(&self) -> Result<RunConfig, ConfigError> {
        let config = RunConfig {
            participants: self.users,
            meeting_code: self.meeting.clone(),
            passcode: self.passcode.clone(),
            stay: seconds("--stay", self.stay)?,
            work: seconds("--work", self.work)?,
            stagger: seconds("--stagger", self.stagger)?,
            log_path: log_path(&self.log),
        };
        config.validate()?;
        Ok(config)
    }

    /// Flags that reproduce these arguments on a `crowdsim` command line.
    pub fn to_argv(&self) -> Vec<String> {
        let mut argv = vec![
            "--users".to_string(),
            self.users.to_string(),
            "--meeting".to_string(),
            self.meeting.clone(),
        ];
        if !self.passcode.is_empty() {
            argv.push("--passcode".to_string());
            argv.push(self.passcode.clone());
        }
        argv.extend([
            "--stay".to_string(),
            self.stay.to_string(),
            "--work".to_string(),
            self.work.to_string(),
            "--stagger".to_string(),
            self.stagger.to_string(),
            "--log".to_string(),
            self.log.clone(),
        ]);
        argv
    }
}

/// Arguments of the hidden per-participant worker subcommand
#[derive(Args, Debug, Clone, PartialEq)]
pub struct ParticipantArgs {
    /// Display name
    #[arg(long)]
    pub name: String,

    /// Meeting code copied into the record
    #[arg(long)]
    pub meeting: String,

    /// Seconds of total presence
    #[arg(long)]
    pub stay: f64,

    /// Seconds of CPU-bound work
    #[arg(long)]
    pub work: f64,

    /// Seconds to wait before connecting
    #[arg(long, default_value_t = 0.0)]
    pub delay: f64,

    /// Record log to append to on leave
    #[arg(long)]
    pub log: Option<PathBuf>,
}

impl ParticipantArgs {
    pub fn to_plan(&self) -> Result<ParticipantPlan, ConfigError> {
        Ok(ParticipantPlan {
            name: ParticipantName::new(self.name.clone()),
            meeting_code: self.meeting.clone(),
            stay: seconds("--stay", self.stay)?,
            work: seconds("--work", self.work)?,
            start_delay: seconds("--delay", self.delay)?,
            log_path: self.log.clone(),
        })
    }
}

#[cfg(test)]
#[path = "args_tests.rs"]
mod tests;
