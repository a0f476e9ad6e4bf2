// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tracked simulator run.
//!
//! The controller shares nothing with the simulator except files and
//! signals: the pid and file locations of the current run live in
//! `<state_dir>/sim.json`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Utc};
use crowd_core::{utc_now, ConfigError};
use crowd_sim::RunArgs;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::sim_process::{process_exists, start_sim_background, terminate, wait_for_exit};

const STATE_FILE: &str = "sim.json";
const CONSOLE_FILE: &str = "console.log";

/// Controller errors
#[derive(Debug, Error)]
pub enum ControlError {
    #[error("Could not determine state directory")]
    NoStateDir,

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Failed to start simulator {}: {source}", binary.display())]
    Launch {
        binary: PathBuf,
        source: std::io::Error,
    },

    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Corrupt state file {}: {source}", path.display())]
    State {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl ControlError {
    fn io(path: &Path) -> impl FnOnce(std::io::Error) -> Self + '_ {
        move |source| ControlError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// A simulator launched by `crowd start`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackedRun {
    pub pid: u32,
    /// Absolute record log path, absent when logging was disabled
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_path: Option<PathBuf>,
    pub console_path: PathBuf,
    pub started_at: DateTime<Utc>,
}

#[derive(Debug, PartialEq)]
pub enum StartOutcome {
    Started(TrackedRun),
    /// A tracked simulator is still alive; nothing was changed
    AlreadyRunning(TrackedRun),
}

#[derive(Debug, PartialEq)]
pub enum StopOutcome {
    Stopped { pid: u32 },
    /// SIGTERM was sent but the process outlived the wait
    StillRunning { pid: u32 },
    NotRunning,
}

pub struct Controller {
    state_dir: PathBuf,
    sim_binary: PathBuf,
}

impl Controller {
    pub fn new(state_dir: impl Into<PathBuf>, sim_binary: impl Into<PathBuf>) -> Self {
        Self {
            state_dir: state_dir.into(),
            sim_binary: sim_binary.into(),
        }
    }

    /// Controller for the state directory and simulator binary resolved from
    /// the environment.
    pub fn from_env() -> Result<Self, ControlError> {
        Ok(Self::new(
            crate::env::state_dir()?,
            crate::sim_process::find_sim_binary(),
        ))
    }

    pub fn state_path(&self) -> PathBuf {
        self.state_dir.join(STATE_FILE)
    }

    pub fn console_path(&self) -> PathBuf {
        self.state_dir.join(CONSOLE_FILE)
    }

    /// The recorded run, alive or not.
    pub fn tracked(&self) -> Result<Option<TrackedRun>, ControlError> {
        let path = self.state_path();
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(ControlError::io(&path)(e)),
        };
        serde_json::from_str(&content)
            .map(Some)
            .map_err(|source| ControlError::State { path, source })
    }

    /// The recorded run if its process is alive.
    pub fn running(&self) -> Result<Option<TrackedRun>, ControlError> {
        Ok(self.tracked()?.filter(|run| process_exists(run.pid)))
    }

    /// Launch the simulator unless a tracked one is alive.
    pub fn start(&self, args: &RunArgs) -> Result<StartOutcome, ControlError> {
        if let Some(run) = self.running()? {
            warn!(pid = run.pid, "simulation already running");
            return Ok(StartOutcome::AlreadyRunning(run));
        }

        let config = args.to_config()?;
        let log_path = config.log_path.as_deref().map(absolute);
        if let Some(parent) = log_path.as_deref().and_then(Path::parent) {
            std::fs::create_dir_all(parent).map_err(ControlError::io(parent))?;
        }
        std::fs::create_dir_all(&self.state_dir).map_err(ControlError::io(&self.state_dir))?;

        let argv = RunArgs {
            log: log_path
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default(),
            ..args.clone()
        }
        .to_argv();
        let console_path = self.console_path();

        let child = start_sim_background(&self.sim_binary, &argv, &console_path).map_err(
            |source| ControlError::Launch {
                binary: self.sim_binary.clone(),
                source,
            },
        )?;

        let run = TrackedRun {
            pid: child.id(),
            log_path,
            console_path,
            started_at: utc_now(),
        };
        self.save(&run)?;
        info!(pid = run.pid, binary = %self.sim_binary.display(), "started simulation");
        Ok(StartOutcome::Started(run))
    }

    /// SIGTERM the tracked simulator and forget it. With `wait`, block until
    /// it exits or the timeout passes.
    pub async fn stop(&self, wait: Option<Duration>) -> Result<StopOutcome, ControlError> {
        let Some(run) = self.running()? else {
            return Ok(StopOutcome::NotRunning);
        };

        if !terminate(run.pid) {
            debug!(pid = run.pid, "SIGTERM not delivered");
        }
        self.clear()?;

        if let Some(timeout) = wait {
            if !wait_for_exit(run.pid, timeout, crate::env::poll_interval()).await {
                warn!(pid = run.pid, "simulation still running after SIGTERM");
                return Ok(StopOutcome::StillRunning { pid: run.pid });
            }
        }
        Ok(StopOutcome::Stopped { pid: run.pid })
    }

    fn save(&self, run: &TrackedRun) -> Result<(), ControlError> {
        let path = self.state_path();
        let tmp = path.with_extension("json.tmp");
        let json = serde_json::to_vec_pretty(run).map_err(|source| ControlError::State {
            path: path.clone(),
            source,
        })?;
        std::fs::write(&tmp, json).map_err(ControlError::io(&tmp))?;
        std::fs::rename(&tmp, &path).map_err(ControlError::io(&path))
    }

    fn clear(&self) -> Result<(), ControlError> {
        let path = self.state_path();
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ControlError::io(&path)(e)),
        }
    }
}

fn absolute(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    std::env::current_dir()
        .map(|cwd| cwd.join(path))
        .unwrap_or_else(|_| path.to_path_buf())
}

#[cfg(test)]
#[path = "controller_tests.rs"]
mod tests;
