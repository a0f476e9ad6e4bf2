// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Lifecycle of one simulated participant.
//!
//! `connecting -> connected -> working -> idle -> left`, publishing a
//! snapshot to the sink at every step. Nothing here returns an error: a
//! record that cannot be written is reported and the participant still
//! leaves.

use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use crowd_core::{
    append_record, idle_duration, utc_now, LogRecord, ParticipantName, ParticipantSnapshot,
    ParticipantState, RunConfig,
};

use crate::sink::StatusSink;
use crate::work::cpu_work_for;

/// Everything one participant needs to run, derived from the run configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ParticipantPlan {
    pub name: ParticipantName,
    pub meeting_code: String,
    pub stay: Duration,
    pub work: Duration,
    pub start_delay: Duration,
    pub log_path: Option<PathBuf>,
}

impl ParticipantPlan {
    /// Plan for the participant at zero-based `index` of a run.
    pub fn for_participant(config: &RunConfig, name: ParticipantName, index: usize) -> Self {
        Self {
            name,
            meeting_code: config.meeting_code.clone(),
            stay: config.stay,
            work: config.work,
            start_delay: config.start_delay(index),
            log_path: config.log_path.clone(),
        }
    }

    pub fn idle(&self) -> Duration {
        idle_duration(self.stay, self.work)
    }
}

/// Run a participant to completion, returning its final snapshot.
///
/// Blocks the calling thread for roughly `start_delay + max(stay, work)`.
pub fn run_participant<S: StatusSink + ?Sized>(
    plan: &ParticipantPlan,
    sink: &S,
) -> ParticipantSnapshot {
    let mut snapshot =
        ParticipantSnapshot::connecting(plan.name.clone(), std::process::id(), utc_now());
    sink.publish(&snapshot);

    if !plan.start_delay.is_zero() {
        thread::sleep(plan.start_delay);
    }

    advance(&mut snapshot, ParticipantState::Connected, sink);
    advance(&mut snapshot, ParticipantState::Working, sink);

    let units = cpu_work_for(plan.work, &mut rand::rng());
    match snapshot.finish_work(units, utc_now()) {
        Ok(()) => sink.publish(&snapshot),
        Err(e) => tracing::error!(error = %e, "lifecycle out of order"),
    }
    tracing::debug!(name = %plan.name, units, "work finished");

    thread::sleep(plan.idle());
    advance(&mut snapshot, ParticipantState::Left, sink);

    if let Some(path) = &plan.log_path {
        let record = LogRecord::from_snapshot(&snapshot, &plan.meeting_code);
        if let Err(e) = append_record(path, &record) {
            tracing::warn!(
                name = %plan.name,
                path = %path.display(),
                error = %e,
                "could not write log record"
            );
        }
    }

    snapshot
}

fn advance<S: StatusSink + ?Sized>(
    snapshot: &mut ParticipantSnapshot,
    to: ParticipantState,
    sink: &S,
) {
    match snapshot.advance(to, utc_now()) {
        Ok(()) => sink.publish(snapshot),
        Err(e) => tracing::error!(error = %e, "lifecycle out of order"),
    }
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;
