// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Participant lifecycle state and status snapshots.
//!
//! A participant moves strictly forward through
//! `connecting -> connected -> working -> idle -> left`. The snapshot is the
//! unit shared with the supervisor: each transition replaces the previous
//! snapshot for that participant in the status table.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::time_fmt::format_timestamp;

crate::define_id! {
    /// Display name of a simulated participant, unique within a run.
    pub struct ParticipantName;
}

/// Lifecycle state of a participant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParticipantState {
    Connecting,
    Connected,
    Working,
    Idle,
    /// Terminal
    Left,
}

impl ParticipantState {
    /// Every state in lifecycle order.
    pub const SEQUENCE: [ParticipantState; 5] = [
        ParticipantState::Connecting,
        ParticipantState::Connected,
        ParticipantState::Working,
        ParticipantState::Idle,
        ParticipantState::Left,
    ];

    /// The only state this one may advance to.
    pub fn next(self) -> Option<Self> {
        match self {
            ParticipantState::Connecting => Some(ParticipantState::Connected),
            ParticipantState::Connected => Some(ParticipantState::Working),
            ParticipantState::Working => Some(ParticipantState::Idle),
            ParticipantState::Idle => Some(ParticipantState::Left),
            ParticipantState::Left => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        self == ParticipantState::Left
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ParticipantState::Connecting => "connecting",
            ParticipantState::Connected => "connected",
            ParticipantState::Working => "working",
            ParticipantState::Idle => "idle",
            ParticipantState::Left => "left",
        }
    }
}

impl fmt::Display for ParticipantState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rejected attempt to skip or reverse a lifecycle state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid transition for {name}: {from} -> {to}")]
pub struct TransitionError {
    pub name: ParticipantName,
    pub from: ParticipantState,
    pub to: ParticipantState,
}

/// Point-in-time view of one participant.
///
/// Timestamps are ISO-8601 UTC strings (see [`format_timestamp`]). Fields for
/// states not yet reached are absent from the serialized form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantSnapshot {
    pub name: ParticipantName,
    pub state: ParticipantState,
    pub pid: u32,
    pub started_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connected_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub work_started_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub work_done: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub work_finished_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left_at: Option<String>,
}

impl ParticipantSnapshot {
    /// A freshly launched participant in the `connecting` state.
    pub fn connecting(name: ParticipantName, pid: u32, started_at: DateTime<Utc>) -> Self {
        Self {
            name,
            state: ParticipantState::Connecting,
            pid,
            started_at: format_timestamp(started_at),
            connected_at: None,
            work_started_at: None,
            work_done: None,
            work_finished_at: None,
            left_at: None,
        }
    }

    /// Move to `to`, stamping the transition time.
    ///
    /// Fails unless `to` is exactly the successor of the current state.
    pub fn advance(
        &mut self,
        to: ParticipantState,
        at: DateTime<Utc>,
    ) -> Result<(), TransitionError> {
        if self.state.next() != Some(to) {
            return Err(TransitionError {
                name: self.name.clone(),
                from: self.state,
                to,
            });
        }
        let stamp = format_timestamp(at);
        match to {
            ParticipantState::Connected => self.connected_at = Some(stamp),
            ParticipantState::Working => self.work_started_at = Some(stamp),
            ParticipantState::Idle => {
                if self.work_finished_at.is_none() {
                    self.work_finished_at = Some(stamp);
                }
            }
            ParticipantState::Left => self.left_at = Some(stamp),
            ParticipantState::Connecting => {}
        }
        self.state = to;
        Ok(())
    }

    /// Record the work tally and move from `working` to `idle`.
    pub fn finish_work(&mut self, units: u64, at: DateTime<Utc>) -> Result<(), TransitionError> {
        if self.state != ParticipantState::Working {
            return Err(TransitionError {
                name: self.name.clone(),
                from: self.state,
                to: ParticipantState::Idle,
            });
        }
        self.work_done = Some(units);
        self.work_finished_at = Some(format_timestamp(at));
        self.advance(ParticipantState::Idle, at)
    }

    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }
}

#[cfg(test)]
#[path = "participant_tests.rs"]
mod tests;
