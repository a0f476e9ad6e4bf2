// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared status table: latest snapshot per participant.
//!
//! The supervisor holds the table; each worker's status stream gets a
//! [`StatusWriter`] bound to that worker's name, so no stream can overwrite
//! another participant's entry. Reads are point-in-time copies.

use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::Mutex;
use thiserror::Error;

use crate::participant::{ParticipantName, ParticipantSnapshot, ParticipantState};

/// Snapshot delivered to a writer bound to a different participant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("writer for {owner} rejected snapshot for {found}")]
pub struct ForeignSnapshot {
    pub owner: ParticipantName,
    pub found: ParticipantName,
}

/// Insertion-ordered map from participant name to its latest snapshot.
#[derive(Debug, Clone, Default)]
pub struct StatusTable {
    inner: Arc<Mutex<IndexMap<ParticipantName, ParticipantSnapshot>>>,
}

impl StatusTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Writer that may only publish snapshots for `name`.
    pub fn writer(&self, name: ParticipantName) -> StatusWriter {
        StatusWriter {
            name,
            table: self.clone(),
        }
    }

    pub fn get(&self, name: &str) -> Option<ParticipantSnapshot> {
        self.inner.lock().get(name).cloned()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// Name and state of the first `limit` participants to report.
    pub fn sample(&self, limit: usize) -> Vec<(ParticipantName, ParticipantState)> {
        self.inner
            .lock()
            .values()
            .take(limit)
            .map(|snap| (snap.name.clone(), snap.state))
            .collect()
    }

    /// Copy of every snapshot in report order.
    pub fn snapshots(&self) -> Vec<ParticipantSnapshot> {
        self.inner.lock().values().cloned().collect()
    }

    pub fn count_in(&self, state: ParticipantState) -> usize {
        self.inner
            .lock()
            .values()
            .filter(|snap| snap.state == state)
            .count()
    }

    /// Sum of work units reported so far.
    pub fn total_work_done(&self) -> u64 {
        self.inner
            .lock()
            .values()
            .filter_map(|snap| snap.work_done)
            .sum()
    }

    fn insert(&self, snapshot: ParticipantSnapshot) {
        self.inner.lock().insert(snapshot.name.clone(), snapshot);
    }
}

/// Write handle owning exactly one key of a [`StatusTable`].
#[derive(Debug, Clone)]
pub struct StatusWriter {
    name: ParticipantName,
    table: StatusTable,
}

impl StatusWriter {
    pub fn name(&self) -> &ParticipantName {
        &self.name
    }

    /// Replace this participant's entry with `snapshot`.
    pub fn publish(&self, snapshot: ParticipantSnapshot) -> Result<(), ForeignSnapshot> {
        if snapshot.name != self.name {
            return Err(ForeignSnapshot {
                owner: self.name.clone(),
                found: snapshot.name,
            });
        }
        self.table.insert(snapshot);
        Ok(())
    }
}

#[cfg(test)]
#[path = "status_table_tests.rs"]
mod tests;
