// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Destinations for a participant's status snapshots.
//!
//! A worker process publishes to [`StdoutSink`]; the supervisor decodes each
//! line of the worker's stdout back into a snapshot with
//! [`decode_status_line`].

use std::io::Write;

use crowd_core::{ParticipantSnapshot, StatusWriter};

/// Receives every snapshot a participant produces, in order.
pub trait StatusSink {
    fn publish(&self, snapshot: &ParticipantSnapshot);
}

/// One JSON line per snapshot on stdout.
///
/// A closed stdout (supervisor gone) is logged and otherwise ignored.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutSink;

impl StatusSink for StdoutSink {
    fn publish(&self, snapshot: &ParticipantSnapshot) {
        let line = match encode_status_line(snapshot) {
            Ok(line) => line,
            Err(e) => {
                tracing::warn!(name = %snapshot.name, error = %e, "failed to encode status");
                return;
            }
        };
        let mut stdout = std::io::stdout().lock();
        if let Err(e) = stdout.write_all(line.as_bytes()).and_then(|()| stdout.flush()) {
            tracing::debug!(name = %snapshot.name, error = %e, "status stream closed");
        }
    }
}

/// Publish straight into an in-process status table.
impl StatusSink for StatusWriter {
    fn publish(&self, snapshot: &ParticipantSnapshot) {
        if let Err(e) = StatusWriter::publish(self, snapshot.clone()) {
            tracing::warn!(error = %e, "dropped status update");
        }
    }
}

/// Serialize a snapshot as one newline-terminated JSON line.
pub fn encode_status_line(snapshot: &ParticipantSnapshot) -> Result<String, serde_json::Error> {
    let mut line = serde_json::to_string(snapshot)?;
    line.push('\n');
    Ok(line)
}

pub fn decode_status_line(line: &str) -> Result<ParticipantSnapshot, serde_json::Error> {
    serde_json::from_str(line.trim_end())
}

/// Sink that keeps every snapshot for later inspection.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct RecordingSink {
    published: parking_lot::Mutex<Vec<ParticipantSnapshot>>,
}

#[cfg(test)]
impl RecordingSink {
    pub fn snapshots(&self) -> Vec<ParticipantSnapshot> {
        self.published.lock().clone()
    }

    pub fn states(&self) -> Vec<crowd_core::ParticipantState> {
        self.published.lock().iter().map(|s| s.state).collect()
    }
}

#[cfg(test)]
impl StatusSink for RecordingSink {
    fn publish(&self, snapshot: &ParticipantSnapshot) {
        self.published.lock().push(snapshot.clone());
    }
}

#[cfg(test)]
#[path = "sink_tests.rs"]
mod tests;
