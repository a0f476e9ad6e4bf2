// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Append-only newline-delimited JSON log of finished participants.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::participant::{ParticipantName, ParticipantSnapshot};

#[derive(Debug, Error)]
pub enum RecordError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// One line of the record log, written when a participant leaves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogRecord {
    pub name: ParticipantName,
    pub meeting_code: String,
    pub started_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left_at: Option<String>,
    pub work_done: u64,
}

impl LogRecord {
    pub fn from_snapshot(snapshot: &ParticipantSnapshot, meeting_code: &str) -> Self {
        Self {
            name: snapshot.name.clone(),
            meeting_code: meeting_code.to_string(),
            started_at: snapshot.started_at.clone(),
            left_at: snapshot.left_at.clone(),
            work_done: snapshot.work_done.unwrap_or(0),
        }
    }
}

/// Append `record` as a single JSON line.
///
/// The line is written with one `write_all` on an `O_APPEND` handle so
/// concurrent writers never interleave inside a record.
pub fn append_record(path: &Path, record: &LogRecord) -> Result<(), RecordError> {
    let mut line = serde_json::to_string(record)?;
    line.push('\n');
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    file.write_all(line.as_bytes())?;
    Ok(())
}

/// Read every record from `path`, skipping blank lines.
pub fn read_records(path: &Path) -> Result<Vec<LogRecord>, RecordError> {
    let content = fs::read_to_string(path)?;
    content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| serde_json::from_str(line).map_err(RecordError::from))
        .collect()
}

#[cfg(test)]
#[path = "record_tests.rs"]
mod tests;
