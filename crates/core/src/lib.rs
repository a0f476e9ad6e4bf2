// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! crowd-core: Core library for the crowd participant simulator

pub mod config;
pub mod id;
pub mod names;
pub mod participant;
pub mod record;
pub mod status_table;
pub mod time_fmt;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use config::{idle_duration, ConfigError, RunConfig, DEFAULT_LOG_PATH, DEFAULT_MEETING_CODE};
pub use names::{generate_names, generate_names_with};
pub use participant::{ParticipantName, ParticipantSnapshot, ParticipantState, TransitionError};
pub use record::{append_record, read_records, LogRecord, RecordError};
pub use status_table::{ForeignSnapshot, StatusTable, StatusWriter};
pub use time_fmt::{format_elapsed, format_timestamp, utc_now};
