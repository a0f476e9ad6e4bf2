// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for use across crates.
//!
//! Gated behind `#[cfg(any(test, feature = "test-support"))]`.

use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::{ParticipantSnapshot, ParticipantState};

/// Fixed instant `secs` seconds after 2026-01-30T08:00:00Z.
pub fn at_secs(secs: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 30, 8, 0, 0)
        .single()
        .unwrap_or_default()
        + Duration::seconds(secs)
}

/// Snapshot for `name` walked forward from `connecting` until it reaches `state`.
///
/// Each transition is stamped one second after the previous one; a participant
/// that reaches `idle` is credited with 10 work units.
pub fn snapshot(name: &str, state: ParticipantState) -> ParticipantSnapshot {
    let mut snap = ParticipantSnapshot::connecting(name.into(), 1000, at_secs(0));
    let mut tick = 0;
    while snap.state != state {
        tick += 1;
        let stepped = match snap.state {
            ParticipantState::Working => snap.finish_work(10, at_secs(tick)),
            current => match current.next() {
                Some(next) => snap.advance(next, at_secs(tick)),
                None => break,
            },
        };
        if stepped.is_err() {
            break;
        }
    }
    snap
}
