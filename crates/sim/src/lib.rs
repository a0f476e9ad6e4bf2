// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! crowd-sim: participant lifecycle simulator
//!
//! Library half of the `crowdsim` binary. The controller depends on it for
//! the shared [`RunArgs`] flags.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod args;
pub mod env;
pub mod error;
pub mod lifecycle;
pub mod sink;
pub mod spawn;
pub mod supervisor;
pub mod work;

pub use args::{ParticipantArgs, RunArgs};
pub use error::SimError;
pub use lifecycle::{run_participant, ParticipantPlan};
pub use sink::{StatusSink, StdoutSink};
pub use supervisor::{RunOutcome, RunReport, Supervisor};
