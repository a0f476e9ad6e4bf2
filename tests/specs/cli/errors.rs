//! Error reporting specs
//!
//! Argument errors exit 2; configuration and startup errors exit 1.

use crate::prelude::*;

#[test]
fn crowdsim_unknown_flag_exits_two() {
    crowdsim().args(&["--bogus"]).fails().exit_code(2);
}

#[test]
fn crowdsim_zero_users_is_a_config_error() {
    let sandbox = Sandbox::new();
    sandbox
        .crowdsim()
        .args(&["--users", "0"])
        .fails()
        .exit_code(1)
        .stderr_has("Error: participant count must be at least 1");
}

#[test]
fn crowdsim_negative_duration_is_a_config_error() {
    let sandbox = Sandbox::new();
    sandbox
        .crowdsim()
        .args(&["--users", "1", "--work=-2"])
        .fails()
        .exit_code(1)
        .stderr_has("--work must be a finite, non-negative number of seconds");
}

#[test]
fn crowd_start_rejects_invalid_config_without_tracking() {
    let sandbox = Sandbox::new();
    sandbox
        .crowd()
        .args(&["start", "--users", "0"])
        .fails()
        .exit_code(1)
        .stderr_has("Error: participant count must be at least 1");
    assert_eq!(sandbox.tracked_pid(), None);
}

#[test]
fn crowd_start_reports_missing_simulator() {
    let sandbox = Sandbox::new();
    sandbox
        .crowd()
        .env("CROWD_SIM_BINARY", "/nonexistent/crowdsim")
        .args(&["start"])
        .fails()
        .exit_code(1)
        .stderr_has("Failed to start simulator /nonexistent/crowdsim");
    assert_eq!(sandbox.tracked_pid(), None);
}
