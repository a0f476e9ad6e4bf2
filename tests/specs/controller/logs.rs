//! Controller log view specs
//!
//! `status` and `logs` read the tracked run's record log; `logs --console`
//! reads the simulator's own output.

use crate::prelude::*;

const QUICK_RUN: &[&str] = &[
    "start", "--users", "3", "--stay", "0.2", "--work", "0.05", "--stagger", "0",
];

fn start_and_finish(sandbox: &Sandbox) {
    sandbox
        .crowd()
        .args(QUICK_RUN)
        .args(&["--log", "logs/records.log"])
        .passes();
    let done = wait_for(SPEC_WAIT_MAX_MS, || {
        json_lines(&sandbox.path().join("logs/records.log")).len() == 3
    });
    assert!(done, "console: {}", sandbox.console());
}

#[test]
fn logs_show_last_records() {
    let sandbox = Sandbox::new();
    start_and_finish(&sandbox);

    let out = sandbox.crowd().args(&["logs", "-n", "2"]).passes().stdout();
    let lines: Vec<&str> = out.lines().collect();

    assert_eq!(lines.len(), 2);
    for line in lines {
        let record: serde_json::Value = serde_json::from_str(line).unwrap();
        assert!(record["work_done"].is_u64());
    }
}

#[test]
fn status_tails_tracked_log() {
    let sandbox = Sandbox::new();
    start_and_finish(&sandbox);

    let log = sandbox.path().join("logs/records.log");
    sandbox
        .crowd()
        .args(&["status"])
        .passes()
        .stdout_has(&format!("Log tail ({}):", log.display()))
        .stdout_has("\"meeting_code\":\"SIM-MEET-123\"");
}

#[test]
fn logs_console_shows_simulator_output() {
    let sandbox = Sandbox::new();
    start_and_finish(&sandbox);

    let finished = wait_for(SPEC_WAIT_MAX_MS, || {
        sandbox.console().contains("Simulation complete.")
    });
    assert!(finished);

    sandbox
        .crowd()
        .args(&["logs", "--console"])
        .passes()
        .stdout_has("Starting simulation: 3 participants");
}

#[test]
fn logs_json_lists_lines() {
    let sandbox = Sandbox::new();
    start_and_finish(&sandbox);

    let json = sandbox
        .crowd()
        .args(&["-o", "json", "logs"])
        .passes()
        .stdout_json();

    assert_eq!(json["lines"].as_array().unwrap().len(), 3);
}

#[test]
fn logs_before_any_run() {
    let sandbox = Sandbox::new();
    sandbox
        .crowd()
        .args(&["logs"])
        .passes()
        .stdout_eq("Log file not found yet. Start a simulation to create it.\n");
}
