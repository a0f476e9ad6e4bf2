//! Simulator run specs
//!
//! A full run with short durations: monitor output, one JSON record per
//! participant, and the disabled-log path.

use std::collections::HashSet;

use crate::prelude::*;

const QUICK_RUN: &[&str] = &[
    "--users", "3", "--meeting", "TEST123", "--stay", "0.3", "--work", "0.1", "--stagger",
    "0.05",
];

#[test]
fn run_prints_start_samples_and_summary() {
    let sandbox = Sandbox::new();
    sandbox
        .crowdsim()
        .args(QUICK_RUN)
        .args(&["--log", "out/records.log"])
        .passes()
        .stdout_has("Starting simulation: 3 participants")
        .stdout_has("Alive workers: ")
        .stdout_has("Simulation complete. Logs -> out/records.log")
        .stdout_has("launched: 3/3, left: 3, terminated: 0");
}

#[test]
fn every_participant_appends_one_record() {
    let sandbox = Sandbox::new();
    sandbox
        .crowdsim()
        .args(QUICK_RUN)
        .args(&["--log", "out/records.log"])
        .passes();

    let records = json_lines(&sandbox.path().join("out/records.log"));
    assert_eq!(records.len(), 3);

    let names: HashSet<String> = records
        .iter()
        .map(|r| r["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names.len(), 3);
    for i in 1..=3 {
        assert!(
            names.iter().any(|n| n.ends_with(&format!(" #{}", i))),
            "no participant #{} in {:?}",
            i,
            names
        );
    }

    for record in &records {
        let obj = record.as_object().unwrap();
        let mut keys: Vec<&str> = obj.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(
            keys,
            ["left_at", "meeting_code", "name", "started_at", "work_done"]
        );
        assert_eq!(record["meeting_code"], "TEST123");
        assert!(record["work_done"].is_u64());
        assert!(record["started_at"].as_str().unwrap().ends_with('Z'));
        assert!(record["left_at"].as_str().unwrap().ends_with('Z'));
    }
}

#[test]
fn work_longer_than_stay_still_completes() {
    let sandbox = Sandbox::new();
    let start = std::time::Instant::now();
    sandbox
        .crowdsim()
        .args(&["--users", "2", "--stay", "0.1", "--work", "0.3", "--stagger", "0"])
        .args(&["--log", "records.log"])
        .passes()
        .stdout_has("left: 2");

    // Idle clamps to zero: the run is bounded by the work budget
    assert!(start.elapsed() < std::time::Duration::from_secs(5));
    assert_eq!(json_lines(&sandbox.path().join("records.log")).len(), 2);
}

#[test]
fn empty_log_path_disables_records() {
    let sandbox = Sandbox::new();
    sandbox
        .crowdsim()
        .args(QUICK_RUN)
        .args(&["--log", ""])
        .passes()
        .stdout_has("Logs -> stdout");

    assert!(!sandbox.path().join("crowdsim.log").exists());
}

#[test]
fn default_log_lands_in_working_directory() {
    let sandbox = Sandbox::new();
    sandbox.crowdsim().args(QUICK_RUN).passes();

    assert_eq!(json_lines(&sandbox.path().join("crowdsim.log")).len(), 3);
}

#[test]
fn worker_subcommand_streams_states_and_writes_record() {
    let sandbox = Sandbox::new();
    let output = sandbox
        .crowdsim()
        .args(&[
            "participant", "--name", "Solo Worker #1", "--meeting", "TEST123", "--stay", "0.1",
            "--work", "0.05", "--log", "solo.log",
        ])
        .passes()
        .stdout();

    let states: Vec<String> = output
        .lines()
        .map(|line| serde_json::from_str::<serde_json::Value>(line).unwrap())
        .map(|snapshot| snapshot["state"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(states.first().map(String::as_str), Some("connecting"));
    assert_eq!(states.last().map(String::as_str), Some("left"));

    let records = json_lines(&sandbox.path().join("solo.log"));
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["name"], "Solo Worker #1");
}
