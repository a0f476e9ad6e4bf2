// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Simulation supervisor.
//!
//! Launches one worker process per participant, feeds each worker's status
//! stream into the shared [`StatusTable`], and prints a liveness sample every
//! poll interval until every worker has exited. On shutdown every live
//! worker is killed outright; the supervisor still waits for all of them
//! before reporting.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crowd_core::{
    format_elapsed, format_timestamp, generate_names, utc_now, ParticipantName,
    ParticipantSnapshot, ParticipantState, RunConfig, StatusTable, StatusWriter,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::{Child, ChildStdout};
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::error::SimError;
use crate::lifecycle::ParticipantPlan;
use crate::sink::decode_status_line;
use crate::spawn::worker_command;

/// Default time between liveness polls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Participants shown per liveness poll.
pub const SAMPLE_SIZE: usize = 5;

/// How the monitoring phase ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Every worker exited on its own
    Completed,
    /// Shutdown was requested; `terminated` workers were killed
    Interrupted { terminated: usize },
}

/// Summary of a finished run, produced after every worker has exited.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub outcome: RunOutcome,
    pub requested: usize,
    pub launched: usize,
    /// Participants whose last reported state is `left`
    pub left: usize,
    pub work_done: u64,
    pub elapsed: Duration,
    pub snapshots: Vec<ParticipantSnapshot>,
}

struct WorkerHandle {
    name: ParticipantName,
    child: Child,
    reader: JoinHandle<()>,
}

pub struct Supervisor {
    config: RunConfig,
    program: PathBuf,
    poll_interval: Duration,
    table: StatusTable,
}

impl Supervisor {
    /// Supervisor that launches workers by executing `program`.
    pub fn new(config: RunConfig, program: PathBuf) -> Self {
        Self {
            config,
            program,
            poll_interval: crate::env::monitor_poll_ms().unwrap_or(DEFAULT_POLL_INTERVAL),
            table: StatusTable::new(),
        }
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Handle to the live status table.
    pub fn status(&self) -> StatusTable {
        self.table.clone()
    }

    /// Run the simulation until every worker has exited.
    ///
    /// A notification on `shutdown` kills all live workers; the returned
    /// report is produced only after each of them has been reaped.
    pub async fn run(self, shutdown: Arc<Notify>) -> Result<RunReport, SimError> {
        self.config.validate()?;
        let started = Instant::now();
        let requested = self.config.participants;

        println!(
            "[{}] Starting simulation: {} participants",
            stamp(),
            requested
        );
        info!(
            participants = requested,
            meeting = %self.config.meeting_code,
            passcode = %self.config.passcode,
            stay_secs = self.config.stay.as_secs_f64(),
            work_secs = self.config.work.as_secs_f64(),
            stagger_secs = self.config.stagger.as_secs_f64(),
            "starting simulation"
        );

        let mut workers = self.launch(generate_names(requested));
        if workers.is_empty() {
            return Err(SimError::NoWorkersLaunched { requested });
        }
        let launched = workers.len();

        let outcome = self.monitor(&mut workers, &shutdown).await;
        join(workers).await;

        let report = RunReport {
            outcome,
            requested,
            launched,
            left: self.table.count_in(ParticipantState::Left),
            work_done: self.table.total_work_done(),
            elapsed: started.elapsed(),
            snapshots: self.table.snapshots(),
        };
        self.print_summary(&report);
        Ok(report)
    }

    fn launch(&self, names: Vec<ParticipantName>) -> Vec<WorkerHandle> {
        let mut workers = Vec::with_capacity(names.len());
        for (index, name) in names.into_iter().enumerate() {
            let plan = ParticipantPlan::for_participant(&self.config, name, index);
            match worker_command(&self.program, &plan).spawn() {
                Ok(mut child) => {
                    debug!(name = %plan.name, pid = ?child.id(), "launched worker");
                    let writer = self.table.writer(plan.name.clone());
                    let reader = tokio::spawn(stream_status(child.stdout.take(), writer));
                    workers.push(WorkerHandle {
                        name: plan.name,
                        child,
                        reader,
                    });
                }
                Err(e) => {
                    error!(name = %plan.name, error = %e, "failed to launch worker");
                }
            }
        }
        workers
    }

    async fn monitor(&self, workers: &mut [WorkerHandle], shutdown: &Notify) -> RunOutcome {
        loop {
            let alive = count_alive(workers);
            if alive == 0 {
                return RunOutcome::Completed;
            }

            println!("[{}] Alive workers: {}", stamp(), alive);
            for (name, state) in self.table.sample(SAMPLE_SIZE) {
                println!("  {}: {}", name, state);
            }

            tokio::select! {
                _ = tokio::time::sleep(self.poll_interval) => {}
                _ = shutdown.notified() => {
                    println!("[{}] Interrupt received: terminating workers", stamp());
                    let terminated = terminate_all(workers);
                    info!(terminated, "terminated live workers");
                    return RunOutcome::Interrupted { terminated };
                }
            }
        }
    }

    fn print_summary(&self, report: &RunReport) {
        let destination = self
            .config
            .log_path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "stdout".to_string());
        let terminated = match report.outcome {
            RunOutcome::Completed => 0,
            RunOutcome::Interrupted { terminated } => terminated,
        };

        println!(
            "[{}] Simulation complete. Logs -> {}",
            stamp(),
            destination
        );
        println!(
            "  launched: {}/{}, left: {}, terminated: {}, work units: {}, elapsed: {}",
            report.launched,
            report.requested,
            report.left,
            terminated,
            report.work_done,
            format_elapsed(report.elapsed.as_secs())
        );
    }
}

/// Copy one worker's status stream into its entry of the table.
async fn stream_status(stdout: Option<ChildStdout>, writer: StatusWriter) {
    let Some(stdout) = stdout else {
        return;
    };
    let mut lines = BufReader::new(stdout).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) if line.trim().is_empty() => {}
            Ok(Some(line)) => match decode_status_line(&line) {
                Ok(snapshot) => {
                    if let Err(e) = writer.publish(snapshot) {
                        warn!(error = %e, "discarded status update");
                    }
                }
                Err(e) => {
                    warn!(name = %writer.name(), error = %e, "unreadable status line");
                }
            },
            Ok(None) => break,
            Err(e) => {
                warn!(name = %writer.name(), error = %e, "status stream failed");
                break;
            }
        }
    }
}

fn is_alive(worker: &mut WorkerHandle) -> bool {
    match worker.child.try_wait() {
        Ok(None) => true,
        Ok(Some(_)) => false,
        Err(e) => {
            warn!(name = %worker.name, error = %e, "liveness check failed");
            false
        }
    }
}

fn count_alive(workers: &mut [WorkerHandle]) -> usize {
    workers.iter_mut().map(is_alive).filter(|alive| *alive).count()
}

/// Kill every live worker without waiting for it. Returns how many were signalled.
fn terminate_all(workers: &mut [WorkerHandle]) -> usize {
    let mut terminated = 0;
    for worker in workers.iter_mut() {
        if !is_alive(worker) {
            continue;
        }
        match worker.child.start_kill() {
            Ok(()) => terminated += 1,
            Err(e) => debug!(name = %worker.name, error = %e, "worker already gone"),
        }
    }
    terminated
}

/// Reap every worker and drain its status stream. No timeout.
async fn join(workers: Vec<WorkerHandle>) {
    for mut worker in workers {
        match worker.child.wait().await {
            Ok(status) => debug!(name = %worker.name, %status, "worker exited"),
            Err(e) => warn!(name = %worker.name, error = %e, "failed to reap worker"),
        }
        if let Err(e) = worker.reader.await {
            warn!(name = %worker.name, error = %e, "status reader failed");
        }
    }
}

fn stamp() -> String {
    format_timestamp(utc_now())
}
