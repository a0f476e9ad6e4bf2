//! Test helpers for behavioral specifications.
//!
//! Provides a small DSL for running `crowd` and `crowdsim` in an isolated
//! sandbox and asserting on their output.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic, dead_code)]

use std::path::{Path, PathBuf};
use std::process::{Child, Command, Output, Stdio};

// Fast polling for tests. The real defaults (5s monitor poll) would make
// every simulator spec take seconds per sample.
const CROWD_MONITOR_POLL_MS: &str = "50";
const CROWD_TIMEOUT_EXIT_MS: &str = "5000";
const CROWD_POLL_MS: &str = "10";

// Spec polling timeouts
pub const SPEC_POLL_INTERVAL_MS: u64 = 10;
pub const SPEC_WAIT_MAX_MS: u64 = 10_000;

/// Returns the path to a binary, checking llvm-cov target directory first.
/// Falls back to resolving relative to the test binary itself when
/// CARGO_MANIFEST_DIR does not point at the target directory in use.
fn binary_path(name: &str) -> PathBuf {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));

    let llvm_cov_path = manifest_dir.join("target/llvm-cov-target/debug").join(name);
    if llvm_cov_path.exists() {
        return llvm_cov_path;
    }

    let standard = manifest_dir.join("target/debug").join(name);
    if standard.exists() {
        return standard;
    }

    // The test binary lives at target/debug/deps/specs-<hash>
    if let Ok(exe) = std::env::current_exe() {
        if let Some(debug_dir) = exe.parent().and_then(|d| d.parent()) {
            let fallback = debug_dir.join(name);
            if fallback.exists() {
                return fallback;
            }
        }
    }

    standard
}

/// Returns the path to the controller binary.
pub fn crowd_binary() -> PathBuf {
    binary_path("crowd")
}

/// Returns the path to the simulator binary.
pub fn crowdsim_binary() -> PathBuf {
    binary_path("crowdsim")
}

/// CLI builder for `crowd`
pub fn crowd() -> CliBuilder {
    CliBuilder::new(crowd_binary())
}

/// CLI builder for `crowdsim`
pub fn crowdsim() -> CliBuilder {
    CliBuilder::new(crowdsim_binary())
}

/// High-level CLI builder for fluent test assertions
pub struct CliBuilder {
    program: PathBuf,
    args: Vec<String>,
    dir: Option<PathBuf>,
    envs: Vec<(String, String)>,
}

impl CliBuilder {
    fn new(program: PathBuf) -> Self {
        Self {
            program,
            args: Vec::new(),
            dir: None,
            envs: vec![
                (
                    "CROWD_SIM_BINARY".into(),
                    crowdsim_binary().to_string_lossy().into(),
                ),
                ("CROWD_MONITOR_POLL_MS".into(), CROWD_MONITOR_POLL_MS.into()),
                ("CROWD_TIMEOUT_EXIT_MS".into(), CROWD_TIMEOUT_EXIT_MS.into()),
                ("CROWD_POLL_MS".into(), CROWD_POLL_MS.into()),
            ],
        }
    }

    /// Add CLI arguments
    pub fn args(mut self, args: &[&str]) -> Self {
        self.args.extend(args.iter().map(|s| s.to_string()));
        self
    }

    /// Set working directory
    pub fn pwd(mut self, path: impl Into<PathBuf>) -> Self {
        self.dir = Some(path.into());
        self
    }

    /// Set environment variable
    pub fn env(mut self, key: &str, value: impl AsRef<Path>) -> Self {
        self.envs.push((
            key.to_string(),
            value.as_ref().to_string_lossy().to_string(),
        ));
        self
    }

    /// Build the command without running it
    pub fn command(self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);

        if let Some(dir) = self.dir {
            cmd.current_dir(dir);
        }

        // A parent's worker override would point simulators at the wrong binary
        cmd.env_remove("CROWD_WORKER_BINARY");

        for (key, value) in self.envs {
            cmd.env(key, value);
        }

        cmd
    }

    /// Start without waiting, stdout redirected to `stdout_file`
    pub fn spawn_to(self, stdout_file: &Path) -> Child {
        let out = std::fs::File::create(stdout_file).unwrap();
        let mut cmd = self.command();
        cmd.stdin(Stdio::null()).stdout(out).stderr(Stdio::null());
        cmd.spawn().expect("command should start")
    }

    /// Run and expect success (exit code 0)
    pub fn passes(self) -> RunAssert {
        let mut cmd = self.command();
        let output = cmd.output().expect("command should run");
        assert!(
            output.status.success(),
            "expected command to pass, got exit code {:?}\nstdout: {}\nstderr: {}",
            output.status.code(),
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );
        RunAssert { output }
    }

    /// Run and expect failure (non-zero exit code)
    pub fn fails(self) -> RunAssert {
        let mut cmd = self.command();
        let output = cmd.output().expect("command should run");
        assert!(
            !output.status.success(),
            "expected command to fail, but it passed\nstdout: {}\nstderr: {}",
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );
        RunAssert { output }
    }
}

/// Result of a CLI run for chaining assertions
pub struct RunAssert {
    output: Output,
}

impl RunAssert {
    /// Get stdout as string
    pub fn stdout(&self) -> String {
        String::from_utf8_lossy(&self.output.stdout).into_owned()
    }

    /// Get stderr as string
    pub fn stderr(&self) -> String {
        String::from_utf8_lossy(&self.output.stderr).into_owned()
    }

    pub fn code(&self) -> Option<i32> {
        self.output.status.code()
    }

    /// Assert the exit code
    pub fn exit_code(self, expected: i32) -> Self {
        assert_eq!(
            self.code(),
            Some(expected),
            "unexpected exit code\nstdout: {}\nstderr: {}",
            self.stdout(),
            self.stderr()
        );
        self
    }

    /// Assert stdout equals expected exactly (with diff on failure).
    pub fn stdout_eq(self, expected: &str) -> Self {
        let stdout = self.stdout();
        similar_asserts::assert_eq!(stdout, expected);
        self
    }

    /// Assert stdout contains substring.
    pub fn stdout_has(self, expected: &str) -> Self {
        let stdout = self.stdout();
        assert!(
            stdout.contains(expected),
            "stdout does not contain '{}'\nstdout: {}",
            expected,
            stdout
        );
        self
    }

    /// Assert stdout does not contain substring.
    pub fn stdout_lacks(self, unexpected: &str) -> Self {
        let stdout = self.stdout();
        assert!(
            !stdout.contains(unexpected),
            "stdout should not contain '{}'\nstdout: {}",
            unexpected,
            stdout
        );
        self
    }

    /// Assert stderr contains substring.
    pub fn stderr_has(self, expected: &str) -> Self {
        let stderr = self.stderr();
        assert!(
            stderr.contains(expected),
            "stderr does not contain '{}'\nstderr: {}",
            expected,
            stderr
        );
        self
    }

    /// Parse stdout as one JSON document
    pub fn stdout_json(&self) -> serde_json::Value {
        serde_json::from_str(&self.stdout()).expect("stdout should be JSON")
    }
}

// =============================================================================
// Polling
// =============================================================================

/// Poll a condition until it returns true or timeout is reached.
pub fn wait_for<F>(timeout_ms: u64, mut condition: F) -> bool
where
    F: FnMut() -> bool,
{
    let start = std::time::Instant::now();
    let timeout = std::time::Duration::from_millis(timeout_ms);
    let poll_interval = std::time::Duration::from_millis(SPEC_POLL_INTERVAL_MS);

    while start.elapsed() < timeout {
        if condition() {
            return true;
        }
        std::thread::sleep(poll_interval);
    }
    false
}

/// Wait for a spawned child to exit, killing it on timeout.
pub fn wait_child(child: &mut Child, timeout_ms: u64) -> std::process::ExitStatus {
    let mut status = None;
    let exited = wait_for(timeout_ms, || {
        status = child.try_wait().unwrap();
        status.is_some()
    });
    if !exited {
        let _ = child.kill();
        let _ = child.wait();
        panic!("process did not exit within {}ms", timeout_ms);
    }
    status.unwrap()
}

/// Send a signal with `kill`
pub fn signal(sig: &str, pid: u32) -> bool {
    Command::new("kill")
        .args([sig, &pid.to_string()])
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

/// Whether a pid is alive and not a zombie
pub fn pid_alive(pid: u32) -> bool {
    let zombie = std::fs::read_to_string(format!("/proc/{pid}/stat"))
        .ok()
        .and_then(|stat| {
            stat.rsplit_once(')')
                .and_then(|(_, rest)| rest.trim_start().chars().next())
        })
        .is_some_and(|state| state == 'Z');
    signal("-0", pid) && !zombie
}

/// Parse a newline-delimited JSON log into values
pub fn json_lines(path: &Path) -> Vec<serde_json::Value> {
    std::fs::read_to_string(path)
        .unwrap_or_default()
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| serde_json::from_str(line).expect("record line should be JSON"))
        .collect()
}

// =============================================================================
// Sandbox
// =============================================================================

/// Temporary working directory plus isolated controller state directory.
pub struct Sandbox {
    dir: tempfile::TempDir,
    state_dir: tempfile::TempDir,
}

impl Sandbox {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
            state_dir: tempfile::tempdir().unwrap(),
        }
    }

    /// Working directory path
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Isolated controller state directory
    pub fn state_path(&self) -> &Path {
        self.state_dir.path()
    }

    /// Run `crowd` in this sandbox
    pub fn crowd(&self) -> CliBuilder {
        crowd()
            .pwd(self.path())
            .env("CROWD_STATE_DIR", self.state_path())
    }

    /// Run `crowdsim` in this sandbox
    pub fn crowdsim(&self) -> CliBuilder {
        crowdsim().pwd(self.path())
    }

    /// Pid recorded by `crowd start`, if any
    pub fn tracked_pid(&self) -> Option<u32> {
        let content = std::fs::read_to_string(self.state_path().join("sim.json")).ok()?;
        let value: serde_json::Value = serde_json::from_str(&content).ok()?;
        value["pid"].as_u64().map(|pid| pid as u32)
    }

    /// Simulator console output captured by the controller
    pub fn console(&self) -> String {
        std::fs::read_to_string(self.state_path().join("console.log"))
            .unwrap_or_else(|_| "(no console log)".to_string())
    }
}

impl Drop for Sandbox {
    fn drop(&mut self) {
        // Always try to stop a tracked simulator (no-op if not running)
        let mut cmd = self.crowd().args(&["stop", "--wait"]).command();
        cmd.stdout(Stdio::null()).stderr(Stdio::null());
        let _ = cmd.status();
    }
}
