// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Output formatting and log viewing shared by controller commands.

use std::io::{BufRead, BufReader};
use std::path::Path;

use clap::ValueEnum;

#[cfg(test)]
#[path = "output_tests.rs"]
mod tests;

/// Shown wherever a log is requested before any run created it.
pub const LOG_NOT_FOUND: &str = "Log file not found yet. Start a simulation to create it.";

#[derive(Clone, Copy, Debug, Default, PartialEq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// The last `n` lines of a file, without trailing newlines.
pub fn last_lines(path: &Path, n: usize) -> std::io::Result<Vec<String>> {
    let file = std::fs::File::open(path)?;
    let mut lines: Vec<String> = BufReader::new(file)
        .lines()
        .collect::<std::io::Result<_>>()?;
    let start = lines.len().saturating_sub(n);
    Ok(lines.split_off(start))
}

/// Print log lines in text or JSON form, optionally following the file.
pub async fn display_log(
    log_path: &Path,
    lines: &[String],
    follow: bool,
    format: OutputFormat,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Text => {
            for line in lines {
                println!("{}", line);
            }
            if follow {
                tail_file(log_path).await?;
            }
        }
        OutputFormat::Json => {
            let obj = serde_json::json!({
                "log_path": log_path.to_string_lossy(),
                "lines": lines,
            });
            println!("{}", serde_json::to_string_pretty(&obj)?);
            if follow {
                eprintln!("warning: --follow is not supported with --output json");
            }
        }
    }
    Ok(())
}

/// Tail a file, printing new lines as they appear until Ctrl+C.
pub async fn tail_file(path: &Path) -> anyhow::Result<()> {
    use notify::{Event, EventKind, RecursiveMode, Watcher};
    use std::io::{Seek, SeekFrom};

    let mut file = std::fs::File::open(path)
        .map_err(|_| anyhow::anyhow!("Log file not found: {}", path.display()))?;
    // Existing content was already printed
    file.seek(SeekFrom::End(0))?;
    let mut reader = BufReader::new(file);

    let (tx, mut rx) = tokio::sync::mpsc::channel(16);
    let mut watcher = notify::recommended_watcher(move |res: Result<Event, _>| {
        if let Ok(event) = res {
            if matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_)) {
                let _ = tx.blocking_send(());
            }
        }
    })?;
    let watch_dir = path.parent().filter(|p| !p.as_os_str().is_empty());
    watcher.watch(watch_dir.unwrap_or(Path::new(".")), RecursiveMode::NonRecursive)?;

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    // Workers append whole lines; a partial read is held until its newline
    let mut pending = String::new();
    loop {
        while reader.read_line(&mut pending)? > 0 {
            if !pending.ends_with('\n') {
                break;
            }
            print!("{}", pending);
            pending.clear();
        }

        tokio::select! {
            _ = rx.recv() => {}
            _ = &mut ctrl_c => break,
        }
    }

    Ok(())
}
