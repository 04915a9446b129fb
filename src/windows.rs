//! Windows delegate: map the system task-list primitive into records.
//!
//! Enumeration on Windows comes from an external primitive that already
//! returns structured rows, so this branch is field mapping only. Rows carry
//! the image name and pid; every unix-only field stays at its default.

use std::process::Stdio;
use tokio::process::Command;

use crate::error::ProcessListError;
use crate::record::{ProcessListOptions, ProcessRecord};

const UTILITY: &str = "tasklist";

pub(crate) async fn snapshot(
    _options: ProcessListOptions,
) -> Result<Vec<ProcessRecord>, ProcessListError> {
    let output = Command::new(UTILITY)
        .args(["/fo", "csv", "/nh"])
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await
        .map_err(|source| ProcessListError::Spawn {
            utility: UTILITY,
            source,
        })?;

    if !output.status.success() {
        return Err(ProcessListError::Exit {
            utility: UTILITY,
            status: output.status,
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let mut records = Vec::new();
    for line in stdout.lines() {
        // Row shape: "Image Name","PID","Session Name","Session#","Mem Usage"
        let mut cells = line.split("\",\"");
        let Some(name) = cells.next().map(|c| c.trim_start_matches('"')) else {
            continue;
        };
        let Some(pid) = cells.next().and_then(|c| c.parse::<u32>().ok()) else {
            continue;
        };
        records.push(ProcessRecord {
            pid,
            ppid: 0,
            uid: None,
            cpu: None,
            memory: None,
            name: name.to_string(),
            cmd: String::new(),
            path: String::new(),
            start_time: None,
        });
    }

    Ok(records)
}
