//! Normalized process records and the builder that assembles them.

use chrono::{DateTime, Local};
use serde::Serialize;
use std::path::Path;

use crate::parse::fields;
use crate::resolve;

/// Options for a process snapshot.
#[derive(Debug, Clone, Copy)]
pub struct ProcessListOptions {
    /// Include processes owned by other users, not just the calling user.
    pub all: bool,
}

impl Default for ProcessListOptions {
    fn default() -> Self {
        Self { all: true }
    }
}

/// One running process, as observed at snapshot time.
///
/// Records are independent value snapshots: no identity is tracked across
/// calls, and a record never changes after construction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessRecord {
    /// Process id, unique among currently listed processes.
    pub pid: u32,
    /// Parent process id; 0 means no parent or unknown.
    pub ppid: u32,
    /// Owning user id. `None` means "no discoverable uid" and is distinct
    /// from `Some(0)` (root).
    pub uid: Option<u32>,
    /// CPU utilization percentage, 0 up to 100 × online core count.
    pub cpu: Option<f64>,
    /// Memory utilization percentage in 0..=100.
    pub memory: Option<f64>,
    /// Short process name. Basename of `path` when a path was resolved,
    /// otherwise the short name reported by the OS (which may be truncated
    /// to a platform-specific width, e.g. 15 bytes on Linux).
    pub name: String,
    /// Best-effort full command line, arguments included. May be empty.
    pub cmd: String,
    /// Best-effort resolved executable path. Empty when unresolvable.
    pub path: String,
    /// Process start time. `None` when unparsable or unsupported.
    pub start_time: Option<DateTime<Local>>,
}

/// Raw textual fields for one process, as captured from `ps` output.
/// Optional fields may be missing entirely in the fallback path.
#[derive(Debug, Default)]
pub(crate) struct RawProcessFields<'a> {
    pub pid: u32,
    pub ppid: &'a str,
    pub uid: &'a str,
    pub cpu: &'a str,
    pub memory: &'a str,
    pub start_time: &'a str,
    pub comm: &'a str,
    pub cmd: &'a str,
}

/// Build one normalized record from raw fields.
///
/// Never fails: absent or malformed inputs degrade to the documented
/// defaults instead of aborting record construction.
pub(crate) fn build_record(raw: RawProcessFields<'_>) -> ProcessRecord {
    let path = resolve::executable_path(raw.pid, raw.cmd);
    let name = if path.is_empty() {
        raw.comm.to_string()
    } else {
        Path::new(&path)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(raw.comm)
            .to_string()
    };

    ProcessRecord {
        pid: raw.pid,
        ppid: fields::parse_int(raw.ppid, 0),
        uid: fields::parse_int_opt(raw.uid),
        cpu: fields::parse_float_opt(raw.cpu),
        memory: fields::parse_float_opt(raw.memory),
        name,
        cmd: raw.cmd.to_string(),
        path,
        start_time: fields::parse_timestamp(raw.start_time),
    }
}
