//! Fallback snapshot: one `ps` call per field, merged by pid.
//!
//! Slower and more skew-prone than the fast path (every extra call is another
//! chance for a process to appear or vanish mid-snapshot), but each call's
//! output is trivially splittable: pid, one space, one value. Used when the
//! fast path's strict table shape cannot be parsed, e.g. a non-standard `ps`
//! or locale bleed-through despite the forced override.

use ahash::AHashMap;
use tracing::debug;

use crate::error::ProcessListError;
use crate::exec;
use crate::record::{build_record, ProcessListOptions, ProcessRecord, RawProcessFields};

/// Fields captured one call each, in `ps -o` vocabulary.
const FIELDS: [&str; 7] = ["comm", "args", "ppid", "uid", "%cpu", "%mem", "lstart"];

/// Raw field values for one pid, keyed by `ps -o` field name.
type FieldMap = AHashMap<&'static str, String>;

/// Take a full snapshot via per-field calls.
pub(crate) async fn snapshot(
    options: ProcessListOptions,
) -> Result<Vec<ProcessRecord>, ProcessListError> {
    let flags = exec::flags(options);
    let outputs = futures_join_fields(flags).await?;

    let mut by_pid: AHashMap<String, FieldMap> = AHashMap::new();
    for (field, output) in FIELDS.into_iter().zip(outputs.iter()) {
        merge_field_output(&mut by_pid, field, output);
    }

    Ok(build_records(by_pid))
}

async fn futures_join_fields(flags: &str) -> Result<[String; 7], ProcessListError> {
    let [comm, args, ppid, uid, cpu, mem, lstart] = FIELDS.map(|field| {
        let format = format!("pid=,{field}=");
        async move { exec::run_ps(flags, &format).await }
    });
    tokio::try_join!(comm, args, ppid, uid, cpu, mem, lstart)
        .map(|(a, b, c, d, e, f, g)| [a, b, c, d, e, f, g])
}

/// Fold one call's output into the accumulator: each line is a pid, a space
/// boundary, and the raw value for `field`.
fn merge_field_output(by_pid: &mut AHashMap<String, FieldMap>, field: &'static str, output: &str) {
    for line in output.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let (pid, value) = match line.split_once(' ') {
            Some((pid, value)) => (pid, value.trim()),
            // Pid-only line: the value column was empty.
            None => (line, ""),
        };
        by_pid
            .entry(pid.to_string())
            .or_default()
            .insert(field, value.to_string());
    }
}

/// Build records from the accumulator, dropping pids that failed the
/// minimum-viability filter. Processes churn between the calls, so a pid
/// missing its short name or parent is expected noise, not an error.
fn build_records(by_pid: AHashMap<String, FieldMap>) -> Vec<ProcessRecord> {
    let mut records = Vec::with_capacity(by_pid.len());
    let mut dropped = 0usize;

    for (pid_str, fields) in &by_pid {
        // A pid-only line leaves an empty value behind; an empty short name
        // or parent is as unusable as a missing one.
        let has = |name: &str| fields.get(name).is_some_and(|value| !value.is_empty());
        let viable = has("comm") && has("ppid");
        let Ok(pid) = pid_str.parse::<u32>() else {
            dropped += 1;
            continue;
        };
        if !viable {
            dropped += 1;
            continue;
        }

        let get = |name: &str| fields.get(name).map(String::as_str).unwrap_or_default();
        records.push(build_record(RawProcessFields {
            pid,
            ppid: get("ppid"),
            uid: get("uid"),
            cpu: get("%cpu"),
            memory: get("%mem"),
            start_time: get("lstart"),
            comm: get("comm"),
            cmd: get("args"),
        }));
    }

    if dropped > 0 {
        debug!(dropped, "dropped pids missing mandatory fields");
    }
    records
}
