//! Fast-path snapshot: two concurrent `ps` calls, one strict table parse.
//!
//! Call A captures the numeric/statistical columns plus start time and short
//! name; call B captures pid and the full command line. Keeping the free-text
//! command line in its own call is what makes call A's columns unambiguous:
//! five leading numeric fields, a fixed-shape timestamp anchor, then the short
//! name. Any line that violates that shape fails the whole fast path so the
//! dispatcher can retry with the per-field fallback strategy. No partial
//! results are emitted from a failed attempt.

use ahash::AHashMap;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{FastPathError, ShapeError};
use crate::exec;
use crate::record::{build_record, ProcessListOptions, ProcessRecord, RawProcessFields};

/// C-locale `lstart` shape: weekday, month, space-padded day, time, year.
/// Anchors where the fixed columns end and the free-text short name begins.
static START_TIME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?:Sun|Mon|Tue|Wed|Thu|Fri|Sat) (?:Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Oct|Nov|Dec) +\d{1,2} +\d{1,2}:\d{2}:\d{2} +\d{4}",
    )
    .expect("start-time pattern is valid")
});

/// Take a full snapshot via the fast path.
pub(crate) async fn snapshot(
    options: ProcessListOptions,
) -> Result<Vec<ProcessRecord>, FastPathError> {
    let flags = exec::flags(options);
    let (stat_out, args_out) = tokio::try_join!(
        exec::run_ps(flags, "pid=,ppid=,uid=,%cpu=,%mem=,lstart=,comm="),
        exec::run_ps(flags, "pid=,args="),
    )?;

    Ok(parse_snapshot(&stat_out, &args_out)?)
}

/// Parse the two captured outputs into records. Pure; separated from the
/// invocation so the table grammar is testable against canned output.
pub(crate) fn parse_snapshot(
    stat_out: &str,
    args_out: &str,
) -> Result<Vec<ProcessRecord>, ShapeError> {
    let cmd_by_pid = parse_command_lines(args_out);

    let mut records = Vec::new();
    for (idx, line) in stat_out.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let row = parse_stat_line(line, idx + 1)?;
        let cmd = cmd_by_pid
            .get(&row.pid)
            .map(String::as_str)
            .unwrap_or_default();
        records.push(build_record(RawProcessFields {
            pid: row.pid,
            ppid: row.ppid,
            uid: row.uid,
            cpu: row.cpu,
            memory: row.memory,
            start_time: row.start_time,
            comm: row.comm,
            cmd,
        }));
    }

    Ok(records)
}

/// One parsed line of call A output, still textual except for the pid.
struct StatRow<'a> {
    pid: u32,
    ppid: &'a str,
    uid: &'a str,
    cpu: &'a str,
    memory: &'a str,
    start_time: &'a str,
    comm: &'a str,
}

/// Tokenize one call A line: five whitespace-delimited numeric columns, then
/// the timestamp anchor, then the short name. Each stage reports its own
/// failure so a shape violation stays diagnosable.
fn parse_stat_line(line: &str, line_no: usize) -> Result<StatRow<'_>, ShapeError> {
    let shape = |reason| ShapeError {
        line: line_no,
        reason,
    };

    let mut rest = line;
    let pid_tok = take_token(&mut rest).ok_or_else(|| shape("missing pid column"))?;
    let pid: u32 = pid_tok
        .parse()
        .map_err(|_| shape("pid column is not a positive integer"))?;

    let ppid = take_token(&mut rest).ok_or_else(|| shape("missing ppid column"))?;
    if !is_integer(ppid) {
        return Err(shape("ppid column is not numeric"));
    }

    let uid = take_token(&mut rest).ok_or_else(|| shape("missing uid column"))?;
    // Some ps implementations render unmapped uids with a sign.
    if !is_integer(uid.strip_prefix('-').unwrap_or(uid)) {
        return Err(shape("uid column is not numeric"));
    }

    let cpu = take_token(&mut rest).ok_or_else(|| shape("missing %cpu column"))?;
    if !is_decimal(cpu) {
        return Err(shape("%cpu column is not a decimal"));
    }

    let memory = take_token(&mut rest).ok_or_else(|| shape("missing %mem column"))?;
    if !is_decimal(memory) {
        return Err(shape("%mem column is not a decimal"));
    }

    // Whatever precedes the timestamp in the remainder is alignment padding;
    // whatever follows it is the short name.
    let anchor = START_TIME_RE
        .find(rest)
        .ok_or_else(|| shape("start-time anchor not found"))?;
    let start_time = anchor.as_str();
    let comm = rest[anchor.end()..].trim();
    if comm.is_empty() {
        return Err(shape("short name missing after start time"));
    }

    Ok(StatRow {
        pid,
        ppid,
        uid,
        cpu,
        memory,
        start_time,
        comm,
    })
}

/// Split call B output into a pid → command-line map. Rows that lost their
/// command line to process churn between the two calls are simply absent.
fn parse_command_lines(args_out: &str) -> AHashMap<u32, String> {
    let mut map = AHashMap::new();
    for line in args_out.lines() {
        let line = line.trim();
        let Some((pid_tok, cmd)) = line.split_once(' ') else {
            continue;
        };
        let Ok(pid) = pid_tok.parse::<u32>() else {
            continue;
        };
        map.insert(pid, cmd.trim().to_string());
    }
    map
}

/// Pop the next whitespace-delimited token, advancing past trailing space.
fn take_token<'a>(rest: &mut &'a str) -> Option<&'a str> {
    let trimmed = rest.trim_start();
    if trimmed.is_empty() {
        *rest = trimmed;
        return None;
    }
    let end = trimmed
        .find(|c: char| c.is_ascii_whitespace())
        .unwrap_or(trimmed.len());
    let (token, tail) = trimmed.split_at(end);
    *rest = tail;
    Some(token)
}

fn is_integer(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit())
}

fn is_decimal(value: &str) -> bool {
    let mut dots = 0;
    !value.is_empty()
        && value.bytes().all(|b| {
            if b == b'.' {
                dots += 1;
                dots == 1
            } else {
                b.is_ascii_digit()
            }
        })
}
