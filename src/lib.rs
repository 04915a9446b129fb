//! Cross-platform process enumeration with normalized records.
//!
//! This library shells out to the platform's process-listing utility and
//! parses its semi-structured text output into typed [`ProcessRecord`]s:
//! pid, parent pid, owning uid, CPU/memory percentages, short name, full
//! command line, resolved executable path, and start time.
//!
//! # Snapshot semantics
//!
//! Each call produces a fresh, best-effort snapshot. The fields come from
//! more than one `ps` invocation, so a process starting or exiting between
//! calls can yield a row with an empty command line or no row at all; that
//! skew is bounded and absorbed, never an error. Atomicity across separate
//! subprocess calls is structurally impossible and is not promised.
//!
//! # Strategy selection
//!
//! On unix the fast path issues two concurrent calls (numeric columns plus
//! start time and short name in one, full command lines in the other) and
//! parses them with a strict column grammar. If any line violates that
//! grammar the whole snapshot is retried with a slower per-field strategy
//! that trades extra calls for trivially parseable output. Invocation
//! failures (utility missing, non-zero exit, output over the cap) always
//! propagate to the caller; parse trouble never does.
//!
//! # Usage
//!
//! ```no_run
//! use proclist::{process_list, ProcessListOptions};
//!
//! # async fn demo() -> Result<(), proclist::ProcessListError> {
//! let records = process_list(ProcessListOptions::default()).await?;
//! for record in &records {
//!     println!("{:>7} {:>7} {}", record.pid, record.ppid, record.name);
//! }
//! # Ok(())
//! # }
//! ```

mod error;
mod exec;
mod parse;
mod record;
mod resolve;
#[cfg(windows)]
mod windows;

pub use error::ProcessListError;
pub use record::{ProcessListOptions, ProcessRecord};

#[cfg(not(windows))]
use crate::error::FastPathError;
#[cfg(not(windows))]
use tracing::{debug, warn};

/// List currently running processes.
///
/// Returns one record per process visible to the underlying utility. Safe to
/// call concurrently; invocations share no state. Fails only when the utility
/// itself cannot be invoked or exceeds the output cap; malformed data
/// degrades per-field or per-row instead.
pub async fn process_list(
    options: ProcessListOptions,
) -> Result<Vec<ProcessRecord>, ProcessListError> {
    #[cfg(windows)]
    {
        windows::snapshot(options).await
    }

    #[cfg(not(windows))]
    {
        match parse::fast::snapshot(options).await {
            Ok(records) => {
                debug!(count = records.len(), "fast-path snapshot complete");
                Ok(records)
            }
            Err(FastPathError::Shape(err)) => {
                warn!(error = %err, "fast-path parse failed, retrying per-field");
                let records = parse::fallback::snapshot(options).await?;
                debug!(count = records.len(), "fallback snapshot complete");
                Ok(records)
            }
            Err(FastPathError::Invocation(err)) => Err(err),
        }
    }
}
