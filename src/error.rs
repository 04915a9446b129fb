//! Error types for process enumeration.
//!
//! Two layers: `ProcessListError` is the public, fatal layer (the external
//! utility could not be invoked or its output could not be captured), while
//! `ShapeError` / `FastPathError` are crate-internal and drive the fast-path
//! to fallback-path degradation without surfacing to callers.

use std::process::ExitStatus;
use thiserror::Error;

/// Errors surfaced by [`process_list`](crate::process_list).
///
/// Malformed rows and unparsable fields are never reported here; they degrade
/// to defaults or drop the affected row. Only invocation-level problems are
/// fatal.
#[derive(Debug, Error)]
pub enum ProcessListError {
    /// The process-listing utility could not be started at all.
    #[error("failed to spawn `{utility}`: {source}")]
    Spawn {
        utility: &'static str,
        #[source]
        source: std::io::Error,
    },

    /// The utility ran but exited non-zero.
    #[error("`{utility}` exited with {status}: {stderr}")]
    Exit {
        utility: &'static str,
        status: ExitStatus,
        stderr: String,
    },

    /// The utility produced more output than the configured cap. Truncated
    /// process tables are worse than no table, so this is a hard failure.
    #[error("`{utility}` produced more than {limit} bytes of output")]
    OutputTooLarge { utility: &'static str, limit: usize },

    /// I/O failure while reading the utility's output or awaiting its exit.
    #[error("i/o error while running the process-listing utility: {0}")]
    Io(#[from] std::io::Error),
}

/// A line of `ps` output did not match the expected column layout.
///
/// Shape failures are recoverable: the dispatcher retries the whole snapshot
/// with the per-field fallback strategy.
#[derive(Debug, Error)]
#[error("unexpected ps output shape at line {line}: {reason}")]
pub(crate) struct ShapeError {
    pub line: usize,
    pub reason: &'static str,
}

/// Failure modes of the fast-path parser, split so the dispatcher can decide
/// between propagating (invocation) and degrading (shape).
#[derive(Debug, Error)]
pub(crate) enum FastPathError {
    #[error(transparent)]
    Invocation(#[from] ProcessListError),

    #[error(transparent)]
    Shape(#[from] ShapeError),
}
