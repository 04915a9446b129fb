//! Invocation of the system process-listing utility.
//!
//! All strategies go through [`run_ps`]: it forces the C locale so numeric
//! and timestamp formatting is stable regardless of the caller's environment,
//! and it caps captured output so a pathological process table cannot exhaust
//! memory. Exceeding the cap is a hard failure, never silent truncation.

use std::process::Stdio;
use tokio::io::AsyncReadExt;
use tokio::process::Command;
use tracing::debug;

use crate::error::ProcessListError;
use crate::record::ProcessListOptions;

pub(crate) const UTILITY: &str = "ps";

/// Upper bound on captured stdout per invocation.
pub(crate) const MAX_OUTPUT_BYTES: usize = 10_000_000;

/// Build the `ps` flag string: `a` widens the listing to other users'
/// processes, `ww` disables line-width truncation, `x` includes processes
/// without a controlling terminal, `o` takes the explicit field list.
pub(crate) fn flags(options: ProcessListOptions) -> &'static str {
    if options.all {
        "awwxo"
    } else {
        "wwxo"
    }
}

/// Run `ps <flags> <format>` and capture stdout.
///
/// `format` uses the headerless `field=` form so no header line needs
/// skipping and the field order is an explicit contract rather than a
/// column-alignment guess.
pub(crate) async fn run_ps(flags: &str, format: &str) -> Result<String, ProcessListError> {
    let mut child = Command::new(UTILITY)
        .arg(flags)
        .arg(format)
        .env("LC_ALL", "C")
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|source| ProcessListError::Spawn {
            utility: UTILITY,
            source,
        })?;

    let stdout = child.stdout.take();
    let stderr = child.stderr.take();

    let mut out = Vec::new();
    let mut err = Vec::new();
    // Read both pipes concurrently so a chatty stderr cannot deadlock the
    // stdout read. The stdout read stops one byte past the cap.
    let (out_read, err_read) = tokio::join!(
        async {
            match stdout {
                Some(pipe) => {
                    pipe.take(MAX_OUTPUT_BYTES as u64 + 1)
                        .read_to_end(&mut out)
                        .await
                }
                None => Ok(0),
            }
        },
        async {
            match stderr {
                Some(mut pipe) => pipe.read_to_end(&mut err).await,
                None => Ok(0),
            }
        },
    );

    if out.len() > MAX_OUTPUT_BYTES {
        let _ = child.start_kill();
        let _ = child.wait().await;
        return Err(ProcessListError::OutputTooLarge {
            utility: UTILITY,
            limit: MAX_OUTPUT_BYTES,
        });
    }

    out_read?;
    err_read?;
    let status = child.wait().await?;

    if !status.success() {
        return Err(ProcessListError::Exit {
            utility: UTILITY,
            status,
            stderr: String::from_utf8_lossy(&err).trim().to_string(),
        });
    }

    debug!(format, bytes = out.len(), "ps invocation completed");
    Ok(String::from_utf8_lossy(&out).into_owned())
}
