//! Best-effort recovery of a process's executable path.
//!
//! The short name `ps` reports may be truncated (15 bytes on Linux) and the
//! command line may quote or space-embed the binary path. This module tries
//! the authoritative source first (the per-process `exe` symlink under /proc)
//! and falls back to probing candidate prefixes of the command line against
//! the filesystem. Resolution is always best-effort: the result is an empty
//! string when nothing can be recovered, never an error.

use std::fs;
use std::path::Path;

/// Longest run of command-line tokens joined when probing for a path that
/// contains literal spaces. Bounds filesystem probes per process.
const MAX_JOINED_TOKENS: usize = 6;

/// Resolve the executable path for `pid`, using `cmd` (the full command line)
/// as a fallback source of candidates. Empty string means unresolved.
pub(crate) fn executable_path(pid: u32, cmd: &str) -> String {
    if let Some(path) = read_proc_exe(pid) {
        return path;
    }
    path_from_command_line(cmd)
}

/// Read the `/proc/<pid>/exe` symlink. Any failure (process already gone,
/// permission denied, platform without procfs) is a recoverable miss.
#[cfg(target_os = "linux")]
fn read_proc_exe(pid: u32) -> Option<String> {
    let target = fs::read_link(format!("/proc/{pid}/exe")).ok()?;
    let target = target.to_str()?;
    // The kernel appends this marker when the binary was unlinked after exec.
    Some(target.trim_end_matches(" (deleted)").to_string())
}

#[cfg(not(target_os = "linux"))]
fn read_proc_exe(_pid: u32) -> Option<String> {
    None
}

/// Probe candidate substrings of the command line against the filesystem.
fn path_from_command_line(cmd: &str) -> String {
    if cmd.is_empty() {
        return String::new();
    }

    if let Some(rest) = cmd.strip_prefix('"') {
        // A quoted path that does not exist is not a valid unquoted candidate
        // either, so there is no fall-through to token splitting.
        return match rest.split('"').next() {
            Some(quoted) if Path::new(quoted).exists() => quoted.to_string(),
            _ => String::new(),
        };
    }

    if !cmd.starts_with('/') {
        // Relative and bare commands are not resolved.
        return String::new();
    }

    let tokens: Vec<&str> = cmd.split(' ').collect();
    if Path::new(tokens[0]).exists() {
        return tokens[0].to_string();
    }

    // The path itself may contain spaces: grow the candidate one token at a
    // time and take the first that exists on disk. Best-effort by design; a
    // shorter accidental match on disk wins over the true boundary.
    let limit = tokens.len().min(MAX_JOINED_TOKENS);
    for end in 2..=limit {
        let candidate = tokens[..end].join(" ");
        if Path::new(&candidate).exists() {
            return candidate;
        }
    }

    String::new()
}
