//! End-to-end snapshot tests against the real `ps` utility.
//!
//! These tests exercise the public operation on a live system: spawning
//! known child processes and checking that the snapshot reports them with
//! the expected pid, ppid, command line, and field ranges. Every test skips
//! gracefully on hosts without a `ps` binary.

use proclist::{process_list, ProcessListOptions, ProcessRecord};
use std::path::Path;
use std::process::{Child, Command, Stdio};

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn ps_available() -> bool {
    Command::new("ps")
        .arg("wwxo")
        .arg("pid=")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|status| status.success())
        .unwrap_or(false)
}

async fn snapshot() -> Vec<ProcessRecord> {
    process_list(ProcessListOptions::default())
        .await
        .expect("process_list failed")
}

fn find_pid(records: &[ProcessRecord], pid: u32) -> Option<&ProcessRecord> {
    records.iter().find(|r| r.pid == pid)
}

/// Kill and reap a spawned test child.
fn cleanup(mut child: Child) {
    let _ = child.kill();
    let _ = child.wait();
}

#[tokio::test]
async fn snapshot_is_nonempty_and_contains_self() {
    init_tracing();
    if !ps_available() {
        eprintln!("skipping: ps unavailable");
        return;
    }

    let records = snapshot().await;
    assert!(!records.is_empty());

    let me = find_pid(&records, std::process::id()).expect("own pid missing from snapshot");
    assert!(!me.name.is_empty());
    // Real vs. effective uid reporting differs between ps implementations.
    let real = nix::unistd::getuid().as_raw();
    let effective = nix::unistd::geteuid().as_raw();
    assert!(me.uid == Some(real) || me.uid == Some(effective));
}

#[tokio::test]
async fn field_ranges_hold_for_every_record() {
    init_tracing();
    if !ps_available() {
        eprintln!("skipping: ps unavailable");
        return;
    }

    let cores = online_cores();
    let now = chrono::Local::now() + chrono::Duration::seconds(5);

    for record in snapshot().await {
        assert!(record.pid > 0, "pid must be positive: {record:?}");
        if let Some(cpu) = record.cpu {
            assert!(
                (0.0..=100.0 * cores).contains(&cpu),
                "cpu out of range: {record:?}"
            );
        }
        if let Some(memory) = record.memory {
            assert!(
                (0.0..=100.0).contains(&memory),
                "memory out of range: {record:?}"
            );
        }
        if let Some(start) = record.start_time {
            assert!(start <= now, "start time in the future: {record:?}");
        }
    }
}

fn online_cores() -> f64 {
    // SAFETY: sysconf is safe to call with _SC_NPROCESSORS_ONLN.
    let cores = unsafe { libc::sysconf(libc::_SC_NPROCESSORS_ONLN) };
    if cores > 0 {
        cores as f64
    } else {
        1.0
    }
}

#[tokio::test]
async fn name_matches_basename_of_resolved_path() {
    init_tracing();
    if !ps_available() {
        eprintln!("skipping: ps unavailable");
        return;
    }

    for record in snapshot().await {
        if record.path.starts_with('/') {
            let basename = Path::new(&record.path)
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or_default();
            assert_eq!(record.name, basename, "name/path mismatch: {record:?}");
        }
    }
}

#[tokio::test]
async fn spawned_child_round_trips_pid_ppid_and_cmd() {
    init_tracing();
    if !ps_available() {
        eprintln!("skipping: ps unavailable");
        return;
    }

    let child = Command::new("sh")
        .args(["-c", "sleep 30", "proclist-test-marker", "alpha", "beta"])
        .stdout(Stdio::null())
        .spawn()
        .expect("failed to spawn test child");
    let child_pid = child.id();

    let records = snapshot().await;
    let record = find_pid(&records, child_pid);
    let result = record.cloned();
    cleanup(child);

    let record = result.expect("spawned child missing from snapshot");
    assert_eq!(record.ppid, std::process::id());
    assert_eq!(record.cmd, "sh -c sleep 30 proclist-test-marker alpha beta");
}

#[tokio::test]
async fn long_binary_name_is_not_truncated_when_path_resolves() {
    init_tracing();
    if !ps_available() {
        eprintln!("skipping: ps unavailable");
        return;
    }

    // comm truncates at 15 bytes on Linux; a longer binary name must still
    // come back whole via the resolved executable path.
    let long_name = "proclist-sleeper-with-a-long-name";
    let dir = tempfile::tempdir().unwrap();
    let bin = dir.path().join(long_name);
    if std::fs::copy("/bin/sleep", &bin).is_err() {
        eprintln!("skipping: /bin/sleep not copyable");
        return;
    }

    let child = match Command::new(&bin).arg("30").stdout(Stdio::null()).spawn() {
        Ok(child) => child,
        Err(err) => {
            eprintln!("skipping: cannot execute from tempdir: {err}");
            return;
        }
    };
    let child_pid = child.id();

    let records = snapshot().await;
    let result = find_pid(&records, child_pid).cloned();
    cleanup(child);

    let record = result.expect("renamed child missing from snapshot");
    assert_eq!(record.name, long_name);
    assert_eq!(record.path, bin.to_str().unwrap());
}

#[tokio::test]
async fn inherited_locale_does_not_affect_start_times() {
    init_tracing();
    if !ps_available() {
        eprintln!("skipping: ps unavailable");
        return;
    }

    let baseline = snapshot().await;

    // The spawned utility inherits this environment; the forced C-locale
    // override must still win so timestamps keep their fixed shape. Other
    // concurrent tests are unaffected because every invocation sets LC_ALL
    // itself, which takes precedence over LANG.
    let prev_lc_all = std::env::var_os("LC_ALL");
    let prev_lang = std::env::var_os("LANG");
    std::env::set_var("LC_ALL", "de_DE.UTF-8");
    std::env::set_var("LANG", "de_DE.UTF-8");
    let localized = process_list(ProcessListOptions::default()).await;
    match prev_lc_all {
        Some(value) => std::env::set_var("LC_ALL", value),
        None => std::env::remove_var("LC_ALL"),
    }
    match prev_lang {
        Some(value) => std::env::set_var("LANG", value),
        None => std::env::remove_var("LANG"),
    }

    let localized = localized.expect("process_list failed under non-English locale");
    let now = chrono::Local::now() + chrono::Duration::seconds(5);

    for records in [&baseline, &localized] {
        let with_start = records.iter().filter(|r| r.start_time.is_some()).count();
        // Process churn between runs allows a little slack, but a localized
        // environment must not wipe out timestamp parsing wholesale.
        assert!(
            with_start * 10 >= records.len() * 9,
            "too few parsed start times: {with_start}/{}",
            records.len()
        );
        for record in records.iter() {
            if let Some(start) = record.start_time {
                assert!(start <= now, "start time in the future: {record:?}");
            }
        }
    }

    let me = find_pid(&localized, std::process::id()).expect("own pid missing from snapshot");
    assert!(me.start_time.is_some());
}

#[tokio::test]
async fn concurrent_snapshots_do_not_interfere() {
    init_tracing();
    if !ps_available() {
        eprintln!("skipping: ps unavailable");
        return;
    }

    let (a, b, c) = tokio::join!(
        process_list(ProcessListOptions::default()),
        process_list(ProcessListOptions::default()),
        process_list(ProcessListOptions::default()),
    );

    let me = std::process::id();
    for records in [a.unwrap(), b.unwrap(), c.unwrap()] {
        assert!(!records.is_empty());
        assert!(find_pid(&records, me).is_some());
    }
}

#[tokio::test]
async fn current_user_only_snapshot_still_sees_self() {
    init_tracing();
    if !ps_available() {
        eprintln!("skipping: ps unavailable");
        return;
    }

    let records = process_list(ProcessListOptions { all: false })
        .await
        .expect("process_list failed");
    assert!(find_pid(&records, std::process::id()).is_some());
}

#[tokio::test]
async fn records_serialize_to_json() {
    init_tracing();
    if !ps_available() {
        eprintln!("skipping: ps unavailable");
        return;
    }

    let records = snapshot().await;
    let me = find_pid(&records, std::process::id()).unwrap();
    let json = serde_json::to_value(me).unwrap();
    assert_eq!(json["pid"], std::process::id());
    assert!(json["name"].is_string());
}
