//! CLI tests for `procinfo`.
//!
//! Validates:
//! - Identifier validation happens before any record read
//! - Fixed text layout against a fixture process table
//! - Missing optional fields render as -1, not as errors
//! - Not-found, malformed, and incomplete records exit 1 with distinct diagnostics
//! - JSON output and settings layering

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::Path;
use std::time::Duration;
use tempfile::{tempdir, TempDir};

// ============================================================================
// Helpers
// ============================================================================

fn procinfo() -> Command {
    let mut cmd = cargo_bin_cmd!("procinfo");
    cmd.timeout(Duration::from_secs(30));
    cmd.env_remove("PK_PROC_ROOT")
        .env_remove("PK_CONFIG")
        .env_remove("PK_FORMAT")
        .env_remove("PK_CMDLINE_LIMIT")
        .env_remove("PK_LOG");
    cmd
}

/// Stat line with `processor` = 2 and 250+50 ticks.
const FULL_STAT: &str = concat!(
    "4321 (my (odd) cmd) S 1 4321 4321 0 -1 4194560 100 0 0 0 250 50 0 0 20 0 1 0 500 ",
    "1000000 200 18446744073709551615 1 1 0 0 0 0 0 0 0 0 0 0 17 2 0 0 0 0 0\n",
);

fn write_proc(root: &Path, pid: &str, stat: &str, status: &str, cmdline: &[u8]) {
    let dir = root.join(pid);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("stat"), stat).unwrap();
    fs::write(dir.join("status"), status).unwrap();
    fs::write(dir.join("cmdline"), cmdline).unwrap();
}

fn fixture() -> TempDir {
    let root = tempdir().unwrap();
    write_proc(
        root.path(),
        "4321",
        FULL_STAT,
        "Name:\tmy (odd) cmd\nState:\tS (sleeping)\nVmRSS:\t    7340 kB\nThreads:\t1\n",
        b"/usr/bin/odd\0--flag\0value\0",
    );
    root
}

// ============================================================================
// Argument validation
// ============================================================================

#[test]
fn rejects_non_decimal_pid() {
    for bad in ["12a", "", "1 2", "+7"] {
        procinfo()
            .args(["--proc-root", "/nonexistent-root", bad])
            .assert()
            .failure()
            .code(1)
            .stdout(predicate::str::is_empty())
            .stderr(predicate::str::contains("Usage:"));
    }
}

#[test]
fn rejects_negative_pid() {
    procinfo()
        .arg("-5")
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::is_empty());
}

#[test]
fn requires_a_pid() {
    procinfo()
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn help_exits_zero() {
    procinfo().arg("--help").assert().success();
}

// ============================================================================
// Reports
// ============================================================================

#[test]
fn text_report_from_fixture() {
    let root = fixture();
    let output = procinfo()
        .arg("--proc-root")
        .arg(root.path())
        .arg("4321")
        .assert()
        .success()
        .code(0)
        .get_output()
        .stdout
        .clone();
    let text = String::from_utf8(output).unwrap();
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(lines.len(), 6, "unexpected report: {text}");
    assert_eq!(lines[0], "PID: 4321");
    assert_eq!(lines[1], "State: S");
    assert_eq!(lines[2], "PPID: 1");
    assert_eq!(lines[3], "Cmd: /usr/bin/odd --flag value");
    assert!(lines[4].starts_with("CPU: 2 "), "got {}", lines[4]);
    assert_eq!(lines[5], "VmRSS: 7340");
}

#[test]
fn missing_optional_fields_render_sentinels() {
    let root = tempdir().unwrap();
    write_proc(
        root.path(),
        "2",
        "2 (kthreadd) S 0 0 0 0 -1 2129984 0 0 0 0 0 0\n",
        "Name:\tkthreadd\nState:\tS (sleeping)\n",
        b"",
    );

    procinfo()
        .arg("--proc-root")
        .arg(root.path())
        .arg("2")
        .assert()
        .success()
        .stdout(predicate::str::contains("Cmd: (empty)\n"))
        .stdout(predicate::str::contains("CPU: -1 0.000\n"))
        .stdout(predicate::str::ends_with("VmRSS: -1\n"));
}

#[test]
fn json_report_uses_nulls() {
    let root = tempdir().unwrap();
    write_proc(root.path(), "2", "2 (k) I 0 0 0 0 -1 0 0 0 0 0 0 0\n", "Name:\tk\n", b"");

    let output = procinfo()
        .args(["--format", "json", "--proc-root"])
        .arg(root.path())
        .arg("2")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let json: Value = serde_json::from_slice(&output).expect("parse JSON");

    assert_eq!(json["pid"], 2);
    assert_eq!(json["state"], "I");
    assert_eq!(json["cmd"], "(empty)");
    assert!(json["processor"].is_null());
    assert!(json["vm_rss_kb"].is_null());
    assert!(json.get("schema_version").is_some());
}

#[test]
fn json_pid_keeps_given_spelling() {
    let root = tempdir().unwrap();
    write_proc(root.path(), "007", "7 (k) S 1 7 7 0 -1 0 0 0 0 0 0 0\n", "Name:\tk\n", b"k\0");

    let output = procinfo()
        .args(["--format", "json", "--proc-root"])
        .arg(root.path())
        .arg("007")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let json: Value = serde_json::from_slice(&output).expect("parse JSON");
    assert_eq!(json["pid"], "007");

    procinfo()
        .arg("--proc-root")
        .arg(root.path())
        .arg("007")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("PID: 007\n"));
}

#[test]
fn proc_root_from_environment() {
    let root = fixture();
    procinfo()
        .env("PK_PROC_ROOT", root.path())
        .arg("4321")
        .assert()
        .success()
        .stdout(predicate::str::contains("PID: 4321\n"));
}

#[test]
fn cmdline_limit_truncates() {
    let root = fixture();
    procinfo()
        .args(["--cmdline-limit", "8", "--proc-root"])
        .arg(root.path())
        .arg("4321")
        .assert()
        .success()
        .stdout(predicate::str::contains("Cmd: /usr/bin\n"));
}

// ============================================================================
// Fatal read and parse failures
// ============================================================================

#[test]
fn unknown_pid_is_not_found() {
    let root = tempdir().unwrap();
    procinfo()
        .arg("--proc-root")
        .arg(root.path())
        .arg("99999")
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn malformed_stat_is_fatal() {
    let root = tempdir().unwrap();
    write_proc(root.path(), "9", "9 (broken S 1 2 3\n", "VmRSS:\t1 kB\n", b"x\0");
    procinfo()
        .arg("--proc-root")
        .arg(root.path())
        .arg("9")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("unexpected format"));
}

#[test]
fn incomplete_stat_is_fatal() {
    let root = tempdir().unwrap();
    write_proc(root.path(), "9", "9 (short) S 1 2 3\n", "VmRSS:\t1 kB\n", b"x\0");
    procinfo()
        .arg("--proc-root")
        .arg(root.path())
        .arg("9")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("got 4 fields"));
}

#[test]
fn missing_status_is_fatal() {
    let root = tempdir().unwrap();
    write_proc(root.path(), "9", FULL_STAT, "", b"x\0");
    fs::remove_file(root.path().join("9").join("status")).unwrap();
    procinfo()
        .arg("--proc-root")
        .arg(root.path())
        .arg("9")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("status"));
}

#[test]
fn json_diagnostics_carry_kind() {
    let root = tempdir().unwrap();
    procinfo()
        .args(["--log-format", "json", "--proc-root"])
        .arg(root.path())
        .arg("1")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("\"kind\":\"not_found\""));
}

#[test]
fn bad_settings_file_is_fatal() {
    let root = fixture();
    let config = root.path().join("settings.json");
    fs::write(&config, "{ not json").unwrap();
    procinfo()
        .arg("--config")
        .arg(&config)
        .arg("--proc-root")
        .arg(root.path())
        .arg("4321")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("configuration error"));
}

// ============================================================================
// Live process table
// ============================================================================

#[cfg(target_os = "linux")]
#[test]
fn reports_own_test_process() {
    let pid = std::process::id().to_string();
    procinfo()
        .arg(&pid)
        .assert()
        .success()
        .stdout(predicate::str::starts_with(format!("PID: {pid}\n")))
        .stdout(predicate::str::is_match(r"(?m)^CPU: -?\d+ \d+\.\d{3}$").unwrap())
        .stdout(predicate::str::is_match(r"(?m)^VmRSS: \d+$").unwrap());
}
