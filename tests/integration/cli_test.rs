//! CLI smoke tests for the akr binary.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn akr() -> Command {
    Command::cargo_bin("akr").unwrap()
}

#[test]
fn parse_reconstructs_a_segment() {
    akr()
        .args(["parse", r"ab\x08c"])
        .assert()
        .success()
        .stdout("ac\n");
}

#[test]
fn parse_reads_stdin_when_no_argument() {
    akr()
        .arg("parse")
        .write_stdin(r"usig `gdb\033[D\033[D\033[D\033[D\033[D\033[Dn\033[C\033[C\033[C\033[C\033[C\033[C`")
        .assert()
        .success()
        .stdout("using `gdb`\n");
}

#[test]
fn parse_aborted_segment_prints_empty() {
    akr()
        .args(["parse", r"doomed\x03"])
        .assert()
        .success()
        .stdout("\n");
}

#[test]
fn replay_dry_run_writes_artifacts() {
    let dir = TempDir::new().unwrap();
    let log_path = dir.path().join("audit.log");
    std::fs::write(
        &log_path,
        "t d=gagpt -m 'what is rust' u=op\nt d=ls u=op\n",
    )
    .unwrap();

    akr()
        .args(["replay", "--dry-run", "--out-dir"])
        .arg(dir.path())
        .arg(&log_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Qualifying:"));

    let commands = std::fs::read_to_string(dir.path().join("commands.txt")).unwrap();
    assert_eq!(commands, "gagpt -m 'what is rust'\nls\n");

    // Dry run opens and closes the responses list without entries.
    let responses = std::fs::read_to_string(dir.path().join("responses.json")).unwrap();
    assert_eq!(responses, "[]");
}

#[test]
fn replay_missing_log_fails() {
    let dir = TempDir::new().unwrap();
    akr()
        .args(["replay", "--dry-run", "--out-dir"])
        .arg(dir.path())
        .arg(dir.path().join("missing.log"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to open audit log"));
}

#[test]
fn config_path_prints_a_location() {
    akr()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn completions_generate_for_bash() {
    akr()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("akr"));
}
