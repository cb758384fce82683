//! End-to-end pipeline tests over fixture audit logs (no network).

use std::fs;
use std::io::Cursor;

use tempfile::TempDir;

use akr::config::OutputConfig;
use akr::ingest::run_pipeline;
use akr::output::Artifacts;

/// A session shaped like the real captures: in-place edits, an abort, a
/// recall, a duplicate, and noise lines. The noise sits after the recall;
/// a skipped line before one shifts the recall ordinal (pinned separately
/// below).
const SESSION_LOG: &str = concat!(
    "Dec  7 00:31:58 ws04 tty d=ls /var/log u=operator\n",
    "Dec  7 00:32:03 ws04 tty d=cat audiit\\x08\\x08t.log u=operator\n",
    "Dec  7 00:32:09 ws04 tty d=rm -rf /var/log\\x03 u=operator\n",
    "Dec  7 00:32:15 ws04 tty d=\\033[A | head u=operator\n",
    "Dec  7 00:32:20 ws04 session idle\n",
    "Dec  7 00:32:25 ws04 tty d=ls /var/log u=operator\n",
    "Dec  7 00:32:30 ws04 session closed\n",
);

fn run_dry(log: &str) -> (akr::ingest::RunStats, OutputConfig, TempDir) {
    let dir = TempDir::new().unwrap();
    let config = OutputConfig {
        directory: dir.path().to_path_buf(),
        ..OutputConfig::default()
    };
    let mut artifacts = Artifacts::create(&config).unwrap();
    let stats = run_pipeline(Cursor::new(log.to_string()), None, &mut artifacts).unwrap();
    artifacts.finish().unwrap();
    (stats, config, dir)
}

fn read(config: &OutputConfig, name: &str) -> String {
    fs::read_to_string(config.directory.join(name)).unwrap()
}

#[test]
fn session_reconstructs_every_command() {
    let (stats, config, _dir) = run_dry(SESSION_LOG);

    assert_eq!(stats.lines_read, 7);
    assert_eq!(stats.lines_skipped, 2);
    assert_eq!(stats.empty_after_parse, 1);
    assert_eq!(stats.duplicates, 1);
    assert_eq!(stats.history_errors, 0);

    // The aborted rm never shows up; the recall re-edits the cat line.
    assert_eq!(
        read(&config, &config.commands),
        concat!(
            "ls /var/log\n",
            "cat audit.log\n",
            "cat audit.log | head\n",
            "ls /var/log\n",
        )
    );
}

#[test]
fn dry_run_artifacts_are_created_but_quiet() {
    let (_stats, config, _dir) = run_dry(SESSION_LOG);

    assert_eq!(read(&config, &config.responses), "[]");
    assert_eq!(read(&config, &config.transcript), "");
    assert_eq!(read(&config, &config.errors), "");
}

#[test]
fn skipped_line_before_a_recall_shifts_the_ordinal() {
    // The noise line advances the ordinal without a history entry, so the
    // recall overshoots and is dropped rather than resolved wrongly.
    let log = concat!(
        "t session opened\n",
        "t d=echo alpha u=op\n",
        "t d=\\033[A again u=op\n",
    );
    let (stats, config, _dir) = run_dry(log);

    assert_eq!(stats.history_errors, 1);
    assert_eq!(read(&config, &config.commands), "echo alpha\n");
}

#[test]
fn recall_chain_survives_intervening_commands() {
    // A two-step recall reaches past the line in between.
    let log = concat!(
        "t d=echo alpha u=op\n",
        "t d=echo beta u=op\n",
        "t d=\\033[A\\033[A again u=op\n",
    );
    let (stats, config, _dir) = run_dry(log);

    assert_eq!(stats.history_errors, 0);
    assert!(read(&config, &config.commands).contains("echo alpha again"));
}

#[test]
fn empty_log_yields_empty_artifacts() {
    let (stats, config, _dir) = run_dry("");

    assert_eq!(stats.lines_read, 0);
    assert_eq!(read(&config, &config.commands), "");
    assert_eq!(read(&config, &config.responses), "[]");
}

#[test]
fn escape_heavy_session_matches_known_reconstruction() {
    // Fragments lifted from a real captured session.
    let log = concat!(
        "t d=-fsSL https://code.visualstudio.com/shell instal\\x01curl \\x05ler.sh -o vs_code.sh\\x0d u=op\n",
        "t d=What are the best practices for writing aaaa\\x08\\x08\\x08nd managing large-scale Python applications u=op\n",
    );
    let (stats, config, _dir) = run_dry(log);

    assert_eq!(stats.lines_read, 2);
    let commands = read(&config, &config.commands);
    assert!(commands
        .contains("curl -fsSL https://code.visualstudio.com/shell installer.sh -o vs_code.sh"));
    assert!(commands
        .contains("What are the best practices for writing and managing large-scale Python applications"));
}
