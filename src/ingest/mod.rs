//! Audit-log ingestion and the per-line replay pipeline.
//!
//! One pass, strictly sequential: each line is carved for its raw segment,
//! reconstructed, correlated against history, deduplicated, classified,
//! and - when it qualifies and a service is attached - replayed before the
//! next line is read. Network latency therefore gates the whole run; that
//! matches how these logs were processed historically and keeps the
//! artifact ordering trivially stable.
//!
//! Per-line conditions (no segment, empty reconstruction, duplicate,
//! unrecognized command) are counted in [`RunStats`] and logged, never
//! fatal. Only a TLS handshake failure or an unwritable artifact aborts
//! the run.

mod classify;
mod segment;

pub use classify::{extract_payload, WRAPPER_COMMAND};
pub use segment::SegmentExtractor;

use std::io::BufRead;

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use crate::output::Artifacts;
use crate::reconstruct::{reconstruct_segment, CommandHistory};
use crate::replay::{fulfillment_text, QueryError, QueryOutcome, QueryService};

/// Counters accumulated over a run, reported in the final summary.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunStats {
    /// Physical lines read from the log.
    pub lines_read: u64,
    /// Lines without a keystroke segment.
    pub lines_skipped: u64,
    /// Segments that reconstructed to the empty string (aborts included).
    pub empty_after_parse: u64,
    /// Escape sequences that degraded to a literal insert.
    pub malformed_escapes: u64,
    /// Recalls that landed outside the recorded history.
    pub history_errors: u64,
    /// Resolved commands already present in history.
    pub duplicates: u64,
    /// Resolved commands that are not query invocations.
    pub unrecognized: u64,
    /// Payloads eligible for replay.
    pub qualifying: u64,
    /// Replays the service answered with status < 400.
    pub replay_succeeded: u64,
    /// Replays rejected, malformed, or lost in transport.
    pub replay_failed: u64,
}

/// Drive the full pipeline over an audit log. With `service` set to `None`
/// the reconstruction, correlation, and classification all still run and
/// the commands artifact is written; only the network step is skipped.
pub fn run_pipeline<R: BufRead>(
    reader: R,
    service: Option<&dyn QueryService>,
    artifacts: &mut Artifacts,
) -> Result<RunStats> {
    let extractor = SegmentExtractor::new();
    let mut history = CommandHistory::new();
    let mut stats = RunStats::default();

    for line in reader.lines() {
        let line = line.context("failed to read audit log line")?;
        stats.lines_read += 1;
        history.note_line();

        let Some(raw) = extractor.extract(&line) else {
            stats.lines_skipped += 1;
            debug!(line = %line.trim_end(), "no keystroke segment in line");
            continue;
        };

        let reconstruction = reconstruct_segment(raw);
        stats.malformed_escapes += reconstruction.malformed_escapes as u64;

        if reconstruction.text.is_empty() {
            stats.empty_after_parse += 1;
            history.compensate();
            debug!(aborted = reconstruction.aborted, "segment reconstructed to nothing");
            continue;
        }

        let resolved = match history.resolve(&reconstruction.text) {
            Ok(resolved) => resolved,
            Err(err) => {
                stats.history_errors += 1;
                warn!(%err, "dropping line with unresolvable recall");
                continue;
            }
        };

        artifacts.record_command(&resolved)?;

        if history.contains(&resolved) {
            // Recorded anyway: later recall offsets count this line.
            history.push(resolved);
            stats.duplicates += 1;
            continue;
        }
        history.push(resolved.clone());

        let Some(payload) = extract_payload(&resolved) else {
            stats.unrecognized += 1;
            debug!(command = %resolved, "not a query invocation");
            continue;
        };
        stats.qualifying += 1;

        let Some(service) = service else {
            continue;
        };

        match service.send(&payload) {
            Ok(QueryOutcome::Success { status, body }) => match fulfillment_text(&body) {
                Some(text) => {
                    artifacts.record_success(&payload, &body, &text)?;
                    stats.replay_succeeded += 1;
                    info!(payload = %payload, status, "replayed");
                }
                None => {
                    warn!(status, "success response carried no fulfillment text");
                    artifacts.record_failure(&payload, status, &body)?;
                    stats.replay_failed += 1;
                }
            },
            Ok(QueryOutcome::Failure { status, body }) => {
                artifacts.record_failure(&payload, status, &body)?;
                stats.replay_failed += 1;
                info!(payload = %payload, status, "replay rejected");
            }
            Err(err @ QueryError::TlsHandshake { .. }) => {
                // Broken credential; every further request would fail the
                // same way.
                return Err(err).context("aborting run on TLS handshake failure");
            }
            Err(err) => {
                artifacts.record_transport_failure(&payload, &err)?;
                stats.replay_failed += 1;
                warn!(%err, "replay request failed");
            }
        }
    }

    Ok(stats)
}
