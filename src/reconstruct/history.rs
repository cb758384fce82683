//! Command history and recall correlation.
//!
//! Arrow-up recalls are left in the reconstructed text as sentinel
//! characters; they are resolved here against previously reconstructed
//! lines. The capture tool's indexing scheme is kept as a compatibility
//! target: the lookup ordinal is the count of audit-log lines seen so far
//! (matched or not), minus one, minus a compensation for every segment
//! that reconstructed to nothing. History itself only grows for matched,
//! non-empty lines - duplicates included - so the two counts drift apart
//! whenever unmatched lines are interleaved with matched ones. When a
//! recall lands outside the history, that drift is surfaced as a
//! [`HistoryError`] instead of wrapping around.

use thiserror::Error;

use super::RECALL_SENTINEL;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HistoryError {
    #[error(
        "recall of {depth} step(s) back at ordinal {ordinal} \
         lands outside the history ({len} line(s) recorded)"
    )]
    OutOfRange {
        ordinal: i64,
        depth: usize,
        len: usize,
    },
}

/// Append-only record of reconstructed lines with the ordinal bookkeeping
/// needed to resolve recalls.
#[derive(Debug, Default)]
pub struct CommandHistory {
    entries: Vec<String>,
    /// Every physical audit-log line, whether or not it carried a segment.
    lines_seen: u64,
    /// Segments that reconstructed to the empty string; these roll the
    /// ordinal back by one each.
    compensated: u64,
}

impl CommandHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Note that a physical log line was read.
    pub fn note_line(&mut self) {
        self.lines_seen += 1;
    }

    /// Roll the ordinal back for a segment that reconstructed to nothing.
    pub fn compensate(&mut self) {
        self.compensated += 1;
    }

    /// The ordinal recalls are resolved against: lines seen so far, minus
    /// one, minus compensations.
    pub fn lookup_ordinal(&self) -> i64 {
        self.lines_seen as i64 - 1 - self.compensated as i64
    }

    pub fn contains(&self, command: &str) -> bool {
        self.entries.iter().any(|entry| entry == command)
    }

    /// Record a resolved line. Duplicates are recorded too; recall offsets
    /// of later lines depend on every entry being present.
    pub fn push(&mut self, command: String) {
        self.entries.push(command);
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(String::as_str)
    }

    /// Resolve recall sentinels in `raw`. With `k` sentinels anywhere in
    /// the text, the result is the line `k` steps back followed by `raw`
    /// with its first `k` characters stripped - whether or not those
    /// characters are the sentinels. This only models a contiguous
    /// recall-then-edit at the start of the line; that is all the capture
    /// tool's logs contain.
    pub fn resolve(&self, raw: &str) -> Result<String, HistoryError> {
        let depth = raw.chars().filter(|&c| c == RECALL_SENTINEL).count();
        if depth == 0 {
            return Ok(raw.to_string());
        }

        let ordinal = self.lookup_ordinal();
        let index = ordinal - depth as i64;
        let entry = usize::try_from(index)
            .ok()
            .and_then(|i| self.entries.get(i));

        match entry {
            Some(base) => {
                let mut resolved = base.clone();
                resolved.extend(raw.chars().skip(depth));
                Ok(resolved)
            }
            None => Err(HistoryError::OutOfRange {
                ordinal,
                depth,
                len: self.entries.len(),
            }),
        }
    }
}
