//! Keystroke reconstruction pipeline.
//!
//! Audit logs capture operator input at the keystroke level, with in-place
//! edits encoded as a mix of `\xHH` control escapes and a small subset of
//! ANSI CSI sequences. This module turns one captured segment back into the
//! text the operator actually ended up with:
//!
//! - [`decoder`] - scans the raw segment into a stream of [`EditOp`]s
//! - [`editor`] - folds the ops over a [`LineBuffer`] (buffer + cursor)
//! - [`history`] - resolves recall sentinels against prior lines
//!
//! The decoder and editor reproduce the capture tool's dialect exactly,
//! including its non-standard backspace (always removes the last character
//! of the buffer, wherever the cursor is) and its unclamped cursor. See
//! DESIGN.md for the compatibility decisions.

mod decoder;
mod editor;
mod history;

pub use decoder::{EditOp, OpDecoder};
pub use editor::LineBuffer;
pub use history::{CommandHistory, HistoryError};

/// Placeholder written into the buffer wherever the operator recalled a
/// previous command (arrow-up). Consumed during history resolution.
pub const RECALL_SENTINEL: char = '\u{1A}';

/// Result of reconstructing one raw segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconstruction {
    /// Final visible text; empty when the line was aborted.
    pub text: String,
    /// The segment contained an abort keystroke (Ctrl-C); the buffer
    /// content is discarded regardless of what was typed.
    pub aborted: bool,
    /// Escape sequences that matched neither dialect and degraded to a
    /// literal insert.
    pub malformed_escapes: usize,
}

/// Decode a raw escape-coded segment and replay it through the line editor.
pub fn reconstruct_segment(raw: &str) -> Reconstruction {
    let mut decoder = OpDecoder::new(raw);
    let mut buffer = LineBuffer::new();
    let mut aborted = false;

    for op in decoder.by_ref() {
        if matches!(op, EditOp::AbortLine) {
            aborted = true;
            break;
        }
        buffer.apply(op);
    }

    Reconstruction {
        text: if aborted {
            String::new()
        } else {
            buffer.into_text()
        },
        aborted,
        malformed_escapes: decoder.malformed_count(),
    }
}
