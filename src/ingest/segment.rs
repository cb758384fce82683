//! Raw-segment extraction from audit-log lines.
//!
//! Lines of interest carry the keystroke capture between a `d=` field and
//! the trailing ` u=<user>` field. The pattern is matched greedily so a
//! `u=` inside the captured keystrokes does not cut the segment short.

use regex::Regex;

/// The delimiter pattern plus the fixed offsets that carve the segment out
/// of the match: two characters in to skip `d=`, three characters off the
/// end to drop the space and `u=`.
pub struct SegmentExtractor {
    pattern: Regex,
}

impl SegmentExtractor {
    pub fn new() -> Self {
        Self {
            pattern: Regex::new("d=.*u=").expect("delimiter pattern is valid"),
        }
    }

    /// Extract the raw segment, or `None` when the line carries no capture.
    /// A matched-but-empty segment returns `Some("")` - the caller treats
    /// that like any other reconstruction to the empty string.
    pub fn extract<'a>(&self, line: &'a str) -> Option<&'a str> {
        let m = self.pattern.find(line)?;
        let start = m.start() + 2;
        let end = m.end().saturating_sub(3);
        if end <= start {
            return Some("");
        }
        // The offsets are derived from an ASCII match, but the last char
        // before "u=" may be multi-byte; a split there means the line is
        // not in the capture format after all.
        line.get(start..end)
    }
}

impl Default for SegmentExtractor {
    fn default() -> Self {
        Self::new()
    }
}
