//! Line-editor state: a growable character buffer plus a cursor.
//!
//! Reproduces the capture tool's editor semantics exactly rather than a
//! conventional line editor. The two deliberate oddities, both pinned by
//! tests:
//!
//! - backspace ([`EditOp::DeleteLast`]) removes the **last** character of
//!   the buffer no matter where the cursor sits, and decrements the cursor
//!   even when the buffer is already empty;
//! - cursor movement is unclamped, so the cursor can sit below zero or past
//!   the end of the buffer. A negative cursor splits the buffer from the
//!   end on insert, mirroring the tool's slice arithmetic.

use super::decoder::EditOp;
use super::RECALL_SENTINEL;

/// Editing state for a single reconstructed line.
#[derive(Debug, Default, Clone)]
pub struct LineBuffer {
    chars: Vec<char>,
    cursor: isize,
}

impl LineBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// Raw cursor value; may be negative or beyond the buffer length.
    pub fn cursor(&self) -> isize {
        self.cursor
    }

    /// Where the buffer splits for an insert or forward delete. A negative
    /// cursor counts from the end (floored at the start), a cursor past the
    /// end saturates to the end.
    fn split_index(&self) -> usize {
        let len = self.chars.len() as isize;
        let index = if self.cursor < 0 {
            len + self.cursor
        } else {
            self.cursor
        };
        index.clamp(0, len) as usize
    }

    /// Insert a character at the cursor, shifting the tail right. At or
    /// past the end this is an append.
    pub fn insert(&mut self, c: char) {
        let at = self.split_index();
        self.chars.insert(at, c);
        self.cursor += 1;
    }

    /// Remove the last character of the buffer, wherever the cursor is.
    /// The cursor decrements unconditionally.
    pub fn delete_last(&mut self) {
        self.chars.pop();
        self.cursor -= 1;
    }

    /// Remove the character at the cursor, if there is one. The cursor
    /// does not move.
    pub fn delete_at_cursor(&mut self) {
        let at = self.split_index();
        if at < self.chars.len() {
            self.chars.remove(at);
        }
    }

    /// Apply one edit operation. [`EditOp::AbortLine`] is the caller's
    /// responsibility; here it leaves the buffer untouched.
    pub fn apply(&mut self, op: EditOp) {
        match op {
            EditOp::Insert(c) | EditOp::InsertDecoded(c) => self.insert(c),
            EditOp::CursorHome => self.cursor = 0,
            EditOp::CursorEnd => self.cursor = self.chars.len() as isize,
            EditOp::CursorLeft => self.cursor -= 1,
            EditOp::CursorRight => self.cursor += 1,
            EditOp::DeleteLast => self.delete_last(),
            EditOp::DeleteAtCursor => self.delete_at_cursor(),
            EditOp::HistoryRecall => self.insert(RECALL_SENTINEL),
            EditOp::AbortLine | EditOp::ClearScreen | EditOp::CursorToOrigin => {}
        }
    }

    /// Consume the buffer into its final text.
    pub fn into_text(self) -> String {
        self.chars.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffer_with(text: &str) -> LineBuffer {
        let mut buf = LineBuffer::new();
        for c in text.chars() {
            buf.insert(c);
        }
        buf
    }

    #[test]
    fn typing_appends_and_advances_cursor() {
        let buf = buffer_with("abc");
        assert_eq!(buf.cursor(), 3);
        assert_eq!(buf.into_text(), "abc");
    }

    #[test]
    fn insert_mid_buffer_preserves_order() {
        let mut buf = buffer_with("acd");
        buf.apply(EditOp::CursorLeft);
        buf.apply(EditOp::CursorLeft);
        buf.insert('b');
        assert_eq!(buf.cursor(), 2);
        assert_eq!(buf.into_text(), "abcd");
    }

    #[test]
    fn delete_last_ignores_cursor_position() {
        let mut buf = buffer_with("abcd");
        buf.apply(EditOp::CursorHome);
        buf.delete_last();
        // Last character removed even though the cursor was at the start.
        assert_eq!(buf.into_text(), "abc");
    }

    #[test]
    fn delete_last_shrinks_by_exactly_one() {
        let mut buf = buffer_with("xy");
        let before = buf.len();
        buf.delete_last();
        assert_eq!(buf.len(), before - 1);
    }

    #[test]
    fn delete_last_on_empty_still_moves_cursor() {
        let mut buf = LineBuffer::new();
        buf.delete_last();
        assert!(buf.is_empty());
        assert_eq!(buf.cursor(), -1);
    }

    #[test]
    fn delete_at_cursor_removes_exactly_that_character() {
        let mut buf = buffer_with("abc");
        buf.apply(EditOp::CursorLeft);
        buf.apply(EditOp::CursorLeft);
        buf.delete_at_cursor();
        assert_eq!(buf.cursor(), 1);
        assert_eq!(buf.into_text(), "ac");
    }

    #[test]
    fn delete_at_cursor_past_end_is_a_no_op() {
        let mut buf = buffer_with("ab");
        buf.apply(EditOp::CursorRight);
        buf.delete_at_cursor();
        assert_eq!(buf.into_text(), "ab");
    }

    #[test]
    fn cursor_home_and_end() {
        let mut buf = buffer_with("abc");
        buf.apply(EditOp::CursorHome);
        assert_eq!(buf.cursor(), 0);
        buf.apply(EditOp::CursorEnd);
        assert_eq!(buf.cursor(), 3);
    }

    #[test]
    fn cursor_is_unclamped() {
        let mut buf = buffer_with("ab");
        for _ in 0..5 {
            buf.apply(EditOp::CursorLeft);
        }
        assert_eq!(buf.cursor(), -3);
        for _ in 0..10 {
            buf.apply(EditOp::CursorRight);
        }
        assert_eq!(buf.cursor(), 7);
    }

    #[test]
    fn negative_cursor_splits_from_the_end() {
        let mut buf = buffer_with("abc");
        buf.apply(EditOp::CursorLeft);
        buf.apply(EditOp::CursorLeft);
        buf.apply(EditOp::CursorLeft);
        buf.apply(EditOp::CursorLeft);
        buf.apply(EditOp::CursorLeft);
        // cursor = -2: splits one character before the end.
        buf.insert('x');
        assert_eq!(buf.into_text(), "axbc");
    }

    #[test]
    fn insert_past_end_appends() {
        let mut buf = buffer_with("ab");
        buf.apply(EditOp::CursorRight);
        buf.apply(EditOp::CursorRight);
        buf.insert('c');
        assert_eq!(buf.into_text(), "abc");
    }

    #[test]
    fn visual_ops_do_not_touch_the_buffer() {
        let mut buf = buffer_with("abc");
        buf.apply(EditOp::ClearScreen);
        buf.apply(EditOp::CursorToOrigin);
        assert_eq!(buf.cursor(), 3);
        assert_eq!(buf.into_text(), "abc");
    }

    #[test]
    fn recall_inserts_sentinel() {
        let mut buf = LineBuffer::new();
        buf.apply(EditOp::HistoryRecall);
        assert_eq!(buf.cursor(), 1);
        assert_eq!(buf.into_text(), RECALL_SENTINEL.to_string());
    }
}
