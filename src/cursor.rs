//! Grapheme-cluster cursor over the parse buffer.
//!
//! The cursor owns the text being parsed and a byte index that always
//! rests on an extended grapheme cluster boundary. All motion is in
//! clusters, so combining marks, emoji with modifiers, and CRLF pairs
//! are never split in either direction.

use std::ops::Range;

use unicode_segmentation::UnicodeSegmentation;

/// Cursor over an owned text buffer.
///
/// The buffer can grow at the end (see [`Cursor::extend_with`]) when a
/// multi-line construct pulls further document lines, so scan methods
/// that produce text return owned strings.
#[derive(Debug)]
pub struct Cursor {
    text: String,
    index: usize,
    /// Byte length of the cluster at `index`; 0 at end of text.
    cur_len: usize,
}

impl Cursor {
    pub fn new(text: impl Into<String>) -> Self {
        let mut cursor = Cursor {
            text: text.into(),
            index: 0,
            cur_len: 0,
        };
        cursor.sync();
        cursor
    }

    /// Recompute the cached cluster length at the current index.
    fn sync(&mut self) {
        self.cur_len = self.text[self.index..]
            .graphemes(true)
            .next()
            .map_or(0, str::len);
    }

    /// The cluster under the cursor, or `None` at end of text.
    pub fn current(&self) -> Option<&str> {
        if self.cur_len == 0 {
            None
        } else {
            Some(&self.text[self.index..self.index + self.cur_len])
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn is_at_end(&self) -> bool {
        self.index >= self.text.len()
    }

    pub fn slice(&self, range: Range<usize>) -> &str {
        &self.text[range]
    }

    /// Move the cursor to an absolute byte offset.
    ///
    /// The offset must lie on a cluster boundary; offsets handed out by
    /// this cursor (indices, find results for ASCII literals) are.
    pub fn set_index(&mut self, index: usize) {
        debug_assert!(self.text.is_char_boundary(index));
        self.index = index.min(self.text.len());
        self.sync();
    }

    /// Step `n` clusters forward (positive) or backward (negative).
    ///
    /// Stepping past the end leaves the cursor on the end sentinel;
    /// stepping backward at offset 0 is a no-op.
    pub fn step(&mut self, n: isize) {
        if n >= 0 {
            for _ in 0..n {
                if self.cur_len == 0 {
                    break;
                }
                self.index += self.cur_len;
                self.sync();
            }
        } else {
            for _ in 0..-n {
                let Some(prev) = self.text[..self.index].graphemes(true).next_back() else {
                    break;
                };
                self.index -= prev.len();
                self.sync();
            }
        }
    }

    /// The cluster `n` steps away without moving. `peek(0)` is
    /// [`Cursor::current`]; negative `n` looks backward.
    pub fn peek(&self, n: isize) -> Option<&str> {
        if n >= 0 {
            self.text[self.index..].graphemes(true).nth(n as usize)
        } else {
            let back = (-n) as usize;
            self.text[..self.index].graphemes(true).rev().nth(back - 1)
        }
    }

    /// The cluster immediately before the cursor.
    pub fn prev_cluster(&self) -> Option<&str> {
        self.peek(-1)
    }

    /// Whether the buffer starts with `literal` at the cursor,
    /// optionally consuming it.
    pub fn check_for(&mut self, literal: &str, consume: bool) -> bool {
        if !self.text[self.index..].starts_with(literal) {
            return false;
        }
        if consume {
            self.index += literal.len();
            self.sync();
        }
        true
    }

    /// Consume text up to (not including) `literal`.
    ///
    /// Returns the consumed text and whether the literal was found. With
    /// `stop_at_line_break` the scan also halts in front of the line
    /// break (the break itself is never consumed). When the literal is
    /// absent the cursor rests at the break or the end of text.
    #[allow(dead_code)]
    pub fn consume_until(&mut self, literal: &str, stop_at_line_break: bool) -> (String, bool) {
        let hay = &self.text[self.index..];
        let lit_pos = hay.find(literal);
        let brk_pos = if stop_at_line_break {
            hay.find('\n').map(|p| {
                // A CRLF pair is one cluster; halt in front of the CR.
                if p > 0 && hay.as_bytes()[p - 1] == b'\r' {
                    p - 1
                } else {
                    p
                }
            })
        } else {
            None
        };

        let (stop, found) = match (lit_pos, brk_pos) {
            (Some(l), Some(b)) if l < b => (l, true),
            (Some(l), None) => (l, true),
            (_, Some(b)) => (b, false),
            (None, None) => (hay.len(), false),
        };

        let consumed = hay[..stop].to_string();
        self.index += stop;
        self.sync();
        (consumed, found)
    }

    /// Consume clusters while `predicate` holds.
    pub fn consume_while(&mut self, predicate: impl Fn(&str) -> bool) -> String {
        let start = self.index;
        while let Some(cluster) = self.current() {
            if !predicate(cluster) {
                break;
            }
            self.index += self.cur_len;
            self.sync();
        }
        self.text[start..self.index].to_string()
    }

    /// Byte offset of the next occurrence of `literal`, cursor included.
    #[allow(dead_code)]
    pub fn find_forward(&self, literal: &str) -> Option<usize> {
        self.text[self.index..]
            .find(literal)
            .map(|pos| self.index + pos)
    }

    /// Byte offset of the last occurrence of `literal` before the cursor.
    pub fn find_backward(&self, literal: &str) -> Option<usize> {
        self.text[..self.index].rfind(literal)
    }

    /// End offset of the line containing `from` (in front of the line
    /// break, or end of text).
    pub fn line_end(&self, from: usize) -> usize {
        match self.text[from..].find('\n') {
            Some(pos) if pos > 0 && self.text.as_bytes()[from + pos - 1] == b'\r' => {
                from + pos - 1
            }
            Some(pos) => from + pos,
            None => self.text.len(),
        }
    }

    /// Text from `from` to the end of its line, optionally consuming up
    /// to the line break.
    pub fn line_text(&mut self, from: usize, consume: bool) -> String {
        let end = self.line_end(from);
        let text = self.text[from..end].to_string();
        if consume {
            self.set_index(end);
        }
        text
    }

    /// Append a further document line to the buffer.
    ///
    /// The buffer keeps the lines-joined-by-breaks shape, so the break
    /// comes first. Re-syncs in case the cursor was resting on the end
    /// sentinel.
    pub fn extend_with(&mut self, line: &str) {
        self.text.push('\n');
        self.text.push_str(line);
        if self.cur_len == 0 {
            self.sync();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steps_whole_clusters() {
        // Thumbs-up with a skin-tone modifier is a single cluster.
        let mut cursor = Cursor::new("a👍🏽b");
        assert_eq!(cursor.current(), Some("a"));
        cursor.step(1);
        assert_eq!(cursor.current(), Some("👍🏽"));
        cursor.step(1);
        assert_eq!(cursor.current(), Some("b"));
        cursor.step(-1);
        assert_eq!(cursor.current(), Some("👍🏽"));
    }

    #[test]
    fn crlf_is_one_cluster() {
        let mut cursor = Cursor::new("a\r\nb");
        cursor.step(1);
        assert_eq!(cursor.current(), Some("\r\n"));
        cursor.step(1);
        assert_eq!(cursor.current(), Some("b"));
    }

    #[test]
    fn step_backward_at_start_is_noop() {
        let mut cursor = Cursor::new("ab");
        cursor.step(-3);
        assert_eq!(cursor.index(), 0);
        assert_eq!(cursor.current(), Some("a"));
    }

    #[test]
    fn step_past_end_is_sentinel() {
        let mut cursor = Cursor::new("ab");
        cursor.step(5);
        assert!(cursor.is_at_end());
        assert_eq!(cursor.current(), None);
        // Stays put.
        cursor.step(1);
        assert_eq!(cursor.index(), 2);
    }

    #[test]
    fn peek_does_not_move() {
        let cursor = Cursor::new("abc");
        assert_eq!(cursor.peek(0), Some("a"));
        assert_eq!(cursor.peek(2), Some("c"));
        assert_eq!(cursor.peek(3), None);
        assert_eq!(cursor.peek(-1), None);
    }

    #[test]
    fn peek_backward() {
        let mut cursor = Cursor::new("xyz");
        cursor.step(2);
        assert_eq!(cursor.peek(-1), Some("y"));
        assert_eq!(cursor.peek(-2), Some("x"));
        assert_eq!(cursor.peek(-3), None);
    }

    #[test]
    fn check_for_consumes_on_request() {
        let mut cursor = Cursor::new("==rest");
        assert!(cursor.check_for("==", false));
        assert_eq!(cursor.index(), 0);
        assert!(cursor.check_for("==", true));
        assert_eq!(cursor.current(), Some("r"));
        assert!(!cursor.check_for("==", true));
    }

    #[test]
    fn consume_until_stops_at_line_break() {
        let mut cursor = Cursor::new("abc]] def");
        let (text, found) = cursor.consume_until("]]", true);
        assert_eq!(text, "abc");
        assert!(found);
        assert!(cursor.check_for("]]", false));

        let mut cursor = Cursor::new("abc\n]]");
        let (text, found) = cursor.consume_until("]]", true);
        assert_eq!(text, "abc");
        assert!(!found);
        assert_eq!(cursor.current(), Some("\n"));
    }

    #[test]
    fn consume_until_honors_crlf() {
        let mut cursor = Cursor::new("ab\r\ncd");
        let (text, found) = cursor.consume_until("]]", true);
        assert_eq!(text, "ab");
        assert!(!found);
        assert_eq!(cursor.current(), Some("\r\n"));
    }

    #[test]
    fn consume_while_runs() {
        let mut cursor = Cursor::new("###rest");
        let run = cursor.consume_while(|c| c == "#");
        assert_eq!(run, "###");
        assert_eq!(cursor.current(), Some("r"));
    }

    #[test]
    fn line_text_and_find() {
        let mut cursor = Cursor::new("one two\nthree");
        assert_eq!(cursor.line_text(4, false), "two");
        assert_eq!(cursor.index(), 0);
        assert_eq!(cursor.find_forward("three"), Some(8));
        cursor.set_index(8);
        assert_eq!(cursor.find_backward("\n"), Some(7));
        assert_eq!(cursor.line_text(8, true), "three");
        assert!(cursor.is_at_end());
    }

    #[test]
    fn extend_appends_a_line() {
        let mut cursor = Cursor::new("ab");
        cursor.step(2);
        assert!(cursor.is_at_end());
        cursor.extend_with("cd");
        assert_eq!(cursor.text(), "ab\ncd");
        assert_eq!(cursor.current(), Some("\n"));
    }
}
