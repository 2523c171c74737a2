//! Document-side line feeding for window parses.
//!
//! A window parse materializes only the requested lines; when an open
//! fenced construct runs off the end of the buffer the engine asks the
//! feeder for further lines, one at a time. Extension is an explicit
//! operation driven by the engine, never a side effect of reading.

/// Source of document lines past the parse window.
pub trait LineFeeder {
    /// The next unconsumed document line, or `None` when the document is
    /// exhausted.
    fn feed_line(&mut self) -> Option<String>;

    /// Number of lines still available.
    fn remaining(&self) -> usize;
}

/// Feeder over an in-memory slice of document lines.
#[derive(Debug)]
pub struct SliceFeeder<'a, S: AsRef<str>> {
    lines: &'a [S],
    next: usize,
}

impl<'a, S: AsRef<str>> SliceFeeder<'a, S> {
    /// Feeder handing out `lines[from..]`.
    pub fn new(lines: &'a [S], from: usize) -> Self {
        SliceFeeder {
            lines,
            next: from.min(lines.len()),
        }
    }
}

impl<S: AsRef<str>> LineFeeder for SliceFeeder<'_, S> {
    fn feed_line(&mut self) -> Option<String> {
        let line = self.lines.get(self.next)?;
        self.next += 1;
        Some(line.as_ref().to_string())
    }

    fn remaining(&self) -> usize {
        self.lines.len() - self.next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feeds_from_offset_until_exhausted() {
        let lines = ["a", "b", "c"];
        let mut feeder = SliceFeeder::new(&lines, 1);
        assert_eq!(feeder.remaining(), 2);
        assert_eq!(feeder.feed_line().as_deref(), Some("b"));
        assert_eq!(feeder.feed_line().as_deref(), Some("c"));
        assert_eq!(feeder.feed_line(), None);
        assert_eq!(feeder.remaining(), 0);
    }

    #[test]
    fn offset_past_end_is_empty() {
        let lines = ["a"];
        let mut feeder = SliceFeeder::new(&lines, 9);
        assert_eq!(feeder.feed_line(), None);
    }
}
