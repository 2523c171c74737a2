//! Output assembler: turns committed text runs into attributed spans
//! and finished lines.
//!
//! Recognizer rules do not build lines directly. They push plain text
//! into a pending buffer, commit spans, and open or drop format scopes;
//! the engine closes lines at line breaks. Scopes opened earlier are
//! overridden by scopes opened later for conflicting keys, and explicit
//! attributes override all scopes.
//!
//! Line attributes are staged with [`Assembler::set_line_attr`] any time
//! before the line is built; open line formats (code, math, front
//! matter membership) apply to every line until dropped.

use crate::line::{AttrSet, Line, LineAttr, LineAttrSet, LineKey, Span, SpanAttr, SpanKey};

#[derive(Debug, Default)]
pub struct Assembler {
    lines: Vec<Line>,
    spans: Vec<Span>,
    pending: String,
    open_formats: Vec<SpanAttr>,
    open_line_formats: Vec<LineAttr>,
    staged_line_attrs: LineAttrSet,
}

impl Assembler {
    pub fn new() -> Self {
        Assembler::default()
    }

    /// Accumulate plain text; attributes are resolved when the text is
    /// flushed into a span.
    pub fn push_text(&mut self, text: &str) {
        self.pending.push_str(text);
    }

    fn scope_attrs(&self) -> AttrSet {
        self.open_formats.iter().cloned().collect()
    }

    /// Flush pending text as a span under the open scopes.
    pub fn flush_pending(&mut self) {
        self.commit_pending(AttrSet::new());
    }

    /// Flush pending text as one span with `attrs` merged over the open
    /// scopes.
    pub fn commit_pending(&mut self, attrs: AttrSet) {
        if self.pending.is_empty() {
            return;
        }
        let text = std::mem::take(&mut self.pending);
        let merged = attrs.merged_over(&self.scope_attrs());
        self.spans.push(Span::new(text, merged));
    }

    /// Emit a span. Pending text is flushed first so span order follows
    /// source order.
    pub fn add_span(&mut self, text: impl Into<String>, attrs: AttrSet) {
        self.flush_pending();
        let merged = attrs.merged_over(&self.scope_attrs());
        self.spans.push(Span::new(text.into(), merged));
    }

    /// Emit a formatting marker span (delimiters, fences, checkboxes).
    pub fn add_marker(&mut self, text: impl Into<String>) {
        self.add_span(text, AttrSet::single(SpanAttr::Marker));
    }

    pub fn open_format(&mut self, attr: SpanAttr) {
        self.flush_pending();
        let key = attr.key();
        self.open_formats.retain(|a| a.key() != key);
        self.open_formats.push(attr);
    }

    pub fn drop_format(&mut self, key: SpanKey) {
        self.flush_pending();
        self.open_formats.retain(|a| a.key() != key);
    }

    pub fn has_format(&self, key: SpanKey) -> bool {
        self.open_formats.iter().any(|a| a.key() == key)
    }

    pub fn open_line_format(&mut self, attr: LineAttr) {
        let key = attr.key();
        self.open_line_formats.retain(|a| a.key() != key);
        self.open_line_formats.push(attr);
    }

    pub fn drop_line_format(&mut self, key: LineKey) {
        self.open_line_formats.retain(|a| a.key() != key);
    }

    /// Stage a line attribute for the line under construction.
    pub fn set_line_attr(&mut self, attr: LineAttr) {
        self.staged_line_attrs.insert(attr);
    }

    /// Close the current line. Staged attributes merge over open line
    /// formats; a line with zero spans is marked empty but still
    /// emitted. Inline format scopes do not cross lines.
    pub fn build_line(&mut self) {
        self.flush_pending();
        let staged = std::mem::take(&mut self.staged_line_attrs);
        let base: LineAttrSet = self.open_line_formats.iter().cloned().collect();
        let mut attrs = staged.merged_over(&base);

        let spans = std::mem::take(&mut self.spans);
        if spans.is_empty() {
            attrs.insert(LineAttr::Empty);
        }
        self.lines.push(Line { spans, attrs });
        self.open_formats.clear();
    }

    /// Replace a finished line's spans (code-token retrofits). The
    /// replacement must concatenate to the same text.
    pub fn rewrite_line(&mut self, index: usize, spans: Vec<Span>) {
        debug_assert_eq!(
            self.lines[index].text(),
            spans.iter().map(|s| s.text.as_str()).collect::<String>(),
        );
        self.lines[index].spans = spans;
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn line(&self, index: usize) -> &Line {
        &self.lines[index]
    }

    pub fn into_lines(self) -> Vec<Line> {
        self.lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_text_takes_open_scopes() {
        let mut asm = Assembler::new();
        asm.push_text("plain ");
        asm.open_format(SpanAttr::Emphasis);
        asm.push_text("slanted");
        asm.drop_format(SpanKey::Emphasis);
        asm.build_line();

        let line = asm.line(0);
        assert_eq!(line.spans.len(), 2);
        assert!(line.spans[0].attrs.is_empty());
        assert!(line.spans[1].attrs.contains(SpanKey::Emphasis));
        assert_eq!(line.text(), "plain slanted");
    }

    #[test]
    fn later_scope_wins_on_conflict() {
        let mut asm = Assembler::new();
        asm.open_format(SpanAttr::Link {
            href: "outer".to_string(),
        });
        asm.open_format(SpanAttr::Link {
            href: "inner".to_string(),
        });
        asm.push_text("x");
        asm.build_line();

        assert_eq!(
            asm.line(0).spans[0].attrs.get(SpanKey::Link),
            Some(&SpanAttr::Link {
                href: "inner".to_string()
            })
        );
    }

    #[test]
    fn explicit_attrs_override_scopes() {
        let mut asm = Assembler::new();
        asm.open_format(SpanAttr::Link {
            href: "scope".to_string(),
        });
        asm.add_span(
            "x",
            AttrSet::single(SpanAttr::Link {
                href: "explicit".to_string(),
            }),
        );
        asm.build_line();

        assert_eq!(
            asm.line(0).spans[0].attrs.get(SpanKey::Link),
            Some(&SpanAttr::Link {
                href: "explicit".to_string()
            })
        );
    }

    #[test]
    fn zero_span_line_is_emitted_empty() {
        let mut asm = Assembler::new();
        asm.build_line();
        assert_eq!(asm.line_count(), 1);
        assert!(asm.line(0).is_empty());
        assert!(asm.line(0).attrs.contains(LineKey::Empty));
    }

    #[test]
    fn line_formats_apply_until_dropped() {
        let mut asm = Assembler::new();
        asm.open_line_format(LineAttr::MathFence {
            role: crate::line::FenceRole::Body,
        });
        asm.push_text("x = 1");
        asm.build_line();
        asm.drop_line_format(LineKey::MathFence);
        asm.push_text("after");
        asm.build_line();

        assert!(asm.line(0).attrs.contains(LineKey::MathFence));
        assert!(!asm.line(1).attrs.contains(LineKey::MathFence));
    }

    #[test]
    fn inline_scopes_do_not_cross_lines() {
        let mut asm = Assembler::new();
        asm.open_format(SpanAttr::Strong);
        asm.push_text("a");
        asm.build_line();
        asm.push_text("b");
        asm.build_line();

        assert!(asm.line(0).spans[0].attrs.contains(SpanKey::Strong));
        assert!(asm.line(1).spans[0].attrs.is_empty());
    }

    #[test]
    fn rewrite_preserves_text() {
        let mut asm = Assembler::new();
        asm.push_text("let x");
        asm.build_line();
        asm.rewrite_line(
            0,
            vec![
                Span::new(
                    "let",
                    AttrSet::single(SpanAttr::Token {
                        scope: "keyword".to_string(),
                    }),
                ),
                Span::plain(" x"),
            ],
        );
        assert_eq!(asm.line(0).text(), "let x");
        assert_eq!(asm.line(0).spans.len(), 2);
    }

    #[test]
    fn committed_pending_takes_explicit_attrs() {
        let mut asm = Assembler::new();
        asm.push_text("#tag");
        asm.commit_pending(AttrSet::single(SpanAttr::Tag {
            names: vec!["tag".to_string()],
        }));
        asm.build_line();

        assert!(asm.line(0).spans[0].attrs.contains(SpanKey::Tag));
        assert_eq!(asm.line(0).text(), "#tag");
    }
}
