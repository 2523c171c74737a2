//! Math, in two shapes.
//!
//! A line holding nothing but `$$` opens a display math block; the next
//! such line closes it. Between the fences every line is passed through
//! verbatim. Inline math is a single `$` pair on one line, recognized
//! conservatively so that prose about prices (`$5 and $6`) stays prose.

use crate::line::{AttrSet, FenceRole, LineAttr, LineKey, SpanAttr, SpanKey};
use crate::parser::Parser;
use crate::parser::context::{
    Context, ContextKind, ContextPayload, ExitAction, MATH_BLOCK_RULES,
};
use crate::utils::touches_text;

pub(crate) fn open_block(p: &mut Parser<'_>) -> bool {
    if !p.at_content_start() || !matches!(p.cursor.current(), Some("$")) {
        return false;
    }
    let line = p.cursor.line_text(p.cursor.index(), false);
    if line.trim_end() != "$$" {
        return false;
    }
    p.asm.add_marker(line);
    p.asm.set_line_attr(LineAttr::MathFence {
        role: FenceRole::Open,
    });
    p.asm.open_line_format(LineAttr::MathFence {
        role: FenceRole::Body,
    });
    let indent = p.line_indent.clone();
    p.push_context(Context {
        kind: ContextKind::Block,
        indent,
        rules: MATH_BLOCK_RULES,
        exit: ExitAction::FinalizeMath,
        payload: ContextPayload::Math,
    });
    p.cursor.set_index(p.line_end_offset());
    true
}

pub(crate) fn close_block(p: &mut Parser<'_>) -> bool {
    if !p.at_content_start() {
        return false;
    }
    let line = p.cursor.line_text(p.cursor.index(), false);
    if line.trim_end() != "$$" {
        return false;
    }
    p.pop_context();
    p.asm.add_marker(line);
    p.asm.set_line_attr(LineAttr::MathFence {
        role: FenceRole::Close,
    });
    p.cursor.set_index(p.line_end_offset());
    true
}

pub(crate) fn finalize(p: &mut Parser<'_>) {
    p.asm.drop_line_format(LineKey::MathFence);
}

/// Inline `$math$`. The opener must touch the content, the closer must
/// touch it from the other side, and the closer may not run into a
/// digit or another dollar. All four gates pass before anything is
/// emitted.
pub(crate) fn inline(p: &mut Parser<'_>) -> bool {
    if !matches!(p.cursor.current(), Some("$")) {
        return false;
    }
    let next = p.cursor.peek(1);
    if next == Some("$") || !touches_text(next) {
        return false;
    }
    let start = p.cursor.index();
    let line_end = p.line_end_offset();
    let rest = p.cursor.slice(start + 1..line_end);
    let Some(rel) = find_close(rest) else {
        return false;
    };
    let content = &rest[..rel];
    if content.ends_with(char::is_whitespace) {
        return false;
    }
    let close_at = start + 1 + rel;
    let after = p.cursor.text()[close_at + 1..].chars().next();
    if after.is_some_and(|c| c.is_ascii_digit() || c == '$') {
        return false;
    }
    let content = content.to_string();
    p.asm.open_format(SpanAttr::Math);
    p.asm.add_marker("$");
    p.asm.add_span(content, AttrSet::new());
    p.asm.add_marker("$");
    p.asm.drop_format(SpanKey::Math);
    p.cursor.set_index(close_at + 1);
    true
}

/// First unescaped `$` in `rest`.
fn find_close(rest: &str) -> Option<usize> {
    let bytes = rest.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'$' => return Some(i),
            _ => i += 1,
        }
    }
    None
}
