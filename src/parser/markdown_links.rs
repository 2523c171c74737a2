//! Markdown links `[text](dest)` and embeds `![text](dest)`, with
//! bracket nesting, backslash escapes, and quoted titles tolerated in
//! the scan. A bare `[text]` without a destination is never claimed.
//! This module also hosts the closer rule for link display contexts,
//! shared with the wiki form.

use crate::line::SpanAttr;
use crate::parser::context::{
    Context, ContextKind, ContextPayload, ExitAction, LINK_TEXT_RULES,
};
use crate::parser::Parser;
use crate::structure::{EmbedEntry, LinkEntry, LinkForm, Structure};

pub(crate) fn claim(p: &mut Parser<'_>) -> bool {
    let embed = match p.cursor.current() {
        Some("[") => false,
        Some("!") if matches!(p.cursor.peek(1), Some("[")) => true,
        _ => return false,
    };

    let start = p.cursor.index();
    let bracket_at = if embed { start + 1 } else { start };
    let line_end = p.line_end_offset();
    let rest = p.cursor.slice(bracket_at..line_end);
    let Some(scanned) = scan_link(rest) else {
        return false;
    };

    let close_at = bracket_at + scanned.close_at;
    let construct_end = bracket_at + scanned.end;
    let display = rest[1..scanned.close_at].to_string();
    let href = scanned.dest;

    let from = p.options.filepath.clone();
    let context = p.line_context();
    let entry = if embed {
        Structure::Embed(EmbedEntry {
            start,
            end: construct_end,
            form: LinkForm::Md,
            href: href.clone(),
            text: Some(display.clone()),
            content_id: None,
            from,
            context,
        })
    } else {
        Structure::Link(LinkEntry {
            start,
            end: construct_end,
            form: LinkForm::Md,
            href: href.clone(),
            text: Some(display.clone()),
            content_id: None,
            from,
            context,
        })
    };
    p.push_structure(entry);

    let opening = p.cursor.slice(start..bracket_at + 1).to_string();
    p.asm.open_format(SpanAttr::Link { href });
    p.asm.add_marker(opening);
    let indent = p.stack.top().indent.clone();
    p.push_context(Context {
        kind: ContextKind::Inline,
        indent,
        rules: LINK_TEXT_RULES,
        exit: ExitAction::FinalizeLink,
        payload: ContextPayload::LinkText {
            close_at,
            construct_end,
        },
    });
    p.cursor.set_index(bracket_at + 1);
    true
}

/// Closer for a link display context, wiki and markdown alike: at the
/// precomputed close offset, emit the closing markup as a marker and
/// pop the context.
pub(crate) fn end(p: &mut Parser<'_>) -> bool {
    let (close_at, construct_end) = match p.stack.top().payload {
        ContextPayload::LinkText {
            close_at,
            construct_end,
        } => (close_at, construct_end),
        _ => return false,
    };
    if p.cursor.index() != close_at {
        return false;
    }
    let marker = p.cursor.slice(close_at..construct_end).to_string();
    p.asm.add_marker(marker);
    p.pop_context();
    p.cursor.set_index(construct_end);
    true
}

struct Scanned {
    /// Offset of the `]` closing the display text, relative to the `[`.
    close_at: usize,
    /// Offset just past the final `)`.
    end: usize,
    /// Destination between the parens, angle wrapper and quoted title
    /// stripped.
    dest: String,
}

/// Validate a whole `[...](...)` at the start of `rest` (which begins
/// with the `[`). Nested brackets and parens must balance, backslash
/// escapes are skipped, and parens inside quotes do not count.
fn scan_link(rest: &str) -> Option<Scanned> {
    let bytes = rest.as_bytes();
    let mut depth = 1usize;
    let mut i = 1;
    let close_at = loop {
        if i >= bytes.len() {
            return None;
        }
        match bytes[i] {
            b'\\' => i += 2,
            b'[' => {
                depth += 1;
                i += 1;
            }
            b']' => {
                depth -= 1;
                if depth == 0 {
                    break i;
                }
                i += 1;
            }
            _ => i += 1,
        }
    };

    if bytes.get(close_at + 1) != Some(&b'(') {
        return None;
    }
    let mut depth = 1usize;
    let mut quote: Option<u8> = None;
    let mut i = close_at + 2;
    let end = loop {
        if i >= bytes.len() {
            return None;
        }
        let b = bytes[i];
        match quote {
            Some(q) => match b {
                b'\\' => i += 2,
                _ if b == q => {
                    quote = None;
                    i += 1;
                }
                _ => i += 1,
            },
            None => match b {
                b'\\' => i += 2,
                b'"' | b'\'' => {
                    quote = Some(b);
                    i += 1;
                }
                b'(' => {
                    depth += 1;
                    i += 1;
                }
                b')' => {
                    depth -= 1;
                    if depth == 0 {
                        break i + 1;
                    }
                    i += 1;
                }
                _ => i += 1,
            },
        }
    };

    Some(Scanned {
        close_at,
        end,
        dest: parse_dest(&rest[close_at + 2..end - 1]),
    })
}

/// Extract the destination from the paren body: strip an `<...>`
/// wrapper and drop a quoted title after the destination.
fn parse_dest(inner: &str) -> String {
    let trimmed = inner.trim();
    if let Some(stripped) = trimmed.strip_prefix('<')
        && let Some(dest) = stripped.strip_suffix('>')
    {
        return dest.to_string();
    }
    if let Some(i) = trimmed.find(char::is_whitespace) {
        let tail = trimmed[i..].trim_start();
        if tail.starts_with('"') || tail.starts_with('\'') {
            return trimmed[..i].to_string();
        }
    }
    trimmed.to_string()
}
