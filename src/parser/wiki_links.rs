//! Wiki links: `[[target]]`, `[[target|display]]`, `[[target#anchor]]`,
//! `[[target#^block]]`, and the `![[...]]` embed form. A link claims
//! only when its `]]` closes on the same line; otherwise the brackets
//! stay plain text. Display text is parsed in a pushed inline context
//! so it can carry emphasis of its own.

use crate::line::{AttrSet, SpanAttr, SpanKey};
use crate::parser::context::{
    Context, ContextKind, ContextPayload, ExitAction, LINK_TEXT_RULES,
};
use crate::parser::Parser;
use crate::structure::{EmbedEntry, LinkEntry, LinkForm, Structure};

pub(crate) fn claim(p: &mut Parser<'_>) -> bool {
    let (embed, open_len) = match p.cursor.current() {
        Some("[") => (false, 2),
        Some("!") => (true, 3),
        _ => return false,
    };
    if !p.cursor.check_for(if embed { "![[" } else { "[[" }, false) {
        return false;
    }

    let start = p.cursor.index();
    let inner_start = start + open_len;
    let line_end = p.line_end_offset();
    if inner_start >= line_end {
        return false;
    }
    let rest = p.cursor.slice(inner_start..line_end);
    let Some(close_rel) = find_close(rest) else {
        return false;
    };
    if close_rel == 0 {
        // `[[]]` carries no target.
        return false;
    }
    let close_at = inner_start + close_rel;
    let construct_end = close_at + 2;

    let inner = &rest[..close_rel];
    let (target, display) = match inner.find('|') {
        Some(i) => (&inner[..i], Some(inner[i + 1..].to_string())),
        None => (inner, None),
    };
    let (href, content_id) = match target.find('#') {
        Some(i) => (
            target[..i].to_string(),
            Some(target[i + 1..].to_string()),
        ),
        None => (target.to_string(), None),
    };
    let span_href = target.to_string();
    let inner = inner.to_string();

    let from = p.options.filepath.clone();
    let context = p.line_context();
    let entry = if embed {
        Structure::Embed(EmbedEntry {
            start,
            end: construct_end,
            form: LinkForm::Wiki,
            href,
            text: display.clone(),
            content_id,
            from,
            context,
        })
    } else {
        Structure::Link(LinkEntry {
            start,
            end: construct_end,
            form: LinkForm::Wiki,
            href,
            text: display.clone(),
            content_id,
            from,
            context,
        })
    };
    p.push_structure(entry);

    match display {
        Some(display) => {
            // Everything up to the display text is markup; the display
            // itself parses in its own inline context and the context's
            // closer emits the `]]`.
            let display_start = close_at - display.len();
            let opening = p.cursor.slice(start..display_start).to_string();
            p.asm.open_format(SpanAttr::Link { href: span_href });
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
            p.cursor.set_index(display_start);
        }
        None => {
            let open_marker = p.cursor.slice(start..inner_start).to_string();
            p.asm.open_format(SpanAttr::Link { href: span_href });
            p.asm.add_marker(open_marker);
            p.asm.add_span(inner, AttrSet::new());
            p.asm.add_marker("]]");
            p.asm.drop_format(SpanKey::Link);
            p.cursor.set_index(construct_end);
        }
    }
    true
}

/// Offset of the first unescaped `]]` in `rest`.
fn find_close(rest: &str) -> Option<usize> {
    let bytes = rest.as_bytes();
    let mut i = 0;
    while i + 1 < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b']' if bytes[i + 1] == b']' => return Some(i),
            _ => i += 1,
        }
    }
    None
}
