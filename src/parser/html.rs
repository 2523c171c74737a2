//! Inline HTML fragments.
//!
//! An opening tag is claimed only when the whole tag scans cleanly on
//! one line and the tag name is known (or unknown names are allowed by
//! option). Void and self-closing tags consume just the tag text; any
//! other tag opens an element context that runs until the matching
//! close tag, so markup inside the element keeps being recognized.
//! Anything malformed leaves the `<` as plain text.

use crate::parser::Parser;
use crate::parser::context::{
    Context, ContextKind, ContextPayload, ExitAction, HTML_CONTENT_RULES,
};

/// Tag names recognized without `allow_unknown_html_tags`, sorted for
/// binary search.
const KNOWN_TAGS: &[&str] = &[
    "a", "abbr", "article", "aside", "audio", "b", "blockquote", "br", "button", "caption",
    "center", "cite", "code", "col", "colgroup", "dd", "details", "div", "dl", "dt", "em", "embed",
    "figcaption", "figure", "font", "footer", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hr",
    "i", "iframe", "img", "input", "ins", "kbd", "label", "li", "main", "mark", "nav", "ol", "p",
    "picture", "pre", "q", "s", "section", "select", "small", "source", "span", "strong", "sub",
    "summary", "sup", "table", "tbody", "td", "textarea", "tfoot", "th", "thead", "tr", "track",
    "u", "ul", "var", "video", "wbr",
];

/// Elements that never take content, claimed without opening a context.
const VOID_TAGS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

pub(crate) fn claim(p: &mut Parser<'_>) -> bool {
    if !matches!(p.cursor.current(), Some("<")) {
        return false;
    }
    let start = p.cursor.index();
    let line_end = p.line_end_offset();
    let rest = p.cursor.slice(start..line_end);
    let Some(tag) = scan_open_tag(rest) else {
        return false;
    };
    if !p.options.allow_unknown_html_tags && KNOWN_TAGS.binary_search(&tag.name.as_str()).is_err()
    {
        return false;
    }
    let marker = rest[..tag.len].to_string();
    let keeps_content = !tag.self_closing && !VOID_TAGS.contains(&tag.name.as_str());
    let indent = p.stack.top().indent.clone();
    p.asm.add_marker(marker);
    if keeps_content {
        p.push_context(Context {
            kind: ContextKind::Inline,
            indent,
            rules: HTML_CONTENT_RULES,
            exit: ExitAction::None,
            payload: ContextPayload::HtmlElement { name: tag.name },
        });
    }
    p.cursor.set_index(start + tag.len);
    true
}

pub(crate) fn close(p: &mut Parser<'_>) -> bool {
    if !matches!(p.cursor.current(), Some("<")) || !matches!(p.cursor.peek(1), Some("/")) {
        return false;
    }
    let name = match &p.stack.top().payload {
        ContextPayload::HtmlElement { name } => name.clone(),
        _ => return false,
    };
    let start = p.cursor.index();
    let line_end = p.line_end_offset();
    let rest = p.cursor.slice(start..line_end);
    let Some(len) = scan_close_tag(rest, &name) else {
        return false;
    };
    let marker = rest[..len].to_string();
    p.asm.add_marker(marker);
    p.pop_context();
    p.cursor.set_index(start + len);
    true
}

#[derive(Debug, PartialEq)]
struct OpenTag {
    /// Lowercased element name.
    name: String,
    /// Tag length in bytes, including the closing `>`.
    len: usize,
    self_closing: bool,
}

/// Scans `<name attr="value" ...>` from the start of `rest`. Attribute
/// values may be double-quoted, single-quoted, or bare.
fn scan_open_tag(rest: &str) -> Option<OpenTag> {
    let bytes = rest.as_bytes();
    let mut i = 1;
    if !bytes.get(i)?.is_ascii_alphabetic() {
        return None;
    }
    let name_start = i;
    while bytes
        .get(i)
        .is_some_and(|b| b.is_ascii_alphanumeric() || *b == b'-')
    {
        i += 1;
    }
    let name = rest[name_start..i].to_ascii_lowercase();

    loop {
        let before = i;
        while matches!(bytes.get(i).copied(), Some(b' ' | b'\t')) {
            i += 1;
        }
        match bytes.get(i).copied()? {
            b'>' => {
                return Some(OpenTag {
                    name,
                    len: i + 1,
                    self_closing: false,
                });
            }
            b'/' if bytes.get(i + 1).copied() == Some(b'>') => {
                return Some(OpenTag {
                    name,
                    len: i + 2,
                    self_closing: true,
                });
            }
            _ if i > before => i = scan_attribute(bytes, i)?,
            _ => return None,
        }
    }
}

/// One attribute starting at `i`, returning the position after it.
fn scan_attribute(bytes: &[u8], mut i: usize) -> Option<usize> {
    if !bytes.get(i)?.is_ascii_alphabetic() {
        return None;
    }
    while bytes
        .get(i)
        .is_some_and(|b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b':' | b'_'))
    {
        i += 1;
    }
    if bytes.get(i).copied() != Some(b'=') {
        return Some(i);
    }
    i += 1;
    match bytes.get(i).copied()? {
        quote @ (b'"' | b'\'') => {
            i += 1;
            while bytes.get(i).is_some_and(|b| *b != quote) {
                i += 1;
            }
            if bytes.get(i).copied() != Some(quote) {
                return None;
            }
            Some(i + 1)
        }
        _ => {
            let start = i;
            while bytes
                .get(i)
                .is_some_and(|b| !matches!(b, b' ' | b'\t' | b'>' | b'/'))
            {
                i += 1;
            }
            (i > start).then_some(i)
        }
    }
}

/// Scans `</name>` at the start of `rest`, matching the element name
/// case-insensitively.
fn scan_close_tag(rest: &str, name: &str) -> Option<usize> {
    let bytes = rest.as_bytes();
    let end = 2 + name.len();
    if bytes.len() < end || !bytes[2..end].eq_ignore_ascii_case(name.as_bytes()) {
        return None;
    }
    let mut i = end;
    while matches!(bytes.get(i).copied(), Some(b' ' | b'\t')) {
        i += 1;
    }
    (bytes.get(i).copied() == Some(b'>')).then_some(i + 1)
}
