//! List items and to-dos: an indent, a glyph (`-`, `*`, `+`) or
//! ordinal (`1.`, `a.`, `A.`) marker plus a space, then an optional
//! `[ ]`/`[x]`/`[-]` checkbox. The checkbox makes the item a to-do and
//! emits a structure entry; the remainder of the line parses inline.

use crate::line::{LineAttr, ListDefinition, ListMarker};
use crate::parser::Parser;
use crate::structure::{Structure, TodoEntry, TodoState};

pub(crate) fn claim(p: &mut Parser<'_>) -> bool {
    if !p.at_content_start() {
        return false;
    }
    let start = p.cursor.index();
    let line_end = p.line_end_offset();
    let rest = p.cursor.slice(start..line_end);

    let Some((marker, marker_len)) = parse_marker(rest) else {
        return false;
    };

    let mut consumed = marker_len;
    let mut todo = None;
    let mut todo_text = String::new();
    if let Some((state, checkbox_len)) = parse_checkbox(&rest[marker_len..]) {
        consumed += checkbox_len;
        todo = Some(state);
        todo_text = rest[consumed..].trim().to_string();
    }
    let marker_text = rest[..consumed].to_string();
    let indent = p.line_indent.len();

    if let Some(state) = todo {
        p.push_structure(Structure::Todo(TodoEntry {
            start,
            end: line_end,
            state,
            text: todo_text,
        }));
    }
    p.asm.add_marker(marker_text);
    p.asm.set_line_attr(LineAttr::List {
        definition: ListDefinition {
            marker,
            indent,
            todo,
        },
    });
    p.cursor.set_index(start + consumed);
    true
}

/// Recognize the list glyph or ordinal at the start of `rest`; the
/// returned length includes the required following space.
fn parse_marker(rest: &str) -> Option<(ListMarker, usize)> {
    let bytes = rest.as_bytes();
    match bytes.first()? {
        b'-' | b'*' | b'+' if bytes.get(1) == Some(&b' ') => {
            let marker = match bytes[0] {
                b'-' => ListMarker::Dash,
                b'*' => ListMarker::Star,
                _ => ListMarker::Plus,
            };
            Some((marker, 2))
        }
        b'0'..=b'9' => {
            let digits = rest.bytes().take_while(|b| b.is_ascii_digit()).count();
            if bytes.get(digits) != Some(&b'.') || bytes.get(digits + 1) != Some(&b' ') {
                return None;
            }
            let n: u32 = rest[..digits].parse().ok()?;
            Some((ListMarker::Number(n), digits + 2))
        }
        c if c.is_ascii_alphabetic() => {
            if bytes.get(1) == Some(&b'.') && bytes.get(2) == Some(&b' ') {
                Some((ListMarker::Letter(*c as char), 3))
            } else {
                None
            }
        }
        _ => None,
    }
}

/// Recognize a checkbox right after the list marker. The returned
/// length includes the following space when there is one; a checkbox
/// followed by anything else is not a checkbox.
fn parse_checkbox(rest: &str) -> Option<(TodoState, usize)> {
    let bytes = rest.as_bytes();
    if bytes.first() != Some(&b'[') || bytes.get(2) != Some(&b']') {
        return None;
    }
    let state = match bytes.get(1)? {
        b' ' => TodoState::Open,
        b'x' | b'X' => TodoState::Checked,
        b'-' => TodoState::Canceled,
        _ => return None,
    };
    match bytes.get(3) {
        None => Some((state, 3)),
        Some(&b' ') => Some((state, 4)),
        Some(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn markers() {
        assert_eq!(parse_marker("- item"), Some((ListMarker::Dash, 2)));
        assert_eq!(parse_marker("* item"), Some((ListMarker::Star, 2)));
        assert_eq!(parse_marker("+ item"), Some((ListMarker::Plus, 2)));
        assert_eq!(parse_marker("12. item"), Some((ListMarker::Number(12), 4)));
        assert_eq!(parse_marker("a. item"), Some((ListMarker::Letter('a'), 3)));
        assert_eq!(parse_marker("A. item"), Some((ListMarker::Letter('A'), 3)));
        assert_eq!(parse_marker("-item"), None);
        assert_eq!(parse_marker("12 item"), None);
        assert_eq!(parse_marker("ab. item"), None);
        assert_eq!(parse_marker(""), None);
    }

    #[test]
    fn checkboxes() {
        assert_eq!(parse_checkbox("[ ] x"), Some((TodoState::Open, 4)));
        assert_eq!(parse_checkbox("[x] x"), Some((TodoState::Checked, 4)));
        assert_eq!(parse_checkbox("[X] x"), Some((TodoState::Checked, 4)));
        assert_eq!(parse_checkbox("[-] x"), Some((TodoState::Canceled, 4)));
        assert_eq!(parse_checkbox("[ ]"), Some((TodoState::Open, 3)));
        assert_eq!(parse_checkbox("[?] x"), None);
        assert_eq!(parse_checkbox("[x]x"), None);
        assert_eq!(parse_checkbox("no box"), None);
    }
}
