//! Toggle rules for the symmetric inline delimiters: emphasis and
//! strong (`*`, `_`), strikethrough (`~~`), and highlight (`==` or the
//! crayon emoji).
//!
//! A delimiter claims only when it touches text on the side it is
//! claiming for: an opener needs a non-blank cluster after its run, a
//! closer a non-blank cluster before it. Everything else falls through
//! to plain text. Scopes still open when the line ends are dropped by
//! the line build, so none of these formats leak across lines.

use crate::line::{SpanAttr, SpanKey};
use crate::parser::Parser;
use crate::utils::{is_word_cluster, touches_text};

/// `*` and `_` toggle emphasis; a doubled run toggles strong.
pub(crate) fn emphasis(p: &mut Parser<'_>) -> bool {
    let Some(delim) = p.cursor.current() else {
        return false;
    };
    if delim != "*" && delim != "_" {
        return false;
    }
    let delim = delim.to_string();
    let doubled = p.cursor.peek(1).is_some_and(|c| c == delim);
    let len = if doubled { 2 } else { 1 };

    // Underscores inside a word stay literal unless the option turns
    // them on: `snake_case` carries no emphasis.
    if delim == "_"
        && !p.options.inter_text_underscores
        && p.cursor.prev_cluster().is_some_and(is_word_cluster)
        && p.cursor.peek(len).is_some_and(is_word_cluster)
    {
        return false;
    }

    if doubled && toggle(p, SpanAttr::Strong, &delim.repeat(2), 2) {
        return true;
    }
    // A doubled run that cannot toggle strong may still close an open
    // emphasis with its first delimiter, but it never opens one against
    // its own second delimiter.
    if doubled && !p.asm.has_format(SpanKey::Emphasis) {
        return false;
    }
    toggle(p, SpanAttr::Emphasis, &delim, 1)
}

/// `~~` toggles strikethrough.
pub(crate) fn strike(p: &mut Parser<'_>) -> bool {
    if !matches!(p.cursor.current(), Some("~")) || !matches!(p.cursor.peek(1), Some("~")) {
        return false;
    }
    toggle(p, SpanAttr::Strike, "~~", 2)
}

/// `==` or the crayon emoji toggles highlight.
pub(crate) fn highlight(p: &mut Parser<'_>) -> bool {
    match p.cursor.current() {
        Some("=") => {
            if !matches!(p.cursor.peek(1), Some("=")) {
                return false;
            }
            toggle(p, SpanAttr::Highlight, "==", 2)
        }
        Some(crayon @ ("🖍" | "🖍️")) => {
            let marker = crayon.to_string();
            toggle(p, SpanAttr::Highlight, &marker, 1)
        }
        _ => false,
    }
}

/// Flip one format: close it when it is open and the run touches text
/// on the left, open it when it is closed and the run touches text on
/// the right. The delimiter run itself becomes a marker span inside
/// the scope, so both markers render with the format they delimit.
fn toggle(p: &mut Parser<'_>, attr: SpanAttr, marker: &str, len: isize) -> bool {
    let key = attr.key();
    if p.asm.has_format(key) {
        if !touches_text(p.cursor.prev_cluster()) {
            return false;
        }
        p.asm.add_marker(marker);
        p.asm.drop_format(key);
    } else {
        if !touches_text(p.cursor.peek(len)) {
            return false;
        }
        p.asm.open_format(attr);
        p.asm.add_marker(marker);
    }
    p.cursor.step(len);
    true
}
