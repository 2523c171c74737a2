//! Blockquotes: a `>` run at the start of content, one level per `>`.
//! Quoting is a per-line mark, not a context; the rest of the line
//! parses as usual.

use crate::line::LineAttr;
use crate::parser::Parser;

pub(crate) fn claim(p: &mut Parser<'_>) -> bool {
    if !p.at_content_start() || !matches!(p.cursor.current(), Some(">")) {
        return false;
    }
    let start = p.cursor.index();
    let line_end = p.line_end_offset();
    let rest = p.cursor.slice(start..line_end);
    let bytes = rest.as_bytes();

    let mut depth = 0u8;
    let mut len = 0;
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'>' {
            depth = depth.saturating_add(1);
            i += 1;
            len = i;
        } else if bytes[i] == b' ' && bytes.get(i + 1) == Some(&b'>') {
            i += 1;
        } else {
            break;
        }
    }
    // One space after the last angle belongs to the marker.
    if bytes.get(len) == Some(&b' ') {
        len += 1;
    }

    let marker = rest[..len].to_string();
    p.asm.add_marker(marker);
    p.asm.set_line_attr(LineAttr::Quote { depth });
    p.cursor.set_index(start + len);
    true
}
