//! Horizontal rules: a line of three or more `-`, `*`, or `_`, spaces
//! allowed in between. Claims the whole line.

use crate::line::LineAttr;
use crate::parser::Parser;

pub(crate) fn claim(p: &mut Parser<'_>) -> bool {
    if !p.at_content_start() {
        return false;
    }
    let start = p.cursor.index();
    let line_end = p.line_end_offset();
    let rest = p.cursor.slice(start..line_end);
    if rest.is_empty() {
        return false;
    }

    let glyph = rest.as_bytes()[0];
    if !matches!(glyph, b'-' | b'*' | b'_') {
        return false;
    }
    let mut count = 0;
    for b in rest.bytes() {
        if b == glyph {
            count += 1;
        } else if b != b' ' && b != b'\t' {
            return false;
        }
    }
    if count < 3 {
        return false;
    }

    let marker = rest.to_string();
    p.asm.add_marker(marker);
    p.asm.set_line_attr(LineAttr::HorizontalRule);
    p.cursor.set_index(line_end);
    true
}
