//! Headers: a `#` run at the start of content, level equal to the run
//! length. The rest of the line still gets inline parsing.

use crate::line::LineAttr;
use crate::parser::Parser;
use crate::structure::{HeaderEntry, Structure};

pub(crate) fn claim(p: &mut Parser<'_>) -> bool {
    if !p.at_content_start() || !matches!(p.cursor.current(), Some("#")) {
        return false;
    }
    let start = p.cursor.index();
    let line_end = p.line_end_offset();
    let rest = p.cursor.slice(start..line_end);
    let run = rest.bytes().take_while(|&b| b == b'#').count();

    // Without a space (or line end) after the run this is tag
    // territory, not a header.
    let after = &rest[run..];
    if !after.is_empty() && !after.starts_with(' ') {
        return false;
    }

    let marker_len = if after.starts_with(' ') { run + 1 } else { run };
    let marker = rest[..marker_len].to_string();
    let text = rest[marker_len..].trim().to_string();
    let level = run.min(u8::MAX as usize) as u8;

    p.asm.add_marker(marker);
    p.asm.set_line_attr(LineAttr::Header { level });
    p.push_structure(Structure::Header(HeaderEntry {
        start,
        end: line_end,
        level,
        text,
    }));
    p.cursor.set_index(start + marker_len);
    true
}
