//! Inline code spans: a backtick run closed by a run of the same
//! length on the same line.

use crate::line::{AttrSet, SpanAttr, SpanKey};
use crate::parser::Parser;

pub(crate) fn claim(p: &mut Parser<'_>) -> bool {
    if !matches!(p.cursor.current(), Some("`")) {
        return false;
    }
    let fence = p.cursor.consume_while(|c| c == "`");
    let n = fence.len();
    let inner_start = p.cursor.index();
    let line_end = p.line_end_offset();
    let close = find_close(p.cursor.slice(inner_start..line_end), n);

    match close {
        Some(rel) => {
            let close_start = inner_start + rel;
            let inner = p.cursor.slice(inner_start..close_start).to_string();
            p.asm.open_format(SpanAttr::Code);
            p.asm.add_marker(fence.as_str());
            p.asm.add_span(inner, AttrSet::new());
            p.asm.add_marker(fence.as_str());
            p.asm.drop_format(SpanKey::Code);
            p.cursor.set_index(close_start + n);
        }
        None => {
            // No closing run on this line; the backticks stay literal.
            p.asm.push_text(&fence);
        }
    }
    true
}

/// Offset of the first backtick run of exactly `n` backticks in
/// `rest`, skipping runs of any other length.
fn find_close(rest: &str, n: usize) -> Option<usize> {
    let bytes = rest.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'`' {
            let run_start = i;
            while i < bytes.len() && bytes[i] == b'`' {
                i += 1;
            }
            if i - run_start == n {
                return Some(run_start);
            }
        } else {
            i += 1;
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn close_run_must_match_length() {
        assert_eq!(find_close("a`b", 1), Some(1));
        assert_eq!(find_close("a``b`c", 1), Some(4));
        assert_eq!(find_close("a``b", 2), Some(1));
        assert_eq!(find_close("a``b", 1), None);
        assert_eq!(find_close("plain", 1), None);
    }
}
