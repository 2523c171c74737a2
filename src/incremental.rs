//! Window selection for incremental re-parses.
//!
//! After an edit the caller re-parses a window of lines around the
//! change and splices the result over the old ones. A window that cuts
//! through a fenced construct would re-read a stray fence line as an
//! opener, so the edited range is widened until neither edge sits
//! inside one. The fence roles recorded on the previous parse's lines
//! are all the evidence this needs.

use std::ops::Range;

use crate::line::{FenceRole, Line};

/// The fence role a line carries, if it belongs to a multi-line
/// construct at all.
fn fence_membership(line: &Line) -> Option<FenceRole> {
    line.attrs.iter().find_map(|attr| attr.fence_role())
}

fn inside_construct(lines: &[Line], index: usize) -> bool {
    matches!(
        lines.get(index).and_then(fence_membership),
        Some(FenceRole::Body | FenceRole::Close)
    )
}

/// Widens `edited` so no multi-line construct straddles its edges. The
/// result starts on a construct opener or a free line, and ends just
/// past a construct close or on a free line. Out-of-bounds input is
/// clamped.
pub fn reparse_range(lines: &[Line], edited: Range<usize>) -> Range<usize> {
    let mut start = edited.start.min(lines.len());
    let mut end = edited.end.clamp(start, lines.len());

    // Body and close lines belong to a construct opened further up;
    // slide the start onto its opener.
    while start > 0 && inside_construct(lines, start) {
        start -= 1;
    }
    // When the line after the window still belongs to a construct, the
    // window cuts it; take lines until the construct is over.
    while end < lines.len() && inside_construct(lines, end) {
        end += 1;
    }

    start..end
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::line::{LineAttr, LineAttrSet, Span};

    fn free_line() -> Line {
        Line {
            spans: vec![Span::plain("text")],
            attrs: LineAttrSet::new(),
        }
    }

    fn fence_line(role: FenceRole) -> Line {
        let mut attrs = LineAttrSet::new();
        attrs.insert(LineAttr::CodeFence {
            role,
            language: None,
        });
        Line {
            spans: vec![Span::plain("```")],
            attrs,
        }
    }

    fn block() -> Vec<Line> {
        vec![
            free_line(),                   // 0
            fence_line(FenceRole::Open),   // 1
            fence_line(FenceRole::Body),   // 2
            fence_line(FenceRole::Body),   // 3
            fence_line(FenceRole::Close),  // 4
            free_line(),                   // 5
        ]
    }

    #[test]
    fn free_lines_stay_put() {
        let lines = block();
        assert_eq!(reparse_range(&lines, 0..1), 0..1);
        assert_eq!(reparse_range(&lines, 5..6), 5..6);
        assert_eq!(reparse_range(&lines, 6..9), 6..6);
    }

    #[test]
    fn edits_inside_a_construct_take_all_of_it() {
        let lines = block();
        assert_eq!(reparse_range(&lines, 2..3), 1..5);
        assert_eq!(reparse_range(&lines, 4..5), 1..5);
        assert_eq!(reparse_range(&lines, 1..2), 1..5);
        assert_eq!(reparse_range(&lines, 0..6), 0..6);
    }

    #[test]
    fn adjacent_constructs_stay_separate() {
        let mut lines = block();
        lines.extend([
            fence_line(FenceRole::Open),  // 6
            fence_line(FenceRole::Body),  // 7
            fence_line(FenceRole::Close), // 8
        ]);
        assert_eq!(reparse_range(&lines, 5..6), 5..6);
        assert_eq!(reparse_range(&lines, 5..7), 5..9);
        assert_eq!(reparse_range(&lines, 3..4), 1..5);
    }
}
