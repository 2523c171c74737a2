//! Window parses: line ranges, feeder-backed extension past the window
//! end, and picking a safe window with [`reparse_range`].

use crate::config::ParseOptions;
use crate::incremental::reparse_range;
use crate::line::FenceRole;
use crate::parser::Parser;
use crate::structure::{LinkForm, Structure};

use super::parse;

fn window(lines: &[&str], range: std::ops::Range<usize>) -> crate::parser::ParseOutput {
    let options = ParseOptions::default();
    Parser::window(lines, range, &options).parse()
}

#[test]
fn output_carries_the_window_start() {
    let lines = ["# One", "", "two"];
    let output = window(&lines, 1..3);
    assert_eq!(output.start_line_index, Some(1));
    assert_eq!(output.lines.len(), 2);

    let full = parse("# One\n\ntwo");
    assert_eq!(full.start_line_index, None);
}

#[test]
fn offsets_are_relative_to_the_window() {
    let lines = ["before", "[[A]]"];
    let output = window(&lines, 1..2);

    let Some(Structure::Link(entry)) = output.structure.first() else {
        panic!("expected a link");
    };
    assert_eq!((entry.start, entry.end), (0, 5));
    assert_eq!(entry.form, LinkForm::Wiki);
}

#[test]
fn open_fences_pull_lines_past_the_window() {
    let lines = ["```", "a", "b", "```", "tail"];
    let output = window(&lines, 0..2);

    // The block runs to its close fence, and not a line further.
    assert_eq!(output.lines.len(), 4);
    let roles: Vec<_> = output
        .lines
        .iter()
        .map(|line| line.attrs.iter().find_map(|a| a.fence_role()))
        .collect();
    assert_eq!(
        roles,
        vec![
            Some(FenceRole::Open),
            Some(FenceRole::Body),
            Some(FenceRole::Body),
            Some(FenceRole::Close),
        ]
    );
}

#[test]
fn a_window_after_one_block_leaves_the_next_alone() {
    let lines = ["```", "one", "```", "", "```", "two", "```"];
    let output = window(&lines, 0..2);

    assert_eq!(output.lines.len(), 3);
    assert_eq!(output.lines[2].text(), "```");

    let output = window(&lines, 0..3);
    assert_eq!(output.lines.len(), 3);
}

#[test]
fn exhausted_feeders_end_the_block_at_the_document_end() {
    let lines = ["```", "a"];
    let output = window(&lines, 0..1);

    assert_eq!(output.lines.len(), 2);
    assert_eq!(
        output.lines[1]
            .attrs
            .iter()
            .find_map(|a| a.fence_role()),
        Some(FenceRole::Body)
    );
}

#[test]
fn math_blocks_extend_like_code_blocks() {
    let lines = ["$$", "E = mc^2", "$$", "after"];
    let output = window(&lines, 0..1);
    assert_eq!(output.lines.len(), 3);
}

#[test]
fn reparse_range_picks_a_self_contained_window() {
    let text = "# head\n```\ncode\n```\ntail";
    let full = parse(text);

    let range = reparse_range(&full.lines, 2..3);
    assert_eq!(range, 1..4);

    let lines: Vec<&str> = text.lines().collect();
    let options = ParseOptions::default();
    let output = Parser::window(&lines, range, &options).parse();
    assert_eq!(output.start_line_index, Some(1));
    assert_eq!(output.lines.len(), 3);
    assert_eq!(output.lines[2].text(), "```");
}

#[test]
fn front_matter_only_opens_at_the_document_start() {
    let lines = ["---", "a: 1", "---", "body"];

    let output = window(&lines, 0..1);
    assert_eq!(output.lines.len(), 3);
    assert!(matches!(
        output.structure.first(),
        Some(Structure::FrontMatter(_))
    ));

    let output = window(&lines, 2..4);
    assert!(output.structure.is_empty());
}

#[test]
fn ranges_clamp_to_the_document() {
    let lines = ["a", "b"];

    let output = window(&lines, 1..9);
    assert_eq!(output.start_line_index, Some(1));
    assert_eq!(output.lines.len(), 1);
    assert_eq!(output.lines[0].text(), "b");

    let output = window(&lines, 5..9);
    assert_eq!(output.start_line_index, Some(2));
    assert_eq!(output.lines.len(), 1);
    assert!(output.lines[0].is_empty());
}
