//! YAML front matter: the data structure, error reporting, and the
//! boundary against horizontal rules.

use serde_json::json;

use crate::line::{FenceRole, LineKey, SpanKey};
use crate::parser::Severity;
use crate::structure::{FrontMatterEntry, Structure};

use super::parse;

#[test]
fn parsed_data_lands_in_the_structure() {
    let output = parse("---\ntitle: Note\n---\nbody");
    assert_eq!(
        output.structure,
        vec![Structure::FrontMatter(FrontMatterEntry {
            start: 0,
            end: 19,
            data: Some(json!({ "title": "Note" })),
        })]
    );
    assert!(output.errors.is_empty());
}

#[test]
fn block_lines_carry_their_roles() {
    let output = parse("---\ntitle: Note\n---\nbody");
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
            Some(FenceRole::Close),
            None,
        ]
    );
}

#[test]
fn duplicate_keys_error_once_and_null_the_data() {
    let output = parse("---\na: 1\na: 2\n---");

    assert_eq!(output.errors.len(), 1);
    let issue = &output.errors[0];
    assert_eq!(issue.severity, Severity::Error);
    assert_eq!((issue.start, issue.end), (4, 13));

    assert_eq!(output.structure.len(), 1);
    let Structure::FrontMatter(entry) = &output.structure[0] else {
        panic!("expected front matter");
    };
    assert_eq!(entry.data, None);

    // The offending body line is annotated inline.
    let annotated = output.lines.iter().any(|line| {
        line.spans
            .iter()
            .any(|span| span.attrs.contains(SpanKey::Error))
    });
    assert!(annotated);
}

#[test]
fn dots_close_the_block_too() {
    let output = parse("---\na: 1\n...\nafter");
    let Structure::FrontMatter(entry) = &output.structure[0] else {
        panic!("expected front matter");
    };
    assert_eq!(entry.data, Some(json!({ "a": 1 })));
    assert_eq!(entry.end, 12);
}

#[test]
fn an_empty_block_is_null_without_an_error() {
    let output = parse("---\n---\nx");
    let Structure::FrontMatter(entry) = &output.structure[0] else {
        panic!("expected front matter");
    };
    assert_eq!(entry.data, Some(serde_json::Value::Null));
    assert!(output.errors.is_empty());
}

#[test]
fn a_lone_ruler_is_not_front_matter() {
    let output = parse("---");
    assert!(output.structure.is_empty());
    assert!(output.lines[0].attrs.contains(LineKey::HorizontalRule));
}

#[test]
fn an_unclosed_opener_is_a_ruler_too() {
    let output = parse("---\ntext");
    assert!(output.structure.is_empty());
    assert!(output.lines[0].attrs.contains(LineKey::HorizontalRule));
    assert!(!output.lines[1].attrs.contains(LineKey::FrontMatter));
}

#[test]
fn only_the_document_start_counts() {
    let output = parse("x\n\n---\na: 1\n---");
    assert!(
        output
            .structure
            .iter()
            .all(|s| !matches!(s, Structure::FrontMatter(_)))
    );
}
