//! Fenced code blocks and the syntax source seam.

use crate::config::ParseOptions;
use crate::line::{FenceRole, Line, LineAttr, SpanKey};
use crate::parser::{ParseOutput, Parser};
use crate::syntax::{SyntaxSource, SyntaxToken, TokenizeResult};

use super::{parse, span_shape};

/// Marks every `fn` in a `mini` body as a keyword. `slow` never
/// finishes loading; anything else is unsupported.
struct KeywordSource;

impl SyntaxSource for KeywordSource {
    fn tokenize(&self, language: &str, text: &str) -> TokenizeResult {
        match language {
            "mini" => TokenizeResult::Tokens(
                text.match_indices("fn")
                    .map(|(at, hit)| SyntaxToken {
                        start: at,
                        end: at + hit.len(),
                        scope: "keyword".to_string(),
                    })
                    .collect(),
            ),
            "slow" => TokenizeResult::Loading,
            _ => TokenizeResult::Unsupported,
        }
    }
}

/// Covers any body with a single token spanning all of it.
struct BlanketSource;

impl SyntaxSource for BlanketSource {
    fn tokenize(&self, _language: &str, text: &str) -> TokenizeResult {
        TokenizeResult::Tokens(vec![SyntaxToken {
            start: 0,
            end: text.len(),
            scope: "string".to_string(),
        }])
    }
}

fn parse_highlighted(text: &str) -> ParseOutput {
    let options = ParseOptions::default();
    let source = KeywordSource;
    Parser::new(text, &options).syntax_source(&source).parse()
}

fn fence_role(line: &Line) -> Option<FenceRole> {
    line.attrs.iter().find_map(|attr| match attr {
        LineAttr::CodeFence { role, .. } => Some(*role),
        _ => None,
    })
}

#[test]
fn bodies_pick_up_tokens_from_the_source() {
    let output = parse_highlighted("```mini\nfn a\nno\nfn b\n```");
    assert!(output.awaiting.is_empty());
    assert_eq!(
        span_shape(&output.lines[1]),
        vec![("fn", vec![SpanKey::Token]), (" a", vec![])]
    );
    assert_eq!(span_shape(&output.lines[2]), vec![("no", vec![])]);
    assert_eq!(
        span_shape(&output.lines[3]),
        vec![("fn", vec![SpanKey::Token]), (" b", vec![])]
    );
}

#[test]
fn tokens_spanning_line_breaks_are_clipped_per_line() {
    let options = ParseOptions::default();
    let source = BlanketSource;
    let output = Parser::new("```x\nab\ncd\n```", &options)
        .syntax_source(&source)
        .parse();

    assert_eq!(
        span_shape(&output.lines[1]),
        vec![("ab", vec![SpanKey::Token])]
    );
    assert_eq!(
        span_shape(&output.lines[2]),
        vec![("cd", vec![SpanKey::Token])]
    );
}

#[test]
fn loading_languages_land_in_awaiting_once() {
    let output = parse_highlighted("```slow\na\n```\n\n```slow\nb\n```");
    assert_eq!(output.awaiting, vec!["slow".to_string()]);
    // Bodies stay unformatted until the tokenizer arrives.
    assert_eq!(span_shape(&output.lines[1]), vec![("a", vec![])]);
    assert_eq!(span_shape(&output.lines[5]), vec![("b", vec![])]);
}

#[test]
fn unknown_languages_stay_plain() {
    let output = parse_highlighted("```elvish\nx\n```");
    assert!(output.awaiting.is_empty());
    assert_eq!(span_shape(&output.lines[1]), vec![("x", vec![])]);
}

#[test]
fn bare_fences_skip_the_source() {
    let options = ParseOptions::default();
    let source = BlanketSource;
    let output = Parser::new("```\nfn a\n```", &options)
        .syntax_source(&source)
        .parse();
    assert_eq!(span_shape(&output.lines[1]), vec![("fn a", vec![])]);
}

#[test]
fn close_fences_match_char_and_length() {
    for text in ["````\n```\n````", "```\n~~~\n```", "~~~\n```\n~~~"] {
        let output = parse(text);
        let roles: Vec<_> = output.lines.iter().map(fence_role).collect();
        assert_eq!(
            roles,
            vec![
                Some(FenceRole::Open),
                Some(FenceRole::Body),
                Some(FenceRole::Close),
            ],
            "input: {text:?}",
        );
    }

    // A longer run still closes.
    let output = parse("```\ncode\n`````");
    assert_eq!(fence_role(&output.lines[2]), Some(FenceRole::Close));
}

#[test]
fn open_blocks_swallow_the_rest_of_the_document() {
    let output = parse_highlighted("```mini\nfn a");
    assert_eq!(output.lines.len(), 2);
    assert_eq!(fence_role(&output.lines[1]), Some(FenceRole::Body));
    assert_eq!(
        span_shape(&output.lines[1]),
        vec![("fn", vec![SpanKey::Token]), (" a", vec![])]
    );
    assert!(output.errors.is_empty());
}

#[test]
fn info_strings_with_backticks_are_not_fences() {
    let output = parse("``` a`b\nplain");
    assert!(output.lines.iter().all(|line| fence_role(line).is_none()));
}

#[test]
fn language_is_the_first_info_word() {
    let output = parse("```rust linenums\nlet x = 1;\n```");
    let language = output.lines[0].attrs.iter().find_map(|attr| match attr {
        LineAttr::CodeFence { language, .. } => language.clone(),
        _ => None,
    });
    assert_eq!(language.as_deref(), Some("rust"));
}

#[test]
fn markup_inside_bodies_stays_literal() {
    let output = parse("```\n# not a header\n[[not a link]]\n```");
    assert_eq!(span_shape(&output.lines[1]), vec![("# not a header", vec![])]);
    assert_eq!(span_shape(&output.lines[2]), vec![("[[not a link]]", vec![])]);
    assert!(output.structure.is_empty());
}
