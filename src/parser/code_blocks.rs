//! Fenced code blocks.
//!
//! A fence line opens a block context that swallows everything up to a
//! matching close fence (or the end of input). Body lines are emitted
//! as plain text first; once the block closes and the language is
//! known, the body is handed to the [`SyntaxSource`] and the already
//! built lines are rewritten with token scopes.
//!
//! [`SyntaxSource`]: crate::syntax::SyntaxSource

use log::debug;

use crate::line::{AttrSet, FenceRole, LineAttr, LineKey, Span, SpanAttr};
use crate::parser::Parser;
use crate::parser::context::{
    CODE_BLOCK_RULES, Context, ContextKind, ContextPayload, ExitAction,
};
use crate::syntax::{SyntaxToken, TokenizeResult};

pub(crate) fn open(p: &mut Parser<'_>) -> bool {
    if !p.at_content_start() || !matches!(p.cursor.current(), Some("`" | "~")) {
        return false;
    }
    let start = p.cursor.index();
    let line_end = p.line_end_offset();
    let rest = p.cursor.slice(start..line_end);
    let glyph = rest.as_bytes()[0];
    let run = rest.bytes().take_while(|&b| b == glyph).count();
    if run < 3 {
        return false;
    }
    let info = &rest[run..];
    // A backtick in the info string means this is not a fence line.
    if glyph == b'`' && info.contains('`') {
        return false;
    }
    let fence = rest[..run].to_string();
    let language = info.split_whitespace().next().map(str::to_string);
    let marker = rest.to_string();

    let body_start = line_end + p.break_len_at(line_end);
    let first_body_line = p.asm.line_count() + 1;
    p.asm.add_marker(marker);
    p.asm.set_line_attr(LineAttr::CodeFence {
        role: FenceRole::Open,
        language: language.clone(),
    });
    p.asm.open_line_format(LineAttr::CodeFence {
        role: FenceRole::Body,
        language: language.clone(),
    });
    let indent = p.line_indent.clone();
    p.push_context(Context {
        kind: ContextKind::Block,
        indent,
        rules: CODE_BLOCK_RULES,
        exit: ExitAction::FinalizeCode,
        payload: ContextPayload::Code {
            fence,
            language,
            body_start,
            first_body_line,
        },
    });
    p.cursor.set_index(line_end);
    true
}

pub(crate) fn close(p: &mut Parser<'_>) -> bool {
    if !p.at_content_start() {
        return false;
    }
    let (fence, language) = match &p.stack.top().payload {
        ContextPayload::Code {
            fence, language, ..
        } => (fence.clone(), language.clone()),
        _ => return false,
    };
    let start = p.cursor.index();
    let line_end = p.line_end_offset();
    let rest = p.cursor.slice(start..line_end);
    let glyph = fence.as_bytes()[0];
    let run = rest.bytes().take_while(|&b| b == glyph).count();
    // The close fence must be at least as long as the opener and carry
    // nothing but trailing whitespace.
    if run < fence.len() || !rest[run..].trim().is_empty() {
        return false;
    }
    let marker = rest.to_string();
    p.pop_context();
    p.asm.add_marker(marker);
    p.asm.set_line_attr(LineAttr::CodeFence {
        role: FenceRole::Close,
        language,
    });
    p.cursor.set_index(line_end);
    true
}

/// Runs when the code context pops, on the close fence, an indent
/// break, or the end of input. Drops the body line format and, when a
/// tokenizer is available, rewrites the body lines with token scopes.
pub(crate) fn finalize(p: &mut Parser<'_>, payload: ContextPayload) {
    let ContextPayload::Code {
        language,
        body_start,
        first_body_line,
        ..
    } = payload
    else {
        return;
    };
    p.asm.drop_line_format(LineKey::CodeFence);
    let Some(language) = language else {
        return;
    };
    let body_end = p.construct_body_end(body_start);
    let body = p.cursor.slice(body_start..body_end).to_string();
    match p.syntax.tokenize(&language, &body) {
        TokenizeResult::Tokens(tokens) => {
            debug!("tokenized {} bytes of {language}", body.len());
            rewrite_body(p, first_body_line, &tokens);
        }
        TokenizeResult::Loading => p.push_awaiting(language),
        TokenizeResult::Unsupported => {}
    }
}

/// Replaces the spans of every body line with token-scoped spans.
/// Token offsets are relative to the body, which the lines reproduce
/// joined by single line feeds.
fn rewrite_body(p: &mut Parser<'_>, first_body_line: usize, tokens: &[SyntaxToken]) {
    let mut offset = 0;
    for index in first_body_line..p.asm.line_count() {
        let text = p.asm.line(index).text();
        let spans = split_by_tokens(&text, offset, tokens);
        p.asm.rewrite_line(index, spans);
        offset += text.len() + 1;
    }
}

fn split_by_tokens(line: &str, line_offset: usize, tokens: &[SyntaxToken]) -> Vec<Span> {
    let line_end = line_offset + line.len();
    let mut spans = Vec::new();
    let mut at = line_offset;
    for token in tokens {
        let start = token.start.max(at);
        let end = token.end.min(line_end);
        if start >= end {
            continue;
        }
        if start > at {
            spans.push(Span::plain(&line[at - line_offset..start - line_offset]));
        }
        spans.push(Span::new(
            &line[start - line_offset..end - line_offset],
            AttrSet::single(SpanAttr::Token {
                scope: token.scope.clone(),
            }),
        ));
        at = end;
    }
    if at < line_end {
        spans.push(Span::plain(&line[at - line_offset..]));
    }
    spans
}
