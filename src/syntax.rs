//! Seam to the external syntax source.
//!
//! Code-block highlighting is not this crate's job. On exit from a
//! fenced code block the buffered body is handed to a [`SyntaxSource`]
//! keyed by the declared language; the source may not have the
//! tokenizer yet (`Loading`), in which case the language lands in the
//! output's `awaiting` list and the caller re-parses once it loaded.

/// One token produced by a syntax source. Offsets are byte ranges into
/// the tokenized body text; tokens are ordered and non-overlapping, and
/// gaps between them render as plain code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxToken {
    pub start: usize,
    pub end: usize,
    /// Scope name, e.g. `keyword` or `string`.
    pub scope: String,
}

/// Outcome of a tokenize request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenizeResult {
    Tokens(Vec<SyntaxToken>),
    /// The tokenizer for this language is still loading; retry later.
    Loading,
    /// No tokenizer for this language.
    Unsupported,
}

pub trait SyntaxSource {
    fn tokenize(&self, language: &str, text: &str) -> TokenizeResult;
}

/// Source that supports nothing; every block stays unformatted.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoSyntax;

impl SyntaxSource for NoSyntax {
    fn tokenize(&self, _language: &str, _text: &str) -> TokenizeResult {
        TokenizeResult::Unsupported
    }
}
