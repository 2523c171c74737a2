//! The parse engine: context stack plus character dispatch.
//!
//! One [`Parser`] drives one parse over one buffer. The loop walks the
//! cursor cluster by cluster; at every position the top context's rules
//! get a chance to claim, in declared order, and unclaimed clusters
//! accumulate as plain pending text. Line breaks close lines, line
//! starts re-check context indents, and the end of input unwinds the
//! stack running each context's exit action.

use std::ops::Range;

use log::{debug, trace};
use serde::Serialize;

use crate::assembler::Assembler;
use crate::config::ParseOptions;
use crate::cursor::Cursor;
use crate::feeder::{LineFeeder, SliceFeeder};
use crate::line::{Line, SpanKey};
use crate::structure::Structure;
use crate::syntax::{NoSyntax, SyntaxSource};

use context::{Context, ContextKind, ContextStack, ExitAction, RuleKind};

pub(crate) mod context;

mod blockquotes;
mod code_blocks;
mod code_spans;
mod emphasis;
mod front_matter;
mod headers;
mod horizontal_rules;
mod html;
mod lists;
mod markdown_links;
mod math;
mod raw_urls;
mod tags;
mod wiki_links;


fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Issue severity. Warnings annotate recoverable oddities; errors mark
/// data that failed to parse. Neither stops a parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

/// A recoverable diagnostic, pointing into the parsed buffer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParseIssue {
    pub message: String,
    pub start: usize,
    pub end: usize,
    pub severity: Severity,
}

/// Everything one parse produces.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParseOutput {
    /// One entry per source line; span texts joined by line breaks
    /// reproduce the input exactly.
    pub lines: Vec<Line>,
    /// Semantic entries in document order.
    pub structure: Vec<Structure>,
    pub errors: Vec<ParseIssue>,
    /// Languages whose tokenizer was still loading; re-parse later.
    pub awaiting: Vec<String>,
    /// Window start for window parses.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_line_index: Option<usize>,
}

static NO_SYNTAX: NoSyntax = NoSyntax;

pub struct Parser<'a> {
    cursor: Cursor,
    asm: Assembler,
    stack: ContextStack,
    structures: Vec<Structure>,
    errors: Vec<ParseIssue>,
    awaiting: Vec<String>,
    options: &'a ParseOptions,
    syntax: &'a dyn SyntaxSource,
    feeder: Option<Box<dyn LineFeeder + 'a>>,
    start_line_index: Option<usize>,
    /// Byte offset of the current line's first cluster.
    line_start: usize,
    /// Byte offset just past the current line's leading whitespace.
    content_start: usize,
    /// The current line's leading whitespace, literally.
    line_indent: String,
    /// Set during the end-of-input unwind; exit actions use it to tell
    /// a normal close from running off the document.
    unwinding: bool,
}

impl<'a> Parser<'a> {
    /// Parser over a complete text.
    pub fn new(text: impl Into<String>, options: &'a ParseOptions) -> Self {
        Parser {
            cursor: Cursor::new(text),
            asm: Assembler::new(),
            stack: ContextStack::new(),
            structures: Vec::new(),
            errors: Vec::new(),
            awaiting: Vec::new(),
            options,
            syntax: &NO_SYNTAX,
            feeder: None,
            start_line_index: None,
            line_start: 0,
            content_start: 0,
            line_indent: String::new(),
            unwinding: false,
        }
    }

    /// Parser over `lines[range]` of a line-oriented document. Open
    /// fenced constructs may pull lines past the range end; the number
    /// of output lines tells the caller how far the parse reached.
    pub fn window<S: AsRef<str>>(
        lines: &'a [S],
        range: Range<usize>,
        options: &'a ParseOptions,
    ) -> Self {
        let start = range.start.min(lines.len());
        let end = range.end.clamp(start, lines.len());
        let text = lines[start..end]
            .iter()
            .map(AsRef::as_ref)
            .collect::<Vec<_>>()
            .join("\n");

        let mut parser = Parser::new(text, options);
        parser.feeder = Some(Box::new(SliceFeeder::new(lines, end)));
        parser.start_line_index = Some(start);
        parser
    }

    pub fn syntax_source(mut self, syntax: &'a dyn SyntaxSource) -> Self {
        self.syntax = syntax;
        self
    }

    /// Run the parse to completion.
    pub fn parse(mut self) -> ParseOutput {
        #[cfg(debug_assertions)]
        {
            init_logger();
        }

        debug!("parse start: {} bytes", self.cursor.len());
        self.begin_line();

        loop {
            if self.cursor.is_at_end() {
                if self.hard_construct_open() && self.has_more(true) {
                    continue;
                }
                break;
            }

            if matches!(self.cursor.current(), Some("\n" | "\r\n")) {
                self.finish_line();
                continue;
            }

            let rules = self.stack.top().rules;
            let mut claimed = false;
            for &rule in rules {
                if rule.run(&mut self) {
                    claimed = true;
                    break;
                }
            }

            if !claimed {
                if let Some(cluster) = self.cursor.current() {
                    self.asm.push_text(cluster);
                }
                self.cursor.step(1);
            }
        }

        self.finish_document()
    }

    // ----- line bookkeeping -------------------------------------------

    /// Start-of-line work: record bounds, compute the leading
    /// whitespace, and pop every context whose indent is not a prefix
    /// of it.
    fn begin_line(&mut self) {
        self.line_start = self.cursor.index();
        let line_end = self.cursor.line_end(self.line_start);
        let line = self.cursor.slice(self.line_start..line_end);
        let ws_len = line.len() - line.trim_start_matches([' ', '\t']).len();
        self.line_indent = line[..ws_len].to_string();
        self.content_start = self.line_start + ws_len;

        // Blank lines carry no indent evidence and never pop.
        if ws_len == line.len() {
            return;
        }
        while self.stack.depth() > 1 {
            if self.line_indent.starts_with(self.stack.top().indent.as_str()) {
                break;
            }
            debug!("indent break at offset {} pops context", self.line_start);
            self.pop_context();
        }
    }

    fn finish_line(&mut self) {
        // A CRLF pair is one cluster; the CR belongs to this line's
        // span text so reconstruction stays byte-exact.
        if matches!(self.cursor.current(), Some("\r\n")) {
            self.asm.push_text("\r");
        }
        self.asm.build_line();
        self.cursor.step(1);
        self.begin_line();
    }

    fn finish_document(mut self) -> ParseOutput {
        // The in-progress line is always emitted, empty included, so a
        // trailing line break round-trips.
        self.asm.build_line();

        self.unwinding = true;
        while self.stack.depth() > 1 {
            self.pop_context();
        }

        debug!(
            "parse done: {} lines, {} structures, {} issues",
            self.asm.line_count(),
            self.structures.len(),
            self.errors.len()
        );

        ParseOutput {
            lines: self.asm.into_lines(),
            structure: self.structures,
            errors: self.errors,
            awaiting: self.awaiting,
            start_line_index: self.start_line_index,
        }
    }

    // ----- document feeding -------------------------------------------

    /// Whether anything past the cursor exists. Soft asks only the
    /// materialized buffer; hard may pull the next document line in.
    fn has_more(&mut self, hard: bool) -> bool {
        if !self.cursor.is_at_end() {
            return true;
        }
        if !hard {
            return false;
        }
        self.extend()
    }

    /// Pull one document line into the buffer.
    fn extend(&mut self) -> bool {
        let Some(feeder) = self.feeder.as_mut() else {
            return false;
        };
        let Some(line) = feeder.feed_line() else {
            return false;
        };
        trace!("hard extension pulled {} bytes", line.len());
        self.cursor.extend_with(&line);
        true
    }

    /// Whether the active construct is allowed to extend the window.
    /// Fenced block contexts pull further document lines in; inline
    /// sub-parses never do.
    fn hard_construct_open(&self) -> bool {
        self.stack.depth() > 1 && self.stack.top().kind == ContextKind::Block
    }

    // ----- context stack ----------------------------------------------

    fn push_context(&mut self, context: Context) {
        trace!("push context at {}", self.cursor.index());
        self.stack.push(context);
    }

    /// Pop the top context and run its exit action.
    fn pop_context(&mut self) {
        let Some(context) = self.stack.pop() else {
            return;
        };
        trace!("exit {:?}", context.exit);
        match context.exit {
            ExitAction::None => {}
            ExitAction::FinalizeCode => code_blocks::finalize(self, context.payload),
            ExitAction::FinalizeMath => math::finalize(self),
            ExitAction::FinalizeFrontMatter => front_matter::finalize(self, context.payload),
            ExitAction::FinalizeLink => self.asm.drop_format(SpanKey::Link),
        }
    }

    // ----- rule support -----------------------------------------------

    /// Whether the cursor sits at the first non-whitespace position of
    /// the current line.
    fn at_content_start(&self) -> bool {
        self.cursor.index() == self.content_start
    }

    /// End offset of the current line.
    fn line_end_offset(&self) -> usize {
        self.cursor.line_end(self.line_start)
    }

    /// Width of the line break at `offset`: 2 for CRLF, 1 for LF, 0 at
    /// the end of the buffer.
    fn break_len_at(&self, offset: usize) -> usize {
        let rest = &self.cursor.text()[offset..];
        if rest.starts_with("\r\n") {
            2
        } else if rest.starts_with('\n') {
            1
        } else {
            0
        }
    }

    /// End of a fenced construct's body in bytes. During the unwind the
    /// body runs to the end of the buffer; otherwise it ends before the
    /// line break preceding the current line.
    fn construct_body_end(&self, body_start: usize) -> usize {
        let end = if self.unwinding {
            self.cursor.len()
        } else {
            match self.cursor.find_backward("\n") {
                Some(brk) if self.cursor.text()[..brk].ends_with('\r') => brk - 1,
                Some(brk) => brk,
                None => self.cursor.len(),
            }
        };
        end.max(body_start)
    }

    /// Surrounding line text, when `detailed_links` asks for it.
    fn line_context(&self) -> Option<String> {
        if !self.options.detailed_links {
            return None;
        }
        let end = self.line_end_offset();
        Some(self.cursor.slice(self.line_start..end).trim().to_string())
    }

    fn push_structure(&mut self, structure: Structure) {
        debug_assert!(
            self.structures
                .last()
                .is_none_or(|prev| prev.start() <= structure.start()),
            "structures must stay ordered by start",
        );
        trace!("structure at {}..{}", structure.start(), structure.end());
        self.structures.push(structure);
    }

    fn push_issue(&mut self, issue: ParseIssue) {
        debug!("issue at {}..{}: {}", issue.start, issue.end, issue.message);
        self.errors.push(issue);
    }

    fn push_awaiting(&mut self, language: String) {
        if !self.awaiting.contains(&language) {
            debug!("awaiting syntax for {language}");
            self.awaiting.push(language);
        }
    }
}

impl RuleKind {
    /// Dispatch entry: let the rule inspect the parser and claim the
    /// current position. Claims consume at least one cluster.
    fn run(self, p: &mut Parser<'_>) -> bool {
        let claimed = match self {
            RuleKind::FrontMatter => front_matter::open(p),
            RuleKind::FencedCode => code_blocks::open(p),
            RuleKind::MathBlock => math::open_block(p),
            RuleKind::Header => headers::claim(p),
            RuleKind::HorizontalRule => horizontal_rules::claim(p),
            RuleKind::Blockquote => blockquotes::claim(p),
            RuleKind::ListItem => lists::claim(p),
            RuleKind::WikiLink => wiki_links::claim(p),
            RuleKind::MarkdownLink => markdown_links::claim(p),
            RuleKind::RawUrl => raw_urls::claim(p),
            RuleKind::Tag => tags::claim(p),
            RuleKind::InlineMath => math::inline(p),
            RuleKind::CodeSpan => code_spans::claim(p),
            RuleKind::Html => html::claim(p),
            RuleKind::Emphasis => emphasis::emphasis(p),
            RuleKind::Strike => emphasis::strike(p),
            RuleKind::Highlight => emphasis::highlight(p),
            RuleKind::CodeFenceClose => code_blocks::close(p),
            RuleKind::MathFenceClose => math::close_block(p),
            RuleKind::FrontMatterClose => front_matter::close(p),
            RuleKind::LinkTextEnd => markdown_links::end(p),
            RuleKind::HtmlClose => html::close(p),
        };
        if claimed {
            trace!("{self:?} claimed at {}", p.cursor.index());
        }
        claimed
    }
}
