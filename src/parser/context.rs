//! Parsing contexts and the context stack.
//!
//! A context scopes a region of the document: the root block context,
//! a fenced construct, or an inline sub-parse (link display text, HTML
//! element content). Each context declares the ordered rule list the
//! dispatch loop tries, the literal indent every line inside it must
//! start with, per-construct state, and what to do when it is popped.
//! The stack is never empty; the root context is never popped.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ContextKind {
    Block,
    Inline,
}

/// The closed set of recognizer rules. Per-context priority is the
/// declaration order of the slices below; the first rule to claim a
/// position wins and the order is part of the grammar's contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RuleKind {
    FrontMatter,
    FencedCode,
    MathBlock,
    Header,
    HorizontalRule,
    Blockquote,
    ListItem,
    WikiLink,
    MarkdownLink,
    RawUrl,
    Tag,
    InlineMath,
    CodeSpan,
    Html,
    Emphasis,
    Strike,
    Highlight,
    // Context-local closers.
    CodeFenceClose,
    MathFenceClose,
    FrontMatterClose,
    LinkTextEnd,
    HtmlClose,
}

pub(crate) const ROOT_RULES: &[RuleKind] = &[
    RuleKind::FrontMatter,
    RuleKind::FencedCode,
    RuleKind::MathBlock,
    RuleKind::Header,
    RuleKind::HorizontalRule,
    RuleKind::Blockquote,
    RuleKind::ListItem,
    RuleKind::WikiLink,
    RuleKind::MarkdownLink,
    RuleKind::RawUrl,
    RuleKind::Tag,
    RuleKind::InlineMath,
    RuleKind::CodeSpan,
    RuleKind::Html,
    RuleKind::Emphasis,
    RuleKind::Strike,
    RuleKind::Highlight,
];

pub(crate) const CODE_BLOCK_RULES: &[RuleKind] = &[RuleKind::CodeFenceClose];

pub(crate) const MATH_BLOCK_RULES: &[RuleKind] = &[RuleKind::MathFenceClose];

pub(crate) const FRONT_MATTER_RULES: &[RuleKind] = &[RuleKind::FrontMatterClose];

/// Display text of a wiki or markdown link. The closer runs first; the
/// rest are toggles that cannot scan past the precomputed close offset.
pub(crate) const LINK_TEXT_RULES: &[RuleKind] = &[
    RuleKind::LinkTextEnd,
    RuleKind::Emphasis,
    RuleKind::Strike,
    RuleKind::Highlight,
];

pub(crate) const HTML_CONTENT_RULES: &[RuleKind] = &[
    RuleKind::HtmlClose,
    RuleKind::Html,
    RuleKind::WikiLink,
    RuleKind::MarkdownLink,
    RuleKind::RawUrl,
    RuleKind::Tag,
    RuleKind::InlineMath,
    RuleKind::CodeSpan,
    RuleKind::Emphasis,
    RuleKind::Strike,
    RuleKind::Highlight,
];

/// Finalization to run when a context is popped, by the close rule, an
/// indentation mismatch, or the end-of-input unwind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ExitAction {
    None,
    /// Hand the buffered body to the syntax source and retrofit token
    /// spans onto the body lines.
    FinalizeCode,
    /// Drop math membership marking.
    FinalizeMath,
    /// Parse the buffered body as YAML; record data or the error.
    FinalizeFrontMatter,
    /// Drop the link format scope.
    FinalizeLink,
}

/// Per-construct state carried by a context, readable by its rules and
/// consumed by its exit action.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ContextPayload {
    None,
    Code {
        /// The exact opening fence run, e.g. "```"; a close fence must
        /// use the same character at least as many times.
        fence: String,
        language: Option<String>,
        /// Byte offset where the body starts (just past the open
        /// fence's line break).
        body_start: usize,
        /// Output line index of the first body line.
        first_body_line: usize,
    },
    Math,
    FrontMatter {
        body_start: usize,
        /// Output line index of the first body line.
        first_body_line: usize,
    },
    /// Display text of a link. `close_at` is the verified offset of the
    /// closing delimiter on this line; `construct_end` is the offset
    /// just past the whole construct. The slice between the two is the
    /// closing markup.
    LinkText {
        close_at: usize,
        construct_end: usize,
    },
    HtmlElement {
        name: String,
    },
}

#[derive(Debug, Clone)]
pub(crate) struct Context {
    pub kind: ContextKind,
    /// Literal leading whitespace every line in this context must start
    /// with; a line that does not pops the context before dispatch.
    pub indent: String,
    pub rules: &'static [RuleKind],
    pub exit: ExitAction,
    pub payload: ContextPayload,
}

impl Context {
    pub fn root() -> Self {
        Context {
            kind: ContextKind::Block,
            indent: String::new(),
            rules: ROOT_RULES,
            exit: ExitAction::None,
            payload: ContextPayload::None,
        }
    }
}

#[derive(Debug)]
pub(crate) struct ContextStack {
    stack: Vec<Context>,
}

impl ContextStack {
    pub fn new() -> Self {
        ContextStack {
            stack: vec![Context::root()],
        }
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn top(&self) -> &Context {
        // The stack is never empty.
        self.stack.last().unwrap_or_else(|| unreachable!())
    }

    pub fn push(&mut self, context: Context) {
        self.stack.push(context);
    }

    /// Pop the top context. The root context stays.
    pub fn pop(&mut self) -> Option<Context> {
        if self.stack.len() > 1 {
            self.stack.pop()
        } else {
            None
        }
    }
}
