//! Formatted-line data model: spans, lines, and their attribute sets.
//!
//! Attribute keys are closed enums. A set keeps insertion order and holds
//! at most one attribute per key; inserting again replaces the earlier
//! entry, so later-opened scopes win on conflict.

use serde::Serialize;

use crate::structure::TodoState;

/// Inline attribute attached to a span.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SpanAttr {
    Emphasis,
    Strong,
    Strike,
    Highlight,
    /// Inline code.
    Code,
    Math,
    /// Formatting delimiter rather than content text.
    Marker,
    Link { href: String },
    Tag { names: Vec<String> },
    /// Syntax-source token scope inside a code block.
    Token { scope: String },
    /// Inline error annotation; the message mirrors the errors entry.
    Error { message: String },
}

/// Payload-free key of a [`SpanAttr`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SpanKey {
    Emphasis,
    Strong,
    Strike,
    Highlight,
    Code,
    Math,
    Marker,
    Link,
    Tag,
    Token,
    Error,
}

impl SpanAttr {
    pub fn key(&self) -> SpanKey {
        match self {
            SpanAttr::Emphasis => SpanKey::Emphasis,
            SpanAttr::Strong => SpanKey::Strong,
            SpanAttr::Strike => SpanKey::Strike,
            SpanAttr::Highlight => SpanKey::Highlight,
            SpanAttr::Code => SpanKey::Code,
            SpanAttr::Math => SpanKey::Math,
            SpanAttr::Marker => SpanKey::Marker,
            SpanAttr::Link { .. } => SpanKey::Link,
            SpanAttr::Tag { .. } => SpanKey::Tag,
            SpanAttr::Token { .. } => SpanKey::Token,
            SpanAttr::Error { .. } => SpanKey::Error,
        }
    }
}

/// Ordered, key-deduplicated set of inline attributes.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct AttrSet(Vec<SpanAttr>);

impl AttrSet {
    pub fn new() -> Self {
        AttrSet(Vec::new())
    }

    pub fn single(attr: SpanAttr) -> Self {
        AttrSet(vec![attr])
    }

    /// Insert, replacing any earlier attribute with the same key.
    pub fn insert(&mut self, attr: SpanAttr) {
        let key = attr.key();
        self.0.retain(|a| a.key() != key);
        self.0.push(attr);
    }

    pub fn remove(&mut self, key: SpanKey) {
        self.0.retain(|a| a.key() != key);
    }

    pub fn contains(&self, key: SpanKey) -> bool {
        self.0.iter().any(|a| a.key() == key)
    }

    pub fn get(&self, key: SpanKey) -> Option<&SpanAttr> {
        self.0.iter().find(|a| a.key() == key)
    }

    /// This set layered over `base`: base entries first, then ours, with
    /// ours replacing same-key entries.
    pub fn merged_over(&self, base: &AttrSet) -> AttrSet {
        let mut out = base.clone();
        for attr in &self.0 {
            out.insert(attr.clone());
        }
        out
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SpanAttr> {
        self.0.iter()
    }
}

impl From<SpanAttr> for AttrSet {
    fn from(attr: SpanAttr) -> Self {
        AttrSet::single(attr)
    }
}

impl FromIterator<SpanAttr> for AttrSet {
    fn from_iter<I: IntoIterator<Item = SpanAttr>>(iter: I) -> Self {
        let mut set = AttrSet::new();
        for attr in iter {
            set.insert(attr);
        }
        set
    }
}

/// A run of text, or a formatting-only marker, with its attributes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Span {
    pub text: String,
    pub attrs: AttrSet,
}

impl Span {
    pub fn plain(text: impl Into<String>) -> Self {
        Span {
            text: text.into(),
            attrs: AttrSet::new(),
        }
    }

    pub fn new(text: impl Into<String>, attrs: AttrSet) -> Self {
        Span {
            text: text.into(),
            attrs,
        }
    }
}

/// Which line of a multi-line fenced construct a line is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FenceRole {
    Open,
    Body,
    Close,
}

/// List marker glyph of a list-item line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ListMarker {
    Dash,
    Star,
    Plus,
    /// `1.`, `2.`, ...
    Number(u32),
    /// `a.` or `A.`
    Letter(char),
}

/// Line-level description of a list item.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListDefinition {
    pub marker: ListMarker,
    /// Leading whitespace width in bytes.
    pub indent: usize,
    pub todo: Option<TodoState>,
}

/// Line-level attribute.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LineAttr {
    Header { level: u8 },
    Quote { depth: u8 },
    List { definition: ListDefinition },
    CodeFence { role: FenceRole, language: Option<String> },
    MathFence { role: FenceRole },
    FrontMatter { role: FenceRole },
    HorizontalRule,
    /// Zero spans on this line.
    Empty,
}

/// Payload-free key of a [`LineAttr`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LineKey {
    Header,
    Quote,
    List,
    CodeFence,
    MathFence,
    FrontMatter,
    HorizontalRule,
    Empty,
}

impl LineAttr {
    pub fn key(&self) -> LineKey {
        match self {
            LineAttr::Header { .. } => LineKey::Header,
            LineAttr::Quote { .. } => LineKey::Quote,
            LineAttr::List { .. } => LineKey::List,
            LineAttr::CodeFence { .. } => LineKey::CodeFence,
            LineAttr::MathFence { .. } => LineKey::MathFence,
            LineAttr::FrontMatter { .. } => LineKey::FrontMatter,
            LineAttr::HorizontalRule => LineKey::HorizontalRule,
            LineAttr::Empty => LineKey::Empty,
        }
    }

    /// Fence role when this attribute marks a multi-line construct.
    pub fn fence_role(&self) -> Option<FenceRole> {
        match self {
            LineAttr::CodeFence { role, .. }
            | LineAttr::MathFence { role }
            | LineAttr::FrontMatter { role } => Some(*role),
            _ => None,
        }
    }
}

/// Ordered, key-deduplicated set of line attributes.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct LineAttrSet(Vec<LineAttr>);

impl LineAttrSet {
    pub fn new() -> Self {
        LineAttrSet(Vec::new())
    }

    pub fn insert(&mut self, attr: LineAttr) {
        let key = attr.key();
        self.0.retain(|a| a.key() != key);
        self.0.push(attr);
    }

    pub fn remove(&mut self, key: LineKey) {
        self.0.retain(|a| a.key() != key);
    }

    pub fn contains(&self, key: LineKey) -> bool {
        self.0.iter().any(|a| a.key() == key)
    }

    pub fn get(&self, key: LineKey) -> Option<&LineAttr> {
        self.0.iter().find(|a| a.key() == key)
    }

    pub fn merged_over(&self, base: &LineAttrSet) -> LineAttrSet {
        let mut out = base.clone();
        for attr in &self.0 {
            out.insert(attr.clone());
        }
        out
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LineAttr> {
        self.0.iter()
    }
}

impl FromIterator<LineAttr> for LineAttrSet {
    fn from_iter<I: IntoIterator<Item = LineAttr>>(iter: I) -> Self {
        let mut set = LineAttrSet::new();
        for attr in iter {
            set.insert(attr);
        }
        set
    }
}

/// One formatted output line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Line {
    pub spans: Vec<Span>,
    pub attrs: LineAttrSet,
}

impl Line {
    /// Concatenated span text; the source line, byte for byte.
    pub fn text(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }
}
