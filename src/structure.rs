//! Semantic structure entries extracted during a parse.
//!
//! Structures are the indexer-facing half of the output: a flat list in
//! document order (ascending `start`). Offsets are byte ranges into the
//! parsed buffer, `end` exclusive; for window parses they are relative
//! to the window and `start_line_index` anchors the translation.

use serde::Serialize;
use serde_json::Value;

/// Checkbox state of a to-do item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TodoState {
    Open,
    Checked,
    Canceled,
}

/// Which syntax produced a link or embed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkForm {
    /// `[[target]]`
    Wiki,
    /// `[text](dest)`
    Md,
    /// A bare URL in running text.
    Raw,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinkEntry {
    pub start: usize,
    pub end: usize,
    pub form: LinkForm,
    pub href: String,
    /// Display text override, when the syntax carries one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Header or block anchor, verbatim after the `#`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_id: Option<String>,
    /// Path of the note the link was found in.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    /// Surrounding line text, captured under `detailed_links`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmbedEntry {
    pub start: usize,
    pub end: usize,
    pub form: LinkForm,
    pub href: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TagEntry {
    pub start: usize,
    pub end: usize,
    /// Hierarchy segments: `#a/b` is `["a", "b"]`.
    pub names: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeaderEntry {
    pub start: usize,
    pub end: usize,
    pub level: u8,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TodoEntry {
    pub start: usize,
    pub end: usize,
    pub state: TodoState,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrontMatterEntry {
    pub start: usize,
    pub end: usize,
    /// Parsed key/value data; `None` when the block failed to parse.
    pub data: Option<Value>,
}

/// One extracted structure.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Structure {
    Link(LinkEntry),
    Embed(EmbedEntry),
    Tag(TagEntry),
    Header(HeaderEntry),
    Todo(TodoEntry),
    FrontMatter(FrontMatterEntry),
}

impl Structure {
    pub fn start(&self) -> usize {
        match self {
            Structure::Link(e) => e.start,
            Structure::Embed(e) => e.start,
            Structure::Tag(e) => e.start,
            Structure::Header(e) => e.start,
            Structure::Todo(e) => e.start,
            Structure::FrontMatter(e) => e.start,
        }
    }

    pub fn end(&self) -> usize {
        match self {
            Structure::Link(e) => e.end,
            Structure::Embed(e) => e.end,
            Structure::Tag(e) => e.end,
            Structure::Header(e) => e.end,
            Structure::Todo(e) => e.end,
            Structure::FrontMatter(e) => e.end,
        }
    }

    /// Identity comparison for index diffing: kind plus target fields,
    /// offsets and capture context ignored. Two entries that are
    /// soft-equal describe the same thing at possibly different places.
    pub fn soft_eq(&self, other: &Structure) -> bool {
        match (self, other) {
            (Structure::Link(a), Structure::Link(b)) => {
                a.form == b.form && a.href == b.href && a.content_id == b.content_id
            }
            (Structure::Embed(a), Structure::Embed(b)) => {
                a.form == b.form && a.href == b.href && a.content_id == b.content_id
            }
            (Structure::Tag(a), Structure::Tag(b)) => a.names == b.names,
            (Structure::Header(a), Structure::Header(b)) => {
                a.level == b.level && a.text == b.text
            }
            (Structure::Todo(a), Structure::Todo(b)) => {
                a.state == b.state && a.text == b.text
            }
            (Structure::FrontMatter(a), Structure::FrontMatter(b)) => a.data == b.data,
            _ => false,
        }
    }
}

/// Result of diffing two structure lists.
#[derive(Debug, Clone, PartialEq)]
pub struct StructureDiff<'a> {
    pub added: Vec<&'a Structure>,
    pub removed: Vec<&'a Structure>,
}

/// Multiset diff by [`Structure::soft_eq`]. Entries present in both
/// lists (at any offset) are unchanged; the rest land in added/removed.
pub fn diff<'a>(old: &'a [Structure], new: &'a [Structure]) -> StructureDiff<'a> {
    let mut matched = vec![false; old.len()];
    let mut added = Vec::new();

    for entry in new {
        let found = old
            .iter()
            .enumerate()
            .find(|(i, candidate)| !matched[*i] && entry.soft_eq(candidate));
        match found {
            Some((i, _)) => matched[i] = true,
            None => added.push(entry),
        }
    }

    let removed = old
        .iter()
        .zip(&matched)
        .filter(|(_, hit)| !**hit)
        .map(|(entry, _)| entry)
        .collect();

    StructureDiff { added, removed }
}
