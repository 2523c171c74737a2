//! Parse options.
//!
//! Options arrive programmatically from the host app (or as CLI flags);
//! they only tune recognition, never the output shape.

use serde::Deserialize;

/// Per-parse options.
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default, rename_all = "kebab-case")]
pub struct ParseOptions {
    /// Path of the note being parsed; attached to link and embed
    /// structures as `from`.
    pub filepath: Option<String>,

    /// Capture the surrounding line text as `context` on link, embed,
    /// and tag structures.
    pub detailed_links: bool,

    /// Emit bare URLs as embed structures instead of links.
    pub auto_embed_raw_links: bool,

    /// Let `_` toggle emphasis between word characters. Off by default
    /// so snake_case identifiers stay plain.
    pub inter_text_underscores: bool,

    /// Accept HTML fragments with tag names outside the known set.
    pub allow_unknown_html_tags: bool,
}

impl ParseOptions {
    pub fn builder() -> ParseOptionsBuilder {
        ParseOptionsBuilder::default()
    }
}

#[derive(Debug, Default, Clone)]
pub struct ParseOptionsBuilder {
    options: ParseOptions,
}

impl ParseOptionsBuilder {
    pub fn filepath(mut self, path: impl Into<String>) -> Self {
        self.options.filepath = Some(path.into());
        self
    }

    pub fn detailed_links(mut self, on: bool) -> Self {
        self.options.detailed_links = on;
        self
    }

    pub fn auto_embed_raw_links(mut self, on: bool) -> Self {
        self.options.auto_embed_raw_links = on;
        self
    }

    pub fn inter_text_underscores(mut self, on: bool) -> Self {
        self.options.inter_text_underscores = on;
        self
    }

    pub fn allow_unknown_html_tags(mut self, on: bool) -> Self {
        self.options.allow_unknown_html_tags = on;
        self
    }

    pub fn build(self) -> ParseOptions {
        self.options
    }
}
