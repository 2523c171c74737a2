//! Incremental parser for a markdown-flavored note syntax.
//!
//! One parse turns a text (or a window of a larger document's lines)
//! into formatted [`Line`]s of attributed spans plus a flat list of
//! the [`Structure`]s found on the way: links, embeds, tags, headers,
//! todos, and front matter. The span texts of the output lines, joined
//! by the input's line breaks, reproduce the input byte for byte, so a
//! caller can render from the output alone.
//!
//! Parses never fail. Anything the grammar does not claim stays plain
//! text, and problems inside otherwise well-formed constructs (bad
//! YAML front matter, say) surface as entries in
//! [`ParseOutput::errors`].
//!
//! # Examples
//!
//! ```rust
//! use notemark::{ParseOptions, parse};
//!
//! let options = ParseOptions::default();
//! let output = parse("# Title\n\nSee [[Other Note]].", &options);
//! assert_eq!(output.lines.len(), 3);
//! assert_eq!(output.structure.len(), 2);
//! ```
//!
//! For incremental work, parse a window of lines with
//! [`Parser::window`] and pick the window with
//! [`incremental::reparse_range`] so no fenced construct is cut open.

pub mod config;
pub mod feeder;
pub mod incremental;
pub mod line;
pub mod parser;
pub mod structure;
pub mod syntax;

mod assembler;
mod cursor;
mod utils;

pub use config::{ParseOptions, ParseOptionsBuilder};
pub use incremental::reparse_range;
pub use line::{Line, Span};
pub use parser::{ParseIssue, ParseOutput, Parser, Severity};
pub use structure::Structure;
pub use syntax::{SyntaxSource, SyntaxToken, TokenizeResult};

/// Parses a complete text with the given options.
///
/// # Examples
///
/// ```rust
/// use notemark::{ParseOptions, parse};
///
/// let output = parse("- [ ] water the plants", &ParseOptions::default());
/// assert_eq!(output.structure.len(), 1);
/// ```
pub fn parse(text: &str, options: &ParseOptions) -> ParseOutput {
    Parser::new(text, options).parse()
}
