use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "notemark")]
#[command(author, version)]
#[command(about = "An incremental parser and structure extractor for markdown-flavored notes")]
#[command(
    long_about = "Notemark parses note files written in a markdown-flavored syntax and emits \
    formatted lines plus the note's structure (links, embeds, tags, headers, todos, and front \
    matter) as JSON. The span texts of the emitted lines reproduce the input byte for byte, so \
    the output alone is enough to render from."
)]
#[command(after_help = "\
EXAMPLES:

    # Parse a note to JSON
    notemark parse note.md

    # Parse from stdin
    cat note.md | notemark parse

    # Parse only lines 5 through 10
    notemark parse --range 5:10 note.md

    # Attach file and line context to extracted links
    notemark parse --detailed-links note.md

For more information, visit: https://github.com/notemark/notemark")]
#[command(arg_required_else_help = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Parse a note and print lines, structure, and errors as JSON
    #[command(
        long_about = "Parse a note document and print the full parse output as JSON: one entry \
        per line holding its attributed spans, the flat list of extracted structures, any \
        recoverable errors, and the languages still awaiting a syntax tokenizer."
    )]
    #[command(after_help = "\
EXAMPLES:

    # Parse a file
    notemark parse note.md

    # Parse from stdin, compact output
    echo '# Heading' | notemark parse --compact

    # Print just the structure entries
    notemark parse --structure note.md

    # Re-parse a window of a larger document
    notemark parse --range 12:40 note.md

RANGES:

Line ranges are 1-indexed and inclusive, like editors display them. A window parse may run \
past the range end when an unterminated fenced construct reaches further; the output's \
start-line-index anchors the result in the document.")]
    Parse {
        /// Input file (stdin if not provided)
        #[arg(help = "Input file path")]
        file: Option<PathBuf>,

        /// Parse only this line range, e.g. 5:10
        #[arg(long)]
        #[arg(help = "Line range to parse, START:END, 1-indexed inclusive")]
        range: Option<String>,

        /// Print compact JSON instead of pretty-printed
        #[arg(long)]
        compact: bool,

        /// Print only the extracted structure list
        #[arg(long)]
        structure: bool,

        /// Print only the formatted lines
        #[arg(long)]
        lines: bool,

        /// Record this path as the origin of extracted links and embeds
        #[arg(long)]
        #[arg(
            long_help = "Path recorded as `from` on extracted links and embeds. Defaults to \
            the input file path when a file is given."
        )]
        filepath: Option<String>,

        /// Attach the surrounding line text to links, embeds, and tags
        #[arg(long)]
        detailed_links: bool,

        /// Emit bare URLs as embeds instead of links
        #[arg(long)]
        auto_embed_raw_links: bool,

        /// Let underscores toggle emphasis inside words
        #[arg(long)]
        inter_text_underscores: bool,

        /// Accept HTML tags outside the known set
        #[arg(long)]
        allow_unknown_html_tags: bool,
    },
}
