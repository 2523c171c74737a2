//! YAML front matter.
//!
//! A `---` line at the very start of the document opens a metadata
//! block, closed by the next `---` or `...` line. The block only opens
//! when its close actually exists, pulling lines from the feeder if
//! the buffer runs out first; a lone `---` stays a horizontal rule.
//! The body is parsed as YAML once the block pops. Bad YAML is a
//! diagnostic, never a failure: the block still round-trips as text
//! and the entry is emitted with empty data.

use crate::line::{FenceRole, LineAttr, LineKey, SpanAttr};
use crate::parser::context::{
    Context, ContextKind, ContextPayload, ExitAction, FRONT_MATTER_RULES,
};
use crate::parser::{ParseIssue, Parser, Severity};
use crate::structure::{FrontMatterEntry, Structure};

pub(crate) fn open(p: &mut Parser<'_>) -> bool {
    if p.cursor.index() != 0 || p.start_line_index.is_some_and(|first| first != 0) {
        return false;
    }
    if !matches!(p.cursor.current(), Some("-")) {
        return false;
    }
    let line_end = p.line_end_offset();
    if p.cursor.slice(0..line_end).trim_end() != "---" {
        return false;
    }
    if !scan_for_close(p, line_end) {
        return false;
    }
    let body_start = line_end + p.break_len_at(line_end);
    let first_body_line = p.asm.line_count() + 1;
    let marker = p.cursor.line_text(0, true);
    p.asm.add_marker(marker);
    p.asm.set_line_attr(LineAttr::FrontMatter {
        role: FenceRole::Open,
    });
    p.asm.open_line_format(LineAttr::FrontMatter {
        role: FenceRole::Body,
    });
    p.push_context(Context {
        kind: ContextKind::Block,
        indent: String::new(),
        rules: FRONT_MATTER_RULES,
        exit: ExitAction::FinalizeFrontMatter,
        payload: ContextPayload::FrontMatter {
            body_start,
            first_body_line,
        },
    });
    true
}

/// Looks ahead for a `---` or `...` line that would close the block,
/// feeding more lines into the buffer when the lookahead runs past it.
fn scan_for_close(p: &mut Parser<'_>, mut from: usize) -> bool {
    loop {
        if from >= p.cursor.len() && !p.extend() {
            return false;
        }
        from += p.break_len_at(from);
        let line_end = p.cursor.line_end(from);
        let line = p.cursor.slice(from..line_end).trim_end();
        if line == "---" || line == "..." {
            return true;
        }
        from = line_end;
    }
}

pub(crate) fn close(p: &mut Parser<'_>) -> bool {
    if p.cursor.index() != p.line_start {
        return false;
    }
    let line = p.cursor.line_text(p.line_start, false);
    let trimmed = line.trim_end();
    if trimmed != "---" && trimmed != "..." {
        return false;
    }
    p.asm.add_marker(line);
    p.asm.set_line_attr(LineAttr::FrontMatter {
        role: FenceRole::Close,
    });
    p.pop_context();
    p.cursor.set_index(p.line_end_offset());
    true
}

/// Runs when the front matter context pops. Parses the body as YAML,
/// reporting failures through `errors` and an [`SpanAttr::Error`]
/// annotation on the offending body line.
pub(crate) fn finalize(p: &mut Parser<'_>, payload: ContextPayload) {
    let ContextPayload::FrontMatter {
        body_start,
        first_body_line,
    } = payload
    else {
        return;
    };
    p.asm.drop_line_format(LineKey::FrontMatter);

    let body_end = p.construct_body_end(body_start);
    let body = p.cursor.slice(body_start..body_end).to_string();
    let end = if p.unwinding {
        p.cursor.len()
    } else {
        p.line_end_offset()
    };

    let data = match parse_yaml(&body) {
        Ok(value) => Some(value),
        Err(error) => {
            let message = error.to_string();
            annotate_error(p, first_body_line, error.line(), &message);
            p.push_issue(ParseIssue {
                message,
                start: body_start,
                end: body_end,
                severity: Severity::Error,
            });
            None
        }
    };
    p.push_structure(Structure::FrontMatter(FrontMatterEntry {
        start: 0,
        end,
        data,
    }));
}

/// Why a front matter body produced no data.
#[derive(Debug)]
pub(crate) enum FrontMatterError {
    /// YAML syntax or semantic error, with the zero-based body line
    /// when the parser reports one.
    Yaml {
        message: String,
        line: Option<usize>,
    },
    /// Parsed YAML that does not convert to JSON data.
    Convert(String),
}

impl FrontMatterError {
    fn line(&self) -> Option<usize> {
        match self {
            FrontMatterError::Yaml { line, .. } => *line,
            FrontMatterError::Convert(_) => None,
        }
    }
}

impl std::fmt::Display for FrontMatterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FrontMatterError::Yaml { message, .. } => write!(f, "{message}"),
            FrontMatterError::Convert(message) => write!(f, "{message}"),
        }
    }
}

impl std::error::Error for FrontMatterError {}

impl From<serde_yaml::Error> for FrontMatterError {
    fn from(e: serde_yaml::Error) -> Self {
        FrontMatterError::Yaml {
            line: e.location().map(|l| l.line().saturating_sub(1)),
            message: e.to_string(),
        }
    }
}

impl From<serde_json::Error> for FrontMatterError {
    fn from(e: serde_json::Error) -> Self {
        FrontMatterError::Convert(e.to_string())
    }
}

/// YAML body to JSON data.
fn parse_yaml(body: &str) -> Result<serde_json::Value, FrontMatterError> {
    let parsed = serde_yaml::from_str::<serde_yaml::Value>(body)?;
    Ok(serde_json::to_value(parsed)?)
}

/// Marks every span of the offending body line with an error. Without
/// a reported location the first body line takes the annotation.
fn annotate_error(p: &mut Parser<'_>, first_body_line: usize, line: Option<usize>, message: &str) {
    let body_lines = p.asm.line_count().saturating_sub(first_body_line);
    if body_lines == 0 {
        return;
    }
    let index = first_body_line + line.unwrap_or(0).min(body_lines - 1);
    let spans = p
        .asm
        .line(index)
        .spans
        .iter()
        .cloned()
        .map(|mut span| {
            span.attrs.insert(SpanAttr::Error {
                message: message.to_string(),
            });
            span
        })
        .collect();
    p.asm.rewrite_line(index, spans);
}
