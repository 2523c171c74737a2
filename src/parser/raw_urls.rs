//! Bare URLs in running text, recognized by scheme at a word boundary.
//! Declared after the bracketed link rules, so those always win when
//! both could match.

use std::sync::LazyLock;

use regex::Regex;

use crate::line::{AttrSet, SpanAttr};
use crate::parser::Parser;
use crate::structure::{EmbedEntry, LinkEntry, LinkForm, Structure};
use crate::utils::is_word_cluster;

static URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^(https?://|ftp://|mailto:)[^\s<>\[\]()'"`]+"#).expect("url pattern compiles")
});

pub(crate) fn claim(p: &mut Parser<'_>) -> bool {
    if !matches!(p.cursor.current(), Some("h" | "f" | "m")) {
        return false;
    }
    if p.cursor.prev_cluster().is_some_and(is_word_cluster) {
        return false;
    }
    let start = p.cursor.index();
    let line_end = p.line_end_offset();
    let rest = p.cursor.slice(start..line_end);
    let Some(captures) = URL_PATTERN.captures(rest) else {
        return false;
    };
    let whole = captures.get(0).map_or(0, |m| m.end());
    let scheme = captures.get(1).map_or(0, |m| m.end());
    let url = trim_trailing(&rest[..whole], scheme);
    // Nothing but the scheme left after trimming is not a link.
    if url.len() <= scheme {
        return false;
    }

    let url = url.to_string();
    let end = start + url.len();
    let from = p.options.filepath.clone();
    let context = p.line_context();
    let structure = if p.options.auto_embed_raw_links {
        Structure::Embed(EmbedEntry {
            start,
            end,
            form: LinkForm::Raw,
            href: url.clone(),
            text: None,
            content_id: None,
            from,
            context,
        })
    } else {
        Structure::Link(LinkEntry {
            start,
            end,
            form: LinkForm::Raw,
            href: url.clone(),
            text: None,
            content_id: None,
            from,
            context,
        })
    };

    p.asm
        .add_span(url.clone(), AttrSet::single(SpanAttr::Link { href: url }));
    p.push_structure(structure);
    p.cursor.set_index(end);
    true
}

/// Strip punctuation a sentence hangs onto the end of a URL, keeping
/// at least the scheme.
fn trim_trailing(url: &str, min_len: usize) -> &str {
    let mut end = url.len();
    for c in url.chars().rev() {
        if end > min_len && matches!(c, '.' | ',' | ';' | ':' | '!' | '?') {
            end -= c.len_utf8();
        } else {
            break;
        }
    }
    &url[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pattern_anchors_at_start() {
        assert!(URL_PATTERN.is_match("https://example.com"));
        assert!(URL_PATTERN.is_match("ftp://host/file"));
        assert!(URL_PATTERN.is_match("mailto:a@b.se"));
        assert!(!URL_PATTERN.is_match("see https://example.com"));
        assert!(!URL_PATTERN.is_match("httpx://nope"));
    }

    #[test]
    fn trailing_punctuation_is_not_part_of_the_url() {
        assert_eq!(trim_trailing("https://a.se/b.", 8), "https://a.se/b");
        assert_eq!(trim_trailing("https://a.se/b?!", 8), "https://a.se/b");
        assert_eq!(trim_trailing("https://a.se/b?q=1", 8), "https://a.se/b?q=1");
        assert_eq!(trim_trailing("mailto:.", 7), "mailto:");
    }
}
