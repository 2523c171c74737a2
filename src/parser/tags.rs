//! Tags: `#name` with optional `/`-separated sub-names. The hash must
//! sit at a word boundary, so `test#tag` is plain text, and a tag of
//! digits alone is not a tag.

use unicode_segmentation::UnicodeSegmentation;

use crate::line::{AttrSet, SpanAttr};
use crate::parser::Parser;
use crate::structure::{Structure, TagEntry};
use crate::utils::is_word_cluster;

pub(crate) fn claim(p: &mut Parser<'_>) -> bool {
    if !matches!(p.cursor.current(), Some("#")) {
        return false;
    }
    // A word cluster right before the hash glues it to that word.
    if p.cursor.prev_cluster().is_some_and(is_word_cluster) {
        return false;
    }
    if !p.cursor.peek(1).is_some_and(is_word_cluster) {
        return false;
    }
    let start = p.cursor.index();
    let line_end = p.line_end_offset();
    let (names, len) = scan_names(p.cursor.slice(start + 1..line_end));
    if names.is_empty() {
        return false;
    }

    let end = start + 1 + len;
    let text = p.cursor.slice(start..end).to_string();
    let context = p.line_context();
    p.asm.add_span(
        text,
        AttrSet::single(SpanAttr::Tag {
            names: names.clone(),
        }),
    );
    p.push_structure(Structure::Tag(TagEntry {
        start,
        end,
        names,
        context,
    }));
    p.cursor.set_index(end);
    true
}

/// Collect `/`-separated tag names from the text after the hash.
/// Returns the names and the byte length of the claimed run; trailing
/// separators are not part of the claim.
fn scan_names(rest: &str) -> (Vec<String>, usize) {
    let mut names: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut claimed = 0;
    let mut offset = 0;

    for cluster in rest.graphemes(true) {
        if is_name_cluster(cluster) {
            current.push_str(cluster);
            offset += cluster.len();
            claimed = offset;
        } else if cluster == "/" && !current.is_empty() {
            names.push(std::mem::take(&mut current));
            offset += 1;
        } else {
            break;
        }
    }
    if !current.is_empty() {
        names.push(current);
    }

    // A hash followed by digits alone reads as a numeric reference.
    if names
        .first()
        .is_some_and(|n| n.bytes().all(|b| b.is_ascii_digit()))
    {
        return (Vec::new(), 0);
    }
    (names, claimed)
}

fn is_name_cluster(cluster: &str) -> bool {
    is_word_cluster(cluster) || cluster == "-"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_and_lengths() {
        assert_eq!(scan_names("foo rest"), (vec!["foo".to_string()], 3));
        assert_eq!(
            scan_names("a/b c"),
            (vec!["a".to_string(), "b".to_string()], 3)
        );
        assert_eq!(scan_names("a/b/"), (vec!["a".to_string(), "b".to_string()], 3));
        assert_eq!(scan_names("a//b"), (vec!["a".to_string()], 1));
        assert_eq!(scan_names("wiki-style_x"), (vec!["wiki-style_x".to_string()], 12));
        assert_eq!(scan_names("123"), (vec![], 0));
        assert_eq!(scan_names("123/abc"), (vec![], 0));
        assert_eq!(scan_names("1a"), (vec!["1a".to_string()], 2));
    }
}
