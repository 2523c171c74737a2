//! Small cluster-classification helpers shared by the recognizer rules.

/// Check if a cluster starts a word: alphanumeric or underscore, the
/// same notion of "word" the tag and emphasis boundary checks use.
pub(crate) fn is_word_cluster(cluster: &str) -> bool {
    cluster
        .chars()
        .next()
        .is_some_and(|c| c.is_alphanumeric() || c == '_')
}

/// Check if a cluster is whitespace, a line break included.
pub(crate) fn is_blank_cluster(cluster: &str) -> bool {
    cluster.chars().all(char::is_whitespace)
}

/// Check if an optional cluster counts as text for the "touches text"
/// delimiter gates: present and not whitespace.
pub(crate) fn touches_text(cluster: Option<&str>) -> bool {
    cluster.is_some_and(|c| !is_blank_cluster(c))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn word_clusters() {
        assert!(is_word_cluster("a"));
        assert!(is_word_cluster("Ż"));
        assert!(is_word_cluster("7"));
        assert!(is_word_cluster("_"));
        assert!(!is_word_cluster("-"));
        assert!(!is_word_cluster(" "));
        assert!(!is_word_cluster(""));
    }

    #[test]
    fn touch_gate() {
        assert!(touches_text(Some("x")));
        assert!(touches_text(Some("🙂")));
        assert!(!touches_text(Some(" ")));
        assert!(!touches_text(Some("\n")));
        assert!(!touches_text(Some("\r\n")));
        assert!(!touches_text(None));
    }
}
