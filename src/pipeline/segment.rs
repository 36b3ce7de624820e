//! Segmentation: split a Markdown document into slide-sized chunks.
//!
//! Slides are delimited by lines that hold exactly `---`. The separator is a
//! fixed convention shared with whoever authored the document; a document
//! without separators is a single slide.

use once_cell::sync::Lazy;
use regex::Regex;

/// A separator line: `---` with optional horizontal whitespace around it.
/// The optional `\r` keeps CRLF documents splitting correctly.
static RE_SEPARATOR: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^[ \t]*---[ \t]*\r?$").unwrap());

/// Split `raw` into trimmed, non-empty segments in document order.
pub fn segment(raw: &str) -> Vec<&str> {
    RE_SEPARATOR
        .split(raw)
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_on_separator_lines() {
        let doc = "# One\nbody\n---\n# Two\n---\n# Three";
        assert_eq!(segment(doc), vec!["# One\nbody", "# Two", "# Three"]);
    }

    #[test]
    fn test_no_separator_is_one_segment() {
        let doc = "\n\n# Only\n\ntext\n\n";
        assert_eq!(segment(doc), vec!["# Only\n\ntext"]);
    }

    #[test]
    fn test_empty_segments_dropped() {
        let doc = "---\n\n---\n# A\n---\n   \n---\n";
        assert_eq!(segment(doc), vec!["# A"]);
    }

    #[test]
    fn test_empty_document() {
        assert!(segment("").is_empty());
        assert!(segment("  \n\t\n").is_empty());
    }

    #[test]
    fn test_separator_with_surrounding_whitespace() {
        let doc = "A\n  ---  \nB";
        assert_eq!(segment(doc), vec!["A", "B"]);
    }

    #[test]
    fn test_crlf_separator() {
        let doc = "A\r\n---\r\nB\r\n";
        assert_eq!(segment(doc), vec!["A", "B"]);
    }

    #[test]
    fn test_longer_rules_are_not_separators() {
        let doc = "A\n----\nB\n--- x\nC";
        assert_eq!(segment(doc).len(), 1);
    }

    #[test]
    fn test_inline_dashes_are_not_separators() {
        let doc = "range 1---5\nnext";
        assert_eq!(segment(doc), vec!["range 1---5\nnext"]);
    }
}
