//! Line-based title extraction.
//!
//! Only the first three lines of a segment are inspected. Title markers deeper
//! in the body are ordinary content; scanning further produced false
//! positives on bold lead-ins inside the body text.
//!
//! Per line, in priority order:
//! 1. ATX heading (`#`, `##`, …)
//! 2. a fully bold line (`**…**`)
//! 3. a `Slide N:` annotation, optionally preceded by `**`
//!
//! When nothing matches the structurer gets a second chance on the parsed
//! Markdown tree (see [`super::structure`]).

use super::clean::{clean_title, SLIDE_WORD};
use once_cell::sync::Lazy;
use regex::Regex;

/// Number of leading lines that may carry the title.
pub const TITLE_SCAN_LINES: usize = 3;

static RE_SLIDE_ANNOTATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!(r"^(?:\*\*)?{SLIDE_WORD}\s+\d+:")).unwrap());

/// Extract a title from the first lines of `segment`.
///
/// Returns the cleaned title and the remainder of the segment (all lines after
/// the title line, trimmed). When no title is found, or the title cleans down
/// to nothing, returns `None` and the segment unchanged.
pub fn extract_title(segment: &str) -> (Option<String>, &str) {
    let mut offset = 0;

    for raw_line in segment.split_inclusive('\n').take(TITLE_SCAN_LINES) {
        offset += raw_line.len();

        if let Some(candidate) = title_candidate(raw_line.trim()) {
            let title = clean_title(&candidate);
            if title.is_empty() {
                return (None, segment);
            }
            return (Some(title), segment[offset..].trim());
        }
    }

    (None, segment)
}

/// Match one trimmed line against the title markers.
fn title_candidate(line: &str) -> Option<String> {
    if line.starts_with('#') {
        return Some(line.trim_start_matches('#').trim_start().to_string());
    }

    if line.len() >= 4 && line.starts_with("**") && line.ends_with("**") {
        return Some(line.trim_matches('*').to_string());
    }

    if let Some(m) = RE_SLIDE_ANNOTATION.find(line) {
        return Some(line[m.end()..].trim_end_matches('*').to_string());
    }

    None
}
