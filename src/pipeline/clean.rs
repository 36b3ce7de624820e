//! Text cleaning: strip generator scaffolding from titles and body text.
//!
//! Decks produced by LLM generators often carry leftovers that must never
//! reach a slide: `**Slide 3: …**` numbering in front of titles, stray
//! emphasis markers, and `(AI prompt: …)` instructions meant for an image or
//! diagram model. Each rule below is a pure `&str → String` pass so the two
//! public cleaners are plain compositions of them.
//!
//! Both cleaners are idempotent: running them on their own output changes
//! nothing.

use once_cell::sync::Lazy;
use regex::Regex;

/// Clean an extracted title.
///
/// Rules (applied in order):
/// 1. Strip a leading `**Slide N:` / `Slide N:` numbering prefix
/// 2. Strip leading and trailing runs of `*`
/// 3. Collapse whitespace runs to a single space and trim
pub fn clean_title(title: &str) -> String {
    let s = strip_slide_prefix(title);
    let s = strip_stray_asterisks(&s);
    collapse_whitespace(&s)
}

/// Clean a paragraph or bullet string.
///
/// Rules (applied in order):
/// 1. Remove `(AI prompt: …)` spans, which may cross line breaks
/// 2. Collapse whitespace runs (newlines included) and trim
pub fn clean_text(text: &str) -> String {
    let s = strip_ai_prompts(text);
    collapse_whitespace(&s)
}

// ── Rule: Slide numbering prefix ─────────────────────────────────────────────

/// Word used by generators to number slides. `Слайд` comes from the Russian
/// decks the converter is regularly fed.
pub(crate) const SLIDE_WORD: &str = r"(?:Slide|Слайд)";

static RE_SLIDE_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!(r"^\s*(?:\*\*)?{SLIDE_WORD}\s+\d+:\s*")).unwrap());

fn strip_slide_prefix(input: &str) -> String {
    RE_SLIDE_PREFIX.replace(input, "").into_owned()
}

// ── Rule: Stray asterisks ────────────────────────────────────────────────────

static RE_LEADING_STARS: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*\*+\s*").unwrap());
static RE_TRAILING_STARS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*\*+\s*$").unwrap());

fn strip_stray_asterisks(input: &str) -> String {
    let s = RE_LEADING_STARS.replace(input, "");
    RE_TRAILING_STARS.replace(&s, "").into_owned()
}

// ── Rule: AI prompt annotations ──────────────────────────────────────────────

static RE_AI_PROMPT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)\((?:AI\s+prompt|Промт\s+для\s+AI)\s*:.*?\)").unwrap());

fn strip_ai_prompts(input: &str) -> String {
    RE_AI_PROMPT.replace_all(input, "").into_owned()
}

// ── Rule: Whitespace ─────────────────────────────────────────────────────────

static RE_WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

fn collapse_whitespace(input: &str) -> String {
    RE_WHITESPACE.replace_all(input, " ").trim().to_string()
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_ai_prompt_inline() {
        assert_eq!(
            clean_text("Text (AI prompt: ignore this)  more"),
            "Text more"
        );
    }

    #[test]
    fn test_strip_ai_prompt_multiline() {
        let input = "Before (AI prompt: draw a chart\nwith two bars\nand a legend) after";
        assert_eq!(clean_text(input), "Before after");
    }

    #[test]
    fn test_strip_ai_prompt_non_greedy() {
        let input = "a (AI prompt: one) b (AI prompt: two) c";
        assert_eq!(clean_text(input), "a b c");
    }

    #[test]
    fn test_strip_ai_prompt_russian() {
        assert_eq!(clean_text("Рост (Промт для AI: график) продаж"), "Рост продаж");
    }

    #[test]
    fn test_ordinary_parentheses_kept() {
        assert_eq!(clean_text("Revenue (in USD)"), "Revenue (in USD)");
    }

    #[test]
    fn test_clean_text_idempotent() {
        let inputs = [
            "Text (AI prompt: x)  more",
            "  spaced\n\nout\ttext ",
            "plain",
            "",
        ];
        for input in inputs {
            let once = clean_text(input);
            assert_eq!(clean_text(&once), once, "input: {input:?}");
        }
    }

    #[test]
    fn test_clean_title_slide_prefix() {
        assert_eq!(clean_title("**Slide 3: Wrap-up**"), "Wrap-up");
        assert_eq!(clean_title("Slide 12: Roadmap"), "Roadmap");
        assert_eq!(clean_title("Слайд 2: Итоги"), "Итоги");
    }

    #[test]
    fn test_clean_title_stray_asterisks() {
        assert_eq!(clean_title("** Overview"), "Overview");
        assert_eq!(clean_title("Overview ***"), "Overview");
    }

    #[test]
    fn test_clean_title_collapses_whitespace() {
        assert_eq!(clean_title("  Big    picture \n view "), "Big picture view");
    }

    #[test]
    fn test_clean_title_keeps_inner_slide_word() {
        assert_eq!(clean_title("Why Slide 3: matters"), "Why Slide 3: matters");
    }

    #[test]
    fn test_clean_title_idempotent() {
        for input in ["**Slide 1: A**", "* B *", "C"] {
            let once = clean_title(input);
            assert_eq!(clean_title(&once), once);
        }
    }
}
