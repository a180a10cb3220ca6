//! Review text cleanup before it is shown to users.

use once_cell::sync::Lazy;
use regex::Regex;

/// Longest excerpt returned in a comparison, in characters.
pub const MAX_REVIEW_CHARS: usize = 500;

static URL_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?:https?://|www\.)\S+").unwrap());
static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\S+@\S+").unwrap());
static WHITESPACE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());
// Runs of 3+ identical terminal marks are squashed to two
static PUNCT_RUN_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"!{3,}|\?{3,}|\.{3,}|।{3,}|॥{3,}").unwrap());

/// Strips links and e-mail addresses, collapses whitespace and squashes punctuation runs.
pub fn clean_text(text: &str) -> String {
    let text = URL_REGEX.replace_all(text, "");
    let text = EMAIL_REGEX.replace_all(&text, "");
    let text = PUNCT_RUN_REGEX.replace_all(&text, |caps: &regex::Captures| {
        caps[0].chars().take(2).collect::<String>()
    });
    let text = WHITESPACE_REGEX.replace_all(&text, " ");
    text.trim().to_string()
}

/// Cuts `text` to at most `max_chars` characters, marking the cut with `...`.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(max_chars.saturating_sub(3)).collect();
    cut.truncate(cut.trim_end().len());
    cut.push_str("...");
    cut
}

/// `clean_text` followed by the display length cap.
pub fn display_text(text: &str) -> String {
    truncate_chars(&clean_text(text), MAX_REVIEW_CHARS)
}
