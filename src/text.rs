//! Plain-text extraction from feed markup.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::Html;

static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Strip all markup from a feed entry body, returning plain text with
/// whitespace runs collapsed to single spaces and the ends trimmed.
///
/// Malformed markup never fails: the fragment parser recovers and whatever
/// it could not interpret as tags survives as text. Empty input yields the
/// empty string.
pub fn clean_text(html: &str) -> String {
    if html.trim().is_empty() {
        return String::new();
    }
    let fragment = Html::parse_fragment(html);
    let text = fragment.root_element().text().collect::<Vec<_>>().join(" ");
    WHITESPACE_RUN.replace_all(&text, " ").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_tags() {
        let out = clean_text("<p>Hello <b>world</b></p>");
        assert_eq!(out, "Hello world");
    }

    #[test]
    fn test_no_tags_and_no_whitespace_runs() {
        let out = clean_text("<div> A   lot\n\nof\t <span>space</span> </div>");
        assert!(!out.contains('<'));
        assert!(!out.contains('>'));
        assert!(!WHITESPACE_RUN.find_iter(&out).any(|m| m.as_str().len() > 1));
        assert_eq!(out, "A lot of space");
    }

    #[test]
    fn test_malformed_markup_does_not_fail() {
        let out = clean_text("<p>Unclosed <b>bold and <broken");
        assert!(out.contains("Unclosed"));
        assert!(out.contains("bold and"));
    }

    #[test]
    fn test_plain_text_passes_through() {
        assert_eq!(clean_text("just text"), "just text");
    }

    #[test]
    fn test_empty_input_yields_empty() {
        assert_eq!(clean_text(""), "");
        assert_eq!(clean_text("   \n  "), "");
    }
}
