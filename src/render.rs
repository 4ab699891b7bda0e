//! Page rendering seam.
//!
//! The builders hand a metadata object and an ordered card list to a
//! [`RenderPage`] collaborator and get back a finished document string; they
//! never inspect it. [`HtmlRenderer`] is the built-in implementation, a
//! plain `write!`-assembled page. Swapping in a real template engine means
//! implementing the trait, nothing more.

use std::error::Error;
use std::fmt::Write;

use crate::models::{Card, CategoryMeta};

/// Render one page from its metadata and ordered cards.
pub trait RenderPage {
    fn render(&self, meta: &CategoryMeta, cards: &[Card]) -> Result<String, Box<dyn Error>>;
}

/// Built-in renderer producing a self-contained HTML document.
#[derive(Debug, Default)]
pub struct HtmlRenderer;

impl RenderPage for HtmlRenderer {
    fn render(&self, meta: &CategoryMeta, cards: &[Card]) -> Result<String, Box<dyn Error>> {
        let mut doc = String::new();

        writeln!(doc, "<!DOCTYPE html>")?;
        writeln!(doc, "<html lang=\"en\">")?;
        writeln!(doc, "<head>")?;
        writeln!(doc, "<meta charset=\"utf-8\">")?;
        writeln!(
            doc,
            "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">"
        )?;
        writeln!(doc, "<title>{}</title>", escape_text(&meta.title))?;
        if !meta.description.is_empty() {
            writeln!(
                doc,
                "<meta name=\"description\" content=\"{}\">",
                escape_attr(&meta.description)
            )?;
        }
        writeln!(doc, "<link rel=\"stylesheet\" href=\"assets/style.css\">")?;
        writeln!(doc, "</head>")?;
        writeln!(doc, "<body>")?;

        writeln!(doc, "<header>")?;
        writeln!(doc, "<h1>{}</h1>", escape_text(&meta.h1))?;
        if !meta.h2.is_empty() {
            writeln!(doc, "<h2>{}</h2>", escape_text(&meta.h2))?;
        }
        writeln!(doc, "</header>")?;

        writeln!(doc, "<main class=\"grid\">")?;
        for card in cards {
            writeln!(doc, "<article class=\"card\">")?;
            if let Some(image) = card.image.as_deref() {
                writeln!(
                    doc,
                    "<img src=\"{}\" alt=\"\" loading=\"lazy\">",
                    escape_attr(image)
                )?;
            }
            if card.link.is_empty() {
                writeln!(doc, "<h3>{}</h3>", escape_text(&card.title))?;
            } else {
                writeln!(
                    doc,
                    "<h3><a href=\"{}\">{}</a></h3>",
                    escape_attr(&card.link),
                    escape_text(&card.title)
                )?;
            }
            write!(doc, "<p class=\"meta\">{}", escape_text(&card.source))?;
            if !card.date.is_empty() {
                write!(doc, " · {}", escape_text(&card.date))?;
            }
            writeln!(doc, "</p>")?;
            if !card.summary.is_empty() {
                writeln!(doc, "<p class=\"summary\">{}</p>", escape_text(&card.summary))?;
            }
            writeln!(doc, "</article>")?;
        }
        writeln!(doc, "</main>")?;

        writeln!(doc, "</body>")?;
        writeln!(doc, "</html>")?;

        Ok(doc)
    }
}

/// Escape text interpolated into element content.
fn escape_text(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

/// Escape text interpolated into a double-quoted attribute value.
fn escape_attr(s: &str) -> String {
    escape_text(s).replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CategoryMeta;

    fn card(title: &str, link: &str) -> Card {
        Card {
            title: title.to_string(),
            link: link.to_string(),
            source: "Example Wire".to_string(),
            summary: "A summary.".to_string(),
            image: Some("https://images.unsplash.com/photo-1".to_string()),
            ts: 1_700_000_000,
            date: "November 14, 2023".to_string(),
            category: "AI News".to_string(),
            commentary: String::new(),
        }
    }

    #[test]
    fn test_renders_meta_and_cards() {
        let meta = CategoryMeta::fallback("AI News");
        let cards = vec![card("Story One", "https://example.com/1")];
        let html = HtmlRenderer.render(&meta, &cards).unwrap();

        assert!(html.contains("<title>AI News</title>"));
        assert!(html.contains("<h1>AI News</h1>"));
        assert!(html.contains("Story One"));
        assert!(html.contains("https://example.com/1"));
        assert!(html.contains("November 14, 2023"));
    }

    #[test]
    fn test_zero_cards_renders_empty_grid() {
        let meta = CategoryMeta::fallback("Empty");
        let html = HtmlRenderer.render(&meta, &[]).unwrap();
        assert!(html.contains("<main class=\"grid\">"));
        assert!(!html.contains("<article"));
    }

    #[test]
    fn test_escapes_feed_controlled_text() {
        let meta = CategoryMeta::fallback("X");
        let mut c = card("<script>alert(1)</script>", "");
        c.summary = "a & b".to_string();
        let html = HtmlRenderer.render(&meta, &[c]).unwrap();
        assert!(!html.contains("<script>alert"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("a &amp; b"));
    }

    #[test]
    fn test_empty_link_renders_plain_heading() {
        let meta = CategoryMeta::fallback("X");
        let html = HtmlRenderer.render(&meta, &[card("No Link", "")]).unwrap();
        assert!(html.contains("<h3>No Link</h3>"));
        assert!(!html.contains("<h3><a"));
    }
}
