//! Data models for feed entries and their renderable representations.
//!
//! This module defines the core data structures used throughout the pipeline:
//! - [`RawEntry`]: One item as parsed out of an RSS/Atom feed, all fields optional
//! - [`MediaRef`]: A media attachment reference (URL plus declared MIME type)
//! - [`Card`]: The normalized, renderable representation of one entry
//! - [`CategoryMeta`]: Display metadata for one category page
//!
//! `RawEntry` deliberately keeps every field optional: feeds in the wild omit
//! or mangle anything, so each consumer performs an explicit presence check
//! and substitutes a documented default instead of assuming shape.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::utils::slugify;

/// A media attachment reference carried by a feed entry.
///
/// Covers `media:content` entries and enclosures alike: a URL plus the
/// MIME type the feed declared for it, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaRef {
    /// The attachment URL.
    pub url: String,
    /// The declared MIME type (e.g. `image/jpeg`), if the feed provided one.
    pub mime: Option<String>,
}

/// One item parsed from a feed, before any normalization.
///
/// Every field is optional or may be empty. Downstream consumers apply
/// these defaults when a field is absent:
///
/// | Field | Default |
/// |-------|---------|
/// | `title` | `"Untitled"` |
/// | `link` | `""` |
/// | `source_title` | `"Unknown"` |
/// | `summary_html` | `""` |
/// | timestamp | `0` (sorts last, renders no date) |
#[derive(Debug, Clone, Default)]
pub struct RawEntry {
    /// The entry headline.
    pub title: Option<String>,
    /// Permalink to the full story.
    pub link: Option<String>,
    /// Publication timestamp; takes precedence over `updated`.
    pub published: Option<DateTime<Utc>>,
    /// Last-updated timestamp; used only when `published` is absent.
    pub updated: Option<DateTime<Utc>>,
    /// The summary/description field, raw markup included.
    pub summary_html: Option<String>,
    /// Embedded full-content HTML blocks.
    pub content_html: Vec<String>,
    /// `media:content` attachments, in feed order.
    pub media_content: Vec<MediaRef>,
    /// `media:thumbnail` URLs, in feed order.
    pub media_thumbnails: Vec<String>,
    /// Enclosure attachments, in feed order.
    pub enclosures: Vec<MediaRef>,
    /// Title of the feed this entry came from.
    pub source_title: Option<String>,
}

impl RawEntry {
    /// Unix timestamp for sorting: `published` wins over `updated`,
    /// absence of both yields `0`.
    pub fn timestamp(&self) -> i64 {
        self.published
            .or(self.updated)
            .map(|d| d.timestamp())
            .unwrap_or(0)
    }
}

/// The normalized, renderable representation of one feed entry.
///
/// Built once per entry by the category builder and never mutated afterwards,
/// except for the single image re-resolution pass applied before rendering.
/// Cards are not persisted; every build regenerates them from the feeds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Card {
    /// The entry headline; `"Untitled"` when the feed omitted one.
    pub title: String,
    /// Permalink to the full story; empty when absent. When non-empty this
    /// is the global dedup key across the whole site.
    pub link: String,
    /// Name of the publication the entry came from.
    pub source: String,
    /// Plain-text extractive summary, at most two sentences.
    pub summary: String,
    /// Resolved image URL. `None` until the trust-filter pass runs; always
    /// `Some` afterwards.
    pub image: Option<String>,
    /// Unix timestamp; `0` means unknown and sorts last.
    pub ts: i64,
    /// Human-readable publication date; empty when `ts` is `0`.
    pub date: String,
    /// Name of the category this card was built for.
    pub category: String,
    /// Reserved for editorial commentary; always empty today.
    pub commentary: String,
}

/// Display metadata for one category page.
///
/// Loaded from `meta.json` when present, otherwise synthesized from the
/// category name via [`CategoryMeta::fallback`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryMeta {
    /// Page `<title>`.
    #[serde(default)]
    pub title: String,
    /// Meta description.
    #[serde(default)]
    pub description: String,
    /// Main heading.
    #[serde(default)]
    pub h1: String,
    /// Subheading.
    #[serde(default)]
    pub h2: String,
    /// URL slug; the page is written to `<slug>.html`.
    #[serde(default)]
    pub slug: String,
    /// Fixed substitute image for the `fixed` trust policy.
    #[serde(default)]
    pub image: Option<String>,
    /// Substitute image pool for the pool-based trust policies.
    #[serde(default)]
    pub image_pool: Vec<String>,
}

impl CategoryMeta {
    /// Synthesize metadata from a bare category name: the name becomes the
    /// title and heading, the slugified name becomes the slug.
    pub fn fallback(name: &str) -> Self {
        CategoryMeta {
            title: name.to_string(),
            description: name.to_string(),
            h1: name.to_string(),
            h2: String::new(),
            slug: slugify(name),
            image: None,
            image_pool: Vec::new(),
        }
    }

    /// Fill any blank field with its synthesized default. Configured entries
    /// may specify only the fields they care about.
    pub fn or_fallback(mut self, name: &str) -> Self {
        let fb = CategoryMeta::fallback(name);
        if self.title.is_empty() {
            self.title = fb.title;
        }
        if self.h1.is_empty() {
            self.h1 = fb.h1;
        }
        if self.slug.is_empty() {
            self.slug = fb.slug;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_timestamp_prefers_published() {
        let entry = RawEntry {
            published: Some(Utc.timestamp_opt(100, 0).unwrap()),
            updated: Some(Utc.timestamp_opt(200, 0).unwrap()),
            ..Default::default()
        };
        assert_eq!(entry.timestamp(), 100);
    }

    #[test]
    fn test_timestamp_falls_back_to_updated() {
        let entry = RawEntry {
            updated: Some(Utc.timestamp_opt(200, 0).unwrap()),
            ..Default::default()
        };
        assert_eq!(entry.timestamp(), 200);
    }

    #[test]
    fn test_timestamp_unknown_is_zero() {
        let entry = RawEntry::default();
        assert_eq!(entry.timestamp(), 0);
    }

    #[test]
    fn test_meta_fallback_slugifies_name() {
        let meta = CategoryMeta::fallback("EVs & Automotive");
        assert_eq!(meta.title, "EVs & Automotive");
        assert_eq!(meta.slug, "evs-automotive");
        assert!(meta.h2.is_empty());
    }

    #[test]
    fn test_meta_or_fallback_keeps_configured_fields() {
        let meta = CategoryMeta {
            title: "AI News | The Tech Brief".to_string(),
            description: "Daily AI coverage".to_string(),
            h1: String::new(),
            h2: String::new(),
            slug: String::new(),
            image: None,
            image_pool: Vec::new(),
        }
        .or_fallback("AI News");

        assert_eq!(meta.title, "AI News | The Tech Brief");
        assert_eq!(meta.description, "Daily AI coverage");
        assert_eq!(meta.h1, "AI News");
        assert_eq!(meta.slug, "ai-news");
    }

    #[test]
    fn test_card_serialization_round_trip() {
        let card = Card {
            title: "Test Story".to_string(),
            link: "https://example.com/story".to_string(),
            source: "Example Wire".to_string(),
            summary: "A short summary.".to_string(),
            image: Some("https://images.unsplash.com/photo-1".to_string()),
            ts: 1_700_000_000,
            date: "November 14, 2023".to_string(),
            category: "AI News".to_string(),
            commentary: String::new(),
        };

        let json = serde_json::to_string(&card).unwrap();
        let back: Card = serde_json::from_str(&json).unwrap();
        assert_eq!(back.title, "Test Story");
        assert_eq!(back.ts, 1_700_000_000);
        assert!(back.commentary.is_empty());
    }
}
