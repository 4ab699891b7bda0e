//! Category page builder.
//!
//! Fetches every feed source of one category, normalizes entries into cards,
//! orders them, applies the image trust filter, renders the page, and
//! returns the ordered cards for the home builder. A failed source fetch is
//! logged and skipped; only an output-file write failure propagates.

use reqwest::Client;
use std::error::Error;
use std::path::Path;
use tracing::{info, instrument, warn};

use crate::build::{PER_SOURCE_CAP, SUMMARY_SENTENCES};
use crate::config::SiteConfig;
use crate::feeds;
use crate::images::{self, ImageGuard, DEFAULT_IMAGE, DEFAULT_POOL};
use crate::models::{Card, RawEntry};
use crate::render::RenderPage;
use crate::summarize::summarize;
use crate::text::clean_text;
use crate::utils::fmt_date;

/// Build one category: fetch, normalize, order, filter images, render, and
/// persist `<out_dir>/<slug>.html`. Returns the ordered cards.
#[instrument(level = "info", skip_all, fields(category = %name))]
pub async fn build_category(
    client: &Client,
    name: &str,
    urls: &[String],
    config: &SiteConfig,
    renderer: &dyn RenderPage,
    out_dir: &Path,
) -> Result<Vec<Card>, Box<dyn Error>> {
    let mut cards = Vec::new();

    for url in urls {
        let parsed = match feeds::fetch_feed(client, url).await {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!(%url, error = %e, "Feed fetch failed; skipping source");
                continue;
            }
        };
        for entry in parsed.entries.into_iter().take(PER_SOURCE_CAP) {
            cards.push(make_card(entry, name));
        }
    }

    // Newest first; unknown timestamps (0) sort last. The sort is stable so
    // ties keep feed order.
    cards.sort_by(|a, b| b.ts.cmp(&a.ts));

    let meta = config.category_meta(name);

    // One-time image re-resolution, scoped to this category's pool.
    let default_pool: Vec<String> = DEFAULT_POOL.iter().map(|s| s.to_string()).collect();
    let pool = if meta.image_pool.is_empty() {
        &default_pool
    } else {
        &meta.image_pool
    };
    let fixed = meta.image.as_deref().unwrap_or(DEFAULT_IMAGE);
    let mut guard = ImageGuard::new(config.image_policy, fixed, pool);
    for card in &mut cards {
        let key = if card.link.is_empty() {
            &card.title
        } else {
            &card.link
        };
        card.image = Some(guard.resolve(card.image.as_deref(), key));
    }

    let html = renderer.render(&meta, &cards)?;
    let out_path = out_dir.join(format!("{}.html", meta.slug));
    tokio::fs::write(&out_path, html).await?;
    info!(path = %out_path.display(), items = cards.len(), "Built category page");

    Ok(cards)
}

/// Normalize one raw entry into a card, substituting the documented default
/// for every absent field.
fn make_card(entry: RawEntry, category: &str) -> Card {
    let image = images::first_image(&entry);
    let ts = entry.timestamp();
    let body = entry
        .summary_html
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .or(entry.content_html.first().map(String::as_str))
        .unwrap_or("");
    let summary = summarize(&clean_text(body), SUMMARY_SENTENCES);

    Card {
        title: entry.title.unwrap_or_else(|| "Untitled".to_string()),
        link: entry.link.unwrap_or_default(),
        source: entry.source_title.unwrap_or_else(|| "Unknown".to_string()),
        summary,
        image,
        ts,
        date: fmt_date(ts),
        category: category.to_string(),
        commentary: String::new(),
    }
}
