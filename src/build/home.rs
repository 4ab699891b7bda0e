//! Homepage builder.
//!
//! Merges the per-category card lists into one deduplicated, time-sorted
//! grid: up to [`HOME_PER_CATEGORY`] cards per category in the configured
//! display order, then a sweep over categories the order left out, capped at
//! [`HOME_CAP`] cards total. A non-empty link appears at most once across
//! the whole homepage, kept at its first encounter.

use itertools::Itertools;
use std::collections::{BTreeMap, HashSet};
use std::error::Error;
use std::path::Path;
use tracing::{info, instrument};

use crate::build::{HOME_CAP, HOME_PER_CATEGORY};
use crate::config::SiteConfig;
use crate::models::Card;
use crate::render::RenderPage;

/// Assemble the homepage card list from the per-category results.
///
/// Pure selection logic, separated from rendering so it can be exercised
/// directly in tests.
pub fn select_home_cards(
    category_map: &BTreeMap<String, Vec<Card>>,
    order: &[String],
) -> Vec<Card> {
    let mut selected: Vec<Card> = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();

    let ordered = order.iter();
    let swept = category_map.keys().filter(|k| !order.contains(k));

    for category in ordered.chain(swept) {
        let Some(cards) = category_map.get(category) else {
            continue;
        };
        for card in cards.iter().take(HOME_PER_CATEGORY) {
            // Empty links carry no identity and never dedup.
            if !card.link.is_empty() && !seen.insert(card.link.as_str()) {
                continue;
            }
            selected.push(card.clone());
        }
    }

    selected
        .into_iter()
        .sorted_by(|a, b| b.ts.cmp(&a.ts))
        .take(HOME_CAP)
        .collect()
}

/// Build and persist `<out_dir>/index.html` from all category results.
#[instrument(level = "info", skip_all)]
pub async fn build_home(
    category_map: &BTreeMap<String, Vec<Card>>,
    config: &SiteConfig,
    renderer: &dyn RenderPage,
    out_dir: &Path,
) -> Result<(), Box<dyn Error>> {
    let cards = select_home_cards(category_map, &config.meta.home_order);
    let meta = config.home_meta();

    let html = renderer.render(&meta, &cards)?;
    let out_path = out_dir.join(format!("{}.html", meta.slug));
    tokio::fs::write(&out_path, html).await?;
    info!(path = %out_path.display(), grid = cards.len(), "Built homepage");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(link: &str, ts: i64, category: &str) -> Card {
        Card {
            title: format!("Story {link}"),
            link: link.to_string(),
            source: "Example Wire".to_string(),
            summary: String::new(),
            image: None,
            ts,
            date: String::new(),
            category: category.to_string(),
            commentary: String::new(),
        }
    }

    #[test]
    fn test_per_category_cap() {
        let map = BTreeMap::from([(
            "A".to_string(),
            (0..10).map(|i| card(&format!("a{i}"), 100 - i, "A")).collect(),
        )]);
        let out = select_home_cards(&map, &["A".to_string()]);
        assert_eq!(out.len(), HOME_PER_CATEGORY);
    }

    #[test]
    fn test_dedup_keeps_first_encounter() {
        let shared = "https://example.com/shared";
        let map = BTreeMap::from([
            ("A".to_string(), vec![card(shared, 10, "A")]),
            ("B".to_string(), vec![card(shared, 10, "B"), card("b1", 5, "B")]),
        ]);
        let order = vec!["A".to_string(), "B".to_string()];
        let out = select_home_cards(&map, &order);

        let hits: Vec<&Card> = out.iter().filter(|c| c.link == shared).collect();
        assert_eq!(hits.len(), 1);
        // First encounter per the ordered pass wins.
        assert_eq!(hits[0].category, "A");
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn test_sweep_covers_unordered_categories() {
        let map = BTreeMap::from([
            ("Listed".to_string(), vec![card("l1", 10, "Listed")]),
            ("Stray".to_string(), vec![card("s1", 20, "Stray")]),
        ]);
        let out = select_home_cards(&map, &["Listed".to_string()]);
        assert_eq!(out.len(), 2);
        // Final order is by timestamp, regardless of pass order.
        assert_eq!(out[0].link, "s1");
        assert_eq!(out[1].link, "l1");
    }

    #[test]
    fn test_total_cap() {
        let mut map = BTreeMap::new();
        for c in 0..20 {
            let name = format!("C{c:02}");
            let cards = (0..HOME_PER_CATEGORY)
                .map(|i| card(&format!("{name}-{i}"), (c * 10 + i) as i64 + 1, &name))
                .collect();
            map.insert(name, cards);
        }
        let out = select_home_cards(&map, &[]);
        assert_eq!(out.len(), HOME_CAP);
        // Sorted newest first.
        assert!(out.windows(2).all(|w| w[0].ts >= w[1].ts));
    }

    #[test]
    fn test_empty_links_never_dedup() {
        let map = BTreeMap::from([
            ("A".to_string(), vec![card("", 10, "A")]),
            ("B".to_string(), vec![card("", 5, "B")]),
        ]);
        let out = select_home_cards(&map, &[]);
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn test_missing_ordered_category_is_skipped() {
        let map = BTreeMap::from([("A".to_string(), vec![card("a1", 1, "A")])]);
        let out = select_home_cards(&map, &["Ghost".to_string(), "A".to_string()]);
        assert_eq!(out.len(), 1);
    }
}
