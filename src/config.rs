//! Site configuration: the feed-category map and category display metadata.
//!
//! Both files are read once at startup into a [`SiteConfig`] that is passed
//! by reference into the builders; there is no ambient global state. A
//! failure to load either file is fatal — it is a startup precondition, not
//! a per-item error.
//!
//! # File formats
//!
//! `feeds.json` maps category names to feed URL lists:
//!
//! ```json
//! { "AI News": ["https://example.com/ai.xml"], "Gaming": [] }
//! ```
//!
//! `meta.json` carries display metadata, the homepage category order, and
//! the homepage's own metadata:
//!
//! ```json
//! {
//!   "home": { "title": "The Tech Brief", "h1": "Today in Tech" },
//!   "home_order": ["AI News", "Gaming"],
//!   "categories": {
//!     "AI News": { "title": "AI News | The Tech Brief", "slug": "ai-news" }
//!   }
//! }
//! ```

use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::error::Error;
use std::fs;
use std::path::Path;
use tracing::info;

use crate::images::ImagePolicy;
use crate::models::CategoryMeta;

/// Display metadata and homepage layout, as loaded from `meta.json`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MetaConfig {
    /// Metadata for the homepage itself.
    #[serde(default)]
    pub home: Option<CategoryMeta>,
    /// Category display order on the homepage. Categories absent from this
    /// list are swept afterwards in name order.
    #[serde(default)]
    pub home_order: Vec<String>,
    /// Per-category metadata, keyed by category name.
    #[serde(default)]
    pub categories: HashMap<String, CategoryMeta>,
}

/// Everything a build needs, constructed once at process start.
#[derive(Debug, Clone)]
pub struct SiteConfig {
    /// Category name to feed source URLs. A `BTreeMap` keeps category
    /// iteration order deterministic across builds.
    pub feeds: BTreeMap<String, Vec<String>>,
    /// Display metadata.
    pub meta: MetaConfig,
    /// Image substitution policy for this build.
    pub image_policy: ImagePolicy,
}

impl SiteConfig {
    /// Load the feed map and metadata from their JSON files.
    pub fn load(
        feeds_path: &Path,
        meta_path: &Path,
        image_policy: ImagePolicy,
    ) -> Result<Self, Box<dyn Error>> {
        let feeds_raw = fs::read_to_string(feeds_path)
            .map_err(|e| format!("cannot read {}: {e}", feeds_path.display()))?;
        let feeds: BTreeMap<String, Vec<String>> = serde_json::from_str(&feeds_raw)
            .map_err(|e| format!("cannot parse {}: {e}", feeds_path.display()))?;

        let meta_raw = fs::read_to_string(meta_path)
            .map_err(|e| format!("cannot read {}: {e}", meta_path.display()))?;
        let meta: MetaConfig = serde_json::from_str(&meta_raw)
            .map_err(|e| format!("cannot parse {}: {e}", meta_path.display()))?;

        info!(
            categories = feeds.len(),
            meta_entries = meta.categories.len(),
            "Loaded site configuration"
        );
        Ok(SiteConfig {
            feeds,
            meta,
            image_policy,
        })
    }

    /// Resolve display metadata for a category, synthesizing defaults from
    /// the name when the configuration has no entry (or a partial one).
    pub fn category_meta(&self, name: &str) -> CategoryMeta {
        match self.meta.categories.get(name) {
            Some(meta) => meta.clone().or_fallback(name),
            None => CategoryMeta::fallback(name),
        }
    }

    /// Metadata for the homepage; synthesized when absent, with the slug
    /// pinned to `index` so the page lands at `index.html`.
    pub fn home_meta(&self) -> CategoryMeta {
        let mut meta = match &self.meta.home {
            Some(home) => home.clone().or_fallback("The Tech Brief"),
            None => CategoryMeta::fallback("The Tech Brief"),
        };
        meta.slug = "index".to_string();
        meta
    }
}
