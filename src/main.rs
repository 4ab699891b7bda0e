//! # The Tech Brief
//!
//! A static news site builder that fetches categorized RSS/Atom feeds,
//! normalizes entries into display cards, and renders one HTML page per
//! category plus a deduplicated homepage.
//!
//! ## Features
//!
//! - Parses RSS and Atom feeds grouped into topical categories
//! - Extracts a representative image per entry through a prioritized
//!   fallback chain (media attachments, enclosures, embedded markup)
//! - Produces a short extractive summary of each entry body
//! - Substitutes copyright-safe stock images for untrusted sources
//! - Merges category results into a time-sorted, deduplicated homepage
//!
//! ## Usage
//!
//! ```sh
//! tech_brief -o ./docs
//! ```
//!
//! ## Architecture
//!
//! The build is a sequential pipeline:
//! 1. **Configuration**: load the feed map and category metadata once
//! 2. **Category builds**: fetch sources, normalize entries, render pages
//! 3. **Homepage**: merge, dedup, and render after all categories finish

use clap::Parser;
use std::collections::BTreeMap;
use std::error::Error;
use std::path::Path;
use tracing::{debug, error, info, instrument, warn};
use tracing_subscriber::{fmt as tfmt, EnvFilter};

mod build;
mod cli;
mod config;
mod feeds;
mod images;
mod models;
mod render;
mod summarize;
mod text;
mod utils;

use cli::Cli;
use config::SiteConfig;
use models::Card;
use render::HtmlRenderer;
use utils::ensure_writable_dir;

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("tech_brief starting up");

    // Parse CLI
    let args = Cli::parse();
    debug!(?args.output_dir, ?args.feeds, ?args.meta, "Parsed CLI arguments");

    // --- Load configuration (startup precondition: fatal on failure) ---
    let config = match SiteConfig::load(
        Path::new(&args.feeds),
        Path::new(&args.meta),
        args.image_policy,
    ) {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Failed to load site configuration");
            return Err(e);
        }
    };

    // Early check: ensure the output dir is writable
    if let Err(e) = ensure_writable_dir(&args.output_dir).await {
        error!(
            path = %args.output_dir,
            error = %e,
            "Output directory is not writable (fix perms or choose a different path)"
        );
        return Err(e);
    }
    let out_dir = Path::new(&args.output_dir);

    let client = feeds::build_client(args.timeout_secs)?;
    let renderer = HtmlRenderer;

    // ---- Build categories sequentially ----
    let mut category_map: BTreeMap<String, Vec<Card>> = BTreeMap::new();
    for (name, urls) in &config.feeds {
        info!(category = %name, sources = urls.len(), "Building category");
        match build::category::build_category(&client, name, urls, &config, &renderer, out_dir)
            .await
        {
            Ok(cards) => {
                info!(category = %name, items = cards.len(), "Category build complete");
                category_map.insert(name.clone(), cards);
            }
            Err(e) => {
                // Only output-file writes fail a category; that is an
                // environment problem the whole build shares.
                error!(category = %name, error = %e, "Category build failed");
                return Err(e);
            }
        }
    }

    if category_map.is_empty() {
        warn!("No categories configured; homepage will be empty");
    }

    // ---- Homepage, strictly after all category builds ----
    build::home::build_home(&category_map, &config, &renderer, out_dir).await?;

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        categories = category_map.len(),
        "Build complete"
    );

    Ok(())
}
