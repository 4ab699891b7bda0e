//! Utility functions for slug generation, date formatting, and file system checks.

use chrono::{Local, TimeZone};
use std::error::Error;
use std::fs as stdfs;
use tokio::fs;
use tracing::{info, instrument};

/// Convert a category name to a URL-friendly slug.
///
/// Lowercases the text, drops characters that are neither alphanumeric,
/// whitespace, nor hyphens, and joins the remaining words with single
/// hyphens.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(slugify("AI News"), "ai-news");
/// assert_eq!(slugify("EVs & Automotive"), "evs-automotive");
/// ```
pub fn slugify(name: &str) -> String {
    name.to_lowercase()
        .replace(|c: char| !c.is_alphanumeric() && !c.is_whitespace() && c != '-', "")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}

/// Format a Unix timestamp as a human-readable date, e.g. `November 14, 2023`.
///
/// A timestamp of `0` means "unknown" and formats as the empty string.
pub fn fmt_date(ts: i64) -> String {
    if ts == 0 {
        return String::new();
    }
    match Local.timestamp_opt(ts, 0).single() {
        Some(dt) => dt.format("%B %d, %Y").to_string(),
        None => String::new(),
    }
}

/// Ensure a directory exists and is writable.
///
/// Creates the directory if it doesn't exist, then performs a write test by
/// creating and immediately deleting a probe file.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or is not writable
/// (permission denied, read-only filesystem, etc.).
#[instrument(level = "info", skip_all, fields(path = %path))]
pub async fn ensure_writable_dir(path: &str) -> Result<(), Box<dyn Error>> {
    if let Err(e) = fs::create_dir_all(path).await {
        return Err(Box::new(e));
    }
    // Try a small sync write using std fs (simpler error surface)
    let probe_path = format!("{}/..__probe_write__", path.trim_end_matches('/'));
    match stdfs::File::create(&probe_path) {
        Ok(_) => {
            let _ = stdfs::remove_file(&probe_path);
            info!("Output directory is writable");
            Ok(())
        }
        Err(e) => Err(Box::new(e)),
    }
}
