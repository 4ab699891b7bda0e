//! Command-line interface definitions for The Tech Brief builder.
//!
//! This module defines the CLI arguments and options using the `clap` crate.
//! All arguments can be provided via command-line flags or environment
//! variables.

use clap::Parser;

use crate::images::ImagePolicy;

/// Command-line arguments for the site builder.
///
/// # Examples
///
/// ```sh
/// # Basic usage with the default data/ layout
/// tech_brief -o ./docs
///
/// # Custom configuration paths and the rotating substitution policy
/// tech_brief -o ./docs --feeds ./data/feeds.json --meta ./data/meta.json \
///     --image-policy rotating-pool
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Output directory for the generated site
    #[arg(short, long)]
    pub output_dir: String,

    /// Path to the feed-category mapping file
    #[arg(long, default_value = "data/feeds.json")]
    pub feeds: String,

    /// Path to the category metadata file
    #[arg(long, default_value = "data/meta.json")]
    pub meta: String,

    /// Untrusted-image substitution policy for this build
    #[arg(long, value_enum, default_value = "hash-pool")]
    pub image_policy: ImagePolicy,

    /// Per-fetch timeout in seconds
    #[arg(long, env = "FEED_TIMEOUT_SECS", default_value_t = 10)]
    pub timeout_secs: u64,
}
