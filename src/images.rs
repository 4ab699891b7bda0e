//! Image extraction and copyright-safe substitution.
//!
//! Resolution happens in two stages. [`first_image`] walks a strict priority
//! order over everything an entry may carry: `media:content`, then
//! `media:thumbnail`, then enclosures, then `<img>` tags embedded in content
//! blocks, then the summary markup, and finally a small map of known
//! publisher logos. [`ImageGuard`] then decides whether the extracted URL is
//! from a source licensed for reuse; anything else is substituted with a
//! curated stock image scoped to the category.
//!
//! # Substitution policies
//!
//! Three mutually exclusive policies exist, selected per build:
//!
//! - **`fixed`** — one fallback image per category.
//! - **`hash-pool`** — pool index from a stable hash of the entry link, so
//!   the same entry maps to the same image across rebuilds.
//! - **`rotating-pool`** — a cursor that advances only when a substitution
//!   is made, so consecutive substitutions within one category never repeat.

use clap::ValueEnum;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use tracing::debug;
use url::Url;

use crate::models::RawEntry;

/// File extensions accepted by the URL-path check, lowercase.
const IMAGE_EXTENSIONS: &[&str] = &[".jpg", ".jpeg", ".png", ".webp", ".gif"];

/// `<img>` attributes tried in order when mining embedded markup. `srcset`
/// is handled separately since it needs splitting.
const IMG_SRC_ATTRS: &[&str] = &["src", "data-src", "data-original"];

/// Hosts known to license their images for reuse. An entry may carry a path
/// prefix (e.g. vendor press-image sections) that the URL path must match.
const SAFE_IMAGE_DOMAINS: &[&str] = &[
    "images.unsplash.com",
    "images.pexels.com",
    "cdn.pixabay.com",
    "upload.wikimedia.org",
    "apple.com/newsroom/images",
    "samsung.com/press",
    "google.com/press",
];

/// Known publication logos, matched by substring against the feed title.
/// Only consulted when every other extraction step came up empty.
const SOURCE_LOGOS: &[(&str, &str)] = &[
    (
        "TechCrunch",
        "https://upload.wikimedia.org/wikipedia/commons/b/bb/TechCrunch_logo.svg.png",
    ),
    (
        "The Verge",
        "https://upload.wikimedia.org/wikipedia/commons/a/a0/The_Verge_logo.png",
    ),
    (
        "Ars Technica",
        "https://upload.wikimedia.org/wikipedia/commons/4/46/Ars_Technica_logo_%282016%29.svg.png",
    ),
];

/// Global substitute used when a category configures neither a fixed image
/// nor a pool.
pub const DEFAULT_IMAGE: &str =
    "https://images.unsplash.com/photo-1518770660439-4636190af475?w=800&auto=format&fit=crop";

/// Built-in substitute pool: curated public-licence stock images.
pub const DEFAULT_POOL: &[&str] = &[
    "https://images.unsplash.com/photo-1677442135703-1787eea5ce01?w=800&auto=format&fit=crop",
    "https://images.unsplash.com/photo-1486312338219-ce68d2c6f44d?w=800&auto=format&fit=crop",
    "https://images.unsplash.com/photo-1550751827-4bd374c3f58b?w=800&auto=format&fit=crop",
    "https://images.unsplash.com/photo-1511707171634-5f897ff02aa9?w=800&auto=format&fit=crop",
    "https://images.unsplash.com/photo-1498049794561-7780e7231661?w=800&auto=format&fit=crop",
    "https://images.unsplash.com/photo-1478737270239-2f02b77fc618?w=800&auto=format&fit=crop",
    "https://images.unsplash.com/photo-1538481199705-c710c4e965fc?w=800&auto=format&fit=crop",
    "https://images.unsplash.com/photo-1593941707882-a5bba14938c7?w=800&auto=format&fit=crop",
    "https://images.unsplash.com/photo-1559136555-9303baea8ebd?w=800&auto=format&fit=crop",
    "https://images.unsplash.com/photo-1518770660439-4636190af475?w=800&auto=format&fit=crop",
    "https://images.unsplash.com/photo-1526374965328-7f61d4dc18c5?w=800&auto=format&fit=crop",
    "https://images.unsplash.com/photo-1531297484001-80022131f5a1?w=800&auto=format&fit=crop",
];

static IMG_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("img").unwrap());

/// How untrusted images are substituted within one build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ImagePolicy {
    /// One fixed fallback image per category.
    Fixed,
    /// Deterministic pool index from a stable hash of the entry link.
    HashPool,
    /// Cursor over the pool, advanced only when a substitution happens.
    RotatingPool,
}

/// Extract a candidate image URL from a feed entry.
///
/// Candidate sources are tried in strict priority order and the first match
/// wins:
///
/// 1. `media:content` attachments with a recognized image extension
/// 2. `media:thumbnail` URLs with a recognized image extension
/// 3. enclosures passing the extension check or declaring an image MIME type
/// 4. the first `<img>` in any embedded content block
/// 5. the first `<img>` in the summary/description markup
/// 6. a known publisher logo matched against the feed title
///
/// Returns `None` when every step fails.
pub fn first_image(entry: &RawEntry) -> Option<String> {
    for media in &entry.media_content {
        if looks_like_image(&media.url) {
            return Some(media.url.clone());
        }
    }
    for thumb in &entry.media_thumbnails {
        if looks_like_image(thumb) {
            return Some(thumb.clone());
        }
    }
    for enc in &entry.enclosures {
        let image_mime = enc.mime.as_deref().is_some_and(|m| m.contains("image"));
        if looks_like_image(&enc.url) || image_mime {
            return Some(enc.url.clone());
        }
    }
    for html in &entry.content_html {
        if let Some(url) = img_from_html(html) {
            return Some(url);
        }
    }
    if let Some(summary) = entry.summary_html.as_deref() {
        if let Some(url) = img_from_html(summary) {
            return Some(url);
        }
    }
    if let Some(source) = entry.source_title.as_deref() {
        for (needle, logo) in SOURCE_LOGOS {
            if source.contains(needle) {
                return Some((*logo).to_string());
            }
        }
    }
    None
}

/// Check whether a URL's path carries a recognized image extension.
///
/// The check is case-insensitive and looks at the path only, so query
/// strings never defeat it (`photo.png?size=800` matches). URLs that do not
/// parse absolutely fall back to checking the portion before `?`/`#`.
pub fn looks_like_image(url: &str) -> bool {
    if url.is_empty() {
        return false;
    }
    let path = match Url::parse(url) {
        Ok(parsed) => parsed.path().to_lowercase(),
        Err(_) => {
            let trimmed = url.split(['?', '#']).next().unwrap_or(url);
            trimmed.to_lowercase()
        }
    };
    IMAGE_EXTENSIONS.iter().any(|ext| path.ends_with(ext))
}

/// Pull an image URL out of an HTML fragment's first `<img>` element.
///
/// Attributes are tried in priority order: the direct `src`, then the
/// lazy-load variants, then the first URL of a `srcset`.
fn img_from_html(html: &str) -> Option<String> {
    if html.trim().is_empty() {
        return None;
    }
    let fragment = Html::parse_fragment(html);
    let img = fragment.select(&IMG_SELECTOR).next()?;
    for attr in IMG_SRC_ATTRS {
        if let Some(value) = img.value().attr(attr) {
            if !value.is_empty() {
                return Some(value.to_string());
            }
        }
    }
    if let Some(srcset) = img.value().attr("srcset") {
        if let Some(first) = srcset.split_whitespace().next() {
            return Some(first.trim_end_matches(',').to_string());
        }
    }
    None
}

/// Check whether an image URL comes from a copyright-safe source: its host
/// must equal, or be a subdomain of, an allow-listed domain, and when the
/// allow-list entry carries a path prefix the URL path must start with it.
pub fn is_safe_image(url: &str) -> bool {
    let Ok(parsed) = Url::parse(url) else {
        return false;
    };
    let Some(host) = parsed.host_str() else {
        return false;
    };
    let host = host.to_lowercase();
    let host = host.strip_prefix("www.").unwrap_or(&host);

    SAFE_IMAGE_DOMAINS.iter().any(|entry| {
        let (domain, path_prefix) = match entry.split_once('/') {
            Some((d, p)) => (d, Some(p)),
            None => (*entry, None),
        };
        let host_ok = host == domain || host.ends_with(&format!(".{domain}"));
        let path_ok = match path_prefix {
            Some(prefix) => parsed.path().trim_start_matches('/').starts_with(prefix),
            None => true,
        };
        host_ok && path_ok
    })
}

/// Per-category substitution state for one build.
///
/// Safe URLs always pass through unmodified; everything else (including a
/// missing image) is replaced according to the configured [`ImagePolicy`].
pub struct ImageGuard<'a> {
    policy: ImagePolicy,
    fixed: &'a str,
    pool: &'a [String],
    cursor: usize,
}

impl<'a> ImageGuard<'a> {
    /// `fixed` is the category's single substitute; `pool` its substitute
    /// pool. Either may come from configuration or from the built-in
    /// defaults; an empty pool degrades every policy to `fixed`.
    pub fn new(policy: ImagePolicy, fixed: &'a str, pool: &'a [String]) -> Self {
        ImageGuard {
            policy,
            fixed,
            pool,
            cursor: 0,
        }
    }

    /// Resolve the final image for one card. `key` is the entry's link (or
    /// title when the link is empty) and scopes the hash policy.
    pub fn resolve(&mut self, candidate: Option<&str>, key: &str) -> String {
        if let Some(url) = candidate {
            if is_safe_image(url) {
                return url.to_string();
            }
            debug!(%url, "untrusted image source; substituting");
        }
        if self.pool.is_empty() {
            return self.fixed.to_string();
        }
        match self.policy {
            ImagePolicy::Fixed => self.fixed.to_string(),
            ImagePolicy::HashPool => {
                let idx = (fnv1a64(key.as_bytes()) % self.pool.len() as u64) as usize;
                self.pool[idx].clone()
            }
            ImagePolicy::RotatingPool => {
                let pick = self.pool[self.cursor % self.pool.len()].clone();
                self.cursor += 1;
                pick
            }
        }
    }
}

/// FNV-1a, 64-bit. Stable across runs and platforms, unlike the std hasher,
/// which is what makes the hash-pool policy reproducible between builds.
fn fnv1a64(data: &[u8]) -> u64 {
    const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;
    let mut hash = OFFSET;
    for &byte in data {
        hash ^= byte as u64;
        hash = hash.wrapping_mul(PRIME);
    }
    hash
}
