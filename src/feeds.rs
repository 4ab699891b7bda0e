//! Feed fetching and RSS/Atom parsing.
//!
//! One function does the network round trip ([`fetch_feed`]); the rest maps
//! `feed_rs` entries into the crate's [`RawEntry`] shape. The mapping is
//! purely structural: every field is carried over with an explicit presence
//! check and no default is applied here, so downstream stages decide what an
//! absent field means.

use feed_rs::model::Entry;
use feed_rs::parser;
use reqwest::Client;
use std::error::Error;
use std::time::Duration;
use tracing::{debug, instrument};

use crate::models::{MediaRef, RawEntry};

/// A fetched and parsed feed: the feed-level title plus its entries.
#[derive(Debug)]
pub struct ParsedFeed {
    /// The feed's own title, when it declares one.
    pub title: Option<String>,
    /// Entries in feed order.
    pub entries: Vec<RawEntry>,
}

/// Build the shared HTTP client used for every fetch in a build.
pub fn build_client(timeout_secs: u64) -> Result<Client, Box<dyn Error>> {
    let client = Client::builder()
        .user_agent(concat!("tech_brief/", env!("CARGO_PKG_VERSION")))
        .timeout(Duration::from_secs(timeout_secs))
        .build()?;
    Ok(client)
}

/// Fetch one feed source and parse it.
///
/// A non-success HTTP status, a network failure, or unparseable feed XML all
/// surface as errors; the caller logs and skips the source.
#[instrument(level = "info", skip(client), fields(%url))]
pub async fn fetch_feed(client: &Client, url: &str) -> Result<ParsedFeed, Box<dyn Error>> {
    let response = client.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(format!("feed fetch failed with status {status}").into());
    }
    let bytes = response.bytes().await?;
    let feed = parser::parse(&bytes[..])?;

    let title = feed.title.map(|t| t.content);
    let entries: Vec<RawEntry> = feed
        .entries
        .into_iter()
        .map(|e| to_raw_entry(e, title.as_deref()))
        .collect();

    debug!(count = entries.len(), "Parsed feed entries");
    Ok(ParsedFeed { title, entries })
}

/// Map a `feed_rs` entry into the crate's structural [`RawEntry`].
///
/// Enclosures are collected from links with `rel="enclosure"` and from an
/// out-of-line content `src`; `media:content` and `media:thumbnail` come
/// from the media extension objects.
fn to_raw_entry(entry: Entry, feed_title: Option<&str>) -> RawEntry {
    let link = entry
        .links
        .iter()
        .find(|l| !matches!(l.rel.as_deref(), Some("enclosure")))
        .map(|l| l.href.clone());

    let mut enclosures: Vec<MediaRef> = entry
        .links
        .iter()
        .filter(|l| matches!(l.rel.as_deref(), Some("enclosure")))
        .map(|l| MediaRef {
            url: l.href.clone(),
            mime: l.media_type.clone(),
        })
        .collect();
    if let Some(content) = entry.content.as_ref() {
        // RSS <enclosure> surfaces as an out-of-line content src.
        if let Some(src) = content.src.as_ref() {
            if !src.href.trim().is_empty() {
                enclosures.push(MediaRef {
                    url: src.href.clone(),
                    mime: src
                        .media_type
                        .clone()
                        .or_else(|| Some(content.content_type.to_string())),
                });
            }
        }
    }

    let mut media_content = Vec::new();
    let mut media_thumbnails = Vec::new();
    for media in &entry.media {
        for content in &media.content {
            if let Some(url) = content.url.as_ref() {
                media_content.push(MediaRef {
                    url: url.to_string(),
                    mime: content.content_type.as_ref().map(|m| m.to_string()),
                });
            }
        }
        for thumb in &media.thumbnails {
            media_thumbnails.push(thumb.image.uri.clone());
        }
    }

    let content_html: Vec<String> = entry
        .content
        .as_ref()
        .and_then(|c| c.body.clone())
        .into_iter()
        .collect();

    RawEntry {
        title: entry.title.map(|t| t.content),
        link,
        published: entry.published,
        updated: entry.updated,
        summary_html: entry.summary.map(|s| s.content),
        content_html,
        media_content,
        media_thumbnails,
        enclosures,
        source_title: feed_title.map(|t| t.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RSS_SAMPLE: &str = r#"<?xml version="1.0"?>
<rss version="2.0" xmlns:media="http://search.yahoo.com/mrss/">
  <channel>
    <title>Example Wire</title>
    <item>
      <title>Chips get faster</title>
      <link>https://example.com/chips</link>
      <pubDate>Tue, 14 Nov 2023 22:13:20 GMT</pubDate>
      <description>&lt;p&gt;Faster &lt;b&gt;chips&lt;/b&gt;.&lt;/p&gt;</description>
      <media:content url="https://media.example.com/chips.jpg" type="image/jpeg"/>
      <media:thumbnail url="https://media.example.com/chips-thumb.jpg"/>
      <enclosure url="https://media.example.com/chips.mp3" type="audio/mpeg" length="1"/>
    </item>
    <item>
      <description>No title, no link, no dates.</description>
    </item>
  </channel>
</rss>"#;

    fn parse_sample() -> ParsedFeed {
        let feed = parser::parse(RSS_SAMPLE.as_bytes()).unwrap();
        let title = feed.title.map(|t| t.content);
        let entries = feed
            .entries
            .into_iter()
            .map(|e| to_raw_entry(e, title.as_deref()))
            .collect();
        ParsedFeed { title, entries }
    }

    #[test]
    fn test_maps_feed_and_entry_fields() {
        let parsed = parse_sample();
        assert_eq!(parsed.title.as_deref(), Some("Example Wire"));

        let entry = &parsed.entries[0];
        assert_eq!(entry.title.as_deref(), Some("Chips get faster"));
        assert_eq!(entry.link.as_deref(), Some("https://example.com/chips"));
        assert_eq!(entry.source_title.as_deref(), Some("Example Wire"));
        assert!(entry.published.is_some());
        assert_eq!(entry.timestamp(), 1_700_000_000);
        assert!(entry.summary_html.as_deref().unwrap().contains("chips"));
    }

    #[test]
    fn test_maps_media_and_enclosures() {
        let parsed = parse_sample();
        let entry = &parsed.entries[0];

        assert!(entry
            .media_content
            .iter()
            .any(|m| m.url == "https://media.example.com/chips.jpg"));
        assert!(entry
            .media_thumbnails
            .contains(&"https://media.example.com/chips-thumb.jpg".to_string()));
        assert!(entry
            .enclosures
            .iter()
            .any(|e| e.url == "https://media.example.com/chips.mp3"
                && e.mime.as_deref() == Some("audio/mpeg")));
    }

    #[test]
    fn test_absent_fields_stay_absent() {
        let parsed = parse_sample();
        let bare = &parsed.entries[1];
        assert!(bare.title.is_none());
        assert!(bare.link.is_none());
        assert_eq!(bare.timestamp(), 0);
        assert!(bare.media_content.is_empty());
    }

    #[test]
    fn test_unparseable_bytes_error() {
        assert!(parser::parse(&b"this is not a feed"[..]).is_err());
    }
}
