use anyhow::{Context, Result};
use chrono::{DateTime, Utc};

use crate::fetch::Fetcher;

/// One candidate article as read straight off an RSS/Atom feed, before
/// normalization.
pub struct FeedItem {
    pub title: String,
    pub url: String,
    pub content: String,
    pub published_at: Option<DateTime<Utc>>,
    pub author: Option<String>,
}

pub async fn fetch_feed(fetcher: &Fetcher, rss_url: &str) -> Result<Vec<FeedItem>> {
    let bytes = fetcher.get_bytes(rss_url).await.context("feed fetch failed")?;
    let feed = feed_rs::parser::parse(&bytes[..]).context("feed parse failed")?;

    let items = feed
        .entries
        .into_iter()
        .filter_map(|entry| {
            let url = entry.links.first().map(|l| l.href.clone())?;
            let title = entry.title.map(|t| t.content).unwrap_or_default();
            let content = entry
                .content
                .and_then(|c| c.body)
                .or_else(|| entry.summary.map(|s| s.content))
                .unwrap_or_default();
            let author = entry.authors.first().map(|a| a.name.clone());
            let published_at = entry
                .published
                .or(entry.updated)
                .map(|dt| dt.with_timezone(&Utc));
            Some(FeedItem {
                title,
                url,
                content,
                published_at,
                author,
            })
        })
        .collect();

    Ok(items)
}
