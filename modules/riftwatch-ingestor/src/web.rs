use anyhow::{Context, Result};
use scraper::{Html, Selector};
use tracing::warn;
use url::Url;

use crate::fetch::Fetcher;
use crate::normalize::{extract_page, resolve_link};

/// A candidate article page, with title/content already extracted.
pub struct ScrapedPage {
    pub title: String,
    pub url: String,
    pub content: String,
}

/// Fetch a source's listing page, try each selector in order to find
/// article links, then follow each link and extract title+content using
/// the fixed priority list of title/content container patterns.
pub async fn scrape_web_source(
    fetcher: &Fetcher,
    web_url: &str,
    selectors: &[String],
) -> Result<Vec<ScrapedPage>> {
    let base = Url::parse(web_url).context("invalid source web_url")?;
    let listing_html = fetcher.get_text(web_url).await.context("listing fetch failed")?;

    let links = find_article_links(&listing_html, &base, selectors);

    let mut pages = Vec::new();
    for link in links {
        match fetcher.get_text(&link).await {
            Ok(html) => {
                let extracted = extract_page(&html);
                let Some(title) = extracted.title else {
                    continue;
                };
                if extracted.content.chars().count() < 10 {
                    continue;
                }
                pages.push(ScrapedPage {
                    title,
                    url: link,
                    content: extracted.content,
                });
            }
            Err(err) => {
                warn!(url = %link, error = %err, "article fetch failed, skipping");
            }
        }
    }

    Ok(pages)
}

/// Try each selector, in order, against the listing page; the first
/// selector that matches anything determines the full link set for this
/// page (selectors are not merged across matches).
fn find_article_links(html: &str, base: &Url, selectors: &[String]) -> Vec<String> {
    let document = Html::parse_document(html);

    for raw_selector in selectors {
        let Ok(selector) = Selector::parse(raw_selector) else {
            continue;
        };
        let mut links = Vec::new();
        let mut seen = std::collections::HashSet::new();
        for el in document.select(&selector) {
            let Some(href) = el.value().attr("href") else {
                continue;
            };
            if let Some(resolved) = resolve_link(href, base) {
                if seen.insert(resolved.clone()) {
                    links.push(resolved);
                }
            }
        }
        if !links.is_empty() {
            return links;
        }
    }

    Vec::new()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_links_via_first_matching_selector() {
        let html = r#"
            <html><body>
                <div class="teaser"><a href="/story/1">One</a></div>
                <div class="teaser"><a href="/story/2">Two</a></div>
            </body></html>
        "#;
        let base = Url::parse("https://news.example.com/").unwrap();
        let selectors = vec!["a.headline".to_string(), "div.teaser a".to_string()];
        let links = find_article_links(html, &base, &selectors);
        assert_eq!(
            links,
            vec![
                "https://news.example.com/story/1",
                "https://news.example.com/story/2"
            ]
        );
    }

    #[test]
    fn no_matching_selector_yields_no_links() {
        let html = "<html><body><p>nothing here</p></body></html>";
        let base = Url::parse("https://news.example.com/").unwrap();
        let selectors = vec!["div.teaser a".to_string()];
        assert!(find_article_links(html, &base, &selectors).is_empty());
    }
}
