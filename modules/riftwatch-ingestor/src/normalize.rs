use scraper::{Html, Selector};
use url::Url;

/// Minimum title length accepted by the Ingestor's normalization pass
/// (stricter than the Article invariant's 3-char floor — this is the
/// cutoff below which a link is treated as navigation chrome, not a
/// headline).
pub const MIN_TITLE_LEN: usize = 10;

/// Resolve `href` against `base`, rejecting anything that isn't either an
/// absolute http(s) URL or root-relative (`/path`). Fragment-only and
/// scheme-relative (`//host/path`) links are rejected as ambiguous.
pub fn resolve_link(href: &str, base: &Url) -> Option<String> {
    let href = href.trim();
    if href.is_empty() || href.starts_with('#') {
        return None;
    }
    if href.starts_with("//") {
        return None;
    }
    if let Ok(absolute) = Url::parse(href) {
        if absolute.scheme() == "http" || absolute.scheme() == "https" {
            return Some(absolute.to_string());
        }
        return None;
    }
    if href.starts_with('/') {
        return base.join(href).ok().map(|u| u.to_string());
    }
    None
}

/// Fixed priority list of container selectors tried, in order, against an
/// article page to find the headline.
const TITLE_SELECTORS: &[&str] = &["h1.headline", "h1.article-title", "article h1", "h1"];

/// Fixed priority list of container selectors tried, in order, against an
/// article page to find the body. Falls back to every `<p>` on the page
/// when none match.
const CONTENT_SELECTORS: &[&str] = &[
    "article .article-body",
    "div.article-content",
    "div.story-body",
    "article",
];

/// Extracted title/content from an article page, following the fixed
/// priority list of container patterns. Content falls back to the
/// concatenation of every `<p>` element's text when no container matches.
pub struct ExtractedPage {
    pub title: Option<String>,
    pub content: String,
}

pub fn extract_page(html: &str) -> ExtractedPage {
    let document = Html::parse_document(html);

    let title = TITLE_SELECTORS.iter().find_map(|sel| {
        let selector = Selector::parse(sel).ok()?;
        document
            .select(&selector)
            .next()
            .map(|el| collapse_whitespace(&el.text().collect::<String>()))
            .filter(|t| t.len() >= MIN_TITLE_LEN)
    });

    let content = CONTENT_SELECTORS.iter().find_map(|sel| {
        let selector = Selector::parse(sel).ok()?;
        let text = document
            .select(&selector)
            .next()
            .map(|el| collapse_whitespace(&el.text().collect::<String>()));
        text.filter(|t| !t.is_empty())
    });

    let content = content.unwrap_or_else(|| all_paragraphs(&document));

    ExtractedPage { title, content }
}

fn all_paragraphs(document: &Html) -> String {
    let Ok(p_selector) = Selector::parse("p") else {
        return String::new();
    };
    document
        .select(&p_selector)
        .map(|el| collapse_whitespace(&el.text().collect::<String>()))
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://news.example.com/section/").unwrap()
    }

    #[test]
    fn resolves_root_relative_link() {
        assert_eq!(
            resolve_link("/story/1", &base()).unwrap(),
            "https://news.example.com/story/1"
        );
    }

    #[test]
    fn accepts_absolute_http_link() {
        assert_eq!(
            resolve_link("https://other.example.com/x", &base()).unwrap(),
            "https://other.example.com/x"
        );
    }

    #[test]
    fn rejects_scheme_relative_link() {
        assert!(resolve_link("//other.example.com/x", &base()).is_none());
    }

    #[test]
    fn rejects_bare_relative_link() {
        assert!(resolve_link("story/1", &base()).is_none());
    }

    #[test]
    fn rejects_fragment_only_link() {
        assert!(resolve_link("#top", &base()).is_none());
    }

    #[test]
    fn extracts_title_and_content_via_selectors() {
        let html = r#"
            <html><body>
                <article>
                    <h1 class="headline">Clash breaks out in Ikeja market</h1>
                    <div class="article-body">There was a clash in Ikeja with many killed today.</div>
                </article>
            </body></html>
        "#;
        let page = extract_page(html);
        assert_eq!(page.title.unwrap(), "Clash breaks out in Ikeja market");
        assert!(page.content.contains("clash in Ikeja"));
    }

    #[test]
    fn falls_back_to_all_paragraphs_when_no_container_matches() {
        let html = "<html><body><p>First bit.</p><p>Second bit.</p></body></html>";
        let page = extract_page(html);
        assert_eq!(page.content, "First bit. Second bit.");
    }

    #[test]
    fn short_heading_is_rejected_as_title() {
        let html = "<html><body><h1>Nav</h1><p>Some long enough paragraph content here.</p></body></html>";
        let page = extract_page(html);
        assert!(page.title.is_none());
    }
}
