use std::sync::Arc;

use chrono::Utc;
use futures::future::join_all;
use riftwatch_common::{fingerprint, AuditEntry, BoundedAuditLog, Article, Features};
use riftwatch_events::{Bus, Queue, Store};
use tracing::{info, warn};

use crate::dedup::dedup_articles;
use crate::fetch::Fetcher;
use crate::rss::fetch_feed;
use crate::source::{Source, SourceConfig};
use crate::web::scrape_web_source;

/// Outcome of fetching a single configured source, before dedup.
struct SourceOutcome {
    articles: Vec<Article>,
    error: Option<String>,
}

/// Summary returned to the caller (and folded into the audit log) after one
/// full ingestion cycle.
#[derive(Debug, Clone)]
pub struct CycleSummary {
    pub status: &'static str,
    pub sources_total: usize,
    pub sources_failed: usize,
    pub articles_scraped: usize,
    pub articles_new: usize,
}

/// Run one ingestion cycle: fan out to every configured source concurrently,
/// normalize results into candidate [`Article`]s, deduplicate across the
/// whole batch, then persist (set-on-insert) and publish the survivors.
/// One source's failure never aborts the cycle (see spec §4.1 failure
/// semantics); an empty source list still succeeds with status "warning"
/// (B1).
pub async fn run_cycle(
    sources: &[SourceConfig],
    store: &Arc<dyn Store>,
    bus: &Arc<dyn Bus>,
    fetcher: &Fetcher,
    audit_log: &BoundedAuditLog,
) -> CycleSummary {
    if sources.is_empty() {
        let summary = CycleSummary {
            status: "warning",
            sources_total: 0,
            sources_failed: 0,
            articles_scraped: 0,
            articles_new: 0,
        };
        record(audit_log, &summary, "no sources configured");
        return summary;
    }

    let outcomes: Vec<SourceOutcome> = join_all(
        sources
            .iter()
            .map(|source| fetch_one_source(source, fetcher)),
    )
    .await;

    let sources_failed = outcomes.iter().filter(|o| o.error.is_some()).count();
    let candidates: Vec<Article> = outcomes.into_iter().flat_map(|o| o.articles).collect();
    let articles_scraped = candidates.len();

    let deduped = dedup_articles(candidates);

    let mut articles_new = 0usize;
    let mut partial = false;
    for article in &deduped {
        match store.upsert_article(article).await {
            Ok(true) => {
                articles_new += 1;
                if let Err(err) = bus
                    .publish(Queue::ScrapedArticles, serde_json::to_value(article).unwrap_or_default())
                    .await
                {
                    warn!(url = %article.url, error = %err, "failed to publish scraped article");
                    partial = true;
                }
            }
            Ok(false) => {}
            Err(err) => {
                warn!(url = %article.url, error = %err, "failed to persist scraped article");
                partial = true;
            }
        }
    }

    let status = if partial {
        "partial"
    } else if sources_failed > 0 {
        "partial"
    } else {
        "success"
    };

    let summary = CycleSummary {
        status,
        sources_total: sources.len(),
        sources_failed,
        articles_scraped,
        articles_new,
    };
    record(audit_log, &summary, "ingest cycle complete");
    info!(
        status,
        sources_total = summary.sources_total,
        sources_failed,
        articles_scraped,
        articles_new,
        "ingest cycle complete"
    );
    summary
}

async fn fetch_one_source(source: &SourceConfig, fetcher: &Fetcher) -> SourceOutcome {
    let resolved = match source.resolve() {
        Ok(r) => r,
        Err(err) => {
            return SourceOutcome {
                articles: Vec::new(),
                error: Some(err.to_string()),
            }
        }
    };

    let result = match resolved {
        Source::Rss { name, rss_url } => fetch_rss(name, rss_url, fetcher).await,
        Source::Web {
            name,
            web_url,
            selectors,
        } => fetch_web(name, web_url, selectors, fetcher).await,
    };

    match result {
        Ok(articles) => SourceOutcome {
            articles,
            error: None,
        },
        Err(err) => {
            warn!(source = %source.name, error = %err, "source fetch failed, isolating failure");
            SourceOutcome {
                articles: Vec::new(),
                error: Some(err.to_string()),
            }
        }
    }
}

async fn fetch_rss(name: &str, rss_url: &str, fetcher: &Fetcher) -> anyhow::Result<Vec<Article>> {
    let items = fetch_feed(fetcher, rss_url).await?;
    Ok(items
        .into_iter()
        .filter(|item| item.title.chars().count() >= crate::normalize::MIN_TITLE_LEN)
        .map(|item| to_article(name, &item.url, &item.title, &item.content, item.author, item.published_at))
        .collect())
}

async fn fetch_web(
    name: &str,
    web_url: &str,
    selectors: &[String],
    fetcher: &Fetcher,
) -> anyhow::Result<Vec<Article>> {
    let pages = scrape_web_source(fetcher, web_url, selectors).await?;
    Ok(pages
        .into_iter()
        .filter(|page| page.title.chars().count() >= crate::normalize::MIN_TITLE_LEN)
        .map(|page| to_article(name, &page.url, &page.title, &page.content, None, None))
        .collect())
}

fn to_article(
    source: &str,
    url: &str,
    title: &str,
    content: &str,
    author: Option<String>,
    published_at: Option<chrono::DateTime<Utc>>,
) -> Article {
    Article {
        title: title.to_string(),
        content: content.to_string(),
        source: source.to_string(),
        url: url.to_string(),
        scraped_at: Utc::now(),
        published_at,
        author,
        tags: Vec::new(),
        features: Features::default(),
        fingerprint: fingerprint(&format!("{title}{content}")),
        veracity_score: 0.5,
        source_count: 1,
    }
}

fn record(audit_log: &BoundedAuditLog, summary: &CycleSummary, details: &str) {
    let entry = AuditEntry {
        timestamp: Utc::now(),
        event_type: "ingest_cycle".to_string(),
        status: summary.status.to_string(),
        details: serde_json::json!({
            "message": details,
            "sources_total": summary.sources_total,
            "sources_failed": summary.sources_failed,
            "articles_scraped": summary.articles_scraped,
            "articles_new": summary.articles_new,
        }),
    };
    if let Err(err) = audit_log.append(entry) {
        warn!(error = %err, "failed to append ingest audit log entry");
    }
}
