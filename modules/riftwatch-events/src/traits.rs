use async_trait::async_trait;
use riftwatch_common::{Article, ParsedEvent, RiskSignal};
use serde::Serialize;

use crate::queue::{Delivery, Queue};

pub type Result<T> = anyhow::Result<T>;

/// Per-category counters backing `GET /stats/categorization-audit`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CategoryStats {
    pub count: u64,
    pub avg_confidence: f64,
}

/// Narrow persistence interface the pipeline depends on. The document store
/// behind it (collections, indexes, connection pooling) is an external
/// collaborator; this trait is the only surface the three stages touch.
#[async_trait]
pub trait Store: Send + Sync {
    /// Insert the article if no row with this `url` exists yet. Never
    /// overwrites an existing article's content (set-on-insert). Returns
    /// `true` if a new row was inserted.
    async fn upsert_article(&self, article: &Article) -> Result<bool>;

    async fn get_article_by_url(&self, url: &str) -> Result<Option<Article>>;

    /// Articles with no corresponding `parsed_events.source_url` row yet.
    async fn list_unclassified_articles(&self, limit: i64) -> Result<Vec<Article>>;

    /// Articles whose `features.conflict_type = Unknown` — the
    /// categorization queue.
    async fn list_unknown_category_articles(&self, limit: i64) -> Result<Vec<Article>>;

    async fn update_article_category(
        &self,
        url: &str,
        conflict_type: riftwatch_common::ConflictType,
        confidence: u8,
    ) -> Result<()>;

    /// Insert a parsed event if `source_url` isn't already present
    /// (idempotence: restart re-discovers work via the queue predicate, not
    /// by retrying an event that already landed).
    async fn insert_parsed_event(&self, event: &ParsedEvent) -> Result<bool>;

    async fn get_parsed_event_by_source_url(
        &self,
        source_url: &str,
    ) -> Result<Option<ParsedEvent>>;

    async fn list_unscored_parsed_events(&self, limit: i64) -> Result<Vec<ParsedEvent>>;

    /// Upsert keyed by `source_url` — exactly one signal survives per URL.
    async fn upsert_risk_signal(&self, signal: &RiskSignal) -> Result<()>;

    async fn list_risk_signals(&self, limit: i64) -> Result<Vec<RiskSignal>>;

    async fn list_all_risk_signals(&self) -> Result<Vec<RiskSignal>>;

    async fn count_articles(&self) -> Result<u64>;

    async fn count_risk_signals(&self) -> Result<u64>;

    async fn categorization_audit(
        &self,
    ) -> Result<(u64, u64, u64, Vec<(String, CategoryStats)>)>;

    /// Liveness check used by the health surface; never panics, reports
    /// failure through the `Result` instead.
    async fn health_check(&self) -> Result<()>;
}

/// Narrow message-bus interface. Durable, at-least-once, manual ack.
#[async_trait]
pub trait Bus: Send + Sync {
    async fn publish(&self, queue: Queue, payload: serde_json::Value) -> Result<()>;

    async fn consume(&self, queue: Queue) -> Result<Option<Delivery>>;

    async fn ack(&self, queue: Queue, tag: i64) -> Result<()>;

    async fn nack(&self, queue: Queue, tag: i64) -> Result<()>;

    async fn health_check(&self) -> Result<()>;
}
