use std::collections::VecDeque;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use riftwatch_common::{Article, ConflictType, ParsedEvent, RiskSignal};

use crate::queue::{Delivery, Queue};
use crate::traits::{Bus, CategoryStats, Result, Store};

/// In-memory [`Store`] + [`Bus`] double for tests. Single-process, no
/// persistence across restarts — a stand-in for the document store and
/// broker, not a production backend.
#[derive(Default)]
pub struct MemoryBackend {
    articles: Mutex<Vec<Article>>,
    parsed_events: Mutex<Vec<ParsedEvent>>,
    risk_signals: Mutex<Vec<RiskSignal>>,
    queues: Mutex<std::collections::HashMap<&'static str, VecDeque<(i64, serde_json::Value)>>>,
    next_tag: AtomicI64,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryBackend {
    async fn upsert_article(&self, article: &Article) -> Result<bool> {
        let mut articles = self.articles.lock().unwrap();
        if articles.iter().any(|a| a.url == article.url) {
            return Ok(false);
        }
        articles.push(article.clone());
        Ok(true)
    }

    async fn get_article_by_url(&self, url: &str) -> Result<Option<Article>> {
        Ok(self
            .articles
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.url == url)
            .cloned())
    }

    async fn list_unclassified_articles(&self, limit: i64) -> Result<Vec<Article>> {
        let parsed = self.parsed_events.lock().unwrap();
        let articles = self.articles.lock().unwrap();
        Ok(articles
            .iter()
            .filter(|a| !parsed.iter().any(|p| p.source_url == a.url))
            .take(limit.max(0) as usize)
            .cloned()
            .collect())
    }

    async fn list_unknown_category_articles(&self, limit: i64) -> Result<Vec<Article>> {
        let articles = self.articles.lock().unwrap();
        Ok(articles
            .iter()
            .filter(|a| a.features.conflict_type == ConflictType::Unknown)
            .take(limit.max(0) as usize)
            .cloned()
            .collect())
    }

    async fn update_article_category(
        &self,
        url: &str,
        conflict_type: ConflictType,
        confidence: u8,
    ) -> Result<()> {
        let mut articles = self.articles.lock().unwrap();
        if let Some(article) = articles.iter_mut().find(|a| a.url == url) {
            article.features.conflict_type = conflict_type;
            article.features.confidence = Some(confidence);
        }
        Ok(())
    }

    async fn insert_parsed_event(&self, event: &ParsedEvent) -> Result<bool> {
        let mut events = self.parsed_events.lock().unwrap();
        if events.iter().any(|e| e.source_url == event.source_url) {
            return Ok(false);
        }
        events.push(event.clone());
        Ok(true)
    }

    async fn get_parsed_event_by_source_url(
        &self,
        source_url: &str,
    ) -> Result<Option<ParsedEvent>> {
        Ok(self
            .parsed_events
            .lock()
            .unwrap()
            .iter()
            .find(|e| e.source_url == source_url)
            .cloned())
    }

    async fn list_unscored_parsed_events(&self, limit: i64) -> Result<Vec<ParsedEvent>> {
        let signals = self.risk_signals.lock().unwrap();
        let events = self.parsed_events.lock().unwrap();
        Ok(events
            .iter()
            .filter(|e| !signals.iter().any(|s| s.source_url == e.source_url))
            .take(limit.max(0) as usize)
            .cloned()
            .collect())
    }

    async fn upsert_risk_signal(&self, signal: &RiskSignal) -> Result<()> {
        let mut signals = self.risk_signals.lock().unwrap();
        if let Some(existing) = signals
            .iter_mut()
            .find(|s| s.source_url == signal.source_url)
        {
            *existing = signal.clone();
        } else {
            signals.push(signal.clone());
        }
        Ok(())
    }

    async fn list_risk_signals(&self, limit: i64) -> Result<Vec<RiskSignal>> {
        let mut signals = self.risk_signals.lock().unwrap().clone();
        signals.sort_by(|a, b| b.calculated_at.cmp(&a.calculated_at));
        signals.truncate(limit.max(0) as usize);
        Ok(signals)
    }

    async fn list_all_risk_signals(&self) -> Result<Vec<RiskSignal>> {
        Ok(self.risk_signals.lock().unwrap().clone())
    }

    async fn count_articles(&self) -> Result<u64> {
        Ok(self.articles.lock().unwrap().len() as u64)
    }

    async fn count_risk_signals(&self) -> Result<u64> {
        Ok(self.risk_signals.lock().unwrap().len() as u64)
    }

    async fn categorization_audit(
        &self,
    ) -> Result<(u64, u64, u64, Vec<(String, CategoryStats)>)> {
        let articles = self.articles.lock().unwrap();
        let total = articles.len() as u64;
        let processed = articles
            .iter()
            .filter(|a| a.features.conflict_type != ConflictType::Unknown)
            .count() as u64;
        let remaining = total.saturating_sub(processed);

        let mut by_category: std::collections::HashMap<String, (u64, f64)> =
            std::collections::HashMap::new();
        for article in articles.iter() {
            let key = article.features.conflict_type.to_string();
            let entry = by_category.entry(key).or_insert((0, 0.0));
            entry.0 += 1;
            entry.1 += article.features.confidence.unwrap_or(0) as f64;
        }
        let categories = by_category
            .into_iter()
            .map(|(name, (count, confidence_sum))| {
                (
                    name,
                    CategoryStats {
                        count,
                        avg_confidence: if count > 0 {
                            confidence_sum / count as f64
                        } else {
                            0.0
                        },
                    },
                )
            })
            .collect();

        Ok((total, processed, remaining, categories))
    }

    async fn health_check(&self) -> Result<()> {
        Ok(())
    }
}

#[async_trait]
impl Bus for MemoryBackend {
    async fn publish(&self, queue: Queue, payload: serde_json::Value) -> Result<()> {
        let tag = self.next_tag.fetch_add(1, Ordering::SeqCst);
        self.queues
            .lock()
            .unwrap()
            .entry(queue.as_str())
            .or_default()
            .push_back((tag, payload));
        Ok(())
    }

    async fn consume(&self, queue: Queue) -> Result<Option<Delivery>> {
        let mut queues = self.queues.lock().unwrap();
        let popped = queues
            .entry(queue.as_str())
            .or_default()
            .pop_front();
        Ok(popped.map(|(tag, payload)| Delivery { tag, payload }))
    }

    async fn ack(&self, _queue: Queue, _tag: i64) -> Result<()> {
        Ok(())
    }

    async fn nack(&self, _queue: Queue, _tag: i64) -> Result<()> {
        Ok(())
    }

    async fn health_check(&self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use riftwatch_common::Features;

    fn sample_article(url: &str) -> Article {
        Article {
            title: "Clash in Ikeja".to_string(),
            content: "There was a clash in Ikeja with many killed".to_string(),
            source: "Test Source".to_string(),
            url: url.to_string(),
            scraped_at: Utc::now(),
            published_at: None,
            author: None,
            tags: vec![],
            features: Features::default(),
            fingerprint: "abc".to_string(),
            veracity_score: 0.5,
            source_count: 1,
        }
    }

    #[tokio::test]
    async fn upsert_article_is_set_on_insert() {
        let backend = MemoryBackend::new();
        assert!(backend.upsert_article(&sample_article("u1")).await.unwrap());
        assert!(!backend.upsert_article(&sample_article("u1")).await.unwrap());
        assert_eq!(backend.count_articles().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn bus_publish_then_consume_is_fifo() {
        let backend = MemoryBackend::new();
        backend
            .publish(Queue::ScrapedArticles, serde_json::json!({"n": 1}))
            .await
            .unwrap();
        backend
            .publish(Queue::ScrapedArticles, serde_json::json!({"n": 2}))
            .await
            .unwrap();
        let first = backend.consume(Queue::ScrapedArticles).await.unwrap().unwrap();
        assert_eq!(first.payload["n"], 1);
    }
}
