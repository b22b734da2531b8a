use std::sync::Arc;
use std::time::Duration;

use ai_client::util::extract_json_object;
use riftwatch_common::{Article, AuditEntry, BoundedAuditLog, ParsedEvent};
use riftwatch_events::{Bus, Queue, Store};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::categorization::parse_categorization;
use crate::extraction::parse_extraction;
use crate::fallback::{rule_based_category, rule_based_extraction};
use crate::prompts::{categorization_messages, extraction_messages};
use crate::resilient::Resilient;

/// Poll `list_unclassified_articles` on `interval`, attempt extraction for
/// each (model first, rule-based fallback second), and persist/publish the
/// survivors. Runs until `shutdown` is cancelled; intended to be spawned as
/// a background task by the orchestrator. Articles already being extracted
/// when shutdown fires are drained before the loop exits.
pub async fn run_extraction_loop(
    store: Arc<dyn Store>,
    bus: Arc<dyn Bus>,
    model: Arc<Resilient>,
    interval: Duration,
    shutdown: CancellationToken,
) {
    let mut ticker = tokio::time::interval(interval);
    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = shutdown.cancelled() => {
                info!("extraction loop shutting down");
                return;
            }
        }
        let articles = match store.list_unclassified_articles(50).await {
            Ok(a) => a,
            Err(err) => {
                warn!(error = %err, "failed to list unclassified articles");
                continue;
            }
        };
        for article in articles {
            extract_one(&article, &store, &bus, &model).await;
        }
    }
}

/// Poll `list_unknown_category_articles` on `interval`, categorize each,
/// and update the article's `features.conflict_type`/`confidence`. Every
/// categorization — model or rule-based — is also appended to
/// `confidence_log`, the bounded feed `GET /stats/categorization-audit`
/// reads its `confidence_logs[10]` from. Runs until `shutdown` is
/// cancelled.
pub async fn run_categorization_loop(
    store: Arc<dyn Store>,
    model: Arc<Resilient>,
    interval: Duration,
    confidence_log: Arc<BoundedAuditLog>,
    shutdown: CancellationToken,
) {
    let mut ticker = tokio::time::interval(interval);
    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = shutdown.cancelled() => {
                info!("categorization loop shutting down");
                return;
            }
        }
        let articles = match store.list_unknown_category_articles(50).await {
            Ok(a) => a,
            Err(err) => {
                warn!(error = %err, "failed to list uncategorized articles");
                continue;
            }
        };
        for article in articles {
            categorize_one(&article, &store, &model, &confidence_log).await;
        }
    }
}

async fn extract_one(article: &Article, store: &Arc<dyn Store>, bus: &Arc<dyn Bus>, model: &Resilient) {
    let extraction = match model.complete(extraction_messages(article)).await {
        Some(text) => extract_json_object(&text).and_then(|v| parse_extraction(&v)),
        None => None,
    };

    let (extraction, rule_based) = match extraction {
        Some(e) => (e, false),
        None => (rule_based_extraction(&article.title, &article.content), true),
    };

    let (latitude, longitude) = crate::fallback::geolocate_state(&extraction.state)
        .map(|(_, lat, lon)| (Some(lat), Some(lon)))
        .unwrap_or((None, None));

    let event = ParsedEvent {
        event_type: extraction.event_type,
        state: extraction.state,
        lga: extraction.lga,
        severity: extraction.severity,
        source_title: article.title.clone(),
        source_url: article.url.clone(),
        latitude,
        longitude,
        sentiment_intensity: Some(extraction.sentiment_intensity),
        hate_speech_indicators: extraction.hate_speech_indicators,
        conflict_driver: Some(extraction.conflict_driver),
        parsed_at: chrono::Utc::now(),
    };

    match store.insert_parsed_event(&event).await {
        Ok(true) => {
            if let Err(err) = bus
                .publish(Queue::ParsedEvents, serde_json::to_value(&event).unwrap_or_default())
                .await
            {
                warn!(url = %article.url, error = %err, "failed to publish parsed event");
            }
            info!(url = %article.url, rule_based, "article parsed");
        }
        Ok(false) => {}
        Err(err) => warn!(url = %article.url, error = %err, "failed to persist parsed event"),
    }
}

async fn categorize_one(
    article: &Article,
    store: &Arc<dyn Store>,
    model: &Resilient,
    confidence_log: &BoundedAuditLog,
) {
    let categorization = match model.complete(categorization_messages(article)).await {
        Some(text) => extract_json_object(&text).map(|v| parse_categorization(&v)),
        None => None,
    };

    let (category, confidence) = match categorization {
        Some(c) => (c.category, c.confidence),
        None => match rule_based_category(&article.title, &article.content) {
            Some((category, confidence)) => (category, confidence),
            None => {
                info!(url = %article.url, "no conflict signal, skipping categorization");
                return;
            }
        },
    };

    if let Err(err) = store
        .update_article_category(&article.url, category, confidence)
        .await
    {
        warn!(url = %article.url, error = %err, "failed to update article category");
        return;
    }

    let entry = AuditEntry {
        timestamp: chrono::Utc::now(),
        event_type: "categorization".to_string(),
        status: format!("{category}"),
        details: serde_json::json!({
            "url": article.url,
            "category": format!("{category}"),
            "confidence": confidence,
        }),
    };
    if let Err(err) = confidence_log.append(entry) {
        warn!(error = %err, "failed to append confidence log entry");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ai_client::{Message, ModelClient};
    use async_trait::async_trait;
    use riftwatch_common::Features;
    use riftwatch_events::MemoryBackend;

    struct StubClient {
        response: String,
    }

    #[async_trait]
    impl ModelClient for StubClient {
        async fn complete(&self, _messages: Vec<Message>) -> anyhow::Result<String> {
            Ok(self.response.clone())
        }
    }

    fn article(url: &str, title: &str, content: &str) -> Article {
        Article {
            title: title.to_string(),
            content: content.to_string(),
            source: "Test Wire".to_string(),
            url: url.to_string(),
            scraped_at: chrono::Utc::now(),
            published_at: None,
            author: None,
            tags: vec![],
            features: Features::default(),
            fingerprint: "fp".to_string(),
            veracity_score: 0.5,
            source_count: 1,
        }
    }

    #[tokio::test]
    async fn extract_one_persists_and_publishes_on_complete_model_response() {
        let backend = Arc::new(MemoryBackend::new());
        let store: Arc<dyn Store> = backend.clone();
        let bus: Arc<dyn Bus> = backend.clone();
        let client: Arc<dyn ModelClient> = Arc::new(StubClient {
            response: serde_json::json!({
                "Event_Type": "Armed clash",
                "State": "Benue",
                "LGA": "Makurdi",
                "Severity": "high",
                "Sentiment_Intensity": 80,
                "Hate_Speech_Indicators": [],
                "Conflict_Driver": "social",
            })
            .to_string(),
        });
        let model = Resilient::new(client, 5);

        let a = article("https://example.com/1", "Clash near Makurdi", "Body text");
        extract_one(&a, &store, &bus, &model).await;

        let stored = store
            .get_parsed_event_by_source_url(&a.url)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.state, "Benue");
        assert_eq!(stored.severity, riftwatch_common::Severity::High);
    }

    #[tokio::test]
    async fn extract_one_falls_back_to_rule_based_on_garbage_response() {
        let backend = Arc::new(MemoryBackend::new());
        let store: Arc<dyn Store> = backend.clone();
        let bus: Arc<dyn Bus> = backend.clone();
        let client: Arc<dyn ModelClient> = Arc::new(StubClient {
            response: "not json at all".to_string(),
        });
        let model = Resilient::new(client, 5);

        let a = article(
            "https://example.com/2",
            "Bandits kill villagers in Zamfara state",
            "Report of bandit attack",
        );
        extract_one(&a, &store, &bus, &model).await;

        let stored = store
            .get_parsed_event_by_source_url(&a.url)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.state, "Zamfara");
    }

    fn confidence_log() -> BoundedAuditLog {
        BoundedAuditLog::load(
            std::env::temp_dir().join(format!("riftwatch-classifier-test-{}", rand_suffix())),
            10,
        )
    }

    fn rand_suffix() -> u64 {
        use std::time::{SystemTime, UNIX_EPOCH};
        SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_nanos() as u64
    }

    #[tokio::test]
    async fn categorize_one_updates_article_on_valid_response() {
        let backend = Arc::new(MemoryBackend::new());
        let store: Arc<dyn Store> = backend.clone();
        let client: Arc<dyn ModelClient> = Arc::new(StubClient {
            response: serde_json::json!({"category": "Banditry", "confidence": 88}).to_string(),
        });
        let model = Resilient::new(client, 5);
        let log = confidence_log();

        let a = article("https://example.com/3", "Bandit raid", "Village attacked");
        store.upsert_article(&a).await.unwrap();
        categorize_one(&a, &store, &model, &log).await;

        let stored = store.get_article_by_url(&a.url).await.unwrap().unwrap();
        assert_eq!(stored.features.conflict_type, riftwatch_common::ConflictType::Banditry);
        assert_eq!(stored.features.confidence, Some(88));
        assert_eq!(log.entries().len(), 1);
    }

    #[tokio::test]
    async fn categorize_one_skips_when_no_signal_present() {
        let backend = Arc::new(MemoryBackend::new());
        let store: Arc<dyn Store> = backend.clone();
        let client: Arc<dyn ModelClient> = Arc::new(StubClient {
            response: "garbled".to_string(),
        });
        let model = Resilient::new(client, 5);
        let log = confidence_log();

        let a = article("https://example.com/4", "Football match ends in draw", "No incidents");
        store.upsert_article(&a).await.unwrap();
        categorize_one(&a, &store, &model, &log).await;

        let stored = store.get_article_by_url(&a.url).await.unwrap().unwrap();
        assert_eq!(stored.features.conflict_type, riftwatch_common::ConflictType::Unknown);
        assert!(log.entries().is_empty());
    }
}
