use std::sync::Arc;

use riftwatch_common::{BoundedAuditLog, SimulationParameters};
use riftwatch_events::{Bus, Store};
use riftwatch_reference::ReferenceData;
use riftwatch_risk::scoring::ScoringThresholds;
use riftwatch_risk::simulator::simulate;

/// Pure content behind `POST /simulate`: scores every unscored parsed event
/// against the slider inputs and returns the GeoJSON `FeatureCollection`
/// contract. Wiring this to an actual HTTP route is an external
/// collaborator's concern — this function is the whole of what the route
/// handler would call.
pub async fn simulate_content(
    store: &Arc<dyn Store>,
    reference: &ReferenceData,
    thresholds: ScoringThresholds,
    params: SimulationParameters,
) -> anyhow::Result<serde_json::Value> {
    let events = store.list_unscored_parsed_events(i64::MAX).await?;
    Ok(simulate(
        &events,
        reference,
        thresholds,
        params.fuel_price_index,
        params.inflation_rate,
        params.chatter_intensity,
        chrono::Utc::now(),
    ))
}

/// Content behind `GET /signals?limit=N`: the last `limit` risk signals by
/// `calculated_at` descending.
pub async fn signals_content(store: &Arc<dyn Store>, limit: i64) -> anyhow::Result<serde_json::Value> {
    let signals = store.list_risk_signals(limit).await?;
    Ok(serde_json::to_value(signals)?)
}

/// Content behind `GET /stats/ingestion-volume`.
pub async fn ingestion_volume_content(store: &Arc<dyn Store>) -> anyhow::Result<serde_json::Value> {
    let count = store.count_articles().await?;
    Ok(serde_json::json!({ "article_count": count }))
}

/// Content behind `GET /stats/intelligence-depth`.
pub async fn intelligence_depth_content(store: &Arc<dyn Store>) -> anyhow::Result<serde_json::Value> {
    let count = store.count_risk_signals().await?;
    Ok(serde_json::json!({ "signal_count": count }))
}

/// Content behind `GET /stats/categorization-audit`. `confidence_log` backs
/// `confidence_logs[10]` — the last ten categorization decisions, model or
/// rule-based, regardless of which category they landed on.
pub async fn categorization_audit_content(
    store: &Arc<dyn Store>,
    confidence_log: &BoundedAuditLog,
) -> anyhow::Result<serde_json::Value> {
    let (total_articles, processed_articles, remaining_articles, categories) =
        store.categorization_audit().await?;
    let categories: serde_json::Map<String, serde_json::Value> = categories
        .into_iter()
        .map(|(name, stats)| (name, serde_json::to_value(stats).unwrap_or_default()))
        .collect();
    Ok(serde_json::json!({
        "total_articles": total_articles,
        "processed_articles": processed_articles,
        "remaining_articles": remaining_articles,
        "categories": categories,
        "confidence_logs": confidence_log.entries(),
    }))
}

/// Content behind `GET /health`: liveness of the two external collaborators
/// the pipeline depends on. Never fails outright — a dependency being down
/// is exactly what this endpoint exists to report.
pub async fn health_content(store: &Arc<dyn Store>, bus: &Arc<dyn Bus>) -> serde_json::Value {
    let store_ok = store.health_check().await.is_ok();
    let bus_ok = bus.health_check().await.is_ok();
    serde_json::json!({
        "status": if store_ok && bus_ok { "healthy" } else { "degraded" },
        "store": store_ok,
        "bus": bus_ok,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use riftwatch_events::MemoryBackend;
    use riftwatch_reference::{
        BorderTable, ClimatePolygons, ClimateTable, EconomicTable, MiningSites, StrategicTable,
    };

    fn reference() -> ReferenceData {
        ReferenceData {
            economic: EconomicTable::from_rows(vec![]),
            climate: ClimateTable::from_rows(vec![]),
            climate_polygons: ClimatePolygons::from_polygons(vec![]),
            mining: MiningSites::from_sites(vec![]),
            border: BorderTable::from_rows(vec![]),
            strategic: StrategicTable::from_rows(vec![]),
        }
    }

    fn thresholds() -> ScoringThresholds {
        ScoringThresholds {
            base_risk_score: 30.0,
            inflation_threshold: 20.0,
            fuel_price_threshold: 650.0,
        }
    }

    #[tokio::test]
    async fn simulate_content_returns_an_empty_feature_collection_with_no_events() {
        let backend = Arc::new(MemoryBackend::new());
        let store: Arc<dyn Store> = backend;
        let result = simulate_content(
            &store,
            &reference(),
            thresholds(),
            SimulationParameters {
                fuel_price_index: 650.0,
                inflation_rate: 20.0,
                chatter_intensity: 0.0,
            },
        )
        .await
        .unwrap();
        assert_eq!(result["type"], "FeatureCollection");
        assert_eq!(result["metadata"]["total_events"], 0);
    }

    #[tokio::test]
    async fn health_content_reports_healthy_when_both_backends_respond() {
        let backend = Arc::new(MemoryBackend::new());
        let store: Arc<dyn Store> = backend.clone();
        let bus: Arc<dyn Bus> = backend;
        let result = health_content(&store, &bus).await;
        assert_eq!(result["status"], "healthy");
        assert_eq!(result["store"], true);
        assert_eq!(result["bus"], true);
    }

    #[tokio::test]
    async fn ingestion_volume_content_reflects_stored_article_count() {
        let backend = Arc::new(MemoryBackend::new());
        let store: Arc<dyn Store> = backend;
        let result = ingestion_volume_content(&store).await.unwrap();
        assert_eq!(result["article_count"], 0);
    }

    #[tokio::test]
    async fn categorization_audit_content_surfaces_the_confidence_log() {
        let backend = Arc::new(MemoryBackend::new());
        let store: Arc<dyn Store> = backend;
        let log = BoundedAuditLog::load(
            std::env::temp_dir().join(format!("riftwatch-orchestrator-test-{}", rand_suffix())),
            10,
        );
        log.append(riftwatch_common::AuditEntry {
            timestamp: chrono::Utc::now(),
            event_type: "categorization".to_string(),
            status: "Banditry".to_string(),
            details: serde_json::json!({}),
        })
        .unwrap();

        let result = categorization_audit_content(&store, &log).await.unwrap();
        assert_eq!(result["confidence_logs"].as_array().unwrap().len(), 1);
        assert_eq!(result["total_articles"], 0);
    }

    fn rand_suffix() -> u64 {
        use std::time::{SystemTime, UNIX_EPOCH};
        SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_nanos() as u64
    }
}
