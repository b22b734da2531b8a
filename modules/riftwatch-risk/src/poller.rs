use std::sync::Arc;
use std::time::Duration;

use riftwatch_common::{BoundedAuditLog, Config};
use riftwatch_events::{Bus, Queue, Store};
use riftwatch_reference::ReferenceData;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::scoring::{score_event, ScoringThresholds};
use crate::surge::SurgeTracker;

/// Poll `list_unscored_parsed_events` on `interval`, score each against
/// `reference`, track surges across consecutive scorings of the same
/// `(state, lga)`, upsert the result, publish it, and — above
/// `config.high_risk_alert_threshold` — append an out-of-band alert entry.
/// Runs until `shutdown` is cancelled; spawned as a background task by the
/// orchestrator.
pub async fn run_risk_loop(
    store: Arc<dyn Store>,
    bus: Arc<dyn Bus>,
    reference: Arc<ReferenceData>,
    config: Arc<Config>,
    high_risk_alert_log: Arc<BoundedAuditLog>,
    interval: Duration,
    shutdown: CancellationToken,
) {
    let thresholds = ScoringThresholds {
        base_risk_score: config.base_risk_score,
        inflation_threshold: config.inflation_threshold,
        fuel_price_threshold: config.fuel_price_threshold,
    };
    let surge = SurgeTracker::new();

    let mut ticker = tokio::time::interval(interval);
    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = shutdown.cancelled() => {
                info!("risk loop shutting down");
                return;
            }
        }
        let events = match store.list_unscored_parsed_events(50).await {
            Ok(e) => e,
            Err(err) => {
                warn!(error = %err, "failed to list unscored parsed events");
                continue;
            }
        };
        for event in events {
            score_one(
                &event,
                &store,
                &bus,
                &reference,
                thresholds,
                &surge,
                config.surge_threshold_pct,
                config.high_risk_alert_threshold,
                &high_risk_alert_log,
            )
            .await;
        }
    }
}

async fn score_one(
    event: &riftwatch_common::ParsedEvent,
    store: &Arc<dyn Store>,
    bus: &Arc<dyn Bus>,
    reference: &ReferenceData,
    thresholds: ScoringThresholds,
    surge: &SurgeTracker,
    surge_threshold_pct: f64,
    high_risk_alert_threshold: f64,
    high_risk_alert_log: &BoundedAuditLog,
) {
    let mut signal = match score_event(event, reference, thresholds) {
        Some(s) => s,
        None => {
            info!(
                url = %event.source_url,
                state = %event.state,
                "no reference data for event, skipping scoring"
            );
            return;
        }
    };

    let observation = surge.observe(&signal.state, &signal.lga, signal.risk_score, surge_threshold_pct);
    if observation.surge_detected {
        signal.surge_detected = true;
        signal.surge_percentage_increase = observation.percentage_increase;
        signal.trigger_reason = format!(
            "[SURGE +{:.0}%] {}",
            observation.percentage_increase.unwrap_or_default(),
            signal.trigger_reason
        );
    }

    if let Err(err) = store.upsert_risk_signal(&signal).await {
        warn!(url = %signal.source_url, error = %err, "failed to upsert risk signal");
        return;
    }

    if let Err(err) = bus
        .publish(Queue::RiskSignals, serde_json::to_value(&signal).unwrap_or_default())
        .await
    {
        warn!(url = %signal.source_url, error = %err, "failed to publish risk signal");
    }

    if signal.risk_score > high_risk_alert_threshold {
        let entry = riftwatch_common::AuditEntry {
            timestamp: chrono::Utc::now(),
            event_type: "high_risk_alert".to_string(),
            status: format!("{}", signal.risk_level),
            details: serde_json::json!({
                "state": signal.state,
                "lga": signal.lga,
                "risk_score": signal.risk_score,
                "trigger_reason": signal.trigger_reason,
                "source_url": signal.source_url,
            }),
        };
        if let Err(err) = high_risk_alert_log.append(entry) {
            warn!(error = %err, "failed to append high risk alert entry");
        }
    }

    info!(
        url = %signal.source_url,
        risk_score = signal.risk_score,
        risk_level = %signal.risk_level,
        surge = signal.surge_detected,
        "event scored"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use riftwatch_common::{EconomicRow, Severity};
    use riftwatch_events::MemoryBackend;
    use riftwatch_reference::{
        BorderTable, ClimatePolygons, ClimateTable, EconomicTable, MiningSites, StrategicTable,
    };

    fn reference() -> ReferenceData {
        ReferenceData {
            economic: EconomicTable::from_rows(vec![EconomicRow {
                state: "Lagos".into(),
                lga: "Ikeja".into(),
                fuel_price: 600.0,
                inflation: 10.0,
            }]),
            climate: ClimateTable::from_rows(vec![]),
            climate_polygons: ClimatePolygons::from_polygons(vec![]),
            mining: MiningSites::from_sites(vec![]),
            border: BorderTable::from_rows(vec![]),
            strategic: StrategicTable::from_rows(vec![]),
        }
    }

    fn event() -> riftwatch_common::ParsedEvent {
        riftwatch_common::ParsedEvent {
            event_type: "clash".to_string(),
            state: "Lagos".to_string(),
            lga: "Ikeja".to_string(),
            severity: Severity::Medium,
            source_title: "Clash reported".to_string(),
            source_url: "https://example.com/1".to_string(),
            latitude: None,
            longitude: None,
            sentiment_intensity: Some(60),
            hate_speech_indicators: vec![],
            conflict_driver: None,
            parsed_at: chrono::Utc::now(),
        }
    }

    #[tokio::test]
    async fn scores_and_persists_an_event_with_matching_reference_data() {
        let backend = Arc::new(MemoryBackend::new());
        let store: Arc<dyn Store> = backend.clone();
        let bus: Arc<dyn Bus> = backend.clone();
        let reference = reference();
        let surge = SurgeTracker::new();
        let log = BoundedAuditLog::load(
            std::env::temp_dir().join(format!("riftwatch-risk-test-{}", rand_suffix())),
            20,
        );

        score_one(
            &event(),
            &store,
            &bus,
            &reference,
            ScoringThresholds {
                base_risk_score: 30.0,
                inflation_threshold: 20.0,
                fuel_price_threshold: 650.0,
            },
            &surge,
            20.0,
            85.0,
            &log,
        )
        .await;

        let signals = store.list_all_risk_signals().await.unwrap();
        assert_eq!(signals.len(), 1);
        assert_eq!(signals[0].source_url, "https://example.com/1");
    }

    #[tokio::test]
    async fn event_without_reference_row_is_skipped() {
        let backend = Arc::new(MemoryBackend::new());
        let store: Arc<dyn Store> = backend.clone();
        let bus: Arc<dyn Bus> = backend.clone();
        let reference = ReferenceData {
            economic: EconomicTable::from_rows(vec![]),
            climate: ClimateTable::from_rows(vec![]),
            climate_polygons: ClimatePolygons::from_polygons(vec![]),
            mining: MiningSites::from_sites(vec![]),
            border: BorderTable::from_rows(vec![]),
            strategic: StrategicTable::from_rows(vec![]),
        };
        let surge = SurgeTracker::new();
        let log = BoundedAuditLog::load(
            std::env::temp_dir().join(format!("riftwatch-risk-test-{}", rand_suffix())),
            20,
        );

        score_one(
            &event(),
            &store,
            &bus,
            &reference,
            ScoringThresholds {
                base_risk_score: 30.0,
                inflation_threshold: 20.0,
                fuel_price_threshold: 650.0,
            },
            &surge,
            20.0,
            85.0,
            &log,
        )
        .await;

        assert!(store.list_all_risk_signals().await.unwrap().is_empty());
    }

    fn rand_suffix() -> u64 {
        use std::time::{SystemTime, UNIX_EPOCH};
        SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_nanos() as u64
    }
}
