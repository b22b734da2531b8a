use chrono::{DateTime, Utc};
use riftwatch_common::{ParsedEvent, RiskLevel, RiskSignal};
use riftwatch_reference::ReferenceData;

use crate::scoring::{score_event_dynamic, ScoringThresholds};

/// `chatter_intensity` feeds only the heatmap weighting, not `risk_score`
/// itself — it has no scoring-algorithm counterpart, just a visual cue for
/// how loud the simulated social signal is around a point.
fn heatmap_radius_km(chatter_intensity: f64) -> f64 {
    5.0 + chatter_intensity / 100.0 * 45.0
}

fn heatmap_weight(risk_score: f64, chatter_intensity: f64) -> f64 {
    (risk_score / 100.0 * (1.0 + chatter_intensity / 100.0)).min(1.0)
}

fn signal_to_feature(signal: &RiskSignal, chatter_intensity: f64) -> Option<serde_json::Value> {
    let lat = signal.latitude?;
    let lon = signal.longitude?;
    Some(serde_json::json!({
        "type": "Feature",
        "geometry": {
            "type": "Point",
            "coordinates": [lon, lat],
        },
        "properties": {
            "event_type": signal.event_type,
            "state": signal.state,
            "lga": signal.lga,
            "severity": signal.severity,
            "risk_score": signal.risk_score,
            "risk_level": signal.risk_level,
            "trigger_reason": signal.trigger_reason,
            "fuel_price": signal.fuel_price,
            "inflation": signal.inflation,
            "high_funding_potential": signal.high_funding_potential,
            "high_escalation_potential": signal.high_escalation_potential,
            "lakurawa_presence": signal.lakurawa_presence,
            "conflict_driver": signal.conflict_driver,
            "climate_impact_zone": signal.climate_impact_zone,
            "heatmap_radius_km": heatmap_radius_km(chatter_intensity),
            "heatmap_weight": heatmap_weight(signal.risk_score, chatter_intensity),
        }
    }))
}

/// Score every candidate event against the slider inputs and encode the
/// survivors as a GeoJSON `FeatureCollection`. Events without coordinates
/// are silently excluded from the map (B2) but still counted in
/// `metadata.total_events`. `Minimal`-band signals are folded into
/// `low_count` — the spec's `/simulate` response only names the four
/// bands at or above the `Low` threshold.
pub fn simulate(
    events: &[ParsedEvent],
    reference: &ReferenceData,
    thresholds: ScoringThresholds,
    fuel_price_index: f64,
    inflation_rate: f64,
    chatter_intensity: f64,
    timestamp: DateTime<Utc>,
) -> serde_json::Value {
    let signals: Vec<RiskSignal> = events
        .iter()
        .filter_map(|event| {
            score_event_dynamic(event, reference, thresholds, fuel_price_index, inflation_rate)
        })
        .collect();

    let features: Vec<serde_json::Value> = signals
        .iter()
        .filter_map(|signal| signal_to_feature(signal, chatter_intensity))
        .collect();

    let mut critical_count = 0u64;
    let mut high_count = 0u64;
    let mut medium_count = 0u64;
    let mut low_count = 0u64;
    let mut categories = std::collections::HashSet::new();
    for signal in &signals {
        match signal.risk_level {
            RiskLevel::Critical => critical_count += 1,
            RiskLevel::High => high_count += 1,
            RiskLevel::Medium => medium_count += 1,
            RiskLevel::Low | RiskLevel::Minimal => low_count += 1,
        }
        categories.insert(signal.event_type.clone());
    }

    serde_json::json!({
        "type": "FeatureCollection",
        "features": features,
        "metadata": {
            "total_events": events.len(),
            "critical_count": critical_count,
            "high_count": high_count,
            "medium_count": medium_count,
            "low_count": low_count,
            "simulated_categories": categories.into_iter().collect::<Vec<_>>(),
            "timestamp": timestamp.to_rfc3339(),
            "simulation_active": true,
        },
        "simulation_params": {
            "fuel_price_index": fuel_price_index,
            "inflation_rate": inflation_rate,
            "chatter_intensity": chatter_intensity,
        },
    })
}
