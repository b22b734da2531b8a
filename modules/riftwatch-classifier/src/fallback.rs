use riftwatch_common::{ConflictType, Severity};

use crate::extraction::ExtractionResult;

/// `(state name, capital lat, capital lon)`. Used when the model is
/// unavailable: an article naming a state is geolocated to that state's
/// capital rather than left without coordinates.
const STATE_CAPITALS: &[(&str, f64, f64)] = &[
    ("Abia", 5.5247, 7.4951),
    ("Adamawa", 9.2035, 12.4954),
    ("Akwa Ibom", 5.0377, 7.9128),
    ("Anambra", 6.2120, 7.0741),
    ("Bauchi", 10.3158, 9.8442),
    ("Bayelsa", 4.9247, 6.2642),
    ("Benue", 7.7337, 8.5391),
    ("Borno", 11.8333, 13.1500),
    ("Cross River", 4.9517, 8.3220),
    ("Delta", 6.2059, 6.7269),
    ("Ebonyi", 6.3249, 8.1137),
    ("Edo", 6.3350, 5.6037),
    ("Ekiti", 7.6211, 5.2213),
    ("Enugu", 6.5244, 7.5086),
    ("Gombe", 10.2897, 11.1673),
    ("Imo", 5.4840, 7.0351),
    ("Jigawa", 11.7564, 9.3375),
    ("Kaduna", 10.5231, 7.4383),
    ("Kano", 12.0022, 8.5919),
    ("Katsina", 12.9908, 7.6017),
    ("Kebbi", 12.4539, 4.1975),
    ("Kogi", 7.8023, 6.7337),
    ("Kwara", 8.4799, 4.5418),
    ("Lagos", 6.6018, 3.3515),
    ("Nasarawa", 8.4939, 8.5168),
    ("Niger", 9.6139, 6.5569),
    ("Ogun", 7.1475, 3.3619),
    ("Ondo", 7.2571, 5.2058),
    ("Osun", 7.7667, 4.5667),
    ("Oyo", 7.3775, 3.9470),
    ("Plateau", 9.8965, 8.8583),
    ("Rivers", 4.8156, 7.0498),
    ("Sokoto", 13.0059, 5.2476),
    ("Taraba", 8.8937, 11.3604),
    ("Yobe", 11.7470, 11.9608),
    ("Zamfara", 12.1700, 6.6625),
    ("FCT", 9.0765, 7.3986),
];

/// Category keyword confidences, matched case-insensitively against the
/// article's title and content.
const CATEGORY_KEYWORDS: &[(&str, &[&str], u8)] = &[
    ("Banditry", &["bandit", "banditry", "rustl"], 70),
    ("Kidnapping", &["kidnap", "abduct", "hostage"], 75),
    ("Gunmen Violence", &["gunmen", "gunman", "armed men"], 65),
    (
        "Farmer-Herder Clashes",
        &["herder", "farmer", "fulani", "grazing"],
        60,
    ),
];

const EVENT_TYPE_KEYWORDS: &[(&str, &str)] = &[
    ("bomb", "Bombing"),
    ("explosion", "Bombing"),
    ("kidnap", "Kidnapping"),
    ("abduct", "Kidnapping"),
    ("bandit", "Banditry Attack"),
    ("herder", "Farmer-Herder Clash"),
    ("farmer", "Farmer-Herder Clash"),
    ("clash", "Communal Clash"),
    ("protest", "Protest"),
    ("gunmen", "Gunmen Attack"),
    ("raid", "Armed Raid"),
];

/// Locate a state name as a whole word inside `text`, returning its
/// capital coordinates (case-insensitive). Matches on word boundaries so
/// "Niger" doesn't fire on every mention of "Nigeria".
pub fn geolocate_state(text: &str) -> Option<(&'static str, f64, f64)> {
    let lower = text.to_lowercase();
    let words: std::collections::HashSet<&str> =
        lower.split(|c: char| !c.is_alphanumeric()).collect();

    STATE_CAPITALS
        .iter()
        .find(|(name, _, _)| {
            let name_lower = name.to_lowercase();
            if name_lower.contains(' ') {
                lower.contains(&name_lower)
            } else {
                words.contains(name_lower.as_str())
            }
        })
        .map(|&(name, lat, lon)| (name, lat, lon))
}

/// Keyword-tiered severity: killed/bomb -> critical; injured/attack/kidnap
/// -> high; protest/clash/tension -> medium; else low.
pub fn infer_severity(text: &str) -> Severity {
    let lower = text.to_lowercase();
    if lower.contains("killed") || lower.contains("bomb") {
        Severity::Critical
    } else if lower.contains("injured") || lower.contains("attack") || lower.contains("kidnap") {
        Severity::High
    } else if lower.contains("protest") || lower.contains("clash") || lower.contains("tension") {
        Severity::Medium
    } else {
        Severity::Low
    }
}

fn infer_event_type(text: &str) -> String {
    let lower = text.to_lowercase();
    EVENT_TYPE_KEYWORDS
        .iter()
        .find(|(keyword, _)| lower.contains(keyword))
        .map(|(_, label)| label.to_string())
        .unwrap_or_else(|| "Unclassified Incident".to_string())
}

/// Rule-based replacement for the extraction prompt, used when the model
/// is unavailable. Always produces a result (no "discard on missing key"
/// here, since there's nothing to discard — every field is synthesized).
pub fn rule_based_extraction(title: &str, content: &str) -> ExtractionResult {
    let text = format!("{title} {content}");
    let (state, _, _) = geolocate_state(&text).unwrap_or(("Unknown", 0.0, 0.0));

    ExtractionResult {
        event_type: infer_event_type(&text),
        state: state.to_string(),
        lga: "Unknown".to_string(),
        severity: infer_severity(&text),
        sentiment_intensity: 50,
        hate_speech_indicators: Vec::new(),
        conflict_driver: riftwatch_common::ConflictDriver::Social,
    }
}

/// Rule-based replacement for the categorization prompt. Returns `None` if
/// no category keyword matches at all — this is the "Skipped(no conflict
/// signal)" terminal state.
pub fn rule_based_category(title: &str, content: &str) -> Option<(ConflictType, u8)> {
    let text = format!("{title} {content}").to_lowercase();
    CATEGORY_KEYWORDS
        .iter()
        .find(|(_, keywords, _)| keywords.iter().any(|k| text.contains(k)))
        .map(|(name, _, confidence)| {
            let category = match *name {
                "Banditry" => ConflictType::Banditry,
                "Kidnapping" => ConflictType::Kidnapping,
                "Gunmen Violence" => ConflictType::GunmenViolence,
                "Farmer-Herder Clashes" => ConflictType::FarmerHerderClashes,
                _ => ConflictType::Unknown,
            };
            (category, *confidence)
        })
}
