use riftwatch_common::{ConflictDriver, Severity};
use serde_json::Value;
use std::str::FromStr;

/// The extraction prompt family's seven required keys. Any key missing or
/// malformed discards the whole result (spec: "all keys must be present;
/// otherwise the result is discarded").
#[derive(Debug, Clone)]
pub struct ExtractionResult {
    pub event_type: String,
    pub state: String,
    pub lga: String,
    pub severity: Severity,
    pub sentiment_intensity: u8,
    pub hate_speech_indicators: Vec<String>,
    pub conflict_driver: ConflictDriver,
}

/// Parse a lenient JSON object into an [`ExtractionResult`]. Returns `None`
/// if any of the seven keys is missing or the wrong shape.
pub fn parse_extraction(value: &Value) -> Option<ExtractionResult> {
    let event_type = value.get("Event_Type")?.as_str()?.to_string();
    let state = value.get("State")?.as_str()?.to_string();
    let lga = value.get("LGA")?.as_str()?.to_string();
    let severity = Severity::from_str(value.get("Severity")?.as_str()?).ok()?;
    let sentiment_intensity = value
        .get("Sentiment_Intensity")?
        .as_u64()?
        .min(100) as u8;
    let hate_speech_indicators = value
        .get("Hate_Speech_Indicators")?
        .as_array()?
        .iter()
        .filter_map(|v| v.as_str().map(str::to_string))
        .collect();
    let conflict_driver = ConflictDriver::from_str(value.get("Conflict_Driver")?.as_str()?).ok()?;

    Some(ExtractionResult {
        event_type,
        state,
        lga,
        severity,
        sentiment_intensity,
        hate_speech_indicators,
        conflict_driver,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_complete_object() {
        let value = serde_json::json!({
            "Event_Type": "Armed clash",
            "State": "Benue",
            "LGA": "Makurdi",
            "Severity": "high",
            "Sentiment_Intensity": 80,
            "Hate_Speech_Indicators": ["ethnic slur"],
            "Conflict_Driver": "social",
        });
        let result = parse_extraction(&value).unwrap();
        assert_eq!(result.event_type, "Armed clash");
        assert_eq!(result.severity, Severity::High);
        assert_eq!(result.sentiment_intensity, 80);
    }

    #[test]
    fn missing_key_discards_result() {
        let value = serde_json::json!({
            "Event_Type": "Armed clash",
            "State": "Benue",
            "LGA": "Makurdi",
            "Severity": "high",
        });
        assert!(parse_extraction(&value).is_none());
    }

    #[test]
    fn sentiment_intensity_is_clamped_to_100() {
        let value = serde_json::json!({
            "Event_Type": "Armed clash",
            "State": "Benue",
            "LGA": "Makurdi",
            "Severity": "high",
            "Sentiment_Intensity": 500,
            "Hate_Speech_Indicators": [],
            "Conflict_Driver": "social",
        });
        let result = parse_extraction(&value).unwrap();
        assert_eq!(result.sentiment_intensity, 100);
    }
}
