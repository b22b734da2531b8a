use riftwatch_common::ConflictType;
use serde_json::Value;
use std::str::FromStr;

#[derive(Debug, Clone, Copy)]
pub struct CategorizationResult {
    pub category: ConflictType,
    pub confidence: u8,
}

/// Parse `{category, confidence}`. Unlike extraction, categorization never
/// discards a malformed response outright — an unrecognized category or an
/// out-of-range confidence clamps to `Unknown`/0 rather than being thrown
/// away, since every article must land somewhere in the categorization
/// queue's terminal states.
pub fn parse_categorization(value: &Value) -> CategorizationResult {
    let category = value
        .get("category")
        .and_then(Value::as_str)
        .and_then(|s| ConflictType::from_str(s).ok())
        .unwrap_or(ConflictType::Unknown);

    let confidence = value
        .get("confidence")
        .and_then(Value::as_i64)
        .filter(|&c| (0..=100).contains(&c))
        .map(|c| c as u8)
        .unwrap_or(0);

    if category == ConflictType::Unknown {
        CategorizationResult {
            category,
            confidence: 0,
        }
    } else {
        CategorizationResult {
            category,
            confidence,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_valid_category() {
        let value = serde_json::json!({"category": "Banditry", "confidence": 72});
        let result = parse_categorization(&value);
        assert_eq!(result.category, ConflictType::Banditry);
        assert_eq!(result.confidence, 72);
    }

    #[test]
    fn unknown_category_forces_zero_confidence() {
        let value = serde_json::json!({"category": "Something Else", "confidence": 90});
        let result = parse_categorization(&value);
        assert_eq!(result.category, ConflictType::Unknown);
        assert_eq!(result.confidence, 0);
    }

    #[test]
    fn out_of_range_confidence_clamps_to_zero() {
        let value = serde_json::json!({"category": "Kidnapping", "confidence": 500});
        let result = parse_categorization(&value);
        assert_eq!(result.confidence, 0);
    }
}
