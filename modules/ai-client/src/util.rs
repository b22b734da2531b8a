/// Strip markdown code-fence wrapping from a model response.
pub fn strip_code_blocks(response: &str) -> &str {
    response
        .trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim()
}

/// Lenient JSON object extraction from a model response: try the response
/// as raw JSON first, then a fenced ```json block, then fall back to the
/// first balanced `{...}` substring. Returns `None` if no candidate parses.
pub fn extract_json_object(response: &str) -> Option<serde_json::Value> {
    let trimmed = response.trim();
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(trimmed) {
        return Some(value);
    }

    let unfenced = strip_code_blocks(trimmed);
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(unfenced) {
        return Some(value);
    }

    first_balanced_object(trimmed).and_then(|s| serde_json::from_str(s).ok())
}

/// Find the first `{...}` substring with balanced braces, ignoring braces
/// inside string literals.
fn first_balanced_object(s: &str) -> Option<&str> {
    let bytes = s.as_bytes();
    let start = s.find('{')?;
    let mut depth = 0i32;
    let mut in_string = false;
    let mut escaped = false;
    for (i, &b) in bytes.iter().enumerate().skip(start) {
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&s[start..=i]);
                }
            }
            _ => {}
        }
    }
    None
}
