//! Model response parsing.
//!
//! The model is asked for a JSON array of `{keyword, category, description}`
//! objects, often wrapped in a fenced code block. Parsing never fails: a
//! response that cannot be decoded yields zero records and a
//! `MalformedResponse` cause, and individual bad elements are skipped.

use lexis_core::errors::GenerationError;
use lexis_core::models::KeywordRecord;
use serde_json::Value;
use tracing::{debug, warn};

const FENCE: &str = "```";

/// Records recovered from one response, plus what was lost.
#[derive(Debug, Default)]
pub struct ParsedResponse {
    /// Valid records in source order.
    pub records: Vec<KeywordRecord>,
    /// Elements dropped because they failed validation.
    pub skipped: usize,
    /// Set when the whole response was unusable.
    pub error: Option<GenerationError>,
}

/// Parse a raw model response into keyword records.
pub fn parse(raw_text: &str) -> Vec<KeywordRecord> {
    parse_detailed(raw_text).records
}

/// Parse a raw model response, reporting skipped elements and hard failures.
pub fn parse_detailed(raw_text: &str) -> ParsedResponse {
    let body = strip_fence(raw_text);

    let value: Value = match serde_json::from_str(body) {
        Ok(v) => v,
        Err(e) => {
            warn!(error = %e, preview = %preview(body), "model response is not valid JSON");
            return malformed(format!("invalid JSON: {e}"));
        }
    };

    let elements = match value {
        Value::Array(elements) => elements,
        other => {
            warn!(kind = json_kind(&other), "model response is not a JSON array");
            return malformed(format!("expected an array, got {}", json_kind(&other)));
        }
    };

    let mut parsed = ParsedResponse::default();
    for element in &elements {
        match to_record(element) {
            Some(record) => parsed.records.push(record),
            None => {
                debug!(element = %element, "skipping invalid keyword entry");
                parsed.skipped += 1;
            }
        }
    }
    parsed
}

/// Trim whitespace and remove a surrounding code fence, if any.
///
/// The opening fence may carry a language tag (```` ```json ````).
pub fn strip_fence(raw_text: &str) -> &str {
    let mut text = raw_text.trim();
    if let Some(rest) = text.strip_prefix(FENCE) {
        text = match rest.find('\n') {
            Some(newline) => &rest[newline + 1..],
            None => rest.trim_start_matches(|c: char| c.is_ascii_alphanumeric()),
        };
        text = text.trim_end();
        if let Some(inner) = text.strip_suffix(FENCE) {
            text = inner;
        }
    }
    text.trim()
}

/// An element is usable when it is an object with a non-empty string
/// `keyword`. Category and description fall back to defaults.
fn to_record(element: &Value) -> Option<KeywordRecord> {
    let object = element.as_object()?;
    let text = object.get("keyword")?.as_str()?;
    let category = object
        .get("category")
        .and_then(Value::as_str)
        .map(str::to_string);
    let description = object
        .get("description")
        .and_then(Value::as_str)
        .map(str::to_string);
    KeywordRecord::new(text, category, description)
}

fn malformed(reason: String) -> ParsedResponse {
    ParsedResponse {
        error: Some(GenerationError::MalformedResponse { reason }),
        ..Default::default()
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn preview(text: &str) -> String {
    text.chars().take(500).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_fence_with_language_tag() {
        assert_eq!(strip_fence("```json\n[1]\n```"), "[1]");
    }

    #[test]
    fn strip_fence_without_tag() {
        assert_eq!(strip_fence("  ```\n[]\n```  "), "[]");
    }

    #[test]
    fn strip_fence_on_single_line() {
        assert_eq!(strip_fence("```json[]```"), "[]");
        assert_eq!(strip_fence("```[]```"), "[]");
    }

    #[test]
    fn strip_fence_leaves_plain_text() {
        assert_eq!(strip_fence("\n [ ] \n"), "[ ]");
    }

    #[test]
    fn unclosed_fence_still_strips_opening() {
        assert_eq!(strip_fence("```json\n[]"), "[]");
    }

    #[test]
    fn non_string_keyword_is_invalid() {
        let value: Value = serde_json::json!({"keyword": 42, "category": "trading"});
        assert!(to_record(&value).is_none());
    }

    #[test]
    fn non_string_category_falls_back() {
        let value: Value = serde_json::json!({"keyword": "דיבידנד", "category": null});
        let record = to_record(&value).unwrap();
        assert_eq!(record.category(), "general");
    }
}
