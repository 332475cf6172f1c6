//! Best-effort recovery of a JSON object from model output.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};

/// ```` ```json {...} ``` ````; the label is matched case-insensitively
/// and the body lazily, so the first closing fence ends it.
static FENCED_JSON: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)```[^\S\r\n]*json\s*(\{.*?\})\s*```").expect("valid regex")
});

/// A comma whose next non-whitespace character closes an object or array.
static TRAILING_COMMA: Lazy<Regex> =
    Lazy::new(|| Regex::new(r",\s*([}\]])").expect("valid regex"));

/// Locate and parse the single JSON object inside `text`.
///
/// Returns an empty map when nothing parses, even after the trailing-comma
/// repair.  Never errors.
pub fn extract(text: &str) -> Map<String, Value> {
    let candidate = candidate_span(text);
    if let Some(map) = parse_object(candidate) {
        return map;
    }

    let repaired = TRAILING_COMMA.replace_all(candidate, "${1}");
    if let Some(map) = parse_object(&repaired) {
        tracing::debug!(chars = candidate.len(), "json candidate parsed after trailing-comma repair");
        return map;
    }

    tracing::debug!(chars = candidate.len(), "no json object recoverable");
    Map::new()
}

/// Strict parse of `s` as a JSON object.  Arrays, scalars and malformed
/// input yield `None`.
pub(crate) fn parse_object(s: &str) -> Option<Map<String, Value>> {
    match serde_json::from_str::<Value>(s) {
        Ok(Value::Object(map)) => Some(map),
        _ => None,
    }
}

fn candidate_span(text: &str) -> &str {
    if let Some(body) = FENCED_JSON.captures(text).and_then(|c| c.get(1)) {
        return body.as_str();
    }
    match (text.find('{'), text.rfind('}')) {
        (Some(start), Some(end)) if end > start => &text[start..=end],
        _ => "{}",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fenced_block_with_trailing_comma() {
        let map = extract("```json\n{\"summary\":\"ok\",\"advice\":\"rest\",}\n```");
        assert_eq!(map.get("summary").and_then(Value::as_str), Some("ok"));
        assert_eq!(map.get("advice").and_then(Value::as_str), Some("rest"));
    }

    #[test]
    fn fence_label_is_case_insensitive() {
        let map = extract("Here you go:\n```JSON\n{\"a\": 1}\n```\nthanks");
        assert_eq!(map.get("a"), Some(&Value::from(1)));
    }

    #[test]
    fn fence_wins_over_stray_braces() {
        let text = "note {not json}\n```json\n{\"a\": true}\n```";
        let map = extract(text);
        assert_eq!(map.get("a"), Some(&Value::Bool(true)));
    }

    #[test]
    fn outermost_braces_in_prose() {
        let text = "Sure! {\"summary\": \"x\", \"nested\": {\"k\": 1}} Hope that helps.";
        let map = extract(text);
        assert_eq!(map.get("summary").and_then(Value::as_str), Some("x"));
        assert!(map.get("nested").is_some_and(Value::is_object));
    }

    #[test]
    fn trailing_comma_inside_array() {
        let map = extract("{\"advice\": [\"a\", \"b\",], }");
        assert_eq!(map.get("advice").and_then(Value::as_array).map(Vec::len), Some(2));
    }

    #[test]
    fn no_braces_yields_empty() {
        assert!(extract("no json here").is_empty());
        assert!(extract("").is_empty());
    }

    #[test]
    fn unbalanced_or_reversed_braces_yield_empty() {
        assert!(extract("{").is_empty());
        assert!(extract("} then {").is_empty());
        assert!(extract("{\"a\": }").is_empty());
    }

    #[test]
    fn non_object_json_is_rejected() {
        assert!(parse_object("[1, 2]").is_none());
        assert!(parse_object("\"text\"").is_none());
        assert!(parse_object("{}").is_some());
    }
}
