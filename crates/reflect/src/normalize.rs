//! Coerces a candidate mapping into a [`NormalizedReply`].

use serde_json::{Map, Value};

use crate::clean::LineCleaner;
use crate::fields::{FieldKind, FieldSpec, FieldValue, NormalizedReply, ReplyFields};

/// Build the reply for `fields` from `candidate`.
///
/// Every field is present in the output.  Missing or wrongly-typed values
/// fall back to the field default; every string is cleaned.
pub fn normalize(
    candidate: &Map<String, Value>,
    fields: &ReplyFields,
    cleaner: &LineCleaner,
) -> NormalizedReply {
    let mut reply = NormalizedReply::default();
    for spec in fields {
        let value = match candidate.get(&spec.name) {
            Some(raw) => coerce(raw, spec, cleaner),
            None => spec.default_value(),
        };
        reply.push(&spec.name, value);
    }
    reply
}

fn coerce(raw: &Value, spec: &FieldSpec, cleaner: &LineCleaner) -> FieldValue {
    match spec.kind {
        FieldKind::Text => FieldValue::Text(text_of(raw, cleaner)),
        FieldKind::Score { min, max, default } => {
            FieldValue::Score(score_of(raw).map_or(default, |n| n.clamp(min, max)))
        }
        FieldKind::List { max_items } => FieldValue::List(
            list_of(raw, cleaner).into_iter().take(max_items).collect(),
        ),
    }
}

fn text_of(raw: &Value, cleaner: &LineCleaner) -> String {
    match raw {
        Value::String(s) => cleaner.clean(s),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        // A list where prose was expected: keep the items as one sentence run.
        Value::Array(_) => list_of(raw, cleaner).join(" "),
        Value::Null | Value::Object(_) => String::new(),
    }
}

fn list_of(raw: &Value, cleaner: &LineCleaner) -> Vec<String> {
    let items: Vec<String> = match raw {
        Value::String(s) => s.lines().map(|line| cleaner.clean(line)).collect(),
        Value::Array(values) => values
            .iter()
            .map(|v| match v {
                Value::String(s) => cleaner.clean(s),
                Value::Number(n) => n.to_string(),
                _ => String::new(),
            })
            .collect(),
        _ => Vec::new(),
    };
    items.into_iter().filter(|s| !s.is_empty()).collect()
}

fn score_of(raw: &Value) -> Option<i64> {
    let n = match raw {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    if !n.is_finite() {
        return None;
    }
    // The `as` cast saturates, so huge values still clamp correctly later.
    Some(n.round() as i64)
}
