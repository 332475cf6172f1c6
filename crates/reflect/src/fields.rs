//! The reply contract: which keys a reply must carry and what type each is.

use serde::ser::{Serialize, SerializeMap, Serializer};

/// Default ceiling for the `score` field.
pub const SCORE_MAX: i64 = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    /// Cleaned free text; defaults to `""`.
    Text,
    /// Integer clamped to `min..=max`; anything unparsable becomes `default`.
    Score { min: i64, max: i64, default: i64 },
    /// Ordered cleaned strings, at most `max_items`; defaults to `[]`.
    List { max_items: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: String,
    pub kind: FieldKind,
}

impl FieldSpec {
    pub fn text(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: FieldKind::Text,
        }
    }

    /// A 0–100 score with the given neutral default (itself clamped).
    pub fn score(name: impl Into<String>, default: i64) -> Self {
        Self {
            name: name.into(),
            kind: FieldKind::Score {
                min: 0,
                max: SCORE_MAX,
                default: default.clamp(0, SCORE_MAX),
            },
        }
    }

    pub fn list(name: impl Into<String>, max_items: usize) -> Self {
        Self {
            name: name.into(),
            kind: FieldKind::List { max_items },
        }
    }

    pub fn default_value(&self) -> FieldValue {
        match self.kind {
            FieldKind::Text => FieldValue::Text(String::new()),
            FieldKind::Score { default, .. } => FieldValue::Score(default),
            FieldKind::List { .. } => FieldValue::List(Vec::new()),
        }
    }
}

/// Ordered, duplicate-free set of expected fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplyFields {
    fields: Vec<FieldSpec>,
}

impl ReplyFields {
    /// Later specs reusing an earlier name are dropped.
    pub fn new(specs: impl IntoIterator<Item = FieldSpec>) -> Self {
        let mut fields: Vec<FieldSpec> = Vec::new();
        for spec in specs {
            if !fields.iter().any(|f| f.name == spec.name) {
                fields.push(spec);
            }
        }
        Self { fields }
    }

    /// `summary`, `advice`, `next`.
    pub fn basic() -> Self {
        Self::new([
            FieldSpec::text("summary"),
            FieldSpec::text("advice"),
            FieldSpec::text("next"),
        ])
    }

    /// `summary`, `advice` (list), `category`, `score`, `followup`.
    pub fn extended(advice_max_items: usize, score_default: i64) -> Self {
        Self::new([
            FieldSpec::text("summary"),
            FieldSpec::list("advice", advice_max_items),
            FieldSpec::text("category"),
            FieldSpec::score("score", score_default),
            FieldSpec::text("followup"),
        ])
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FieldSpec> {
        self.fields.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    pub fn get(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<'a> IntoIterator for &'a ReplyFields {
    type Item = &'a FieldSpec;
    type IntoIter = std::slice::Iter<'a, FieldSpec>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Score(i64),
    List(Vec<String>),
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Text(s) => serializer.serialize_str(s),
            Self::Score(n) => serializer.serialize_i64(*n),
            Self::List(items) => items.serialize(serializer),
        }
    }
}

/// A reply with every expected field present, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NormalizedReply {
    entries: Vec<(String, FieldValue)>,
}

impl NormalizedReply {
    pub(crate) fn push(&mut self, name: &str, value: FieldValue) {
        self.entries.push((name.to_owned(), value));
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.entries
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v)
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        match self.get(name)? {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn score(&self, name: &str) -> Option<i64> {
        match self.get(name)? {
            FieldValue::Score(n) => Some(*n),
            _ => None,
        }
    }

    pub fn list(&self, name: &str) -> Option<&[String]> {
        match self.get(name)? {
            FieldValue::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Every string carried by the reply, list items included.
    pub fn strings(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().flat_map(|(_, v)| {
            let items: Vec<&str> = match v {
                FieldValue::Text(s) => vec![s.as_str()],
                FieldValue::List(items) => items.iter().map(String::as_str).collect(),
                FieldValue::Score(_) => Vec::new(),
            };
            items
        })
    }

    /// The reply as a JSON object (field order is not preserved by
    /// `serde_json::Map`; use [`Serialize`] when it matters).
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

impl Serialize for NormalizedReply {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}
