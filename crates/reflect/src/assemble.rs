//! Reply assembly: direct parse, salvage, positional fallback, normalize.

use serde_json::{Map, Value};

use crate::clean::LineCleaner;
use crate::extract::{extract, parse_object};
use crate::fields::{NormalizedReply, ReplyFields};
use crate::normalize::normalize;

/// Which stage produced the candidate mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateSource {
    /// The whole reply was a JSON object.
    Direct,
    /// [`extract`] found an object inside the reply.
    Extracted,
    /// No usable keys; lines were assigned to fields in order.
    Positional,
}

impl CandidateSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Direct => "direct",
            Self::Extracted => "extracted",
            Self::Positional => "positional",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Assembled {
    pub reply: NormalizedReply,
    pub source: CandidateSource,
}

/// Turn raw model text into a fully populated reply for `fields`.
pub fn assemble(raw: &str, fields: &ReplyFields, cleaner: &LineCleaner) -> NormalizedReply {
    assemble_with_source(raw, fields, cleaner).reply
}

/// Like [`assemble`], also reporting which stage supplied the values.
pub fn assemble_with_source(raw: &str, fields: &ReplyFields, cleaner: &LineCleaner) -> Assembled {
    let (candidate, mut source) = match parse_object(raw.trim()) {
        Some(map) => (map, CandidateSource::Direct),
        None => (extract(raw), CandidateSource::Extracted),
    };

    let candidate = if has_usable_keys(&candidate, fields) {
        candidate
    } else {
        tracing::debug!(
            keys = candidate.len(),
            "no expected keys recovered, assigning lines positionally"
        );
        source = CandidateSource::Positional;
        positional(raw, fields)
    };

    Assembled {
        reply: normalize(&candidate, fields, cleaner),
        source,
    }
}

fn has_usable_keys(candidate: &Map<String, Value>, fields: &ReplyFields) -> bool {
    candidate.keys().any(|k| fields.contains(k))
}

/// Non-empty trimmed lines of `raw`, one per field in declaration order.
/// Surplus lines are dropped; surplus fields stay absent (and so default).
fn positional(raw: &str, fields: &ReplyFields) -> Map<String, Value> {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .zip(fields.names())
        .map(|(line, name)| (name.to_owned(), Value::String(line.to_owned())))
        .collect()
}
