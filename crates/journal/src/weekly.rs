//! Weekly roll-up of journal entries.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::store::JournalEntry;

/// Aggregate statistics over a window of entries.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklyDigest {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
    pub entries: usize,
    /// Mean of every numeric `score` in the window; `None` when no entry has one.
    pub average_score: Option<f64>,
    /// Count per non-empty `category`.
    pub categories: BTreeMap<String, usize>,
    /// Non-empty `summary` values in chronological order.
    pub summaries: Vec<String>,
}

impl WeeklyDigest {
    /// Build the digest from the entries whose `created_at` lies in `[from, to]`.
    pub fn from_entries(entries: &[JournalEntry], from: DateTime<Utc>, to: DateTime<Utc>) -> Self {
        let mut window: Vec<&JournalEntry> = entries
            .iter()
            .filter(|e| e.created_at >= from && e.created_at <= to)
            .collect();
        window.sort_by_key(|e| e.created_at);

        let scores: Vec<f64> = window
            .iter()
            .filter_map(|e| e.reply_number("score"))
            .filter(|s| s.is_finite())
            .collect();
        let average_score = if scores.is_empty() {
            None
        } else {
            Some(scores.iter().sum::<f64>() / scores.len() as f64)
        };

        let mut categories = BTreeMap::new();
        for cat in window.iter().filter_map(|e| e.reply_text("category")) {
            *categories.entry(cat.to_owned()).or_insert(0) += 1;
        }

        let summaries = window
            .iter()
            .filter_map(|e| e.reply_text("summary"))
            .map(str::to_owned)
            .collect();

        Self {
            from,
            to,
            entries: window.len(),
            average_score,
            categories,
            summaries,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use serde_json::json;

    fn entry_at(at: DateTime<Utc>, reply: serde_json::Value) -> JournalEntry {
        let mut e = JournalEntry::new("input", "extended", reply);
        e.created_at = at;
        e
    }

    #[test]
    fn empty_window() {
        let now = Utc::now();
        let d = WeeklyDigest::from_entries(&[], now - Duration::days(7), now);
        assert!(d.is_empty());
        assert_eq!(d.average_score, None);
        assert!(d.categories.is_empty());
        assert!(d.summaries.is_empty());
    }

    #[test]
    fn aggregates_scores_categories_and_summaries() {
        let now = Utc::now();
        let entries = vec![
            entry_at(
                now - Duration::days(1),
                json!({"summary": "二番目", "score": 80, "category": "喜び"}),
            ),
            entry_at(
                now - Duration::days(3),
                json!({"summary": "一番目", "score": 40, "category": "不安"}),
            ),
            entry_at(
                now - Duration::hours(2),
                json!({"summary": "", "category": "喜び"}),
            ),
            entry_at(
                now - Duration::days(9),
                json!({"summary": "範囲外", "score": 0, "category": "怒り"}),
            ),
        ];

        let d = WeeklyDigest::from_entries(&entries, now - Duration::days(7), now);
        assert_eq!(d.entries, 3);
        assert_eq!(d.average_score, Some(60.0));
        assert_eq!(d.categories.get("喜び"), Some(&2));
        assert_eq!(d.categories.get("不安"), Some(&1));
        assert!(!d.categories.contains_key("怒り"));
        assert_eq!(d.summaries, vec!["一番目".to_string(), "二番目".to_string()]);
    }

    #[test]
    fn serializes_stats() {
        let now = Utc::now();
        let entries = vec![entry_at(now, json!({"summary": "s", "score": 50}))];
        let d = WeeklyDigest::from_entries(&entries, now - Duration::days(7), now);
        let v = serde_json::to_value(&d).unwrap();
        assert_eq!(v["entries"], 1);
        assert_eq!(v["average_score"], 50.0);
        assert_eq!(v["summaries"], json!(["s"]));
    }
}
