use std::path::PathBuf;

use serde::{Deserialize, Serialize};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Journal persistence
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalConfig {
    /// When false, reflections are not persisted and `/weekly_report`
    /// always reports an empty week.
    #[serde(default = "d_true")]
    pub enabled: bool,
    /// Append-only JSONL file holding one entry per reflection.
    #[serde(default = "d_journal_path")]
    pub path: PathBuf,
}

impl Default for JournalConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: d_journal_path(),
        }
    }
}

fn d_true() -> bool {
    true
}
fn d_journal_path() -> PathBuf {
    PathBuf::from("./data/journal.jsonl")
}
