//! Append-only JSONL journal.
//!
//! One line per reflection.  The whole file is loaded once at startup into
//! an in-memory cache; appends write through to disk first and only then
//! update the cache.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use ml_domain::error::{Error, Result};
use ml_domain::trace::TraceEvent;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

/// A single persisted reflection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub id: String,
    pub created_at: DateTime<Utc>,
    /// The user's text as submitted (trimmed).
    pub input: String,
    /// Reply profile the entry was produced with (`basic` / `extended`).
    #[serde(default)]
    pub profile: String,
    /// The normalized reply object.
    pub reply: serde_json::Value,
}

impl JournalEntry {
    pub fn new(input: &str, profile: &str, reply: serde_json::Value) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            created_at: Utc::now(),
            input: input.to_owned(),
            profile: profile.to_owned(),
            reply,
        }
    }

    /// A string field of the reply, when present and non-empty.
    pub fn reply_text(&self, key: &str) -> Option<&str> {
        self.reply
            .get(key)
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty())
    }

    /// A numeric field of the reply.
    pub fn reply_number(&self, key: &str) -> Option<f64> {
        self.reply.get(key).and_then(|v| v.as_f64())
    }
}

pub struct JournalStore {
    path: PathBuf,
    /// Sorted by `created_at`, oldest first.
    cache: RwLock<Vec<JournalEntry>>,
}

impl JournalStore {
    /// Load or create the journal at `path`, creating parent directories.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir).map_err(Error::Io)?;
        }

        let mut entries = read_jsonl_file(path)?;
        // Stable, so entries sharing a timestamp keep file order.
        entries.sort_by_key(|e| e.created_at);

        tracing::info!(
            entries = entries.len(),
            path = %path.display(),
            "journal loaded"
        );

        Ok(Self {
            path: path.to_path_buf(),
            cache: RwLock::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.cache.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.read().is_empty()
    }

    /// Append one entry (sync).
    pub fn append(&self, entry: JournalEntry) -> Result<()> {
        let buf = serialize_entry(&entry)?;
        append_to_file(&self.path, &buf)?;
        self.cache_insert(entry);
        Ok(())
    }

    /// Append one entry (async).
    ///
    /// The file write runs on the blocking pool.
    pub async fn append_async(&self, entry: JournalEntry) -> Result<()> {
        let buf = serialize_entry(&entry)?;
        let path = self.path.clone();

        // Cache is updated only after the write succeeds.
        tokio::task::spawn_blocking(move || append_to_file(&path, &buf))
            .await
            .map_err(|e| Error::Other(format!("spawn_blocking join: {e}")))??;

        self.cache_insert(entry);
        Ok(())
    }

    /// Entries created at or after `since`, oldest first.
    pub fn entries_since(&self, since: DateTime<Utc>) -> Vec<JournalEntry> {
        let cache = self.cache.read();
        let start = cache.partition_point(|e| e.created_at < since);
        cache[start..].to_vec()
    }

    fn cache_insert(&self, entry: JournalEntry) {
        let entry_id = entry.id.clone();
        let entries = {
            let mut cache = self.cache.write();
            // Usually the end; clock steps or racing appends land earlier.
            let at = cache.partition_point(|e| e.created_at <= entry.created_at);
            cache.insert(at, entry);
            cache.len()
        };
        TraceEvent::JournalAppend { entry_id, entries }.emit();
    }
}

fn serialize_entry(entry: &JournalEntry) -> Result<String> {
    let mut line = serde_json::to_string(entry)
        .map_err(|e| Error::Other(format!("serializing journal entry: {e}")))?;
    line.push('\n');
    Ok(line)
}

fn append_to_file(path: &Path, buf: &str) -> Result<()> {
    use std::io::Write;
    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(Error::Io)?;
    file.write_all(buf.as_bytes()).map_err(Error::Io)?;
    Ok(())
}

/// Read a JSONL journal, skipping lines that do not parse.
fn read_jsonl_file(path: &Path) -> Result<Vec<JournalEntry>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let raw = std::fs::read_to_string(path).map_err(Error::Io)?;
    let mut entries = Vec::new();
    for (lineno, line) in raw.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<JournalEntry>(line) {
            Ok(entry) => entries.push(entry),
            Err(e) => {
                tracing::warn!(
                    line = lineno + 1,
                    error = %e,
                    "skipping malformed journal line"
                );
            }
        }
    }
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use serde_json::json;

    #[test]
    fn open_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/deeper/journal.jsonl");
        let store = JournalStore::open(&path).unwrap();
        assert!(store.is_empty());
        assert!(path.parent().unwrap().is_dir());
    }

    #[test]
    fn appended_entries_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("journal.jsonl");

        let store = JournalStore::open(&path).unwrap();
        store
            .append(JournalEntry::new("疲れた", "basic", json!({"summary": "疲れた"})))
            .unwrap();
        store
            .append(JournalEntry::new("眠い", "basic", json!({"summary": "眠い"})))
            .unwrap();
        assert_eq!(store.len(), 2);

        let reopened = JournalStore::open(&path).unwrap();
        assert_eq!(reopened.len(), 2);
        let all = reopened.entries_since(Utc::now() - Duration::days(1));
        assert_eq!(all[0].input, "疲れた");
        assert_eq!(all[1].reply_text("summary"), Some("眠い"));
    }

    #[test]
    fn malformed_lines_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("journal.jsonl");
        let good = serde_json::to_string(&JournalEntry::new("a", "basic", json!({}))).unwrap();
        std::fs::write(&path, format!("{good}\nnot json\n\n{good}\n")).unwrap();

        let store = JournalStore::open(&path).unwrap();
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn entries_since_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        let store = JournalStore::open(&dir.path().join("j.jsonl")).unwrap();

        let now = Utc::now();
        let mut old = JournalEntry::new("old", "basic", json!({}));
        old.created_at = now - Duration::days(10);
        let mut mid = JournalEntry::new("mid", "basic", json!({}));
        mid.created_at = now - Duration::days(2);
        let mut recent = JournalEntry::new("recent", "basic", json!({}));
        recent.created_at = now - Duration::hours(1);

        store.append(recent).unwrap();
        store.append(old).unwrap();
        store.append(mid).unwrap();

        let week: Vec<String> = store
            .entries_since(now - Duration::days(7))
            .into_iter()
            .map(|e| e.input)
            .collect();
        assert_eq!(week, vec!["mid".to_string(), "recent".to_string()]);
    }

    #[test]
    fn out_of_order_file_is_sorted_on_open() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("journal.jsonl");
        let now = Utc::now();

        let mut newer = JournalEntry::new("newer", "basic", json!({}));
        newer.created_at = now - Duration::hours(1);
        let mut older = JournalEntry::new("older", "basic", json!({}));
        older.created_at = now - Duration::days(3);
        let mut ancient = JournalEntry::new("ancient", "basic", json!({}));
        ancient.created_at = now - Duration::days(30);

        let lines: Vec<String> = [&newer, &ancient, &older]
            .iter()
            .map(|e| serde_json::to_string(e).unwrap())
            .collect();
        std::fs::write(&path, lines.join("\n")).unwrap();

        let store = JournalStore::open(&path).unwrap();
        let week: Vec<String> = store
            .entries_since(now - Duration::days(7))
            .into_iter()
            .map(|e| e.input)
            .collect();
        assert_eq!(week, vec!["older".to_string(), "newer".to_string()]);
        assert!(store.entries_since(now).is_empty());
        assert_eq!(store.entries_since(now - Duration::days(365)).len(), 3);
    }

    #[tokio::test]
    async fn append_async_writes_through() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("journal.jsonl");
        let store = JournalStore::open(&path).unwrap();

        store
            .append_async(JournalEntry::new("x", "extended", json!({"score": 70})))
            .await
            .unwrap();

        assert_eq!(store.len(), 1);
        let raw = std::fs::read_to_string(&path).unwrap();
        assert_eq!(raw.lines().count(), 1);
        assert!(raw.contains("\"profile\":\"extended\""));
    }

    #[test]
    fn reply_accessors_ignore_empty_and_wrong_types() {
        let e = JournalEntry::new("x", "basic", json!({"summary": "", "score": "high", "category": "喜び"}));
        assert_eq!(e.reply_text("summary"), None);
        assert_eq!(e.reply_number("score"), None);
        assert_eq!(e.reply_text("category"), Some("喜び"));
    }
}
