use serde::Serialize;

/// Structured trace events emitted across all MirrorLoop crates.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event")]
pub enum TraceEvent {
    LlmRequest {
        provider: String,
        model: String,
        route: String,
        duration_ms: u64,
        prompt_tokens: Option<u32>,
        completion_tokens: Option<u32>,
        finish_reason: Option<String>,
    },
    ReplyAssembled {
        profile: String,
        /// Which stage produced the candidate: `direct`, `extracted`, or `positional`.
        source: String,
        raw_chars: usize,
    },
    JournalAppend {
        entry_id: String,
        entries: usize,
    },
    SpeechSynth {
        provider: String,
        model: String,
        text_chars: usize,
        audio_bytes: usize,
        duration_ms: u64,
    },
    WeeklyReport {
        entries: usize,
        llm_called: bool,
    },
}

impl TraceEvent {
    pub fn emit(&self) {
        let json = serde_json::to_string(self).unwrap_or_default();
        tracing::info!(trace_event = %json, "ml_event");
    }
}
