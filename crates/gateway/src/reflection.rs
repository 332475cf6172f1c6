//! The model round trips shared by the HTTP routes and the CLI.

use std::time::Instant;

use chrono::{DateTime, Duration, Utc};
use ml_domain::config::ReplyProfile;
use ml_domain::error::Result;
use ml_domain::trace::TraceEvent;
use ml_journal::{JournalEntry, WeeklyDigest};
use ml_providers::{ChatMessage, ChatRequest, LlmProvider};
use ml_reflect::prompt::{reflection_prompt, weekly_prompt, Prompt};
use ml_reflect::{assemble_with_source, LineCleaner, NormalizedReply};

use crate::state::AppState;

/// Report returned when the window holds no entries.
pub const EMPTY_WEEK_REPORT: &str = "今週の記録はまだありません。まずは今日の気持ちを書いてみましょう。";

/// Length of the weekly report window.
pub const WEEK: i64 = 7;

/// Send `prompt` and return the model's raw text.
pub async fn complete(
    state: &AppState,
    llm: &dyn LlmProvider,
    prompt: Prompt,
    json_mode: bool,
    route: &str,
) -> Result<String> {
    let req = ChatRequest {
        messages: vec![ChatMessage::system(prompt.system), ChatMessage::user(prompt.user)],
        temperature: Some(state.config.llm.temperature),
        max_tokens: None,
        json_mode,
        model: None,
    };

    let started = Instant::now();
    let resp = llm.chat(&req).await?;
    if resp.finish_reason.as_deref() == Some("length") {
        tracing::warn!(route, "model reply was cut off at the token limit");
    }

    TraceEvent::LlmRequest {
        provider: llm.provider_id().to_owned(),
        model: resp.model.clone(),
        route: route.to_owned(),
        duration_ms: started.elapsed().as_millis() as u64,
        prompt_tokens: resp.usage.map(|u| u.prompt_tokens),
        completion_tokens: resp.usage.map(|u| u.completion_tokens),
        finish_reason: resp.finish_reason.clone(),
    }
    .emit();

    Ok(resp.content)
}

/// Ask the model to reflect on `input` and assemble the reply for `profile`.
///
/// `input` must already be trimmed and non-empty.
pub async fn reflect(
    state: &AppState,
    llm: &dyn LlmProvider,
    profile: ReplyProfile,
    input: &str,
    route: &str,
) -> Result<NormalizedReply> {
    let fields = state.fields_for(profile);
    let raw = complete(
        state,
        llm,
        reflection_prompt(fields, input),
        state.config.llm.json_mode,
        route,
    )
    .await?;

    let assembled = assemble_with_source(&raw, fields, &state.cleaner);

    TraceEvent::ReplyAssembled {
        profile: profile.as_str().to_owned(),
        source: assembled.source.as_str().to_owned(),
        raw_chars: raw.chars().count(),
    }
    .emit();

    Ok(assembled.reply)
}

/// Append the reflection to the journal when one is configured.
///
/// A failed write is logged and otherwise ignored.
pub async fn persist(state: &AppState, profile: ReplyProfile, input: &str, reply: &NormalizedReply) {
    let Some(journal) = &state.journal else {
        return;
    };
    let entry = JournalEntry::new(input, profile.as_str(), reply.to_json());
    if let Err(e) = journal.append_async(entry).await {
        tracing::warn!(error = %e, path = %journal.path().display(), "journal append failed");
    }
}

/// Digest of the last [`WEEK`] days ending at `now`.
pub fn weekly_digest(state: &AppState, now: DateTime<Utc>) -> WeeklyDigest {
    let from = now - Duration::days(WEEK);
    let entries = state
        .journal
        .as_ref()
        .map(|j| j.entries_since(from))
        .unwrap_or_default();
    WeeklyDigest::from_entries(&entries, from, now)
}

/// Generate the weekly report text for a non-empty digest.
pub async fn weekly_report(
    state: &AppState,
    llm: &dyn LlmProvider,
    digest: &WeeklyDigest,
) -> Result<String> {
    let raw = complete(
        state,
        llm,
        weekly_prompt(&digest.summaries, digest.average_score),
        false,
        "weekly_report",
    )
    .await?;
    Ok(state.cleaner.clean(&raw))
}

/// Clean `text` for speech and cut it to at most `max_chars` characters.
pub fn speech_text(cleaner: &LineCleaner, text: &str, max_chars: usize) -> String {
    let cleaned = cleaner.clean(text);
    if cleaned.chars().count() <= max_chars {
        return cleaned;
    }
    cleaned.chars().take(max_chars).collect::<String>().trim_end().to_owned()
}
