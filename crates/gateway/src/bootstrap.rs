//! AppState construction shared by `serve` and the one-shot CLI commands.

use std::sync::Arc;

use ml_domain::config::Config;
use ml_journal::JournalStore;
use ml_providers::{LlmProvider, OpenAiCompatProvider};

use crate::state::AppState;

/// Validate config, initialize every subsystem and return a fully-wired
/// [`AppState`].
///
/// A provider that cannot be built (typically a missing API key) or a
/// journal that cannot be opened is logged and left out; the server still
/// starts and the affected routes report the gap.
pub async fn build_app_state(config: Arc<Config>) -> anyhow::Result<AppState> {
    // ── Config validation ────────────────────────────────────────────
    let issues = config.validate();
    for issue in &issues {
        tracing::error!("config: {issue}");
    }
    if !issues.is_empty() {
        anyhow::bail!("config validation failed with {} error(s)", issues.len());
    }

    // ── LLM provider ─────────────────────────────────────────────────
    let llm: Option<Arc<dyn LlmProvider>> = match OpenAiCompatProvider::from_config(&config.llm) {
        Ok(p) => {
            tracing::info!(
                provider = %config.llm.id,
                model = %config.llm.model,
                base_url = %config.llm.base_url,
                "LLM provider ready"
            );
            Some(Arc::new(p))
        }
        Err(e) => {
            tracing::warn!(
                provider = %config.llm.id,
                error = %e,
                "LLM provider unavailable; model-backed routes will return 503"
            );
            None
        }
    };

    // ── Journal ──────────────────────────────────────────────────────
    let journal = if config.journal.enabled {
        let path = config.journal.path.clone();
        let opened = tokio::task::spawn_blocking(move || JournalStore::open(&path)).await?;
        match opened {
            Ok(store) => Some(Arc::new(store)),
            Err(e) => {
                tracing::warn!(
                    path = %config.journal.path.display(),
                    error = %e,
                    "journal unavailable; reflections will not be persisted"
                );
                None
            }
        }
    } else {
        tracing::info!("journal disabled");
        None
    };

    Ok(AppState::from_parts(config, llm, journal)?)
}
