use std::sync::Arc;

use ml_domain::config::{Config, ReplyProfile};
use ml_domain::error::Result;
use ml_journal::JournalStore;
use ml_providers::LlmProvider;
use ml_reflect::{CharacterRules, LineCleaner, ReplyFields};

/// Shared application state passed to all API handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    /// `None` when no provider could be configured (e.g. missing API key);
    /// model-backed routes answer 503.
    pub llm: Option<Arc<dyn LlmProvider>>,
    pub cleaner: Arc<LineCleaner>,
    pub basic_fields: Arc<ReplyFields>,
    pub extended_fields: Arc<ReplyFields>,
    /// `None` when the journal is disabled or failed to open.
    pub journal: Option<Arc<JournalStore>>,
}

impl AppState {
    /// Wire the reply pipeline from `config` around the given provider and
    /// journal.
    pub fn from_parts(
        config: Arc<Config>,
        llm: Option<Arc<dyn LlmProvider>>,
        journal: Option<Arc<JournalStore>>,
    ) -> Result<Self> {
        let rules = CharacterRules::from_config(&config.reflect.rules);
        let cleaner = LineCleaner::new(&rules)?;
        let extended = ReplyFields::extended(
            config.reflect.advice_max_items,
            config.reflect.score_default,
        );

        Ok(Self {
            config,
            llm,
            cleaner: Arc::new(cleaner),
            basic_fields: Arc::new(ReplyFields::basic()),
            extended_fields: Arc::new(extended),
            journal,
        })
    }

    pub fn fields_for(&self, profile: ReplyProfile) -> &ReplyFields {
        match profile {
            ReplyProfile::Basic => &self.basic_fields,
            ReplyProfile::Extended => &self.extended_fields,
        }
    }
}
