mod journal;
mod llm;
mod observability;
mod reflect;
mod server;

pub use journal::*;
pub use llm::*;
pub use observability::*;
pub use reflect::*;
pub use server::*;

use serde::{Deserialize, Serialize};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Top-level config
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub reflect: ReflectConfig,
    #[serde(default)]
    pub journal: JournalConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

/// A single problem found by [`Config::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigIssue {
    /// Dotted path of the offending key, e.g. `llm.temperature`.
    pub key: &'static str,
    pub message: String,
}

impl std::fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.key, self.message)
    }
}

impl Config {
    /// Check value ranges that serde cannot express.  An empty vec means
    /// the config is usable.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        if self.server.port == 0 {
            issues.push(ConfigIssue {
                key: "server.port",
                message: "must be non-zero".into(),
            });
        }
        if self.llm.model.trim().is_empty() {
            issues.push(ConfigIssue {
                key: "llm.model",
                message: "must not be empty".into(),
            });
        }
        if !(0.0..=2.0).contains(&self.llm.temperature) {
            issues.push(ConfigIssue {
                key: "llm.temperature",
                message: format!("{} is outside 0.0..=2.0", self.llm.temperature),
            });
        }
        if self.llm.speech.max_chars == 0 {
            issues.push(ConfigIssue {
                key: "llm.speech.max_chars",
                message: "must be non-zero".into(),
            });
        }
        if self.reflect.advice_max_items == 0 {
            issues.push(ConfigIssue {
                key: "reflect.advice_max_items",
                message: "must be at least 1".into(),
            });
        }
        if !(0..=100).contains(&self.reflect.score_default) {
            issues.push(ConfigIssue {
                key: "reflect.score_default",
                message: format!("{} is outside 0..=100", self.reflect.score_default),
            });
        }

        issues
    }
}
