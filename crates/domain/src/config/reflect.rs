use serde::{Deserialize, Serialize};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Reflection (reply shape + cleaning rules)
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Which built-in field set `/reflect` asks the model for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ReplyProfile {
    /// `summary`, `advice`, `next`, all plain text.
    #[default]
    Basic,
    /// `summary`, `advice` (list), `category`, `score` (0–100), `followup`.
    Extended,
}

impl ReplyProfile {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Extended => "extended",
        }
    }
}

impl std::str::FromStr for ReplyProfile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "basic" => Ok(Self::Basic),
            "extended" => Ok(Self::Extended),
            other => Err(format!("unknown profile '{other}' (expected basic or extended)")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReflectConfig {
    #[serde(default)]
    pub profile: ReplyProfile,
    /// Cap on advice items in the extended profile.
    #[serde(default = "d_2usize")]
    pub advice_max_items: usize,
    /// Neutral mood score used when the model omits or garbles it.
    #[serde(default = "d_50")]
    pub score_default: i64,
    #[serde(default)]
    pub rules: RulesConfig,
}

impl Default for ReflectConfig {
    fn default() -> Self {
        Self {
            profile: ReplyProfile::Basic,
            advice_max_items: 2,
            score_default: 50,
            rules: RulesConfig::default(),
        }
    }
}

/// Overrides for the line cleaner's character classes.
///
/// `None` keeps the built-in Japanese set.  `bullets` and `decorations`
/// are strings in which every character is one member of the set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RulesConfig {
    #[serde(default)]
    pub labels: Option<Vec<String>>,
    #[serde(default)]
    pub bullets: Option<String>,
    #[serde(default)]
    pub decorations: Option<String>,
    #[serde(default = "d_true")]
    pub strip_bullets: bool,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            labels: None,
            bullets: None,
            decorations: None,
            strip_bullets: true,
        }
    }
}

fn d_2usize() -> usize {
    2
}
fn d_50() -> i64 {
    50
}
fn d_true() -> bool {
    true
}
