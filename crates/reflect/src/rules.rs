//! Character classes the [`LineCleaner`](crate::LineCleaner) strips.
//!
//! These are plain data.  The built-in sets target Japanese coaching
//! replies; deployments may replace any of them through configuration.

use ml_domain::config::RulesConfig;

/// Section labels the model tends to prefix lines with despite the prompt.
pub const DEFAULT_LABELS: &[&str] = &["要約", "助言", "次の一言", "カテゴリ"];

/// Glyphs stripped when they open a line.
pub const DEFAULT_BULLETS: &str = "・-＊*•●◆■◉▶▷➤→";

/// Symbols removed anywhere in the text.  U+FE0F is the emoji variation
/// selector that trails `⭐️` and `▶️`.
pub const DEFAULT_DECORATIONS: &str =
    "💡⭐\u{FE0F}✨🔥✅▶➤→•●◆■◉※★☆◎○▲△□◇";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharacterRules {
    pub labels: Vec<String>,
    pub bullets: Vec<char>,
    pub decorations: Vec<char>,
    /// Some deployments keep bullets so list replies stay readable.
    pub strip_bullets: bool,
}

impl Default for CharacterRules {
    fn default() -> Self {
        Self {
            labels: DEFAULT_LABELS.iter().map(|s| (*s).to_owned()).collect(),
            bullets: unique_chars(DEFAULT_BULLETS),
            decorations: unique_chars(DEFAULT_DECORATIONS),
            strip_bullets: true,
        }
    }
}

impl CharacterRules {
    /// Built-in sets with the configured overrides applied.
    pub fn from_config(cfg: &RulesConfig) -> Self {
        let mut rules = Self::default();
        if let Some(labels) = &cfg.labels {
            rules.labels = labels
                .iter()
                .map(|l| l.trim().to_owned())
                .filter(|l| !l.is_empty())
                .collect();
        }
        if let Some(bullets) = &cfg.bullets {
            rules.bullets = unique_chars(bullets);
        }
        if let Some(decorations) = &cfg.decorations {
            rules.decorations = unique_chars(decorations);
        }
        rules.strip_bullets = cfg.strip_bullets;
        rules
    }

    pub fn with_strip_bullets(mut self, strip: bool) -> Self {
        self.strip_bullets = strip;
        self
    }
}

/// Every distinct non-whitespace character of `s`, in first-seen order.
fn unique_chars(s: &str) -> Vec<char> {
    let mut out: Vec<char> = Vec::new();
    for c in s.chars() {
        if !c.is_whitespace() && !out.contains(&c) {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_sets_are_deduplicated() {
        let rules = CharacterRules::default();
        let mut sorted = rules.decorations.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), rules.decorations.len());
        assert!(rules.decorations.contains(&'\u{FE0F}'));
        assert!(rules.bullets.contains(&'・'));
    }

    #[test]
    fn config_overrides_replace_builtins() {
        let cfg = RulesConfig {
            labels: Some(vec!["Summary".into(), "  ".into()]),
            bullets: Some("- *".into()),
            decorations: None,
            strip_bullets: false,
        };
        let rules = CharacterRules::from_config(&cfg);
        assert_eq!(rules.labels, vec!["Summary".to_string()]);
        assert_eq!(rules.bullets, vec!['-', '*']);
        assert_eq!(rules.decorations, CharacterRules::default().decorations);
        assert!(!rules.strip_bullets);
    }
}
