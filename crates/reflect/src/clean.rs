//! Line cleaner: strips enumeration markers, section labels, bullets and
//! decorative symbols so text reads cleanly on screen and through TTS.

use ml_domain::error::{Error, Result};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::rules::CharacterRules;

/// Horizontal whitespace; never crosses a line break.
const HSPACE: &str = r"[^\S\r\n]*";

/// `1.` / `１．` / `(2)` / `3)` at line start, plus trailing horizontal space.
static ENUMERATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?m)^{h}\(?{h}[0-9０-９]+{h}\)?[.．)]{h}",
        h = HSPACE
    ))
    .expect("valid regex")
});

/// Compiled form of [`CharacterRules`].  Holds only immutable regexes and
/// is shared across requests behind an `Arc`.
#[derive(Debug, Clone)]
pub struct LineCleaner {
    labels: Option<Regex>,
    bullets: Option<Regex>,
    decorations: Option<Regex>,
}

impl Default for LineCleaner {
    fn default() -> Self {
        Self::new(&CharacterRules::default()).expect("built-in cleaning rules compile")
    }
}

impl LineCleaner {
    pub fn new(rules: &CharacterRules) -> Result<Self> {
        let labels = if rules.labels.is_empty() {
            None
        } else {
            let alternation = rules
                .labels
                .iter()
                .map(|l| regex::escape(l))
                .collect::<Vec<_>>()
                .join("|");
            Some(compile(&format!(
                r"(?mi)^{h}(?:{alternation}){h}[:：]{h}",
                h = HSPACE
            ))?)
        };

        let bullets = if rules.strip_bullets && !rules.bullets.is_empty() {
            Some(compile(&format!(
                r"(?m)^{h}[{class}]{h}",
                h = HSPACE,
                class = char_class(&rules.bullets)
            ))?)
        } else {
            None
        };

        let decorations = if rules.decorations.is_empty() {
            None
        } else {
            Some(compile(&format!("[{}]", char_class(&rules.decorations)))?)
        };

        Ok(Self {
            labels,
            bullets,
            decorations,
        })
    }

    /// Sanitize `raw`.
    ///
    /// Each pass applies, in order: enumeration markers, labels, bullets,
    /// decorations, then trims the whole string.  Passes repeat until the
    /// output is stable, so `clean(clean(s)) == clean(s)` always holds.
    pub fn clean(&self, raw: &str) -> String {
        // No pass introduces `\r`, so line endings only need fixing once.
        let mut current = raw.replace("\r\n", "\n").replace('\r', "\n");
        loop {
            let next = self.pass(&current);
            // A pass that changes anything strictly shortens the text.
            if next == current {
                return next;
            }
            current = next;
        }
    }

    fn pass(&self, text: &str) -> String {
        let mut out = ENUMERATION.replace_all(text, "").into_owned();
        for re in [&self.labels, &self.bullets, &self.decorations]
            .into_iter()
            .flatten()
        {
            out = re.replace_all(&out, "").into_owned();
        }
        out.trim().to_owned()
    }
}

fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|e| Error::Config(format!("cleaning rule: {e}")))
}

/// Body of a `[...]` class matching exactly the given characters.
fn char_class(chars: &[char]) -> String {
    chars
        .iter()
        .map(|c| regex::escape(&c.to_string()))
        .collect()
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
