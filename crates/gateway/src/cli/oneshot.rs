//! One-shot `reflect` and `clean` commands.

use std::sync::Arc;

use ml_domain::config::{Config, ReplyProfile};
use ml_reflect::{CharacterRules, FieldValue, LineCleaner, NormalizedReply};

use crate::bootstrap;
use crate::reflection;

/// Reflect on `text` once and print the reply to stdout.
pub async fn reflect(
    config: Arc<Config>,
    text: String,
    profile: Option<String>,
    json: bool,
) -> anyhow::Result<()> {
    let profile = match profile {
        Some(p) => p.parse::<ReplyProfile>().map_err(anyhow::Error::msg)?,
        None => config.reflect.profile,
    };

    let input = text.trim();
    if input.is_empty() {
        anyhow::bail!("入力が空です");
    }

    let state = bootstrap::build_app_state(config).await?;
    let llm = state
        .llm
        .clone()
        .ok_or_else(|| anyhow::anyhow!("LLM provider is not configured (check the API key)"))?;

    let reply = reflection::reflect(&state, llm.as_ref(), profile, input, "cli").await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&reply)?);
    } else {
        print!("{}", render_plain(&reply));
    }
    Ok(())
}

/// Clean `text` with the configured rules and print it.
pub fn clean(config: &Config, text: &str) -> anyhow::Result<()> {
    let rules = CharacterRules::from_config(&config.reflect.rules);
    let cleaner = LineCleaner::new(&rules)?;
    println!("{}", cleaner.clean(text));
    Ok(())
}

/// One `name: value` line per field; list items follow on indented lines.
fn render_plain(reply: &NormalizedReply) -> String {
    let mut out = String::new();
    for (name, value) in reply.iter() {
        match value {
            FieldValue::Text(s) => out.push_str(&format!("{name}: {s}\n")),
            FieldValue::Score(n) => out.push_str(&format!("{name}: {n}\n")),
            FieldValue::List(items) => {
                out.push_str(&format!("{name}:\n"));
                for item in items {
                    out.push_str(&format!("  {item}\n"));
                }
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use ml_reflect::{assemble, ReplyFields};

    #[test]
    fn plain_rendering_lists_fields_in_order() {
        let fields = ReplyFields::extended(2, 50);
        let raw = r#"{"summary":"疲れた","advice":["休む","寝る"],"category":"疲労","score":30,"followup":"何時間寝た？"}"#;
        let reply = assemble(raw, &fields, &LineCleaner::default());
        assert_eq!(
            render_plain(&reply),
            "summary: 疲れた\nadvice:\n  休む\n  寝る\ncategory: 疲労\nscore: 30\nfollowup: 何時間寝た？\n"
        );
    }
}
