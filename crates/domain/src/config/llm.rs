use serde::{Deserialize, Serialize};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// LLM provider
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Identifier used in logs and provider errors.
    #[serde(default = "d_provider_id")]
    pub id: String,
    /// Base URL of an OpenAI-compatible API (no trailing `/chat/completions`).
    #[serde(default = "d_base_url")]
    pub base_url: String,
    #[serde(default = "d_model")]
    pub model: String,
    #[serde(default = "d_temperature")]
    pub temperature: f32,
    /// Request timeout applied to every outbound call.
    #[serde(default = "d_30000u")]
    pub timeout_ms: u64,
    /// Ask the provider for `response_format: json_object`.  Off by default
    /// because the prompt already demands single-line JSON and some
    /// compatible servers reject the parameter.
    #[serde(default)]
    pub json_mode: bool,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub speech: SpeechConfig,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            id: d_provider_id(),
            base_url: d_base_url(),
            model: d_model(),
            temperature: d_temperature(),
            timeout_ms: 30_000,
            json_mode: false,
            auth: AuthConfig::default(),
            speech: SpeechConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Header name (e.g. "Authorization", "api-key").
    #[serde(default)]
    pub header: Option<String>,
    /// Header value prefix (e.g. "Bearer ").
    #[serde(default)]
    pub prefix: Option<String>,
    /// Env var containing the key.
    #[serde(default = "d_key_env")]
    pub env: Option<String>,
    /// Direct key (for config-only setups; prefer env).
    #[serde(default)]
    pub key: Option<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            header: None,
            prefix: None,
            env: d_key_env(),
            key: None,
        }
    }
}

/// Text-to-speech settings for the `/tts` route.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeechConfig {
    #[serde(default = "d_speech_model")]
    pub model: String,
    #[serde(default = "d_voice")]
    pub voice: String,
    /// Audio container requested from the provider (`mp3`, `wav`, `opus`, ...).
    #[serde(default = "d_format")]
    pub format: String,
    /// Input longer than this many characters is truncated before synthesis.
    #[serde(default = "d_max_chars")]
    pub max_chars: usize,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            model: d_speech_model(),
            voice: d_voice(),
            format: d_format(),
            max_chars: d_max_chars(),
        }
    }
}

// ── serde default helpers ───────────────────────────────────────────

fn d_provider_id() -> String {
    "openai".into()
}
fn d_base_url() -> String {
    "https://api.openai.com/v1".into()
}
fn d_model() -> String {
    "gpt-4o-mini".into()
}
fn d_temperature() -> f32 {
    0.8
}
fn d_30000u() -> u64 {
    30_000
}
fn d_key_env() -> Option<String> {
    Some("OPENAI_API_KEY".into())
}
fn d_speech_model() -> String {
    "gpt-4o-mini-tts".into()
}
fn d_voice() -> String {
    "alloy".into()
}
fn d_format() -> String {
    "mp3".into()
}
fn d_max_chars() -> usize {
    1000
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
