//! OpenAI-compatible adapter.
//!
//! Works with OpenAI and any other endpoint that follows the OpenAI chat
//! completions and `audio/speech` contracts.

use std::time::{Duration, Instant};

use ml_domain::config::LlmConfig;
use ml_domain::error::{Error, Result};
use ml_domain::trace::TraceEvent;
use serde_json::Value;

use crate::traits::{
    ChatMessage, ChatRequest, ChatResponse, LlmProvider, SpeechAudio, SpeechRequest, Usage,
};
use crate::util::{audio_content_type, from_reqwest, resolve_api_key};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Adapter struct
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub struct OpenAiCompatProvider {
    id: String,
    base_url: String,
    api_key: String,
    auth_header: String,
    auth_prefix: String,
    default_model: String,
    client: reqwest::Client,
}

impl OpenAiCompatProvider {
    /// Create a provider from the `[llm]` config table.
    ///
    /// Fails when no API key can be resolved or the HTTP client cannot be
    /// built.
    pub fn from_config(cfg: &LlmConfig) -> Result<Self> {
        let api_key = resolve_api_key(&cfg.auth)?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(cfg.timeout_ms))
            .build()
            .map_err(from_reqwest)?;

        Ok(Self {
            id: cfg.id.clone(),
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
            api_key,
            auth_header: cfg
                .auth
                .header
                .clone()
                .unwrap_or_else(|| "Authorization".into()),
            auth_prefix: cfg.auth.prefix.clone().unwrap_or_else(|| "Bearer ".into()),
            default_model: cfg.model.clone(),
            client,
        })
    }

    // ── Internal: build authenticated request builder ──────────────

    fn authed_post(&self, url: &str) -> reqwest::RequestBuilder {
        let header_value = format!("{}{}", self.auth_prefix, self.api_key);
        self.client
            .post(url)
            .header(&self.auth_header, &header_value)
            .header("Content-Type", "application/json")
    }

    fn effective_model(&self, req: &ChatRequest) -> String {
        req.model
            .clone()
            .unwrap_or_else(|| self.default_model.clone())
    }

    /// POST `body` to `url` and return the response if it is a 2xx.
    async fn send(&self, url: &str, body: &Value) -> Result<reqwest::Response> {
        let resp = self
            .authed_post(url)
            .json(body)
            .send()
            .await
            .map_err(from_reqwest)?;

        let status = resp.status();
        if !status.is_success() {
            let err_text = resp.text().await.map_err(from_reqwest)?;
            return Err(Error::Provider {
                provider: self.id.clone(),
                message: format!("HTTP {} - {}", status.as_u16(), err_text),
            });
        }
        Ok(resp)
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Wire helpers
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

fn msg_to_openai(msg: &ChatMessage) -> Value {
    serde_json::json!({
        "role": msg.role.as_str(),
        "content": msg.content,
    })
}

fn build_chat_body(req: &ChatRequest, model: &str) -> Value {
    let messages: Vec<Value> = req.messages.iter().map(msg_to_openai).collect();

    let mut body = serde_json::json!({
        "model": model,
        "messages": messages,
    });
    if let Some(temp) = req.temperature {
        body["temperature"] = serde_json::json!(temp);
    }
    if let Some(max) = req.max_tokens {
        body["max_tokens"] = serde_json::json!(max);
    }
    if req.json_mode {
        body["response_format"] = serde_json::json!({"type": "json_object"});
    }
    body
}

fn build_speech_body(req: &SpeechRequest) -> Value {
    serde_json::json!({
        "model": req.model,
        "voice": req.voice,
        "input": req.input,
        "response_format": req.format,
    })
}

fn parse_chat_response(provider: &str, body: &Value) -> Result<ChatResponse> {
    let choice = body
        .get("choices")
        .and_then(|c| c.as_array())
        .and_then(|a| a.first())
        .ok_or_else(|| Error::Provider {
            provider: provider.into(),
            message: "no choices in response".into(),
        })?;

    let message = choice.get("message").ok_or_else(|| Error::Provider {
        provider: provider.into(),
        message: "no message in choice".into(),
    })?;

    // `content` is null when the model refused or only emitted tool calls.
    let content = message
        .get("content")
        .and_then(|v| v.as_str())
        .unwrap_or("")
        .to_string();

    let finish_reason = choice
        .get("finish_reason")
        .and_then(|v| v.as_str())
        .map(String::from);

    let model = body
        .get("model")
        .and_then(|v| v.as_str())
        .unwrap_or("unknown")
        .to_string();

    Ok(ChatResponse {
        content,
        usage: body.get("usage").and_then(parse_openai_usage),
        model,
        finish_reason,
    })
}

fn parse_openai_usage(v: &Value) -> Option<Usage> {
    Some(Usage {
        prompt_tokens: v.get("prompt_tokens")?.as_u64()? as u32,
        completion_tokens: v.get("completion_tokens")?.as_u64()? as u32,
        total_tokens: v.get("total_tokens")?.as_u64()? as u32,
    })
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Trait implementation
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[async_trait::async_trait]
impl LlmProvider for OpenAiCompatProvider {
    async fn chat(&self, req: &ChatRequest) -> Result<ChatResponse> {
        let url = format!("{}/chat/completions", self.base_url);
        let model = self.effective_model(req);
        let body = build_chat_body(req, &model);

        tracing::debug!(provider = %self.id, url = %url, model = %model, "chat request");

        let resp = self.send(&url, &body).await?;
        let resp_text = resp.text().await.map_err(from_reqwest)?;
        let resp_json: Value = serde_json::from_str(&resp_text)?;
        parse_chat_response(&self.id, &resp_json)
    }

    async fn speech(&self, req: &SpeechRequest) -> Result<SpeechAudio> {
        let url = format!("{}/audio/speech", self.base_url);
        let body = build_speech_body(req);
        let started = Instant::now();

        tracing::debug!(provider = %self.id, url = %url, voice = %req.voice, "speech request");

        let resp = self.send(&url, &body).await?;
        let content_type = resp
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(String::from)
            .unwrap_or_else(|| audio_content_type(&req.format).to_string());
        let bytes = resp.bytes().await.map_err(from_reqwest)?;

        TraceEvent::SpeechSynth {
            provider: self.id.clone(),
            model: req.model.clone(),
            text_chars: req.input.chars().count(),
            audio_bytes: bytes.len(),
            duration_ms: started.elapsed().as_millis() as u64,
        }
        .emit();

        Ok(SpeechAudio {
            bytes,
            content_type,
        })
    }

    fn provider_id(&self) -> &str {
        &self.id
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[cfg(test)]
mod tests {
    use super::*;
    use ml_domain::config::AuthConfig;

    fn test_config() -> LlmConfig {
        LlmConfig {
            base_url: "http://localhost:9999/v1/".into(),
            auth: AuthConfig {
                key: Some("sk-test".into()),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn from_config_trims_base_url_and_defaults_auth() {
        let p = OpenAiCompatProvider::from_config(&test_config()).unwrap();
        assert_eq!(p.base_url, "http://localhost:9999/v1");
        assert_eq!(p.auth_header, "Authorization");
        assert_eq!(p.auth_prefix, "Bearer ");
        assert_eq!(p.effective_model(&ChatRequest::default()), "gpt-4o-mini");
        assert_eq!(p.provider_id(), "openai");
    }

    #[test]
    fn from_config_without_key_fails() {
        let cfg = LlmConfig {
            auth: AuthConfig {
                env: Some("ML_TEST_NO_SUCH_KEY_5555".into()),
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(matches!(
            OpenAiCompatProvider::from_config(&cfg),
            Err(Error::Auth(_))
        ));
    }

    #[test]
    fn chat_body_includes_optional_fields() {
        let req = ChatRequest {
            messages: vec![ChatMessage::system("sys"), ChatMessage::user("hi")],
            temperature: Some(0.5),
            json_mode: true,
            ..Default::default()
        };
        let body = build_chat_body(&req, "gpt-4o-mini");
        assert_eq!(body["model"], "gpt-4o-mini");
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["content"], "hi");
        assert_eq!(body["temperature"], serde_json::json!(0.5));
        assert_eq!(body["response_format"]["type"], "json_object");
        assert!(body.get("max_tokens").is_none());
    }

    #[test]
    fn chat_body_omits_unset_fields() {
        let body = build_chat_body(&ChatRequest::default(), "m");
        assert!(body.get("temperature").is_none());
        assert!(body.get("response_format").is_none());
    }

    #[test]
    fn speech_body_shape() {
        let body = build_speech_body(&SpeechRequest {
            input: "こんにちは".into(),
            model: "gpt-4o-mini-tts".into(),
            voice: "alloy".into(),
            format: "mp3".into(),
        });
        assert_eq!(body["input"], "こんにちは");
        assert_eq!(body["voice"], "alloy");
        assert_eq!(body["response_format"], "mp3");
    }

    #[test]
    fn parses_chat_response() {
        let body = serde_json::json!({
            "model": "gpt-4o-mini-2024-07-18",
            "choices": [{
                "message": {"role": "assistant", "content": "{\"summary\":\"ok\"}"},
                "finish_reason": "stop"
            }],
            "usage": {"prompt_tokens": 10, "completion_tokens": 5, "total_tokens": 15}
        });
        let resp = parse_chat_response("openai", &body).unwrap();
        assert_eq!(resp.content, "{\"summary\":\"ok\"}");
        assert_eq!(resp.model, "gpt-4o-mini-2024-07-18");
        assert_eq!(resp.finish_reason.as_deref(), Some("stop"));
        assert_eq!(resp.usage.map(|u| u.total_tokens), Some(15));
    }

    #[test]
    fn null_content_becomes_empty() {
        let body = serde_json::json!({
            "choices": [{"message": {"role": "assistant", "content": null}}]
        });
        let resp = parse_chat_response("openai", &body).unwrap();
        assert_eq!(resp.content, "");
        assert_eq!(resp.model, "unknown");
        assert!(resp.usage.is_none());
    }

    #[test]
    fn missing_choices_is_provider_error() {
        let err = parse_chat_response("openai", &serde_json::json!({})).unwrap_err();
        assert!(err.to_string().contains("no choices"));
    }
}
