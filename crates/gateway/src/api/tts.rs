//! `POST /tts`: speak a cleaned reply.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Json, Response};
use ml_providers::SpeechRequest;
use serde::Deserialize;

use crate::reflection;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct TtsRequest {
    #[serde(default)]
    pub text: String,
}

pub async fn tts(
    State(state): State<AppState>,
    body: Result<Json<TtsRequest>, JsonRejection>,
) -> Response {
    let text = match body {
        Ok(Json(req)) => req.text,
        Err(rejection) => {
            tracing::debug!(error = %rejection.body_text(), "unreadable tts body");
            String::new()
        }
    };
    let speech = &state.config.llm.speech;
    let input = reflection::speech_text(&state.cleaner, &text, speech.max_chars);
    if input.is_empty() {
        return super::empty_input();
    }
    let Some(llm) = state.llm.clone() else {
        return super::no_provider();
    };

    let req = SpeechRequest {
        input,
        model: speech.model.clone(),
        voice: speech.voice.clone(),
        format: speech.format.clone(),
    };

    match llm.speech(&req).await {
        Ok(audio) => ([(header::CONTENT_TYPE, audio.content_type)], audio.bytes).into_response(),
        Err(e) => super::upstream_error("tts", e),
    }
}
