//! `POST /reflect` and `POST /analyze`.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::response::{IntoResponse, Json, Response};
use ml_domain::config::ReplyProfile;
use ml_reflect::NormalizedReply;
use serde::{Deserialize, Serialize};

use crate::reflection;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ReflectRequest {
    #[serde(default)]
    pub user_input: String,
}

#[derive(Serialize)]
struct ReflectResponse {
    reply: NormalizedReply,
}

/// Reflect with the configured profile.
pub async fn reflect(
    State(state): State<AppState>,
    body: Result<Json<ReflectRequest>, JsonRejection>,
) -> Response {
    let profile = state.config.reflect.profile;
    run(&state, profile, &user_input(body), "reflect").await
}

/// Reflect with the extended profile regardless of configuration.
pub async fn analyze(
    State(state): State<AppState>,
    body: Result<Json<ReflectRequest>, JsonRejection>,
) -> Response {
    run(&state, ReplyProfile::Extended, &user_input(body), "analyze").await
}

/// A body that is missing or not JSON counts as empty input.
fn user_input(body: Result<Json<ReflectRequest>, JsonRejection>) -> String {
    match body {
        Ok(Json(req)) => req.user_input,
        Err(rejection) => {
            tracing::debug!(error = %rejection.body_text(), "unreadable reflect body");
            String::new()
        }
    }
}

async fn run(state: &AppState, profile: ReplyProfile, raw_input: &str, route: &str) -> Response {
    let input = raw_input.trim();
    if input.is_empty() {
        return super::empty_input();
    }
    let Some(llm) = state.llm.clone() else {
        return super::no_provider();
    };

    let reply = match reflection::reflect(state, llm.as_ref(), profile, input, route).await {
        Ok(r) => r,
        Err(e) => return super::upstream_error(route, e),
    };

    reflection::persist(state, profile, input, &reply).await;

    Json(ReflectResponse { reply }).into_response()
}
