pub mod health;
pub mod index;
pub mod reflect;
pub mod tts;
pub mod weekly;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, post};
use axum::Router;
use ml_domain::error::Error;

use crate::state::AppState;

/// Build the full API router.  State is attached by the caller.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index::index))
        .route("/health", get(health::health))
        .route("/reflect", post(reflect::reflect))
        .route("/analyze", post(reflect::analyze))
        .route("/weekly_report", post(weekly::weekly_report))
        .route("/tts", post(tts::tts))
}

/// Build a standardized JSON error response: `{ "error": "<message>" }`.
pub(crate) fn api_error(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(serde_json::json!({ "error": message.into() }))).into_response()
}

pub(crate) fn empty_input() -> Response {
    api_error(StatusCode::BAD_REQUEST, "入力が空です")
}

pub(crate) fn no_provider() -> Response {
    api_error(StatusCode::SERVICE_UNAVAILABLE, "LLM provider is not configured")
}

/// Map a failed model round trip to a response.
pub(crate) fn upstream_error(route: &str, e: Error) -> Response {
    tracing::error!(route, error = %e, "upstream call failed");
    let status = match &e {
        Error::Provider { .. } | Error::Http(_) | Error::Timeout(_) => StatusCode::BAD_GATEWAY,
        Error::Auth(_) => StatusCode::SERVICE_UNAVAILABLE,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    api_error(status, e.to_string())
}
