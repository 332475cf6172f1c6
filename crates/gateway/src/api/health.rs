use axum::extract::State;
use axum::response::{IntoResponse, Json};

use crate::state::AppState;

/// `GET /health`: liveness plus which optional subsystems are wired.
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "llm": state.llm.is_some(),
        "journal": state.journal.is_some(),
    }))
}
