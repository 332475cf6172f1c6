//! `POST /weekly_report`.

use axum::extract::State;
use axum::response::{IntoResponse, Json, Response};
use chrono::Utc;
use ml_domain::trace::TraceEvent;
use ml_journal::WeeklyDigest;
use serde::Serialize;

use crate::reflection;
use crate::state::AppState;

#[derive(Serialize)]
struct WeeklyResponse {
    report: String,
    stats: WeeklyDigest,
}

pub async fn weekly_report(State(state): State<AppState>) -> Response {
    let digest = reflection::weekly_digest(&state, Utc::now());

    if digest.is_empty() {
        TraceEvent::WeeklyReport {
            entries: 0,
            llm_called: false,
        }
        .emit();
        return Json(WeeklyResponse {
            report: reflection::EMPTY_WEEK_REPORT.to_owned(),
            stats: digest,
        })
        .into_response();
    }

    let Some(llm) = state.llm.clone() else {
        return super::no_provider();
    };

    let report = match reflection::weekly_report(&state, llm.as_ref(), &digest).await {
        Ok(r) => r,
        Err(e) => return super::upstream_error("weekly_report", e),
    };

    TraceEvent::WeeklyReport {
        entries: digest.entries,
        llm_called: true,
    }
    .emit();

    Json(WeeklyResponse {
        report,
        stats: digest,
    })
    .into_response()
}
