//! HTTP surface: the bootstrap-status endpoint and the scheduler-facing
//! reminder dispatch endpoint.

use crate::db::Database;
use crate::dispatch::Dispatcher;
use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, post};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tracing::error;

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub dispatcher: Arc<Dispatcher>,
    pub invocation_timeout: Duration,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/bootstrap-status", get(bootstrap_status))
        .route("/task-reminders", post(task_reminders))
        .with_state(state)
}

/// Always 200; an internal error is surfaced in the `error` field with the
/// safe default, never as a transport-level failure.
async fn bootstrap_status(State(state): State<AppState>) -> Json<serde_json::Value> {
    match state.db.count_admin_accounts().await {
        Ok(count) => Json(json!({ "setupRequired": count == 0 })),
        Err(e) => {
            let message = format!("{:#}", e);
            error!(error = %message, "bootstrap status query failed");
            Json(json!({ "setupRequired": false, "error": message }))
        }
    }
}

/// 500 only when the initial fetch fails or the invocation times out;
/// partial per-task failures come back in-band with a 200.
async fn task_reminders(State(state): State<AppState>) -> Response {
    match tokio::time::timeout(state.invocation_timeout, state.dispatcher.run()).await {
        Ok(Ok(report)) => (StatusCode::OK, Json(report)).into_response(),
        Ok(Err(e)) => {
            let message = format!("{:#}", e);
            error!(error = %message, "reminder dispatch failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": message })),
            )
                .into_response()
        }
        Err(_) => {
            let message = format!(
                "reminder dispatch timed out after {}s",
                state.invocation_timeout.as_secs()
            );
            error!("{}", message);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": message })),
            )
                .into_response()
        }
    }
}
