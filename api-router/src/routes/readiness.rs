use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use crate::api_state::ApiState;

/// Readiness probe: returns 200 if the search engine answers, else 503.
pub async fn ready(State(state): State<ApiState>) -> impl IntoResponse {
    match state.coordinator.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "checks": { "engine": "ok" }
            })),
        ),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "status": "error",
                "checks": { "engine": "fail" },
                "reason": e.to_string()
            })),
        ),
    }
}
