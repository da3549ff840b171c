//! Health check endpoints for Kubernetes-style probes.
//!
//! - `/livez` - Basic liveness probe (immediate 200, no checks)
//! - `/healthz` - Cache Store reachability plus a stats summary

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::state::AppState;

/// GET /livez - Basic liveness probe.
#[axum::debug_handler]
pub async fn livez() -> StatusCode {
    StatusCode::OK
}

/// GET /healthz - Reads cache statistics, which exercises the store.
///
/// Returns 503 if the store cannot be read.
#[axum::debug_handler]
pub async fn healthz(State(state): State<AppState>) -> Response {
    match state.engine.stats().await {
        Ok(stats) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "bill_entries": stats.bill_entries,
                "summary_entries": stats.summary_entries,
                "in_flight_fetches": stats.in_flight_bill_fetches + stats.in_flight_summary_fetches,
            })),
        )
            .into_response(),
        Err(err) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "status": "unavailable",
                "error": err.to_string(),
            })),
        )
            .into_response(),
    }
}
