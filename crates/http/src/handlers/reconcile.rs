use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use std::sync::Arc;

use crate::response_types::ReconcileResponse;
use crate::AppState;

/// Run the streak reconciler once, for an external scheduler.
///
/// Failures answer 500 with `{"success": false, "error": ...}` so the caller
/// can alert on them.
pub async fn run_reconcile(State(state): State<Arc<AppState>>) -> Response {
    match state.reconciler.reconcile().await {
        Ok(report) => Json(ReconcileResponse {
            success: true,
            results: report,
            timestamp: report.timestamp,
        })
        .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "streak reconciliation failed");
            let body = serde_json::json!({"success": false, "error": e.to_string()});
            (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
        },
    }
}
