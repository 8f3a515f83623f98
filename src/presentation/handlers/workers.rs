use std::time::Duration;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use crate::presentation::state::AppState;

#[derive(Serialize)]
pub struct WorkerStatusResponse {
    pub status: String,
    pub timestamp: String,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Operational liveness check for the queue: submits a probe and waits,
/// bounded by the configured timeout, for a worker to answer.
#[tracing::instrument(skip(state))]
pub async fn worker_status_handler(State(state): State<AppState>) -> impl IntoResponse {
    let timeout = Duration::from_secs(state.settings.queue.probe_timeout_seconds);

    match state.job_queue.probe(timeout).await {
        Ok(probe) => (
            StatusCode::OK,
            Json(WorkerStatusResponse {
                status: probe.status,
                timestamp: probe.timestamp.to_rfc3339(),
            }),
        )
            .into_response(),
        Err(e) => {
            tracing::warn!(error = %e, "Worker probe failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ErrorResponse {
                    error: format!("Worker not available: {}", e),
                }),
            )
                .into_response()
        }
    }
}
