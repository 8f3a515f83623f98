use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::{JobId, JobStatus};
use crate::presentation::handlers::DogResponse;
use crate::presentation::state::AppState;

#[derive(Serialize)]
pub struct JobStatusResponse {
    pub id: String,
    pub status: String,
    pub dog_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    /// Summary of the created dog, present once the job has succeeded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dog: Option<DogResponse>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[tracing::instrument(skip(state))]
pub async fn job_status_handler(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> impl IntoResponse {
    let uuid = match Uuid::parse_str(&job_id) {
        Ok(u) => u,
        Err(_) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: format!("Invalid job ID: {}", job_id),
                }),
            )
                .into_response();
        }
    };

    let job = match state.job_repository.get_by_id(JobId::from_uuid(uuid)).await {
        Ok(Some(job)) => job,
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse {
                    error: format!("Job not found: {}", job_id),
                }),
            )
                .into_response();
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to fetch job status");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Internal server error".to_string(),
                }),
            )
                .into_response();
        }
    };

    let dog = if job.status == JobStatus::Succeeded {
        match job.dog_id {
            Some(dog_id) => match state.dog_service.get_by_id(dog_id).await {
                Ok(dog) => dog.map(DogResponse::from),
                Err(e) => {
                    tracing::error!(error = %e, "Failed to fetch created dog");
                    return (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        Json(ErrorResponse {
                            error: "Internal server error".to_string(),
                        }),
                    )
                        .into_response();
                }
            },
            None => None,
        }
    } else {
        None
    };

    let response = JobStatusResponse {
        id: job.id.to_string(),
        status: job.status.as_api_str().to_string(),
        dog_name: job.dog_name,
        failure_reason: job.failure_reason.map(|r| r.as_api_str().to_string()),
        error_message: job.error_message,
        dog,
        created_at: job.created_at.to_rfc3339(),
        updated_at: job.updated_at.to_rfc3339(),
    };

    (StatusCode::OK, Json(response)).into_response()
}
