use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::application::services::DogServiceError;
use crate::domain::{CreationRequest, Dog, DogFilter, DogUpdate};
use crate::presentation::extract::AuthenticatedUser;
use crate::presentation::state::AppState;

#[derive(Serialize)]
pub struct DogResponse {
    pub id: i64,
    pub name: String,
    pub picture: String,
    pub is_adopted: bool,
    pub owner_id: Option<i64>,
    pub create_date: String,
}

impl From<Dog> for DogResponse {
    fn from(dog: Dog) -> Self {
        Self {
            id: dog.id,
            name: dog.name,
            picture: dog.picture,
            is_adopted: dog.is_adopted,
            owner_id: dog.owner_id,
            create_date: dog.create_date.to_rfc3339(),
        }
    }
}

#[derive(Deserialize)]
pub struct CreateDogRequest {
    #[serde(default)]
    pub is_adopted: bool,
    #[serde(default)]
    pub owner_id: Option<i64>,
}

#[derive(Deserialize, Default)]
pub struct UpdateDogRequest {
    pub name: Option<String>,
    pub picture: Option<String>,
    pub is_adopted: Option<bool>,
    pub owner_id: Option<i64>,
}

#[derive(Serialize)]
pub struct CreationAcceptedResponse {
    pub job_id: String,
    pub status: String,
    pub message: String,
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[tracing::instrument(skip(state))]
pub async fn list_dogs_handler(State(state): State<AppState>) -> impl IntoResponse {
    match state.dog_service.list(DogFilter::default()).await {
        Ok(dogs) => {
            let body: Vec<DogResponse> = dogs.into_iter().map(DogResponse::from).collect();
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to list dogs");
            internal_error()
        }
    }
}

#[tracing::instrument(skip(state))]
pub async fn adopted_dogs_handler(State(state): State<AppState>) -> impl IntoResponse {
    match state.dog_service.list(DogFilter::adopted()).await {
        Ok(dogs) => {
            let body: Vec<DogResponse> = dogs.into_iter().map(DogResponse::from).collect();
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to list adopted dogs");
            internal_error()
        }
    }
}

#[tracing::instrument(skip(state))]
pub async fn dog_by_name_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> impl IntoResponse {
    match state.dog_service.get_by_name(&name).await {
        Ok(Some(dog)) => (StatusCode::OK, Json(DogResponse::from(dog))).into_response(),
        Ok(None) => dog_not_found(&name),
        Err(e) => {
            tracing::error!(error = %e, "Failed to fetch dog");
            internal_error()
        }
    }
}

/// Validates and enqueues; the response only carries the job handle. The
/// caller polls the job endpoint to learn the outcome.
#[tracing::instrument(skip(state, body, subject), fields(subject = %subject.0))]
pub async fn create_dog_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
    subject: AuthenticatedUser,
    Json(body): Json<CreateDogRequest>,
) -> impl IntoResponse {
    let request = CreationRequest {
        name: name.clone(),
        is_adopted: body.is_adopted,
        owner_id: body.owner_id,
    };

    match state.dog_service.submit_creation(request).await {
        Ok(job_id) => (
            StatusCode::ACCEPTED,
            Json(CreationAcceptedResponse {
                job_id: job_id.to_string(),
                status: "processing".to_string(),
                message: format!("Dog '{}' creation started", name),
            }),
        )
            .into_response(),
        Err(DogServiceError::AlreadyExists(name)) => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: format!("Dog with name '{}' already exists", name),
            }),
        )
            .into_response(),
        Err(DogServiceError::Queue(e)) => {
            tracing::error!(error = %e, "Failed to enqueue creation job");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ErrorResponse {
                    error: "Job queue unavailable".to_string(),
                }),
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to submit creation job");
            internal_error()
        }
    }
}

#[tracing::instrument(skip(state, body))]
pub async fn update_dog_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Json(body): Json<UpdateDogRequest>,
) -> impl IntoResponse {
    let changes = DogUpdate {
        name: body.name,
        picture: body.picture,
        is_adopted: body.is_adopted,
        owner_id: body.owner_id,
    };

    match state.dog_service.update(&name, changes).await {
        Ok(Some(dog)) => (StatusCode::OK, Json(DogResponse::from(dog))).into_response(),
        Ok(None) => dog_not_found(&name),
        Err(DogServiceError::UnknownOwner(owner_id)) => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: format!("User with id {} does not exist", owner_id),
            }),
        )
            .into_response(),
        Err(DogServiceError::AlreadyExists(name)) => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: format!("Dog with name '{}' already exists", name),
            }),
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to update dog");
            internal_error()
        }
    }
}

#[tracing::instrument(skip(state))]
pub async fn delete_dog_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> impl IntoResponse {
    match state.dog_service.delete(&name).await {
        Ok(true) => (
            StatusCode::OK,
            Json(MessageResponse {
                message: format!("Dog '{}' deleted successfully", name),
            }),
        )
            .into_response(),
        Ok(false) => dog_not_found(&name),
        Err(e) => {
            tracing::error!(error = %e, "Failed to delete dog");
            internal_error()
        }
    }
}

fn dog_not_found(name: &str) -> axum::response::Response {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: format!("Dog with name '{}' not found", name),
        }),
    )
        .into_response()
}

fn internal_error() -> axum::response::Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: "Internal server error".to_string(),
        }),
    )
        .into_response()
}
