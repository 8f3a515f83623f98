use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::application::ports::RepositoryError;
use crate::domain::{NewUser, User, UserUpdate};
use crate::presentation::handlers::DogResponse;
use crate::presentation::state::AppState;

#[derive(Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub name: String,
    pub last_name: String,
    pub email: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            last_name: user.last_name,
            email: user.email,
            created_at: user.created_at.to_rfc3339(),
            updated_at: user.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Serialize)]
pub struct UserWithDogsResponse {
    #[serde(flatten)]
    pub user: UserResponse,
    pub dogs: Vec<DogResponse>,
}

#[derive(Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    pub last_name: String,
    pub email: String,
}

#[derive(Deserialize, Default)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
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
pub async fn list_users_handler(State(state): State<AppState>) -> impl IntoResponse {
    match state.user_service.list().await {
        Ok(users) => {
            let body: Vec<UserResponse> = users.into_iter().map(UserResponse::from).collect();
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to list users");
            internal_error()
        }
    }
}

#[tracing::instrument(skip(state))]
pub async fn user_by_id_handler(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> impl IntoResponse {
    match state.user_service.get_with_dogs(user_id).await {
        Ok(Some((user, dogs))) => {
            let body = UserWithDogsResponse {
                user: UserResponse::from(user),
                dogs: dogs.into_iter().map(DogResponse::from).collect(),
            };
            (StatusCode::OK, Json(body)).into_response()
        }
        Ok(None) => user_not_found(user_id),
        Err(e) => {
            tracing::error!(error = %e, "Failed to fetch user");
            internal_error()
        }
    }
}

#[tracing::instrument(skip(state, body))]
pub async fn create_user_handler(
    State(state): State<AppState>,
    Json(body): Json<CreateUserRequest>,
) -> impl IntoResponse {
    if !is_plausible_email(&body.email) {
        return invalid_email(&body.email);
    }

    let new_user = NewUser {
        name: body.name,
        last_name: body.last_name,
        email: body.email,
    };

    match state.user_service.create(new_user).await {
        Ok(user) => (StatusCode::CREATED, Json(UserResponse::from(user))).into_response(),
        Err(RepositoryError::DuplicateEmail(email)) => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: format!("User with email '{}' already exists", email),
            }),
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to create user");
            internal_error()
        }
    }
}

#[tracing::instrument(skip(state, body))]
pub async fn update_user_handler(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Json(body): Json<UpdateUserRequest>,
) -> impl IntoResponse {
    if let Some(email) = &body.email {
        if !is_plausible_email(email) {
            return invalid_email(email);
        }
    }

    let changes = UserUpdate {
        name: body.name,
        last_name: body.last_name,
        email: body.email,
    };

    match state.user_service.update(user_id, changes).await {
        Ok(Some(user)) => (StatusCode::OK, Json(UserResponse::from(user))).into_response(),
        Ok(None) => user_not_found(user_id),
        Err(RepositoryError::DuplicateEmail(email)) => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: format!("User with email '{}' already exists", email),
            }),
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to update user");
            internal_error()
        }
    }
}

/// Deleting a user leaves its dogs in place with the owner reference
/// cleared.
#[tracing::instrument(skip(state))]
pub async fn delete_user_handler(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> impl IntoResponse {
    match state.user_service.delete(user_id).await {
        Ok(true) => (
            StatusCode::OK,
            Json(MessageResponse {
                message: format!("User with id {} deleted successfully", user_id),
            }),
        )
            .into_response(),
        Ok(false) => user_not_found(user_id),
        Err(e) => {
            tracing::error!(error = %e, "Failed to delete user");
            internal_error()
        }
    }
}

fn is_plausible_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
}

fn invalid_email(email: &str) -> axum::response::Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: format!("Invalid email address: '{}'", email),
        }),
    )
        .into_response()
}

fn user_not_found(user_id: i64) -> axum::response::Response {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: format!("User with id {} not found", user_id),
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
