use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::presentation::state::AppState;

/// Subject of a verified bearer token. Rejects with 401 when the
/// Authorization header is missing, malformed, or fails verification.
pub struct AuthenticatedUser(pub String);

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "));

        let Some(token) = token else {
            return Err(unauthorized());
        };

        match state.token_verifier.verify(token).await {
            Some(subject) => Ok(AuthenticatedUser(subject)),
            None => Err(unauthorized()),
        }
    }
}

fn unauthorized() -> Response {
    let mut response = (
        StatusCode::UNAUTHORIZED,
        Json(ErrorResponse {
            error: "Could not validate credentials".to_string(),
        }),
    )
        .into_response();
    response
        .headers_mut()
        .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
    response
}
