use axum::middleware;
use axum::routing::get;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::infrastructure::observability::request_id_middleware;
use crate::presentation::handlers::{
    adopted_dogs_handler, create_dog_handler, create_user_handler, delete_dog_handler,
    delete_user_handler, dog_by_name_handler, health_handler, job_status_handler,
    list_dogs_handler, list_users_handler, update_dog_handler, update_user_handler,
    user_by_id_handler, worker_status_handler,
};
use crate::presentation::state::AppState;

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    Router::new()
        .route("/health", get(health_handler))
        .route("/api/dogs", get(list_dogs_handler))
        .route("/api/dogs/is_adopted", get(adopted_dogs_handler))
        .route(
            "/api/dogs/{name}",
            get(dog_by_name_handler)
                .post(create_dog_handler)
                .put(update_dog_handler)
                .delete(delete_dog_handler),
        )
        .route(
            "/api/users",
            get(list_users_handler).post(create_user_handler),
        )
        .route(
            "/api/users/{user_id}",
            get(user_by_id_handler)
                .put(update_user_handler)
                .delete(delete_user_handler),
        )
        .route("/api/jobs/{job_id}", get(job_status_handler))
        .route("/api/workers", get(worker_status_handler))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(trace_layer)
        .layer(cors)
        .with_state(state)
}
