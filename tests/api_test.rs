use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tokio::sync::mpsc;
use tower::ServiceExt;

use kennel::application::ports::{
    DogRepository, ImageProvider, JobQueue, JobRepository, TokenVerifier, UserRepository,
};
use kennel::application::services::{CreationWorker, DogService, UserService, WorkerMessage};
use kennel::infrastructure::auth::SharedSecretVerifier;
use kennel::infrastructure::image::FixedImageProvider;
use kennel::infrastructure::persistence::{InMemoryEntityStore, InMemoryJobRepository};
use kennel::infrastructure::queue::ChannelJobQueue;
use kennel::presentation::config::{
    AuthSettings, DatabaseSettings, ImageProviderSettings, LoggingSettings, QueueSettings,
    ServerSettings, Settings,
};
use kennel::presentation::{create_router, AppState};

const TEST_TOKEN: &str = "test-token";
const TEST_IMAGE: &str = "https://images.dog.ceo/breeds/shiba/shiba-16.jpg";

fn test_settings() -> Settings {
    Settings {
        server: ServerSettings {
            host: "127.0.0.1".to_string(),
            port: 8000,
        },
        database: DatabaseSettings {
            url: "postgres://unused".to_string(),
            max_connections: 1,
            run_migrations: false,
        },
        queue: QueueSettings {
            capacity: 16,
            probe_timeout_seconds: 1,
        },
        image_provider: ImageProviderSettings {
            url: "http://localhost:1/random".to_string(),
            request_timeout_seconds: 1,
        },
        auth: AuthSettings {
            api_token: TEST_TOKEN.to_string(),
            subject: "test-suite".to_string(),
        },
        logging: LoggingSettings {
            level: "info".to_string(),
            enable_json: false,
        },
    }
}

/// Router over in-memory ports. Without a worker the returned receiver keeps
/// the queue channel open so submissions are accepted but never processed.
fn test_app(spawn_worker: bool) -> (Router, Option<mpsc::Receiver<WorkerMessage>>) {
    let store = Arc::new(InMemoryEntityStore::new());
    let jobs = Arc::new(InMemoryJobRepository::new());
    let image: Arc<dyn ImageProvider> = Arc::new(FixedImageProvider::new(TEST_IMAGE));
    let (sender, receiver) = mpsc::channel(16);
    let queue = Arc::new(ChannelJobQueue::new(sender, Arc::clone(&jobs) as Arc<dyn JobRepository>));

    let receiver = if spawn_worker {
        let worker = CreationWorker::new(
            receiver,
            Arc::clone(&store) as Arc<dyn DogRepository>,
            Arc::clone(&store) as Arc<dyn UserRepository>,
            Arc::clone(&jobs) as Arc<dyn JobRepository>,
            Arc::clone(&image),
        );
        tokio::spawn(worker.run());
        None
    } else {
        Some(receiver)
    };

    let dog_service = Arc::new(DogService::new(
        Arc::clone(&store) as Arc<dyn DogRepository>,
        Arc::clone(&store) as Arc<dyn UserRepository>,
        Arc::clone(&image),
        Arc::clone(&queue) as Arc<dyn JobQueue>,
    ));
    let user_service = Arc::new(UserService::new(
        Arc::clone(&store) as Arc<dyn UserRepository>,
        Arc::clone(&store) as Arc<dyn DogRepository>,
    ));

    let state = AppState {
        dog_service,
        user_service,
        job_repository: Arc::clone(&jobs) as Arc<dyn JobRepository>,
        job_queue: Arc::clone(&queue) as Arc<dyn JobQueue>,
        token_verifier: Arc::new(SharedSecretVerifier::new(
            TEST_TOKEN.to_string(),
            "test-suite".to_string(),
        )) as Arc<dyn TokenVerifier>,
        settings: test_settings(),
    };

    (create_router(state), receiver)
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("request failed");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("failed to read body");
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("body is not JSON")
    };
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("request build failed")
}

fn json_request(method: &str, uri: &str, body: Value, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    builder
        .body(Body::from(body.to_string()))
        .expect("request build failed")
}

/// Poll the job endpoint until the job leaves pending/running.
async fn wait_for_job(app: &Router, job_id: &str) -> Value {
    for _ in 0..200 {
        let (status, body) = send(app, get(&format!("/api/jobs/{}", job_id))).await;
        assert_eq!(status, StatusCode::OK);
        let state = body["status"].as_str().expect("status missing").to_string();
        if state == "succeeded" || state == "failed" {
            return body;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("job {} never reached a terminal state", job_id);
}

#[tokio::test]
async fn health_returns_ok() {
    let (app, _guard) = test_app(true);

    let (status, body) = send(&app, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn creation_requires_a_valid_bearer_token() {
    let (app, _guard) = test_app(true);

    let (status, _) = send(
        &app,
        json_request("POST", "/api/dogs/rex", json!({"is_adopted": false}), None),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(
        &app,
        json_request(
            "POST",
            "/api/dogs/rex",
            json!({"is_adopted": false}),
            Some("wrong-token"),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Nothing was enqueued either way.
    let (_, dogs) = send(&app, get("/api/dogs")).await;
    assert_eq!(dogs.as_array().expect("expected array").len(), 0);
}

#[tokio::test]
async fn creation_round_trip_is_observable_through_the_job_endpoint() {
    let (app, _guard) = test_app(true);

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/api/dogs/rex",
            json!({"is_adopted": false}),
            Some(TEST_TOKEN),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(body["status"], "processing");
    let job_id = body["job_id"].as_str().expect("job_id missing").to_string();

    let job = wait_for_job(&app, &job_id).await;
    assert_eq!(job["status"], "succeeded");
    assert_eq!(job["dog"]["name"], "rex");
    assert_eq!(job["dog"]["picture"], TEST_IMAGE);

    let (status, dog) = send(&app, get("/api/dogs/rex")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(dog["picture"], TEST_IMAGE);
}

#[tokio::test]
async fn creating_an_existing_dog_is_rejected_up_front() {
    let (app, _guard) = test_app(true);

    let (_, body) = send(
        &app,
        json_request("POST", "/api/dogs/rex", json!({}), Some(TEST_TOKEN)),
    )
    .await;
    let job_id = body["job_id"].as_str().expect("job_id missing").to_string();
    wait_for_job(&app, &job_id).await;

    let (status, body) = send(
        &app,
        json_request("POST", "/api/dogs/rex", json!({}), Some(TEST_TOKEN)),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"]
        .as_str()
        .expect("error missing")
        .contains("already exists"));
}

#[tokio::test]
async fn job_with_unknown_owner_reports_the_reason() {
    let (app, _guard) = test_app(true);

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/api/dogs/ghost",
            json!({"owner_id": 42}),
            Some(TEST_TOKEN),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::ACCEPTED);
    let job_id = body["job_id"].as_str().expect("job_id missing").to_string();

    let job = wait_for_job(&app, &job_id).await;
    assert_eq!(job["status"], "failed");
    assert_eq!(job["failure_reason"], "unknown_owner");
    assert!(job.get("dog").is_none());

    let (status, _) = send(&app, get("/api/dogs/ghost")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn job_endpoint_validates_ids() {
    let (app, _guard) = test_app(true);

    let (status, _) = send(&app, get("/api/jobs/not-a-uuid")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        get("/api/jobs/00000000-0000-4000-8000-000000000000"),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn user_lifecycle_detaches_dogs_on_delete() {
    let (app, _guard) = test_app(true);

    let (status, user) = send(
        &app,
        json_request(
            "POST",
            "/api/users",
            json!({"name": "Ada", "last_name": "Lovelace", "email": "ada@example.com"}),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let user_id = user["id"].as_i64().expect("id missing");

    let (_, body) = send(
        &app,
        json_request(
            "POST",
            "/api/dogs/bran",
            json!({"owner_id": user_id}),
            Some(TEST_TOKEN),
        ),
    )
    .await;
    let job_id = body["job_id"].as_str().expect("job_id missing").to_string();
    let job = wait_for_job(&app, &job_id).await;
    assert_eq!(job["status"], "succeeded");

    let (status, detail) = send(&app, get(&format!("/api/users/{}", user_id))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["dogs"].as_array().expect("dogs missing").len(), 1);

    let (status, _) = send(
        &app,
        Request::builder()
            .method("DELETE")
            .uri(format!("/api/users/{}", user_id))
            .body(Body::empty())
            .expect("request build failed"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // The dog outlives its owner, detached.
    let (status, dog) = send(&app, get("/api/dogs/bran")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(dog["owner_id"].is_null());
}

#[tokio::test]
async fn malformed_emails_are_rejected() {
    let (app, _guard) = test_app(true);

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/api/users",
            json!({"name": "No", "last_name": "Mail", "email": "not-an-email"}),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"]
        .as_str()
        .expect("error missing")
        .contains("Invalid email"));
}

#[tokio::test]
async fn duplicate_emails_are_rejected() {
    let (app, _guard) = test_app(true);

    let payload = json!({"name": "Ada", "last_name": "Lovelace", "email": "ada@example.com"});
    let (status, _) = send(&app, json_request("POST", "/api/users", payload.clone(), None)).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = send(&app, json_request("POST", "/api/users", payload, None)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn updating_a_missing_dog_returns_not_found() {
    let (app, _guard) = test_app(true);

    let (status, _) = send(
        &app,
        json_request("PUT", "/api/dogs/nobody", json!({"is_adopted": true}), None),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn worker_status_reports_a_live_worker() {
    let (app, _guard) = test_app(true);

    let (status, body) = send(&app, get("/api/workers")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(!body["timestamp"].as_str().expect("timestamp missing").is_empty());
}

#[tokio::test]
async fn worker_status_reports_unavailability_on_timeout() {
    let (app, _receiver) = test_app(false);

    let (status, body) = send(&app, get("/api/workers")).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(body["error"]
        .as_str()
        .expect("error missing")
        .contains("Worker not available"));
}
