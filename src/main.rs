use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio::sync::mpsc;

use kennel::application::ports::{
    DogRepository, ImageProvider, JobQueue, JobRepository, TokenVerifier, UserRepository,
};
use kennel::application::services::{CreationWorker, DogService, UserService};
use kennel::infrastructure::auth::SharedSecretVerifier;
use kennel::infrastructure::image::DogApiClient;
use kennel::infrastructure::observability::{init_tracing, TracingConfig};
use kennel::infrastructure::persistence::{
    create_pool, PgDogRepository, PgJobRepository, PgUserRepository,
};
use kennel::infrastructure::queue::ChannelJobQueue;
use kennel::presentation::{create_router, AppState, Environment, Settings};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let environment: Environment = std::env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "local".into())
        .try_into()
        .map_err(anyhow::Error::msg)?;
    let settings = Settings::load(environment)?;

    init_tracing(&TracingConfig {
        level: settings.logging.level.clone(),
        json_format: settings.logging.enable_json,
    });
    tracing::info!(environment = %environment, "Starting kennel");

    let pool = create_pool(&settings.database.url, settings.database.max_connections).await?;
    if settings.database.run_migrations {
        sqlx::migrate!().run(&pool).await?;
        tracing::info!("Database migrations applied");
    }

    let dog_repository: Arc<dyn DogRepository> = Arc::new(PgDogRepository::new(pool.clone()));
    let user_repository: Arc<dyn UserRepository> = Arc::new(PgUserRepository::new(pool.clone()));
    let job_repository: Arc<dyn JobRepository> = Arc::new(PgJobRepository::new(pool.clone()));

    let image_provider: Arc<dyn ImageProvider> = Arc::new(DogApiClient::new(
        settings.image_provider.url.clone(),
        Duration::from_secs(settings.image_provider.request_timeout_seconds),
    ));
    let token_verifier: Arc<dyn TokenVerifier> = Arc::new(SharedSecretVerifier::new(
        settings.auth.api_token.clone(),
        settings.auth.subject.clone(),
    ));

    let (sender, receiver) = mpsc::channel(settings.queue.capacity);
    let queue = Arc::new(ChannelJobQueue::new(sender, Arc::clone(&job_repository)));

    let worker = CreationWorker::new(
        receiver,
        Arc::clone(&dog_repository),
        Arc::clone(&user_repository),
        Arc::clone(&job_repository),
        Arc::clone(&image_provider),
    );
    tokio::spawn(worker.run());

    let recovered = queue.recover_pending().await?;
    if recovered > 0 {
        tracing::info!(recovered, "Re-dispatched jobs from previous run");
    }

    let job_queue: Arc<dyn JobQueue> = queue;
    let dog_service = Arc::new(DogService::new(
        Arc::clone(&dog_repository),
        Arc::clone(&user_repository),
        Arc::clone(&image_provider),
        Arc::clone(&job_queue),
    ));
    let user_service = Arc::new(UserService::new(
        Arc::clone(&user_repository),
        Arc::clone(&dog_repository),
    ));

    let state = AppState {
        dog_service,
        user_service,
        job_repository,
        job_queue,
        token_verifier,
        settings: settings.clone(),
    };
    let router = create_router(state);

    let addr: SocketAddr = format!("{}:{}", settings.server.host, settings.server.port).parse()?;
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
