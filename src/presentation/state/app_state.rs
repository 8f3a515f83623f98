use std::sync::Arc;

use crate::application::ports::{JobQueue, JobRepository, TokenVerifier};
use crate::application::services::{DogService, UserService};
use crate::presentation::config::Settings;

/// Everything the handlers need, constructed once at startup and injected —
/// there are no process-wide singletons.
#[derive(Clone)]
pub struct AppState {
    pub dog_service: Arc<DogService>,
    pub user_service: Arc<UserService>,
    pub job_repository: Arc<dyn JobRepository>,
    pub job_queue: Arc<dyn JobQueue>,
    pub token_verifier: Arc<dyn TokenVerifier>,
    pub settings: Settings,
}
