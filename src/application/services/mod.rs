mod creation_worker;
mod dog_service;
mod user_service;

pub use creation_worker::{CreationWorker, WorkerMessage, FALLBACK_IMAGE};
pub use dog_service::{DogService, DogServiceError};
pub use user_service::UserService;
