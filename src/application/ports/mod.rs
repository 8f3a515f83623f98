mod dog_repository;
mod image_provider;
mod job_queue;
mod job_repository;
mod repository_error;
mod token_verifier;
mod user_repository;

pub use dog_repository::DogRepository;
pub use image_provider::ImageProvider;
pub use job_queue::{JobQueue, QueueError, WorkerProbe};
pub use job_repository::JobRepository;
pub use repository_error::RepositoryError;
pub use token_verifier::TokenVerifier;
pub use user_repository::UserRepository;
