mod in_memory;
mod pg_dog_repository;
mod pg_job_repository;
mod pg_user_repository;

pub use in_memory::{InMemoryEntityStore, InMemoryJobRepository};
pub use pg_dog_repository::PgDogRepository;
pub use pg_job_repository::PgJobRepository;
pub use pg_user_repository::PgUserRepository;
