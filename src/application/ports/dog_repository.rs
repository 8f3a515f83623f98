use async_trait::async_trait;

use crate::domain::{Dog, DogFilter, DogUpdate, NewDog};

use super::RepositoryError;

/// Durable storage for dogs. Name uniqueness and the owner foreign key are
/// enforced by the store itself, so concurrent duplicate creations are
/// serialized there and surface as typed errors.
#[async_trait]
pub trait DogRepository: Send + Sync {
    async fn create(&self, new_dog: NewDog) -> Result<Dog, RepositoryError>;

    async fn get_by_name(&self, name: &str) -> Result<Option<Dog>, RepositoryError>;

    async fn get_by_id(&self, id: i64) -> Result<Option<Dog>, RepositoryError>;

    async fn list(&self, filter: DogFilter) -> Result<Vec<Dog>, RepositoryError>;

    /// Dogs owned by one user. Explicit lookup keyed by the foreign id,
    /// there is no implicit relationship loading.
    async fn list_by_owner(&self, owner_id: i64) -> Result<Vec<Dog>, RepositoryError>;

    async fn update(&self, name: &str, changes: DogUpdate)
        -> Result<Option<Dog>, RepositoryError>;

    async fn delete(&self, name: &str) -> Result<bool, RepositoryError>;
}
