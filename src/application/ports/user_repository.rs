use async_trait::async_trait;

use crate::domain::{NewUser, User, UserUpdate};

use super::RepositoryError;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, new_user: NewUser) -> Result<User, RepositoryError>;

    async fn get_by_id(&self, id: i64) -> Result<Option<User>, RepositoryError>;

    async fn list(&self) -> Result<Vec<User>, RepositoryError>;

    async fn update(&self, id: i64, changes: UserUpdate)
        -> Result<Option<User>, RepositoryError>;

    /// Deleting a user detaches its dogs (owner reference set to null);
    /// dogs are never cascade-deleted.
    async fn delete(&self, id: i64) -> Result<bool, RepositoryError>;
}
