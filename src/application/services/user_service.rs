use std::sync::Arc;

use crate::application::ports::{DogRepository, RepositoryError, UserRepository};
use crate::domain::{Dog, NewUser, User, UserUpdate};

pub struct UserService {
    user_repository: Arc<dyn UserRepository>,
    dog_repository: Arc<dyn DogRepository>,
}

impl UserService {
    pub fn new(
        user_repository: Arc<dyn UserRepository>,
        dog_repository: Arc<dyn DogRepository>,
    ) -> Self {
        Self {
            user_repository,
            dog_repository,
        }
    }

    pub async fn create(&self, new_user: NewUser) -> Result<User, RepositoryError> {
        self.user_repository.create(new_user).await
    }

    pub async fn list(&self) -> Result<Vec<User>, RepositoryError> {
        self.user_repository.list().await
    }

    /// User detail with owned dogs, fetched as a second lookup keyed by the
    /// owner id.
    pub async fn get_with_dogs(
        &self,
        id: i64,
    ) -> Result<Option<(User, Vec<Dog>)>, RepositoryError> {
        let Some(user) = self.user_repository.get_by_id(id).await? else {
            return Ok(None);
        };
        let dogs = self.dog_repository.list_by_owner(user.id).await?;
        Ok(Some((user, dogs)))
    }

    pub async fn update(
        &self,
        id: i64,
        changes: UserUpdate,
    ) -> Result<Option<User>, RepositoryError> {
        self.user_repository.update(id, changes).await
    }

    pub async fn delete(&self, id: i64) -> Result<bool, RepositoryError> {
        self.user_repository.delete(id).await
    }
}
