use std::sync::Arc;

use crate::application::ports::{
    DogRepository, ImageProvider, JobQueue, QueueError, RepositoryError, UserRepository,
};
use crate::domain::{CreationRequest, Dog, DogFilter, DogUpdate, JobId, NewDog};

use super::creation_worker::FALLBACK_IMAGE;

#[derive(Debug, thiserror::Error)]
pub enum DogServiceError {
    #[error("dog named '{0}' already exists")]
    AlreadyExists(String),
    #[error("owner {0} does not exist")]
    UnknownOwner(i64),
    #[error(transparent)]
    Queue(#[from] QueueError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

pub struct DogService {
    dog_repository: Arc<dyn DogRepository>,
    user_repository: Arc<dyn UserRepository>,
    image_provider: Arc<dyn ImageProvider>,
    job_queue: Arc<dyn JobQueue>,
}

impl DogService {
    pub fn new(
        dog_repository: Arc<dyn DogRepository>,
        user_repository: Arc<dyn UserRepository>,
        image_provider: Arc<dyn ImageProvider>,
        job_queue: Arc<dyn JobQueue>,
    ) -> Self {
        Self {
            dog_repository,
            user_repository,
            image_provider,
            job_queue,
        }
    }

    pub async fn list(&self, filter: DogFilter) -> Result<Vec<Dog>, RepositoryError> {
        self.dog_repository.list(filter).await
    }

    pub async fn get_by_name(&self, name: &str) -> Result<Option<Dog>, RepositoryError> {
        self.dog_repository.get_by_name(name).await
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Option<Dog>, RepositoryError> {
        self.dog_repository.get_by_id(id).await
    }

    /// Submit a creation job and return the caller's handle. The existence
    /// pre-check is best-effort only; the authoritative duplicate check is
    /// the store constraint hit by the worker.
    pub async fn submit_creation(
        &self,
        request: CreationRequest,
    ) -> Result<JobId, DogServiceError> {
        if self.dog_repository.get_by_name(&request.name).await?.is_some() {
            return Err(DogServiceError::AlreadyExists(request.name));
        }
        let job_id = self.job_queue.submit(request).await?;
        Ok(job_id)
    }

    /// Direct, synchronous creation bypassing the queue. Internal
    /// convenience for tests and seeding; the public creation contract is
    /// `submit_creation`.
    pub async fn create_direct(&self, request: CreationRequest) -> Result<Dog, DogServiceError> {
        if let Some(owner_id) = request.owner_id {
            if self.user_repository.get_by_id(owner_id).await?.is_none() {
                return Err(DogServiceError::UnknownOwner(owner_id));
            }
        }

        let picture = self
            .image_provider
            .fetch_random_image()
            .await
            .unwrap_or_else(|| FALLBACK_IMAGE.to_string());

        let new_dog = NewDog {
            name: request.name,
            picture,
            is_adopted: request.is_adopted,
            owner_id: request.owner_id,
        };

        match self.dog_repository.create(new_dog).await {
            Ok(dog) => Ok(dog),
            Err(RepositoryError::DuplicateName(name)) => {
                Err(DogServiceError::AlreadyExists(name))
            }
            Err(RepositoryError::UnknownOwner(owner_id)) => {
                Err(DogServiceError::UnknownOwner(owner_id))
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn update(
        &self,
        name: &str,
        changes: DogUpdate,
    ) -> Result<Option<Dog>, DogServiceError> {
        if let Some(owner_id) = changes.owner_id {
            if self.user_repository.get_by_id(owner_id).await?.is_none() {
                return Err(DogServiceError::UnknownOwner(owner_id));
            }
        }

        match self.dog_repository.update(name, changes).await {
            Ok(dog) => Ok(dog),
            Err(RepositoryError::DuplicateName(name)) => {
                Err(DogServiceError::AlreadyExists(name))
            }
            Err(RepositoryError::UnknownOwner(owner_id)) => {
                Err(DogServiceError::UnknownOwner(owner_id))
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn delete(&self, name: &str) -> Result<bool, RepositoryError> {
        self.dog_repository.delete(name).await
    }
}
