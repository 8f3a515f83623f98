//! In-memory implementations of the store ports. They mirror the schema's
//! behavior (name/email uniqueness, owner foreign key, delete-user detaches
//! dogs) so workers and handlers can be exercised without PostgreSQL.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::application::ports::{
    DogRepository, JobRepository, RepositoryError, UserRepository,
};
use crate::domain::{
    CreationJob, Dog, DogFilter, DogUpdate, FailureReason, JobId, JobStatus, NewDog, NewUser,
    User, UserUpdate,
};

#[derive(Default)]
struct EntityState {
    dogs: Vec<Dog>,
    users: Vec<User>,
    next_dog_id: i64,
    next_user_id: i64,
}

/// Backs both entity ports with one shared state so referential behavior
/// between users and dogs matches the relational schema.
#[derive(Default)]
pub struct InMemoryEntityStore {
    state: Mutex<EntityState>,
}

impl InMemoryEntityStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DogRepository for InMemoryEntityStore {
    async fn create(&self, new_dog: NewDog) -> Result<Dog, RepositoryError> {
        let mut state = self.state.lock().expect("entity state lock poisoned");

        if state.dogs.iter().any(|d| d.name == new_dog.name) {
            return Err(RepositoryError::DuplicateName(new_dog.name));
        }
        if let Some(owner_id) = new_dog.owner_id {
            if !state.users.iter().any(|u| u.id == owner_id) {
                return Err(RepositoryError::UnknownOwner(owner_id));
            }
        }

        state.next_dog_id += 1;
        let dog = Dog {
            id: state.next_dog_id,
            name: new_dog.name,
            picture: new_dog.picture,
            is_adopted: new_dog.is_adopted,
            owner_id: new_dog.owner_id,
            create_date: Utc::now(),
        };
        state.dogs.push(dog.clone());
        Ok(dog)
    }

    async fn get_by_name(&self, name: &str) -> Result<Option<Dog>, RepositoryError> {
        let state = self.state.lock().expect("entity state lock poisoned");
        Ok(state.dogs.iter().find(|d| d.name == name).cloned())
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Dog>, RepositoryError> {
        let state = self.state.lock().expect("entity state lock poisoned");
        Ok(state.dogs.iter().find(|d| d.id == id).cloned())
    }

    async fn list(&self, filter: DogFilter) -> Result<Vec<Dog>, RepositoryError> {
        let state = self.state.lock().expect("entity state lock poisoned");
        Ok(state
            .dogs
            .iter()
            .filter(|d| filter.is_adopted.is_none_or(|a| d.is_adopted == a))
            .cloned()
            .collect())
    }

    async fn list_by_owner(&self, owner_id: i64) -> Result<Vec<Dog>, RepositoryError> {
        let state = self.state.lock().expect("entity state lock poisoned");
        Ok(state
            .dogs
            .iter()
            .filter(|d| d.owner_id == Some(owner_id))
            .cloned()
            .collect())
    }

    async fn update(
        &self,
        name: &str,
        changes: DogUpdate,
    ) -> Result<Option<Dog>, RepositoryError> {
        let mut state = self.state.lock().expect("entity state lock poisoned");

        if let Some(new_name) = &changes.name {
            if new_name != name && state.dogs.iter().any(|d| &d.name == new_name) {
                return Err(RepositoryError::DuplicateName(new_name.clone()));
            }
        }
        if let Some(owner_id) = changes.owner_id {
            if !state.users.iter().any(|u| u.id == owner_id) {
                return Err(RepositoryError::UnknownOwner(owner_id));
            }
        }

        let Some(dog) = state.dogs.iter_mut().find(|d| d.name == name) else {
            return Ok(None);
        };
        if let Some(new_name) = changes.name {
            dog.name = new_name;
        }
        if let Some(picture) = changes.picture {
            dog.picture = picture;
        }
        if let Some(is_adopted) = changes.is_adopted {
            dog.is_adopted = is_adopted;
        }
        if let Some(owner_id) = changes.owner_id {
            dog.owner_id = Some(owner_id);
        }
        Ok(Some(dog.clone()))
    }

    async fn delete(&self, name: &str) -> Result<bool, RepositoryError> {
        let mut state = self.state.lock().expect("entity state lock poisoned");
        let before = state.dogs.len();
        state.dogs.retain(|d| d.name != name);
        Ok(state.dogs.len() < before)
    }
}

#[async_trait]
impl UserRepository for InMemoryEntityStore {
    async fn create(&self, new_user: NewUser) -> Result<User, RepositoryError> {
        let mut state = self.state.lock().expect("entity state lock poisoned");

        if state.users.iter().any(|u| u.email == new_user.email) {
            return Err(RepositoryError::DuplicateEmail(new_user.email));
        }

        state.next_user_id += 1;
        let now = Utc::now();
        let user = User {
            id: state.next_user_id,
            name: new_user.name,
            last_name: new_user.last_name,
            email: new_user.email,
            created_at: now,
            updated_at: now,
        };
        state.users.push(user.clone());
        Ok(user)
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<User>, RepositoryError> {
        let state = self.state.lock().expect("entity state lock poisoned");
        Ok(state.users.iter().find(|u| u.id == id).cloned())
    }

    async fn list(&self) -> Result<Vec<User>, RepositoryError> {
        let state = self.state.lock().expect("entity state lock poisoned");
        Ok(state.users.clone())
    }

    async fn update(
        &self,
        id: i64,
        changes: UserUpdate,
    ) -> Result<Option<User>, RepositoryError> {
        let mut state = self.state.lock().expect("entity state lock poisoned");

        if let Some(email) = &changes.email {
            if state.users.iter().any(|u| &u.email == email && u.id != id) {
                return Err(RepositoryError::DuplicateEmail(email.clone()));
            }
        }

        let Some(user) = state.users.iter_mut().find(|u| u.id == id) else {
            return Ok(None);
        };
        let mutated = !changes.is_empty();
        if let Some(name) = changes.name {
            user.name = name;
        }
        if let Some(last_name) = changes.last_name {
            user.last_name = last_name;
        }
        if let Some(email) = changes.email {
            user.email = email;
        }
        if mutated {
            user.updated_at = Utc::now();
        }
        Ok(Some(user.clone()))
    }

    async fn delete(&self, id: i64) -> Result<bool, RepositoryError> {
        let mut state = self.state.lock().expect("entity state lock poisoned");
        let before = state.users.len();
        state.users.retain(|u| u.id != id);
        if state.users.len() == before {
            return Ok(false);
        }
        // ON DELETE SET NULL
        for dog in state.dogs.iter_mut().filter(|d| d.owner_id == Some(id)) {
            dog.owner_id = None;
        }
        Ok(true)
    }
}

#[derive(Default)]
pub struct InMemoryJobRepository {
    jobs: Mutex<HashMap<Uuid, CreationJob>>,
}

impl InMemoryJobRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl JobRepository for InMemoryJobRepository {
    async fn create(&self, job: &CreationJob) -> Result<(), RepositoryError> {
        let mut jobs = self.jobs.lock().expect("job state lock poisoned");
        jobs.insert(job.id.as_uuid(), job.clone());
        Ok(())
    }

    async fn get_by_id(&self, id: JobId) -> Result<Option<CreationJob>, RepositoryError> {
        let jobs = self.jobs.lock().expect("job state lock poisoned");
        Ok(jobs.get(&id.as_uuid()).cloned())
    }

    async fn list_by_status(
        &self,
        status: JobStatus,
    ) -> Result<Vec<CreationJob>, RepositoryError> {
        let jobs = self.jobs.lock().expect("job state lock poisoned");
        let mut matching: Vec<_> = jobs
            .values()
            .filter(|j| j.status == status)
            .cloned()
            .collect();
        matching.sort_by_key(|j| j.created_at);
        Ok(matching)
    }

    async fn mark_running(&self, id: JobId) -> Result<(), RepositoryError> {
        let mut jobs = self.jobs.lock().expect("job state lock poisoned");
        if let Some(job) = jobs.get_mut(&id.as_uuid()) {
            job.status = JobStatus::Running;
            job.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn mark_succeeded(&self, id: JobId, dog_id: i64) -> Result<(), RepositoryError> {
        let mut jobs = self.jobs.lock().expect("job state lock poisoned");
        if let Some(job) = jobs.get_mut(&id.as_uuid()) {
            job.status = JobStatus::Succeeded;
            job.dog_id = Some(dog_id);
            job.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn mark_failed(
        &self,
        id: JobId,
        reason: FailureReason,
        message: &str,
    ) -> Result<(), RepositoryError> {
        let mut jobs = self.jobs.lock().expect("job state lock poisoned");
        if let Some(job) = jobs.get_mut(&id.as_uuid()) {
            job.status = JobStatus::Failed;
            job.failure_reason = Some(reason);
            job.error_message = Some(message.to_string());
            job.updated_at = Utc::now();
        }
        Ok(())
    }
}
