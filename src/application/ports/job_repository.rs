use async_trait::async_trait;

use crate::domain::{CreationJob, FailureReason, JobId, JobStatus};

use super::RepositoryError;

/// Durable job state. Status changes refresh `updated_at`; terminal
/// transitions additionally record the outcome (created dog id, or a
/// failure reason plus message).
#[async_trait]
pub trait JobRepository: Send + Sync {
    async fn create(&self, job: &CreationJob) -> Result<(), RepositoryError>;

    async fn get_by_id(&self, id: JobId) -> Result<Option<CreationJob>, RepositoryError>;

    async fn list_by_status(&self, status: JobStatus)
        -> Result<Vec<CreationJob>, RepositoryError>;

    async fn mark_running(&self, id: JobId) -> Result<(), RepositoryError>;

    async fn mark_succeeded(&self, id: JobId, dog_id: i64) -> Result<(), RepositoryError>;

    async fn mark_failed(
        &self,
        id: JobId,
        reason: FailureReason,
        message: &str,
    ) -> Result<(), RepositoryError>;
}
