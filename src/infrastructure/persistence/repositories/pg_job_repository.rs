use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use crate::application::ports::{JobRepository, RepositoryError};
use crate::domain::{CreationJob, FailureReason, JobId, JobStatus};

const JOB_COLUMNS: &str = "id, dog_name, is_adopted, owner_id, status, failure_reason, \
                           error_message, dog_id, created_at, updated_at";

pub struct PgJobRepository {
    pool: PgPool,
}

impl PgJobRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct JobRow {
    id: Uuid,
    dog_name: String,
    is_adopted: bool,
    owner_id: Option<i64>,
    status: String,
    failure_reason: Option<String>,
    error_message: Option<String>,
    dog_id: Option<i64>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<JobRow> for CreationJob {
    type Error = RepositoryError;

    fn try_from(row: JobRow) -> Result<Self, Self::Error> {
        let status = row
            .status
            .parse::<JobStatus>()
            .map_err(RepositoryError::QueryFailed)?;
        let failure_reason = row
            .failure_reason
            .map(|r| r.parse::<FailureReason>())
            .transpose()
            .map_err(RepositoryError::QueryFailed)?;

        Ok(CreationJob {
            id: JobId::from_uuid(row.id),
            dog_name: row.dog_name,
            is_adopted: row.is_adopted,
            owner_id: row.owner_id,
            status,
            failure_reason,
            error_message: row.error_message,
            dog_id: row.dog_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[async_trait]
impl JobRepository for PgJobRepository {
    #[instrument(skip(self, job), fields(job_id = %job.id))]
    async fn create(&self, job: &CreationJob) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO creation_jobs \
             (id, dog_name, is_adopted, owner_id, status, failure_reason, error_message, \
              dog_id, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
        )
        .bind(job.id.as_uuid())
        .bind(&job.dog_name)
        .bind(job.is_adopted)
        .bind(job.owner_id)
        .bind(job.status.as_str())
        .bind(job.failure_reason.map(|r| r.as_str()))
        .bind(&job.error_message)
        .bind(job.dog_id)
        .bind(job.created_at)
        .bind(job.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

        Ok(())
    }

    #[instrument(skip(self), fields(job_id = %id))]
    async fn get_by_id(&self, id: JobId) -> Result<Option<CreationJob>, RepositoryError> {
        let row = sqlx::query_as::<_, JobRow>(&format!(
            "SELECT {JOB_COLUMNS} FROM creation_jobs WHERE id = $1"
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

        row.map(CreationJob::try_from).transpose()
    }

    #[instrument(skip(self), fields(status = %status))]
    async fn list_by_status(
        &self,
        status: JobStatus,
    ) -> Result<Vec<CreationJob>, RepositoryError> {
        let rows = sqlx::query_as::<_, JobRow>(&format!(
            "SELECT {JOB_COLUMNS} FROM creation_jobs WHERE status = $1 ORDER BY created_at"
        ))
        .bind(status.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

        rows.into_iter().map(CreationJob::try_from).collect()
    }

    #[instrument(skip(self), fields(job_id = %id))]
    async fn mark_running(&self, id: JobId) -> Result<(), RepositoryError> {
        sqlx::query(
            "UPDATE creation_jobs SET status = $2, updated_at = $3 WHERE id = $1",
        )
        .bind(id.as_uuid())
        .bind(JobStatus::Running.as_str())
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

        Ok(())
    }

    #[instrument(skip(self), fields(job_id = %id))]
    async fn mark_succeeded(&self, id: JobId, dog_id: i64) -> Result<(), RepositoryError> {
        sqlx::query(
            "UPDATE creation_jobs SET status = $2, dog_id = $3, updated_at = $4 WHERE id = $1",
        )
        .bind(id.as_uuid())
        .bind(JobStatus::Succeeded.as_str())
        .bind(dog_id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

        Ok(())
    }

    #[instrument(skip(self, message), fields(job_id = %id, reason = %reason))]
    async fn mark_failed(
        &self,
        id: JobId,
        reason: FailureReason,
        message: &str,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            "UPDATE creation_jobs \
             SET status = $2, failure_reason = $3, error_message = $4, updated_at = $5 \
             WHERE id = $1",
        )
        .bind(id.as_uuid())
        .bind(JobStatus::Failed.as_str())
        .bind(reason.as_str())
        .bind(message)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

        Ok(())
    }
}
