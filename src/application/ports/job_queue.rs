use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{CreationRequest, JobId};

use super::RepositoryError;

/// Reply from a live worker to a status probe.
#[derive(Debug, Clone)]
pub struct WorkerProbe {
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, thiserror::Error)]
pub enum QueueError {
    /// The worker channel is closed or full; the job could not be handed off.
    #[error("job queue unavailable: {0}")]
    Unavailable(String),
    /// No worker answered a probe within the configured timeout.
    #[error("no worker responded within {0:?}")]
    ProbeTimeout(Duration),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// At-least-once dispatch decoupling the request path from slow work. A
/// submitted job cannot be cancelled, only observed through its id.
#[async_trait]
pub trait JobQueue: Send + Sync {
    /// Persist the job, hand it to a worker, return the caller's handle.
    async fn submit(&self, request: CreationRequest) -> Result<JobId, QueueError>;

    /// Synchronously verify that a worker is consuming the queue, waiting at
    /// most `timeout` for an answer. The one path that blocks on a worker.
    async fn probe(&self, timeout: Duration) -> Result<WorkerProbe, QueueError>;
}
