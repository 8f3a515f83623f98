use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};

use crate::application::ports::{JobQueue, JobRepository, QueueError, WorkerProbe};
use crate::application::services::WorkerMessage;
use crate::domain::{CreationJob, CreationRequest, JobId, JobStatus};

/// Queue client handed to the API layer and the worker at startup. The job
/// row is the durable record; the channel is only the in-process hand-off.
pub struct ChannelJobQueue {
    sender: mpsc::Sender<WorkerMessage>,
    job_repository: Arc<dyn JobRepository>,
}

impl ChannelJobQueue {
    pub fn new(sender: mpsc::Sender<WorkerMessage>, job_repository: Arc<dyn JobRepository>) -> Self {
        Self {
            sender,
            job_repository,
        }
    }

    /// Re-dispatch jobs left non-terminal by a previous process: PENDING
    /// rows that never reached a worker, and RUNNING rows whose worker died
    /// mid-job. At-least-once delivery across restarts.
    pub async fn recover_pending(&self) -> Result<usize, QueueError> {
        let mut recovered = 0;
        for status in [JobStatus::Pending, JobStatus::Running] {
            for job in self.job_repository.list_by_status(status).await? {
                tracing::info!(
                    job_id = %job.id,
                    status = %status,
                    "Re-dispatching job from previous run"
                );
                self.dispatch(job).await?;
                recovered += 1;
            }
        }
        Ok(recovered)
    }

    async fn dispatch(&self, job: CreationJob) -> Result<(), QueueError> {
        self.sender
            .send(WorkerMessage::Create(job))
            .await
            .map_err(|_| QueueError::Unavailable("worker channel closed".to_string()))
    }
}

#[async_trait]
impl JobQueue for ChannelJobQueue {
    async fn submit(&self, request: CreationRequest) -> Result<JobId, QueueError> {
        let job = CreationJob::new(request);
        let job_id = job.id;

        // Persist first: a job that was acknowledged to the caller must
        // survive a crash before the worker picks it up.
        self.job_repository.create(&job).await?;
        self.dispatch(job).await?;

        tracing::info!(job_id = %job_id, "Creation job submitted");
        Ok(job_id)
    }

    async fn probe(&self, timeout: Duration) -> Result<WorkerProbe, QueueError> {
        let (reply, response) = oneshot::channel();
        self.sender
            .send(WorkerMessage::Probe(reply))
            .await
            .map_err(|_| QueueError::Unavailable("worker channel closed".to_string()))?;

        match tokio::time::timeout(timeout, response).await {
            Ok(Ok(probe)) => Ok(probe),
            Ok(Err(_)) => Err(QueueError::Unavailable(
                "worker dropped the probe".to_string(),
            )),
            Err(_) => Err(QueueError::ProbeTimeout(timeout)),
        }
    }
}
