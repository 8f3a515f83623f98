use std::sync::Arc;

use chrono::Utc;
use tokio::sync::{mpsc, oneshot};

use crate::application::ports::{
    DogRepository, ImageProvider, JobRepository, RepositoryError, UserRepository, WorkerProbe,
};
use crate::domain::{CreationJob, FailureReason, NewDog};

/// Substituted whenever the image provider comes back empty-handed. A dog is
/// never visible with an empty picture.
pub const FALLBACK_IMAGE: &str =
    "https://images.dog.ceo/breeds/hound-afghan/n02088094_1007.jpg";

/// Messages consumed by the worker: real creation jobs, and liveness probes
/// answered inline with a timestamped reply.
pub enum WorkerMessage {
    Create(CreationJob),
    Probe(oneshot::Sender<WorkerProbe>),
}

/// Consumes queued creation jobs: fetches an image reference, validates the
/// owner, writes the dog, and records a terminal status. Constraint
/// violations become observable failures, never retries — redelivery only
/// happens through startup recovery of non-terminal jobs.
pub struct CreationWorker {
    receiver: mpsc::Receiver<WorkerMessage>,
    dog_repository: Arc<dyn DogRepository>,
    user_repository: Arc<dyn UserRepository>,
    job_repository: Arc<dyn JobRepository>,
    image_provider: Arc<dyn ImageProvider>,
}

impl CreationWorker {
    pub fn new(
        receiver: mpsc::Receiver<WorkerMessage>,
        dog_repository: Arc<dyn DogRepository>,
        user_repository: Arc<dyn UserRepository>,
        job_repository: Arc<dyn JobRepository>,
        image_provider: Arc<dyn ImageProvider>,
    ) -> Self {
        Self {
            receiver,
            dog_repository,
            user_repository,
            job_repository,
            image_provider,
        }
    }

    pub async fn run(mut self) {
        tracing::info!("Creation worker started");
        while let Some(msg) = self.receiver.recv().await {
            match msg {
                WorkerMessage::Create(job) => {
                    let span = tracing::info_span!(
                        "creation_job",
                        job_id = %job.id,
                        dog_name = %job.dog_name,
                    );
                    let _guard = span.enter();

                    if let Err(e) = self.process_job(job).await {
                        // The job stays non-terminal and will be re-dispatched
                        // on the next startup recovery pass.
                        tracing::error!(error = %e, "Creation job aborted");
                    }
                }
                WorkerMessage::Probe(reply) => {
                    let _ = reply.send(WorkerProbe {
                        status: "Worker is functioning correctly".to_string(),
                        timestamp: Utc::now(),
                    });
                }
            }
        }
        tracing::info!("Creation worker stopped: channel closed");
    }

    async fn process_job(&self, job: CreationJob) -> Result<(), RepositoryError> {
        self.job_repository.mark_running(job.id).await?;

        let picture = match self.image_provider.fetch_random_image().await {
            Some(url) => url,
            None => {
                tracing::warn!("Image provider unavailable, using fallback reference");
                FALLBACK_IMAGE.to_string()
            }
        };

        if let Some(owner_id) = job.owner_id {
            if self.user_repository.get_by_id(owner_id).await?.is_none() {
                return self
                    .fail(
                        &job,
                        FailureReason::UnknownOwner,
                        &format!("owner {} does not exist", owner_id),
                    )
                    .await;
            }
        }

        let new_dog = NewDog {
            name: job.dog_name.clone(),
            picture,
            is_adopted: job.is_adopted,
            owner_id: job.owner_id,
        };

        match self.dog_repository.create(new_dog).await {
            Ok(dog) => {
                self.job_repository.mark_succeeded(job.id, dog.id).await?;
                tracing::info!(dog_id = dog.id, "Dog created");
                Ok(())
            }
            Err(RepositoryError::DuplicateName(name)) => {
                self.fail(
                    &job,
                    FailureReason::AlreadyExists,
                    &format!("dog named '{}' already exists", name),
                )
                .await
            }
            // Owner deleted between validation and insert; the store's
            // foreign key is authoritative.
            Err(RepositoryError::UnknownOwner(owner_id)) => {
                self.fail(
                    &job,
                    FailureReason::UnknownOwner,
                    &format!("owner {} does not exist", owner_id),
                )
                .await
            }
            Err(e) => Err(e),
        }
    }

    async fn fail(
        &self,
        job: &CreationJob,
        reason: FailureReason,
        message: &str,
    ) -> Result<(), RepositoryError> {
        tracing::warn!(reason = %reason, message, "Creation job failed");
        self.job_repository.mark_failed(job.id, reason, message).await
    }
}
