use chrono::{DateTime, Utc};

use super::{FailureReason, JobId, JobStatus};

/// What a creation-endpoint caller asked for. Everything except the picture,
/// which only the worker can supply.
#[derive(Debug, Clone)]
pub struct CreationRequest {
    pub name: String,
    pub is_adopted: bool,
    pub owner_id: Option<i64>,
}

/// Durable record of a requested-but-not-yet-materialized dog, tracked by
/// status until terminal. `dog_id` is set once the row has committed.
#[derive(Debug, Clone)]
pub struct CreationJob {
    pub id: JobId,
    pub dog_name: String,
    pub is_adopted: bool,
    pub owner_id: Option<i64>,
    pub status: JobStatus,
    pub failure_reason: Option<FailureReason>,
    pub error_message: Option<String>,
    pub dog_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CreationJob {
    pub fn new(request: CreationRequest) -> Self {
        let now = Utc::now();
        Self {
            id: JobId::new(),
            dog_name: request.name,
            is_adopted: request.is_adopted,
            owner_id: request.owner_id,
            status: JobStatus::Pending,
            failure_reason: None,
            error_message: None,
            dog_id: None,
            created_at: now,
            updated_at: now,
        }
    }
}
