use std::fmt;
use std::str::FromStr;

/// Lifecycle of a creation job: Pending -> Running -> {Succeeded, Failed}.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobStatus {
    Pending,
    Running,
    Succeeded,
    Failed,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Pending => "PENDING",
            JobStatus::Running => "RUNNING",
            JobStatus::Succeeded => "SUCCEEDED",
            JobStatus::Failed => "FAILED",
        }
    }

    /// Lowercase form used in API payloads.
    pub fn as_api_str(&self) -> &'static str {
        match self {
            JobStatus::Pending => "pending",
            JobStatus::Running => "running",
            JobStatus::Succeeded => "succeeded",
            JobStatus::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Succeeded | JobStatus::Failed)
    }
}

impl FromStr for JobStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(JobStatus::Pending),
            "RUNNING" => Ok(JobStatus::Running),
            "SUCCEEDED" => Ok(JobStatus::Succeeded),
            "FAILED" => Ok(JobStatus::Failed),
            _ => Err(format!("Invalid job status: {}", s)),
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Why a job reached `Failed`. Recorded alongside the status so the outcome
/// stays observable through the job endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureReason {
    /// A dog with the requested name was created between submission and
    /// execution; the existing row is never overwritten.
    AlreadyExists,
    /// The requested owner id does not exist in the store.
    UnknownOwner,
}

impl FailureReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureReason::AlreadyExists => "ALREADY_EXISTS",
            FailureReason::UnknownOwner => "UNKNOWN_OWNER",
        }
    }

    pub fn as_api_str(&self) -> &'static str {
        match self {
            FailureReason::AlreadyExists => "already_exists",
            FailureReason::UnknownOwner => "unknown_owner",
        }
    }
}

impl FromStr for FailureReason {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ALREADY_EXISTS" => Ok(FailureReason::AlreadyExists),
            "UNKNOWN_OWNER" => Ok(FailureReason::UnknownOwner),
            _ => Err(format!("Invalid failure reason: {}", s)),
        }
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
