//! Port to the intermediary generation endpoints.

use async_trait::async_trait;

use crate::error::BackendError;
use crate::wire::{StatusResponse, SubmitRequest, SubmitResponse};

/// One round trip per call to the remote job-based generation API.
///
/// Implementations do not interpret the answers; accepting, rejecting and
/// polling decisions live in the generation client.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Submits one image + prompt pair for generation.
    async fn create_job(&self, request: &SubmitRequest) -> Result<SubmitResponse, BackendError>;

    /// Queries the current status of a job.
    async fn fetch_status(&self, job_id: &str) -> Result<StatusResponse, BackendError>;
}
