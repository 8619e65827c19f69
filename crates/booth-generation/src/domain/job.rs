//! A single in-flight remote generation job.

use booth_core::error::GenerationError;
use booth_core::wire::{JobStatus, StatusResponse};

/// Local view of one remote job, updated from status polls.
///
/// Owned by the client loop that polls it and dropped once its terminal
/// outcome has been handed to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationJob {
    id: String,
    status: JobStatus,
    result: Option<String>,
    error: Option<String>,
}

impl GenerationJob {
    /// A freshly submitted job.
    #[must_use]
    pub fn submitted(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            status: JobStatus::Pending,
            result: None,
            error: None,
        }
    }

    /// The identifier assigned by the remote service.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Last observed status.
    #[must_use]
    pub fn status(&self) -> JobStatus {
        self.status
    }

    /// Applies one status answer.
    ///
    /// A succeeded answer whose payload yields no reference is recorded as a
    /// failure, since there is nothing to show.
    pub fn observe(&mut self, status: JobStatus, response: StatusResponse) {
        debug_assert!(
            !self.status.is_terminal(),
            "job {} observed after reaching {:?}",
            self.id,
            self.status
        );
        self.status = status;
        match status {
            JobStatus::Succeeded => {
                self.result = response.image_url.and_then(|payload| payload.into_reference());
                if self.result.is_none() {
                    self.status = JobStatus::Failed;
                    self.error = Some("job succeeded without a result reference".to_owned());
                }
            }
            JobStatus::Failed | JobStatus::Canceled => {
                self.error = Some(
                    response
                        .error
                        .filter(|detail| !detail.trim().is_empty())
                        .unwrap_or_else(|| format!("job {}", status.label())),
                );
            }
            JobStatus::Pending | JobStatus::Running => {}
        }
    }

    /// The terminal outcome, or `None` while the job is still in progress.
    #[must_use]
    pub fn outcome(&self) -> Option<Result<String, GenerationError>> {
        match self.status {
            JobStatus::Pending | JobStatus::Running => None,
            JobStatus::Succeeded => self.result.clone().map(Ok),
            JobStatus::Failed | JobStatus::Canceled => Some(Err(GenerationError::Failed(
                self.error
                    .clone()
                    .unwrap_or_else(|| "generation failed".to_owned()),
            ))),
        }
    }
}
