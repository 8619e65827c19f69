//! Remote generation service client.
//!
//! Hides the submit/poll protocol of the job-based generation API behind two
//! calls: `submit` returns a job identifier immediately, `await_result` polls
//! that job until it reaches a terminal status or the budget runs out.

use std::sync::Arc;
use std::time::Duration;

use booth_core::backend::GenerationBackend;
use booth_core::config::Tunables;
use booth_core::error::GenerationError;
use booth_core::wire::SubmitRequest;
use tokio::time::{Instant, sleep_until, timeout_at};
use tracing::{debug, info, instrument, warn};

use crate::domain::job::GenerationJob;

/// Client for one remote generation service.
#[derive(Clone)]
pub struct GenerationClient {
    backend: Arc<dyn GenerationBackend>,
    poll_interval: Duration,
}

impl std::fmt::Debug for GenerationClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerationClient")
            .field("poll_interval", &self.poll_interval)
            .finish_non_exhaustive()
    }
}

impl GenerationClient {
    /// Creates a client polling at `poll_interval`.
    #[must_use]
    pub fn new(backend: Arc<dyn GenerationBackend>, poll_interval: Duration) -> Self {
        Self {
            backend,
            poll_interval,
        }
    }

    /// Creates a client using the configured poll interval.
    #[must_use]
    pub fn from_tunables(backend: Arc<dyn GenerationBackend>, tunables: &Tunables) -> Self {
        Self::new(backend, tunables.poll_interval)
    }

    /// Submits one image + prompt pair and returns the job identifier without
    /// waiting for generation.
    ///
    /// # Errors
    ///
    /// Returns `GenerationError::Submission` if the inputs are empty, the
    /// service is unreachable, the service rejects the request, or it accepts
    /// it without assigning an identifier.
    #[instrument(skip(self, image, prompt), fields(image_len = image.len(), prompt_len = prompt.len()))]
    pub async fn submit(&self, image: &str, prompt: &str) -> Result<String, GenerationError> {
        if image.trim().is_empty() {
            return Err(GenerationError::Submission("image must not be empty".into()));
        }
        if prompt.trim().is_empty() {
            return Err(GenerationError::Submission("prompt must not be empty".into()));
        }

        let request = SubmitRequest {
            image: image.to_owned(),
            prompt: prompt.to_owned(),
        };
        let response = self
            .backend
            .create_job(&request)
            .await
            .map_err(|e| GenerationError::Submission(e.to_string()))?;

        if !response.success {
            return Err(GenerationError::Submission(
                response
                    .error
                    .unwrap_or_else(|| "submission rejected".to_owned()),
            ));
        }

        let job_id = response
            .job_id
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| {
                GenerationError::Submission("service accepted the job without an id".into())
            })?;

        info!(job_id = %job_id, status = ?response.status, "generation job submitted");
        Ok(job_id)
    }

    /// Polls `job_id` until it reaches a terminal status or `budget` elapses.
    ///
    /// Polls run one at a time; the next poll starts `poll_interval` after the
    /// previous one completed. A poll that fails in transport is logged and
    /// retried on the next tick. The budget is measured from the call, so a
    /// slow or hung poll cannot extend it.
    ///
    /// # Errors
    ///
    /// Returns `GenerationError::Failed` if the job fails, is canceled, or
    /// succeeds without a usable reference, and `GenerationError::Timeout` if
    /// no terminal status is observed within `budget`.
    #[instrument(skip(self))]
    pub async fn await_result(
        &self,
        job_id: &str,
        budget: Duration,
    ) -> Result<String, GenerationError> {
        let deadline = Instant::now() + budget;
        let mut job = GenerationJob::submitted(job_id);
        let mut polls: u32 = 0;

        loop {
            polls += 1;
            match timeout_at(deadline, self.backend.fetch_status(job.id())).await {
                Err(_) => {
                    warn!(polls, "status poll still pending at budget deadline");
                    return Err(GenerationError::Timeout { budget });
                }
                Ok(Err(err)) => {
                    warn!(polls, error = %err, "status poll failed; retrying");
                }
                Ok(Ok(response)) => match response.job_status() {
                    None => {
                        warn!(
                            polls,
                            error = response.error.as_deref().unwrap_or("unknown"),
                            "status endpoint reported an error; retrying"
                        );
                    }
                    Some(status) => {
                        job.observe(status, response);
                        if let Some(outcome) = job.outcome() {
                            info!(polls, status = job.status().label(), "generation job finished");
                            return outcome;
                        }
                        debug!(polls, status = status.label(), "generation job in progress");
                    }
                },
            }

            let now = Instant::now();
            if now >= deadline {
                warn!(polls, "generation budget exhausted");
                return Err(GenerationError::Timeout { budget });
            }
            sleep_until((now + self.poll_interval).min(deadline)).await;
        }
    }
}
