//! Test backends — scripted `GenerationBackend` implementations.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use booth_core::backend::GenerationBackend;
use booth_core::error::BackendError;
use booth_core::wire::{
    JobStatus, ResultPayload, StatusResponse, SubmitRequest, SubmitResponse,
};

/// Scripted behavior of one job, selected by a prompt fragment.
#[derive(Debug, Clone)]
pub struct JobScript {
    submit: Result<SubmitResponse, String>,
    statuses: Vec<Result<StatusResponse, String>>,
    poll_latency: Duration,
    submit_hangs: bool,
}

impl JobScript {
    /// Reports `running` for `polls` polls, then succeeds with `payload`.
    #[must_use]
    pub fn succeeding_after(polls: usize, payload: ResultPayload) -> Self {
        let mut statuses = vec![Ok(StatusResponse::in_progress("processing")); polls];
        statuses.push(Ok(StatusResponse::succeeded(payload)));
        Self::with_statuses(statuses)
    }

    /// Never leaves `running`.
    #[must_use]
    pub fn running_forever() -> Self {
        Self::with_statuses(vec![Ok(StatusResponse::in_progress("processing"))])
    }

    /// Reports `running` once, then ends in `status` with `error`.
    #[must_use]
    pub fn ending_in(status: JobStatus, error: &str) -> Self {
        Self::with_statuses(vec![
            Ok(StatusResponse::in_progress("starting")),
            Ok(StatusResponse::finished_unsuccessfully(status, error)),
        ])
    }

    /// The submission itself is answered with `{success: false, error}`.
    #[must_use]
    pub fn rejected(error: &str) -> Self {
        Self {
            submit: Ok(SubmitResponse::rejected(error)),
            statuses: Vec::new(),
            poll_latency: Duration::ZERO,
            submit_hangs: false,
        }
    }

    /// The submission never reaches the service.
    #[must_use]
    pub fn unreachable() -> Self {
        Self {
            submit: Err("connection refused".to_owned()),
            statuses: Vec::new(),
            poll_latency: Duration::ZERO,
            submit_hangs: false,
        }
    }

    /// The service accepts the connection but never answers the submission.
    #[must_use]
    pub fn never_answering() -> Self {
        Self {
            submit_hangs: true,
            ..Self::running_forever()
        }
    }

    /// Accepted submission followed by the given poll answers. `Err` entries
    /// are transport failures. The last entry repeats once exhausted.
    #[must_use]
    pub fn with_statuses(statuses: Vec<Result<StatusResponse, String>>) -> Self {
        Self {
            submit: Ok(SubmitResponse::accepted(String::new(), "starting")),
            statuses,
            poll_latency: Duration::ZERO,
            submit_hangs: false,
        }
    }

    /// Replaces the submission answer.
    #[must_use]
    pub fn with_submit_response(mut self, response: SubmitResponse) -> Self {
        self.submit = Ok(response);
        self
    }

    /// Makes every poll take `latency` before answering.
    #[must_use]
    pub fn with_poll_latency(mut self, latency: Duration) -> Self {
        self.poll_latency = latency;
        self
    }
}

#[derive(Debug)]
struct JobState {
    script: JobScript,
    polls: usize,
    terminal_seen: bool,
}

#[derive(Debug, Default)]
struct Inner {
    scripts: Vec<(String, JobScript)>,
    jobs: HashMap<String, JobState>,
    submitted: Vec<SubmitRequest>,
    polled_after_terminal: bool,
}

/// A backend that answers from per-prompt scripts and records every call.
///
/// Job identifiers are `job-1`, `job-2`, ... in submission order unless the
/// script overrides the submission answer.
#[derive(Debug, Default)]
pub struct ScriptedBackend {
    inner: Mutex<Inner>,
}

impl ScriptedBackend {
    /// Creates a backend with no scripts.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses `script` for every submission whose prompt contains `fragment`.
    /// Earlier registrations win.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn with_job(self, fragment: &str, script: JobScript) -> Self {
        self.inner
            .lock()
            .unwrap()
            .scripts
            .push((fragment.to_owned(), script));
        self
    }

    /// Every submission received, in order.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn submitted(&self) -> Vec<SubmitRequest> {
        self.inner.lock().unwrap().submitted.clone()
    }

    /// Number of status polls received for `job_id`.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn polls_for(&self, job_id: &str) -> usize {
        self.inner
            .lock()
            .unwrap()
            .jobs
            .get(job_id)
            .map_or(0, |job| job.polls)
    }

    /// Whether any job was polled again after reporting a terminal status.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn polled_after_terminal(&self) -> bool {
        self.inner.lock().unwrap().polled_after_terminal
    }
}

#[async_trait]
impl GenerationBackend for ScriptedBackend {
    async fn create_job(&self, request: &SubmitRequest) -> Result<SubmitResponse, BackendError> {
        let script = {
            let mut inner = self.inner.lock().unwrap();
            inner.submitted.push(request.clone());
            inner
                .scripts
                .iter()
                .find(|(fragment, _)| request.prompt.contains(fragment.as_str()))
                .map(|(_, script)| script.clone())
                .ok_or_else(|| {
                    BackendError::Transport(format!("no script for prompt {:?}", request.prompt))
                })?
        };
        if script.submit_hangs {
            std::future::pending::<()>().await;
        }

        let mut inner = self.inner.lock().unwrap();

        let mut response = script.submit.clone().map_err(BackendError::Transport)?;
        if response.success && response.job_id.as_deref() == Some("") {
            response.job_id = Some(format!("job-{}", inner.submitted.len()));
        }
        if let Some(job_id) = response.job_id.clone() {
            inner.jobs.insert(
                job_id,
                JobState {
                    script,
                    polls: 0,
                    terminal_seen: false,
                },
            );
        }
        Ok(response)
    }

    async fn fetch_status(&self, job_id: &str) -> Result<StatusResponse, BackendError> {
        let (answer, latency) = {
            let mut inner = self.inner.lock().unwrap();
            let Some(job) = inner.jobs.get_mut(job_id) else {
                return Err(BackendError::Protocol {
                    status: 404,
                    message: format!("unknown job {job_id}"),
                });
            };
            let after_terminal = job.terminal_seen;
            let index = job.polls.min(job.script.statuses.len().saturating_sub(1));
            job.polls += 1;
            let answer = job.script.statuses.get(index).cloned().unwrap_or_else(|| {
                Ok(StatusResponse::in_progress("processing"))
            });
            if let Ok(status) = &answer {
                if status.job_status().is_some_and(JobStatus::is_terminal) {
                    job.terminal_seen = true;
                }
            }
            let latency = job.script.poll_latency;
            if after_terminal {
                inner.polled_after_terminal = true;
            }
            (answer, latency)
        };

        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }
        answer.map_err(BackendError::Transport)
    }
}

/// A backend whose every call fails at the transport level.
#[derive(Debug, Default)]
pub struct FailingBackend;

#[async_trait]
impl GenerationBackend for FailingBackend {
    async fn create_job(&self, _request: &SubmitRequest) -> Result<SubmitResponse, BackendError> {
        Err(BackendError::Transport("connection refused".into()))
    }

    async fn fetch_status(&self, _job_id: &str) -> Result<StatusResponse, BackendError> {
        Err(BackendError::Transport("connection refused".into()))
    }
}
