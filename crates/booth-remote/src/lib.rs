//! Portrait booth — HTTP generation backend.
//!
//! Implements `GenerationBackend` against the intermediary's
//! `POST /api/generate` and `GET /api/status` endpoints. The intermediary
//! answers failures with a JSON body and a non-2xx status, so bodies are
//! decoded regardless of the status code; only an undecodable body is a
//! protocol error.

use std::time::Duration;

use async_trait::async_trait;
use booth_core::backend::GenerationBackend;
use booth_core::error::BackendError;
use booth_core::wire::{StatusResponse, SubmitRequest, SubmitResponse};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

/// Default location of the intermediary.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:3002";

/// Upper bound on one request, connect included. Encoded stills are large,
/// so uploads get generous headroom.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// `GenerationBackend` speaking JSON over HTTP.
#[derive(Debug, Clone)]
pub struct HttpGenerationBackend {
    client: Client,
    base_url: String,
    request_timeout: Duration,
}

impl HttpGenerationBackend {
    /// Creates a backend for the intermediary at `base_url`.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    /// Creates a backend reusing an existing HTTP client.
    #[must_use]
    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_owned();
        Self {
            client,
            base_url,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Replaces the per-request timeout.
    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// The intermediary base URL, without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, BackendError> {
    let status = response.status().as_u16();
    let body = response
        .bytes()
        .await
        .map_err(|e| BackendError::Transport(e.to_string()))?;
    serde_json::from_slice(&body).map_err(|e| BackendError::Protocol {
        status,
        message: format!("undecodable response body: {e}"),
    })
}

#[async_trait]
impl GenerationBackend for HttpGenerationBackend {
    #[instrument(skip(self, request), fields(base_url = %self.base_url))]
    async fn create_job(&self, request: &SubmitRequest) -> Result<SubmitResponse, BackendError> {
        let response = self
            .client
            .post(self.endpoint("/api/generate"))
            .json(request)
            .timeout(self.request_timeout)
            .send()
            .await
            .map_err(|e| BackendError::Transport(e.to_string()))?;
        debug!(status = response.status().as_u16(), "generate answered");
        decode(response).await
    }

    #[instrument(skip(self), fields(base_url = %self.base_url))]
    async fn fetch_status(&self, job_id: &str) -> Result<StatusResponse, BackendError> {
        let response = self
            .client
            .get(self.endpoint("/api/status"))
            .query(&[("id", job_id)])
            .timeout(self.request_timeout)
            .send()
            .await
            .map_err(|e| BackendError::Transport(e.to_string()))?;
        debug!(status = response.status().as_u16(), "status answered");
        decode(response).await
    }
}
