//! Wire protocol of the intermediary generation endpoints.
//!
//! The kiosk talks to `POST /api/generate` and `GET /api/status`; the
//! intermediary in turn talks to the hosted prediction provider. Both sides
//! share these types.

use serde::{Deserialize, Deserializer, Serialize};

/// Body of `POST /api/generate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitRequest {
    /// Encoded still image, usually a `data:` URL.
    pub image: String,
    /// Fully resolved prompt.
    pub prompt: String,
}

/// Answer to `POST /api/generate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponse {
    /// Whether the provider accepted the job.
    pub success: bool,
    /// Opaque job identifier, present on success.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_id: Option<String>,
    /// Initial status label reported by the provider.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Rejection detail, present on failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SubmitResponse {
    /// A successful submission.
    #[must_use]
    pub fn accepted(job_id: impl Into<String>, status: impl Into<String>) -> Self {
        Self {
            success: true,
            job_id: Some(job_id.into()),
            status: Some(status.into()),
            error: None,
        }
    }

    /// A rejected submission.
    #[must_use]
    pub fn rejected(error: impl Into<String>) -> Self {
        Self {
            success: false,
            job_id: None,
            status: None,
            error: Some(error.into()),
        }
    }
}

/// Answer to `GET /api/status?id=...`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    /// `false` for failed/canceled jobs and for intermediary errors.
    pub success: bool,
    /// Provider status label. Absent when the intermediary itself failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Result payload, present once the job succeeded. A payload of any
    /// unrecognized shape decodes as absent.
    #[serde(
        default,
        deserialize_with = "lenient_payload",
        skip_serializing_if = "Option::is_none"
    )]
    pub image_url: Option<ResultPayload>,
    /// Failure detail.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StatusResponse {
    /// A job that is still queued or running.
    #[must_use]
    pub fn in_progress(status: impl Into<String>) -> Self {
        Self {
            success: true,
            status: Some(status.into()),
            image_url: None,
            error: None,
        }
    }

    /// A job that succeeded with the given payload.
    #[must_use]
    pub fn succeeded(payload: ResultPayload) -> Self {
        Self {
            success: true,
            status: Some(JobStatus::Succeeded.label().to_owned()),
            image_url: Some(payload),
            error: None,
        }
    }

    /// A job that ended in `failed` or `canceled`.
    #[must_use]
    pub fn finished_unsuccessfully(status: JobStatus, error: impl Into<String>) -> Self {
        Self {
            success: false,
            status: Some(status.label().to_owned()),
            image_url: None,
            error: Some(error.into()),
        }
    }

    /// Parsed job status, `None` when the intermediary reported its own error.
    #[must_use]
    pub fn job_status(&self) -> Option<JobStatus> {
        self.status.as_deref().map(JobStatus::from_label)
    }
}

/// Lifecycle of a remote job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobStatus {
    /// Accepted but not started.
    Pending,
    /// Being generated.
    Running,
    /// Finished with a result.
    Succeeded,
    /// Finished with an error.
    Failed,
    /// Stopped before finishing.
    Canceled,
}

impl JobStatus {
    /// Maps a provider label to a status. Unknown labels are in-progress.
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "succeeded" => Self::Succeeded,
            "failed" => Self::Failed,
            "canceled" | "cancelled" => Self::Canceled,
            "starting" | "pending" | "queued" => Self::Pending,
            _ => Self::Running,
        }
    }

    /// Canonical label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Running => "running",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
            Self::Canceled => "canceled",
        }
    }

    /// Whether no further transition can happen.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed | Self::Canceled)
    }
}

/// Object form of a result: exposes the reference through a `url` field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlAccessor {
    /// The result reference.
    pub url: String,
}

/// The result field of a succeeded job, in any of the shapes the provider
/// has used across API versions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResultPayload {
    /// A bare reference string.
    Reference(String),
    /// A collection of results; the first usable entry wins.
    Collection(Vec<ResultPayload>),
    /// An object carrying the reference in `url`.
    Accessor(UrlAccessor),
}

impl ResultPayload {
    /// Normalizes the payload to a single reference string.
    ///
    /// Returns `None` if no non-blank reference can be found.
    #[must_use]
    pub fn into_reference(self) -> Option<String> {
        match self {
            Self::Reference(reference) => non_blank(&reference),
            Self::Collection(items) => items.into_iter().find_map(Self::into_reference),
            Self::Accessor(accessor) => non_blank(&accessor.url),
        }
    }

    /// Decodes an arbitrary provider output value. Values of any other shape
    /// (numbers, objects without `url`, ...) yield `None`.
    #[must_use]
    pub fn from_value(value: serde_json::Value) -> Option<Self> {
        serde_json::from_value(value).ok()
    }
}

fn lenient_payload<'de, D>(deserializer: D) -> Result<Option<ResultPayload>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(ResultPayload::from_value))
}

fn non_blank(reference: &str) -> Option<String> {
    let trimmed = reference.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}
