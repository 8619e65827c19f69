//! Error types shared across the booth crates.

use std::time::Duration;

use thiserror::Error;

/// Failure talking to the intermediary generation endpoints.
#[derive(Debug, Error)]
pub enum BackendError {
    /// The request never produced a response (connection refused, DNS,
    /// request timeout).
    #[error("transport error: {0}")]
    Transport(String),

    /// A response arrived but its body could not be decoded.
    #[error("protocol error (HTTP {status}): {message}")]
    Protocol {
        /// HTTP status code of the undecodable response.
        status: u16,
        /// Decoder message.
        message: String,
    },
}

/// Terminal failure of one generation pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    /// The service rejected the submission or could not be reached.
    #[error("submission error: {0}")]
    Submission(String),

    /// The job reached `failed` or `canceled`.
    #[error("generation failed: {0}")]
    Failed(String),

    /// No terminal status was observed within the budget.
    #[error("generation timed out after {budget:?}")]
    Timeout {
        /// The budget that was exhausted.
        budget: Duration,
    },
}

impl GenerationError {
    /// Short machine-readable label for logs and diagnostics.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Submission(_) => "submission_error",
            Self::Failed(_) => "generation_failed",
            Self::Timeout { .. } => "generation_timeout",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_labels_are_distinct() {
        let kinds = [
            GenerationError::Submission("rate limited".into()).kind(),
            GenerationError::Failed("nsfw".into()).kind(),
            GenerationError::Timeout {
                budget: Duration::from_secs(180),
            }
            .kind(),
        ];

        assert_eq!(
            kinds,
            ["submission_error", "generation_failed", "generation_timeout"]
        );
    }

    #[test]
    fn test_timeout_message_names_budget() {
        let err = GenerationError::Timeout {
            budget: Duration::from_secs(180),
        };

        assert_eq!(err.to_string(), "generation timed out after 180s");
    }
}
