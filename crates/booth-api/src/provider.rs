//! Hosted prediction provider port and its Replicate adapter.

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, instrument};

use crate::error::AppError;

/// Default Replicate API base.
pub const DEFAULT_API_BASE: &str = "https://api.replicate.com/v1";

/// Model the booth generates with.
pub const DEFAULT_MODEL: &str = "google/nano-banana-pro";

/// Aspect ratio of every generated image.
pub const ASPECT_RATIO: &str = "3:4";

/// Encoding of every generated image.
pub const OUTPUT_FORMAT: &str = "png";

/// Failure talking to the provider.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// The provider could not be reached.
    #[error("prediction provider unreachable: {0}")]
    Transport(String),

    /// The provider answered with an error status.
    #[error("prediction provider returned {status}: {detail}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Provider error detail.
        detail: String,
    },

    /// The provider answered with an unexpected payload.
    #[error("unexpected prediction payload: {0}")]
    Decode(String),
}

/// Model input of one prediction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PredictionInput {
    /// Resolved prompt.
    pub prompt: String,
    /// Output aspect ratio.
    pub aspect_ratio: &'static str,
    /// Output encoding.
    pub output_format: &'static str,
    /// Reference images; the captured still when one was sent.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub image_input: Vec<String>,
}

impl PredictionInput {
    /// Input for `prompt`, optionally anchored on a reference image.
    #[must_use]
    pub fn new(prompt: String, image: Option<String>) -> Self {
        Self {
            prompt,
            aspect_ratio: ASPECT_RATIO,
            output_format: OUTPUT_FORMAT,
            image_input: image.into_iter().collect(),
        }
    }
}

/// A prediction as reported by the provider.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Prediction {
    /// Provider-assigned identifier.
    pub id: String,
    /// Provider status label.
    pub status: String,
    /// Model output once succeeded.
    #[serde(default)]
    pub output: Option<Value>,
    /// Failure detail once failed.
    #[serde(default)]
    pub error: Option<Value>,
}

impl Prediction {
    /// The failure detail as text, if the provider supplied one.
    #[must_use]
    pub fn error_message(&self) -> Option<String> {
        match &self.error {
            Some(Value::String(message)) => {
                let message = message.trim();
                (!message.is_empty()).then(|| message.to_owned())
            }
            Some(Value::Null) | None => None,
            Some(other) => Some(other.to_string()),
        }
    }
}

/// Port for the hosted prediction API.
#[async_trait]
pub trait PredictionProvider: Send + Sync {
    /// Starts a prediction and returns without waiting for it.
    async fn create_prediction(&self, input: &PredictionInput) -> Result<Prediction, ProviderError>;

    /// Reads the current state of a prediction.
    async fn get_prediction(&self, id: &str) -> Result<Prediction, ProviderError>;
}

/// Connection settings for Replicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplicateConfig {
    /// API base without a trailing slash.
    pub api_base: String,
    /// Bearer token.
    pub token: String,
    /// `owner/name` of the model.
    pub model: String,
}

impl ReplicateConfig {
    /// Reads `REPLICATE_API_TOKEN`, `REPLICATE_API_BASE` and
    /// `REPLICATE_MODEL` from the environment.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if the token is missing or the model is not
    /// of the form `owner/name`.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the settings through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if the token is missing or the model is not
    /// of the form `owner/name`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_owned())
                .filter(|value| !value.is_empty())
        };

        let token = non_empty("REPLICATE_API_TOKEN").ok_or_else(|| {
            AppError::Config("REPLICATE_API_TOKEN environment variable must be set".into())
        })?;
        let api_base = non_empty("REPLICATE_API_BASE")
            .map_or_else(|| DEFAULT_API_BASE.to_owned(), |base| {
                base.trim_end_matches('/').to_owned()
            });
        let model = non_empty("REPLICATE_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_owned());
        if model.split('/').filter(|part| !part.is_empty()).count() != 2 {
            return Err(AppError::Config(format!(
                "REPLICATE_MODEL must be owner/name, got {model:?}"
            )));
        }

        Ok(Self {
            api_base,
            token,
            model,
        })
    }
}

/// `PredictionProvider` backed by the Replicate HTTP API.
#[derive(Debug, Clone)]
pub struct ReplicateProvider {
    http: Client,
    config: ReplicateConfig,
}

impl ReplicateProvider {
    /// Creates a provider with a fresh HTTP client.
    #[must_use]
    pub fn new(config: ReplicateConfig) -> Self {
        Self {
            http: Client::new(),
            config,
        }
    }

    fn create_endpoint(&self) -> String {
        format!(
            "{}/models/{}/predictions",
            self.config.api_base, self.config.model
        )
    }

    fn prediction_endpoint(&self, id: &str) -> String {
        format!("{}/predictions/{id}", self.config.api_base)
    }
}

async fn read_prediction(response: Response) -> Result<Prediction, ProviderError> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| ProviderError::Transport(e.to_string()))?;
    if !status.is_success() {
        return Err(ProviderError::Api {
            status: status.as_u16(),
            detail: error_detail(&body),
        });
    }
    serde_json::from_str(&body).map_err(|e| ProviderError::Decode(e.to_string()))
}

/// Replicate reports errors as `{"detail": ...}`; anything else is passed on
/// verbatim, shortened.
fn error_detail(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|value| value.get("detail")?.as_str().map(str::to_owned))
        .unwrap_or_else(|| body.chars().take(200).collect())
}

#[async_trait]
impl PredictionProvider for ReplicateProvider {
    #[instrument(skip(self, input), fields(model = %self.config.model))]
    async fn create_prediction(&self, input: &PredictionInput) -> Result<Prediction, ProviderError> {
        let response = self
            .http
            .post(self.create_endpoint())
            .bearer_auth(&self.config.token)
            .json(&serde_json::json!({ "input": input }))
            .send()
            .await
            .map_err(|e| ProviderError::Transport(e.to_string()))?;
        let prediction = read_prediction(response).await?;
        debug!(prediction_id = %prediction.id, status = %prediction.status, "prediction created");
        Ok(prediction)
    }

    #[instrument(skip(self))]
    async fn get_prediction(&self, id: &str) -> Result<Prediction, ProviderError> {
        let response = self
            .http
            .get(self.prediction_endpoint(id))
            .bearer_auth(&self.config.token)
            .send()
            .await
            .map_err(|e| ProviderError::Transport(e.to_string()))?;
        read_prediction(response).await
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use serde_json::json;

    use super::*;

    fn config_from(pairs: &[(&str, &str)]) -> Result<ReplicateConfig, AppError> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        ReplicateConfig::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn test_config_defaults_base_and_model() {
        let config = config_from(&[("REPLICATE_API_TOKEN", "r8_secret")]).unwrap();

        assert_eq!(config.api_base, DEFAULT_API_BASE);
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.token, "r8_secret");
    }

    #[test]
    fn test_config_requires_token() {
        let result = config_from(&[("REPLICATE_API_TOKEN", "  ")]);

        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn test_config_rejects_model_without_owner() {
        let result = config_from(&[
            ("REPLICATE_API_TOKEN", "r8_secret"),
            ("REPLICATE_MODEL", "nano-banana-pro"),
        ]);

        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn test_endpoints_use_configured_base_and_model() {
        let config = config_from(&[
            ("REPLICATE_API_TOKEN", "r8_secret"),
            ("REPLICATE_API_BASE", "http://replicate.local/v1/"),
        ])
        .unwrap();
        let provider = ReplicateProvider::new(config);

        assert_eq!(
            provider.create_endpoint(),
            "http://replicate.local/v1/models/google/nano-banana-pro/predictions"
        );
        assert_eq!(
            provider.prediction_endpoint("abc123"),
            "http://replicate.local/v1/predictions/abc123"
        );
    }

    #[test]
    fn test_input_serializes_reference_image_only_when_present() {
        let with_image = PredictionInput::new("a prompt".into(), Some("data:image/png;base64,AA".into()));
        let without_image = PredictionInput::new("a prompt".into(), None);

        assert_eq!(
            serde_json::to_value(&with_image).unwrap(),
            json!({
                "prompt": "a prompt",
                "aspect_ratio": "3:4",
                "output_format": "png",
                "image_input": ["data:image/png;base64,AA"]
            })
        );
        assert!(serde_json::to_value(&without_image).unwrap().get("image_input").is_none());
    }

    #[test]
    fn test_error_message_handles_string_null_and_object() {
        let mut prediction: Prediction =
            serde_json::from_value(json!({ "id": "p", "status": "failed", "error": "NSFW" })).unwrap();
        assert_eq!(prediction.error_message().as_deref(), Some("NSFW"));

        prediction.error = Some(Value::Null);
        assert_eq!(prediction.error_message(), None);

        prediction.error = Some(json!({ "code": 7 }));
        assert_eq!(prediction.error_message().as_deref(), Some(r#"{"code":7}"#));
    }

    #[test]
    fn test_error_detail_prefers_detail_field() {
        assert_eq!(error_detail(r#"{"detail":"Invalid token."}"#), "Invalid token.");
        assert_eq!(error_detail("Bad Gateway"), "Bad Gateway");
    }
}
