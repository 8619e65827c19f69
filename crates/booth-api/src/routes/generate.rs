//! Submission endpoint.

use axum::extract::State;
use axum::{Json, Router, routing::post};
use booth_core::wire::SubmitResponse;
use serde::Deserialize;
use tracing::{info, instrument};

use crate::error::ApiError;
use crate::prompt::legacy_portrait_prompt;
use crate::provider::PredictionInput;
use crate::state::AppState;

/// Request body for POST /api/generate.
///
/// Either `prompt` is sent, or the legacy profile fields from which the
/// portrait prompt is built.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    /// Encoded still, usually a `data:` URL.
    #[serde(default)]
    pub image: Option<String>,
    /// Fully resolved prompt.
    #[serde(default)]
    pub prompt: Option<String>,
    /// Legacy: `male` or `female`.
    #[serde(default)]
    pub sex: Option<String>,
    /// Legacy: category title.
    #[serde(default)]
    pub mos_title: Option<String>,
    /// Legacy: category prompt modifier.
    #[serde(default)]
    pub prompt_modifier: Option<String>,
}

impl GenerateRequest {
    fn resolve_prompt(&self) -> Result<String, ApiError> {
        if let Some(prompt) = non_blank(self.prompt.as_deref()) {
            return Ok(prompt.to_owned());
        }
        let title = non_blank(self.mos_title.as_deref()).ok_or_else(|| {
            ApiError::BadRequest("Missing prompt: send prompt or mosTitle".into())
        })?;
        Ok(legacy_portrait_prompt(
            self.sex.as_deref(),
            title,
            self.prompt_modifier.as_deref(),
        ))
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|value| !value.trim().is_empty())
}

/// POST /api/generate
///
/// Starts a prediction and answers immediately with its id; the kiosk polls
/// `/api/status` for the outcome.
#[instrument(skip_all, fields(image_len = request.image.as_ref().map_or(0, String::len)))]
async fn generate(
    State(state): State<AppState>,
    Json(request): Json<GenerateRequest>,
) -> Result<Json<SubmitResponse>, ApiError> {
    let prompt = request.resolve_prompt()?;
    let image = request.image.filter(|image| !image.trim().is_empty());
    info!(
        with_image = image.is_some(),
        prompt_len = prompt.len(),
        "creating prediction"
    );

    let prediction = state
        .provider
        .create_prediction(&PredictionInput::new(prompt, image))
        .await?;

    info!(prediction_id = %prediction.id, status = %prediction.status, "prediction created");
    Ok(Json(SubmitResponse::accepted(
        prediction.id,
        prediction.status,
    )))
}

/// Returns the router for the submission endpoint.
pub fn router() -> Router<AppState> {
    Router::new().route("/generate", post(generate))
}
