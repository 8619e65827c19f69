//! Prediction status endpoint.

use axum::extract::{Query, State};
use axum::{Json, Router, routing::get};
use booth_core::wire::{JobStatus, ResultPayload, StatusResponse};
use serde::Deserialize;
use tracing::{info, instrument, warn};

use crate::error::ApiError;
use crate::provider::Prediction;
use crate::state::AppState;

/// Query string of GET /api/status.
#[derive(Debug, Deserialize)]
pub struct StatusQuery {
    /// Prediction id returned by `/api/generate`.
    #[serde(default)]
    pub id: Option<String>,
}

fn is_valid_prediction_id(id: &str) -> bool {
    id.chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Maps a provider prediction to the kiosk's status answer, normalizing the
/// model output of a succeeded prediction to one reference string.
fn to_status_response(prediction: Prediction) -> StatusResponse {
    match JobStatus::from_label(&prediction.status) {
        JobStatus::Succeeded => {
            let reference = prediction
                .output
                .and_then(ResultPayload::from_value)
                .and_then(ResultPayload::into_reference);
            if reference.is_none() {
                warn!(prediction_id = %prediction.id, "succeeded prediction has no usable output");
            }
            StatusResponse {
                success: true,
                status: Some(JobStatus::Succeeded.label().to_owned()),
                image_url: reference.map(ResultPayload::Reference),
                error: None,
            }
        }
        status @ (JobStatus::Failed | JobStatus::Canceled) => {
            let error = prediction
                .error_message()
                .unwrap_or_else(|| "Prediction failed".to_owned());
            warn!(prediction_id = %prediction.id, %error, "prediction ended unsuccessfully");
            StatusResponse::finished_unsuccessfully(status, error)
        }
        JobStatus::Pending | JobStatus::Running => StatusResponse::in_progress(prediction.status),
    }
}

/// GET /api/status?id=...
#[instrument(skip_all, fields(prediction_id = query.id.as_deref().unwrap_or_default()))]
async fn status(
    State(state): State<AppState>,
    Query(query): Query<StatusQuery>,
) -> Result<Json<StatusResponse>, ApiError> {
    let id = query
        .id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ApiError::BadRequest("Missing prediction ID".into()))?;
    if !is_valid_prediction_id(id) {
        return Err(ApiError::BadRequest("Invalid prediction ID".into()));
    }

    let prediction = state.provider.get_prediction(id).await?;
    info!(status = %prediction.status, "prediction status checked");
    Ok(Json(to_status_response(prediction)))
}

/// Returns the router for the status endpoint.
pub fn router() -> Router<AppState> {
    Router::new().route("/status", get(status))
}
