//! Portrait booth intermediary — API error types.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

use crate::provider::ProviderError;

/// Startup and runtime errors for the API server.
#[derive(Debug, Error)]
pub enum AppError {
    /// A required environment variable is missing or invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// The span exporter could not be built.
    #[error("telemetry error: {0}")]
    Telemetry(String),

    /// Network binding or I/O error.
    #[error("server error: {0}")]
    Server(#[from] std::io::Error),
}

/// JSON body returned for error responses. Same shape the kiosk reads for
/// rejected submissions and failed status checks.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Always `false`.
    pub success: bool,
    /// Human-readable error message.
    pub error: String,
}

/// Request failure with its HTTP mapping.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request is missing or has malformed fields.
    #[error("{0}")]
    BadRequest(String),

    /// The prediction provider failed or could not be reached.
    #[error(transparent)]
    Provider(#[from] ProviderError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Provider(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        let body = ErrorBody {
            success: false,
            error: self.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: ApiError) -> StatusCode {
        let response = err.into_response();
        response.status()
    }

    #[test]
    fn test_bad_request_maps_to_400() {
        assert_eq!(
            status_of(ApiError::BadRequest("Missing prediction ID".into())),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_provider_transport_maps_to_500() {
        assert_eq!(
            status_of(ApiError::Provider(ProviderError::Transport("dns".into()))),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_provider_api_error_maps_to_500() {
        assert_eq!(
            status_of(ApiError::Provider(ProviderError::Api {
                status: 401,
                detail: "Invalid token".into(),
            })),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
