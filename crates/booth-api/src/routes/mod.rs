//! Route modules, mounted under `/api`.

use axum::Router;

use crate::state::AppState;

pub mod generate;
pub mod health;
pub mod status;

/// Returns the router for every `/api` endpoint.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(generate::router())
        .merge(status::router())
}

#[cfg(test)]
pub(crate) mod testing {
    //! Provider double shared by the route tests.

    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::provider::{Prediction, PredictionInput, PredictionProvider, ProviderError};
    use crate::state::AppState;

    /// Answers every call with a fixed result and records the inputs.
    pub(crate) struct FakeProvider {
        answer: Result<Prediction, ProviderError>,
        pub(crate) created: Mutex<Vec<PredictionInput>>,
        pub(crate) fetched: Mutex<Vec<String>>,
    }

    impl FakeProvider {
        pub(crate) fn answering(answer: Result<Prediction, ProviderError>) -> Arc<Self> {
            Arc::new(Self {
                answer,
                created: Mutex::new(Vec::new()),
                fetched: Mutex::new(Vec::new()),
            })
        }

        pub(crate) fn with_prediction(prediction: Value) -> Arc<Self> {
            Self::answering(Ok(serde_json::from_value(prediction).unwrap()))
        }
    }

    #[async_trait]
    impl PredictionProvider for FakeProvider {
        async fn create_prediction(
            &self,
            input: &PredictionInput,
        ) -> Result<Prediction, ProviderError> {
            self.created.lock().unwrap().push(input.clone());
            self.answer.clone()
        }

        async fn get_prediction(&self, id: &str) -> Result<Prediction, ProviderError> {
            self.fetched.lock().unwrap().push(id.to_owned());
            self.answer.clone()
        }
    }

    pub(crate) fn state_with(provider: Arc<FakeProvider>) -> AppState {
        AppState::new(provider)
    }

    pub(crate) async fn send(
        app: axum::Router,
        request: Request<Body>,
    ) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);
        (status, json)
    }
}
