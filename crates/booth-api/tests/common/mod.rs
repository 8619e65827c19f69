//! Shared test helpers for API integration tests.
#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use booth_api::provider::{Prediction, PredictionInput, PredictionProvider, ProviderError};
use booth_api::state::AppState;

/// Provider whose predictions walk through a fixed list of states, one per
/// status read; the last state repeats.
pub struct SequenceProvider {
    states: Vec<Value>,
    reads: Mutex<usize>,
    created: Mutex<Vec<PredictionInput>>,
}

impl SequenceProvider {
    pub fn new(states: Vec<Value>) -> Arc<Self> {
        Arc::new(Self {
            states,
            reads: Mutex::new(0),
            created: Mutex::new(Vec::new()),
        })
    }

    pub fn created(&self) -> Vec<PredictionInput> {
        self.created.lock().unwrap().clone()
    }

    pub fn reads(&self) -> usize {
        *self.reads.lock().unwrap()
    }
}

#[async_trait]
impl PredictionProvider for SequenceProvider {
    async fn create_prediction(&self, input: &PredictionInput) -> Result<Prediction, ProviderError> {
        self.created.lock().unwrap().push(input.clone());
        let id = format!("pred-{}", self.created.lock().unwrap().len());
        Ok(serde_json::from_value(serde_json::json!({ "id": id, "status": "starting" })).unwrap())
    }

    async fn get_prediction(&self, id: &str) -> Result<Prediction, ProviderError> {
        let mut reads = self.reads.lock().unwrap();
        let index = (*reads).min(self.states.len() - 1);
        *reads += 1;
        let mut state = self.states[index].clone();
        state["id"] = Value::String(id.to_owned());
        serde_json::from_value(state).map_err(|e| ProviderError::Decode(e.to_string()))
    }
}

/// Provider that cannot be reached.
pub struct DownProvider;

#[async_trait]
impl PredictionProvider for DownProvider {
    async fn create_prediction(&self, _input: &PredictionInput) -> Result<Prediction, ProviderError> {
        Err(ProviderError::Transport("connection refused".into()))
    }

    async fn get_prediction(&self, _id: &str) -> Result<Prediction, ProviderError> {
        Err(ProviderError::Transport("connection refused".into()))
    }
}

/// Build the full app router around `provider`. Uses the same middleware
/// stack as `main.rs`.
pub fn build_test_app(provider: Arc<dyn PredictionProvider>) -> Router {
    booth_api::app(AppState::new(provider))
}

/// Send a POST request with a JSON body and return the response.
pub async fn post_json(app: Router, uri: &str, body: &Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap();

    send(app, request).await
}

/// Send a GET request and return the response.
pub async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    send(app, request).await
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

    (status, json)
}
