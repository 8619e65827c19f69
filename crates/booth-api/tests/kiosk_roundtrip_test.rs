//! The kiosk's HTTP backend and generation client against a live server.

mod common;

use std::sync::Arc;
use std::time::Duration;

use booth_core::backend::GenerationBackend;
use booth_core::error::GenerationError;
use booth_generation::application::client::GenerationClient;
use booth_api::provider::PredictionProvider;
use booth_remote::HttpGenerationBackend;
use serde_json::json;

async fn serve(provider: Arc<dyn PredictionProvider>) -> String {
    let app = common::build_test_app(provider);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn client(base: String) -> GenerationClient {
    let backend: Arc<dyn GenerationBackend> = Arc::new(HttpGenerationBackend::new(base));
    GenerationClient::new(backend, Duration::from_millis(10))
}

#[tokio::test]
async fn test_client_extracts_reference_through_the_server() {
    // Arrange
    let provider = common::SequenceProvider::new(vec![
        json!({ "status": "starting" }),
        json!({ "status": "processing" }),
        json!({ "status": "succeeded", "output": { "url": "https://replicate.delivery/b.png" } }),
    ]);
    let client = client(serve(provider.clone()).await);

    // Act
    let job_id = client
        .submit("data:image/png;base64,AA", "a portrait of a man")
        .await
        .unwrap();
    let reference = client
        .await_result(&job_id, Duration::from_secs(5))
        .await
        .unwrap();

    // Assert
    assert_eq!(job_id, "pred-1");
    assert_eq!(reference, "https://replicate.delivery/b.png");
    assert_eq!(provider.reads(), 3);
}

#[tokio::test]
async fn test_client_reports_failed_prediction() {
    let provider = common::SequenceProvider::new(vec![json!({
        "status": "failed",
        "error": "Prediction interrupted; please retry (code: PA)"
    })]);
    let client = client(serve(provider).await);

    let job_id = client.submit("data:image/png;base64,AA", "p").await.unwrap();
    let result = client.await_result(&job_id, Duration::from_secs(5)).await;

    assert_eq!(
        result,
        Err(GenerationError::Failed(
            "Prediction interrupted; please retry (code: PA)".to_owned()
        ))
    );
}

#[tokio::test]
async fn test_provider_outage_surfaces_as_submission_error() {
    let client = client(serve(Arc::new(common::DownProvider)).await);

    let result = client.submit("data:image/png;base64,AA", "a portrait").await;

    assert_eq!(
        result,
        Err(GenerationError::Submission(
            "prediction provider unreachable: connection refused".to_owned()
        ))
    );
}
