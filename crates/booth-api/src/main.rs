//! Portrait booth intermediary entry point.

use std::error::Error;
use std::net::SocketAddr;
use std::sync::Arc;

use booth_api::provider::{ReplicateConfig, ReplicateProvider};
use booth_api::state::AppState;
use booth_api::{app, telemetry};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let tracer_provider = telemetry::init()?;

    tracing::info!("Starting portrait booth intermediary");

    // Read configuration from environment.
    let replicate = ReplicateConfig::from_env()?;
    let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = std::env::var("PORT")
        .unwrap_or_else(|_| "3002".to_string())
        .parse()
        .map_err(|e| format!("PORT must be a valid u16: {e}"))?;

    tracing::info!(model = %replicate.model, api_base = %replicate.api_base, "prediction provider configured");
    let app_state = AppState::new(Arc::new(ReplicateProvider::new(replicate)));

    let app = app(app_state);

    // Start server.
    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .map_err(|e| format!("invalid HOST:PORT combination: {e}"))?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;

    if let Some(provider) = tracer_provider {
        provider.shutdown()?;
    }

    Ok(())
}
