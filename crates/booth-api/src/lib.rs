//! Portrait booth intermediary.
//!
//! Accepts submissions and status queries from the kiosk and forwards them
//! to the hosted prediction provider, keeping the provider token off the
//! kiosk.

use axum::Router;
use axum::extract::DefaultBodyLimit;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod error;
pub mod prompt;
pub mod provider;
pub mod routes;
pub mod state;
pub mod telemetry;

/// Largest accepted request body. Encoded stills are several megabytes.
pub const BODY_LIMIT_BYTES: usize = 50 * 1024 * 1024;

/// Builds the full application router with its middleware stack.
pub fn app(state: state::AppState) -> Router {
    Router::new()
        .nest("/api", routes::router())
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
        .layer(TraceLayer::new_for_http())
        // TODO: restrict to the kiosk origin once it is served from a fixed host.
        .layer(CorsLayer::permissive())
        .with_state(state)
}
