//! Shared application state.

use std::sync::Arc;

use crate::provider::PredictionProvider;

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Hosted prediction provider.
    pub provider: Arc<dyn PredictionProvider>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState").finish_non_exhaustive()
    }
}

impl AppState {
    /// Create new application state.
    #[must_use]
    pub fn new(provider: Arc<dyn PredictionProvider>) -> Self {
        Self { provider }
    }
}
