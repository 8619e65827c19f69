//! Dual-job coordinator.
//!
//! Runs the portrait and field generations for one captured still
//! concurrently and folds their outcomes into a single `ResultPair`. Any
//! failure in either pipeline voids the whole pair: the kiosk shows the
//! placeholder pair rather than a half-real one, and the failure goes to the
//! diagnostics sink instead of the screen.

use std::sync::Arc;
use std::time::Duration;

use booth_core::config::Tunables;
use booth_core::diagnostics::{DiagnosticsSink, PairSlot};
use booth_core::error::GenerationError;
use tokio::time::{Instant, timeout_at};
use tracing::{info, instrument, warn};

use crate::application::client::GenerationClient;
use crate::domain::category::Category;
use crate::domain::pair::ResultPair;
use crate::domain::prompt::StyleAttribute;

/// Produces one `ResultPair` per captured still.
#[derive(Clone)]
pub struct PairCoordinator {
    client: GenerationClient,
    diagnostics: Arc<dyn DiagnosticsSink>,
    budget: Duration,
    fallback_reference: String,
}

impl std::fmt::Debug for PairCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PairCoordinator")
            .field("client", &self.client)
            .field("budget", &self.budget)
            .field("fallback_reference", &self.fallback_reference)
            .finish_non_exhaustive()
    }
}

impl PairCoordinator {
    /// Creates a coordinator using the configured budget and fallback.
    #[must_use]
    pub fn new(
        client: GenerationClient,
        diagnostics: Arc<dyn DiagnosticsSink>,
        tunables: &Tunables,
    ) -> Self {
        Self {
            client,
            diagnostics,
            budget: tunables.generation_budget,
            fallback_reference: tunables.fallback_reference.clone(),
        }
    }

    /// The pair returned when any pipeline fails.
    #[must_use]
    pub fn fallback_pair(&self) -> ResultPair {
        ResultPair::fallback(&self.fallback_reference)
    }

    /// Generates the portrait and field images for `image` concurrently.
    ///
    /// Always resolves within one budget, with either both real references
    /// or the fallback pair. The budget covers submission as well as polling.
    #[instrument(skip(self, image, category), fields(category = %category.id, %attribute))]
    pub async fn generate_pair(
        &self,
        image: &str,
        category: &Category,
        attribute: StyleAttribute,
    ) -> ResultPair {
        let portrait_prompt = category.prompts.portrait.resolve(attribute);
        let field_prompt = category.prompts.field.resolve(attribute);

        let (portrait, field) = tokio::join!(
            self.run_pipeline(image, &portrait_prompt),
            self.run_pipeline(image, &field_prompt),
        );

        match (portrait, field) {
            (Ok(primary), Ok(secondary)) => {
                info!("both generations succeeded");
                ResultPair::generated(primary, secondary)
            }
            (portrait, field) => {
                for (slot, outcome) in [(PairSlot::Primary, portrait), (PairSlot::Secondary, field)]
                {
                    if let Err(err) = outcome {
                        self.diagnostics.record_failure(slot, &err);
                    }
                }
                warn!("generation failed; using fallback pair");
                self.fallback_pair()
            }
        }
    }

    async fn run_pipeline(&self, image: &str, prompt: &str) -> Result<String, GenerationError> {
        let budget = self.budget;
        let deadline = Instant::now() + budget;
        let pipeline = async {
            let job_id = self.client.submit(image, prompt).await?;
            let remaining = deadline.saturating_duration_since(Instant::now());
            self.client.await_result(&job_id, remaining).await
        };

        match timeout_at(deadline, pipeline).await {
            Ok(Err(GenerationError::Timeout { .. })) | Err(_) => {
                Err(GenerationError::Timeout { budget })
            }
            Ok(outcome) => outcome,
        }
    }
}
