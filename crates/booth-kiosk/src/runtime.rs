//! Kiosk runtime: the navigator plus the one processing run it may own.

use booth_core::config::Tunables;
use booth_generation::application::coordinator::PairCoordinator;
use booth_generation::domain::category::Category;
use booth_generation::domain::pair::ResultPair;
use booth_generation::domain::prompt::StyleAttribute;
use booth_processing::application::run::{
    Completion, CompletionTrigger, ProcessingRun, ProgressSnapshot,
};
use booth_session::application::navigator::Navigator;
use booth_session::domain::screen::NavigationError;
use thiserror::Error;
use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{info, instrument, warn};

use crate::capture::preview;

/// Failure driving the kiosk flow.
#[derive(Debug, Error)]
pub enum KioskError {
    /// The navigator rejected the request.
    #[error(transparent)]
    Navigation(#[from] NavigationError),

    /// `finish_processing` was called with no run in flight.
    #[error("no processing run is in flight")]
    NotProcessing,

    /// The processing task panicked or was cancelled.
    #[error("processing run ended abnormally: {0}")]
    ProcessingAborted(String),
}

/// Drives one visitor at a time through the kiosk flow.
///
/// Entering the processing screen spawns the generation pair and the
/// completion gate as one task. Restarting aborts that task, which drops
/// every poll loop and timer it owns; jobs already submitted are left to
/// finish on the remote side.
#[derive(Debug)]
pub struct KioskRuntime {
    navigator: Navigator,
    coordinator: PairCoordinator,
    tunables: Tunables,
    processing: Option<JoinHandle<Completion<ResultPair>>>,
}

impl KioskRuntime {
    /// Creates a runtime on the attract screen.
    #[must_use]
    pub fn new(navigator: Navigator, coordinator: PairCoordinator, tunables: Tunables) -> Self {
        Self {
            navigator,
            coordinator,
            tunables,
            processing: None,
        }
    }

    /// The navigator, for reading the current screen and session.
    #[must_use]
    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    /// Whether a processing run is in flight.
    #[must_use]
    pub fn is_processing(&self) -> bool {
        self.processing.is_some()
    }

    /// Attract → biographical entry.
    ///
    /// # Errors
    ///
    /// Returns `KioskError::Navigation` off the attract screen.
    pub fn start(&mut self) -> Result<(), KioskError> {
        Ok(self.navigator.start()?)
    }

    /// Biographical entry → category selection.
    ///
    /// # Errors
    ///
    /// Returns `KioskError::Navigation` if the navigator rejects it.
    pub fn select_attribute(&mut self, attribute: StyleAttribute) -> Result<(), KioskError> {
        Ok(self.navigator.select_attribute(attribute)?)
    }

    /// Category selection → photo capture.
    ///
    /// # Errors
    ///
    /// Returns `KioskError::Navigation` if the navigator rejects it.
    pub fn select_category(&mut self, category: Category) -> Result<(), KioskError> {
        Ok(self.navigator.select_category(category)?)
    }

    /// Photo capture → processing, starting generation.
    ///
    /// `video_end` is fired by the presentation layer when the processing
    /// video finishes. Returns the progress feed for the processing screen.
    ///
    /// # Errors
    ///
    /// Returns `KioskError::Navigation` if the capture is rejected.
    #[instrument(skip_all, fields(image = preview(&image)))]
    pub fn capture_photo(
        &mut self,
        image: String,
        video_end: oneshot::Receiver<()>,
    ) -> Result<watch::Receiver<ProgressSnapshot>, KioskError> {
        self.navigator.capture_photo(image)?;

        let record = self
            .navigator
            .record()
            .ok_or(NavigationError::MissingField("session record"))?;
        let image = record
            .captured_image()
            .ok_or(NavigationError::MissingField("captured image"))?
            .to_owned();
        let category = record
            .category()
            .ok_or(NavigationError::MissingField("category"))?
            .clone();
        let attribute = record
            .attribute()
            .ok_or(NavigationError::MissingField("attribute"))?;

        let (run, progress) = ProcessingRun::new(&self.tunables);
        let coordinator = self.coordinator.clone();
        let generation = async move {
            coordinator
                .generate_pair(&image, &category, attribute)
                .await
        };
        self.processing = Some(tokio::spawn(run.run(generation, video_end)));
        info!(session_id = %record.session_id(), "processing started");
        Ok(progress)
    }

    /// Waits for the completion gate and moves to the reveal screen with
    /// the resulting pair.
    ///
    /// # Errors
    ///
    /// Returns `KioskError::NotProcessing` without a run in flight,
    /// `KioskError::ProcessingAborted` if the run task failed, and
    /// `KioskError::Navigation` if the navigator rejects the result.
    pub async fn finish_processing(&mut self) -> Result<CompletionTrigger, KioskError> {
        let handle = self.processing.take().ok_or(KioskError::NotProcessing)?;
        let completion = handle
            .await
            .map_err(|e| KioskError::ProcessingAborted(e.to_string()))?;
        if completion.result.is_fallback() {
            warn!("revealing fallback pair");
        }
        self.navigator.complete_processing(completion.result)?;
        Ok(completion.trigger)
    }

    /// Abandons any processing run and returns to attract.
    pub fn restart(&mut self) {
        if let Some(handle) = self.processing.take() {
            handle.abort();
            info!("in-flight processing abandoned");
        }
        self.navigator.restart();
    }
}

impl Drop for KioskRuntime {
    fn drop(&mut self) {
        if let Some(handle) = self.processing.take() {
            handle.abort();
        }
    }
}
