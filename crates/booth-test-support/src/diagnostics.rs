//! Recording diagnostics sink.

use std::sync::Mutex;

use booth_core::diagnostics::{DiagnosticsSink, PairSlot};
use booth_core::error::GenerationError;

/// Keeps every reported failure for later assertions.
#[derive(Debug, Default)]
pub struct RecordingDiagnostics {
    failures: Mutex<Vec<(PairSlot, GenerationError)>>,
}

impl RecordingDiagnostics {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the recorded failures, in report order.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn failures(&self) -> Vec<(PairSlot, GenerationError)> {
        self.failures.lock().unwrap().clone()
    }
}

impl DiagnosticsSink for RecordingDiagnostics {
    fn record_failure(&self, slot: PairSlot, error: &GenerationError) {
        self.failures.lock().unwrap().push((slot, error.clone()));
    }
}
