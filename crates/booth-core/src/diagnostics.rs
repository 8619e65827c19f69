//! Observability collaborator for failures that are masked from the user.

use std::fmt;

use crate::error::GenerationError;

/// The two slots of a result pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PairSlot {
    /// Studio portrait.
    Primary,
    /// In-the-field shot.
    Secondary,
}

impl fmt::Display for PairSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primary => f.write_str("portrait"),
            Self::Secondary => f.write_str("field"),
        }
    }
}

/// Receives generation failures that the kiosk replaces with placeholders.
pub trait DiagnosticsSink: Send + Sync {
    /// Records one failed pipeline.
    fn record_failure(&self, slot: PairSlot, error: &GenerationError);
}

/// Reports failures through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingDiagnostics;

impl DiagnosticsSink for TracingDiagnostics {
    fn record_failure(&self, slot: PairSlot, error: &GenerationError) {
        tracing::error!(
            slot = %slot,
            kind = error.kind(),
            error = %error,
            "generation pipeline failed"
        );
    }
}
