//! Shared test doubles for the portrait booth kiosk.

mod backend;
mod clock;
mod diagnostics;

pub use backend::{FailingBackend, JobScript, ScriptedBackend};
pub use clock::FixedClock;
pub use diagnostics::RecordingDiagnostics;
