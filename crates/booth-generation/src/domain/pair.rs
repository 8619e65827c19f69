//! The pair of references shown on the reveal screen.

use booth_core::diagnostics::PairSlot;
use serde::Serialize;

/// Two result references, generated or placeholder. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultPair {
    primary: String,
    secondary: String,
    fallback: bool,
}

impl ResultPair {
    /// A pair of real generation results.
    #[must_use]
    pub fn generated(primary: String, secondary: String) -> Self {
        Self {
            primary,
            secondary,
            fallback: false,
        }
    }

    /// The placeholder pair: the same reference in both slots.
    #[must_use]
    pub fn fallback(reference: &str) -> Self {
        Self {
            primary: reference.to_owned(),
            secondary: reference.to_owned(),
            fallback: true,
        }
    }

    /// The studio portrait reference.
    #[must_use]
    pub fn primary(&self) -> &str {
        &self.primary
    }

    /// The field shot reference.
    #[must_use]
    pub fn secondary(&self) -> &str {
        &self.secondary
    }

    /// The reference shown in `slot`.
    #[must_use]
    pub fn get(&self, slot: PairSlot) -> &str {
        match slot {
            PairSlot::Primary => &self.primary,
            PairSlot::Secondary => &self.secondary,
        }
    }

    /// Whether this pair is the placeholder pair.
    #[must_use]
    pub fn is_fallback(&self) -> bool {
        self.fallback
    }
}
