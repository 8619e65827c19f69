//! Portrait booth — kiosk composition.
//!
//! Wires the navigator, the pair coordinator and the processing screen
//! driver into one runtime that a presentation layer (or the headless
//! driver binary) calls into.

pub mod capture;
pub mod runtime;
