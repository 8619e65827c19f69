//! Portrait booth — session context.
//!
//! The screen navigator: one current screen out of a fixed set, and the
//! single session record that accumulates the visitor's choices as they
//! move through the flow.

pub mod application;
pub mod domain;
