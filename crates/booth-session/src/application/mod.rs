//! Application layer for the session context.

pub mod navigator;
