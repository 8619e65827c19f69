//! Domain layer for the session context.

pub mod record;
pub mod screen;
