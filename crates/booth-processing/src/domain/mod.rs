//! Domain layer for the processing context.

pub mod gate;
pub mod messages;
