//! Application services for the generation context.

pub mod client;
pub mod coordinator;
