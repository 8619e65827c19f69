//! Domain types for the generation context.

pub mod category;
pub mod job;
pub mod pair;
pub mod prompt;
