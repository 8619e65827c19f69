//! Application layer for the processing context.

pub mod run;
