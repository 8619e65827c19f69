//! Portrait booth — processing context.
//!
//! Joins "generation finished" and "presentation video ended" into the one
//! transition that leaves the processing screen, while showing the visitor a
//! steadily climbing progress bar.

pub mod application;
pub mod domain;
