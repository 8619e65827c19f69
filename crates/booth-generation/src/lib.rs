//! Portrait booth — generation context.
//!
//! Turns a captured still and a chosen category into a pair of generated
//! portraits: prompt resolution, the submit/poll protocol against the remote
//! generation service, and the concurrent two-job pipeline with its
//! fallback policy.

pub mod application;
pub mod domain;
