//! Booth Core — shared abstractions.
//!
//! This crate defines the ports, wire types and configuration that every
//! other booth crate depends on. It contains no infrastructure code.

pub mod backend;
pub mod clock;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod wire;
