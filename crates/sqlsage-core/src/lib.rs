//! Core types and trait definitions for the sqlsage query assistant.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! All other crates depend on it; it depends on nothing proprietary.
//! The two seams — [`state::StateStore`] and [`generator::SqlGenerator`] —
//! are implemented by `sqlsage-state-file` and `sqlsage-client`, and by
//! in-memory doubles in tests.

pub mod error;
pub mod examples;
pub mod fingerprint;
pub mod generator;
pub mod record;
pub mod snapshot;
pub mod state;
pub mod trainer;

pub use error::{Error, Result};
