//! HTTP client for the hosted NL-to-SQL inference service.
//!
//! Implements [`sqlsage_core::generator::SqlGenerator`] over a small JSON
//! API: one endpoint to feed training examples, one to translate a
//! question. The service itself is opaque; nothing here inspects or
//! post-processes the SQL it returns.

mod client;

pub mod error;

pub use client::{GeneratorConfig, HttpGenerator};
pub use error::{Error, Result};
