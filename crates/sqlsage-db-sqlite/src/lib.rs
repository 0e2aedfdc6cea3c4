//! SQLite backend for sqlsage.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated
//! thread without blocking the async runtime. Provides the two operations
//! the assistant needs: schema introspection (producing a
//! [`sqlsage_core::snapshot::SchemaSnapshot`]) and ad-hoc execution of the
//! generated SQL.

mod db;
mod output;

pub mod error;

pub use db::Database;
pub use error::{Error, Result};
pub use output::QueryOutput;
