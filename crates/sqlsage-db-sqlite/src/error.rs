//! Error type for `sqlsage-db-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// The metadata catalog could not be read; training status is unknown
  /// and callers degrade to "needs training".
  #[error("schema unavailable: {0}")]
  SchemaUnavailable(String),

  /// A user query failed (syntax error, missing table, connection lost).
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
