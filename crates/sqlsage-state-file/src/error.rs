//! Error type for `sqlsage-state-file`.
//!
//! Only write-side failures are ever returned to callers; read-side
//! failures degrade to an absent record per the `StateStore` contract.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("io error: {0}")]
  Io(#[from] std::io::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  /// The temp file could not be renamed over the record file.
  #[error("atomic replace failed: {0}")]
  Persist(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
