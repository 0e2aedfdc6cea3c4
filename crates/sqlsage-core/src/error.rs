//! Error types for `sqlsage-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// The database's metadata catalog could not be read. Training status is
  /// unknown; callers degrade to "needs training" rather than aborting.
  #[error("schema unavailable: {0}")]
  SchemaUnavailable(String),

  /// The training-state record could not be written. Read-side failures are
  /// never reported here — a store maps them to an absent record instead.
  #[error("training state persistence failed: {0}")]
  Persistence(String),

  /// Every training call in a batch failed, so the model cannot be
  /// considered trained. The prior on-disk record is left untouched.
  #[error("training failed: all {attempted} training calls failed")]
  Training { attempted: usize },

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
