//! The `StateStore` trait and an in-memory implementation.
//!
//! A state store owns the persisted [`TrainingRecord`]. The contract every
//! implementation must honor:
//!
//! - `load` maps a missing, unreadable, or corrupt record to `Ok(None)` —
//!   "never trained" — rather than an error;
//! - `commit` replaces any prior record atomically, so a crash mid-write
//!   leaves the prior record intact;
//! - `clear` deletes the record; clearing an absent record succeeds.

use std::future::Future;

use crate::record::TrainingRecord;

/// Abstraction over durable training-state storage.
pub trait StateStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Read the persisted record, or `None` if absent or unreadable.
  fn load(
    &self,
  ) -> impl Future<Output = Result<Option<TrainingRecord>, Self::Error>> + Send + '_;

  /// Atomically replace the persisted record.
  fn commit(
    &self,
    record: TrainingRecord,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Delete the persisted record, forcing the next reconciliation to
  /// retrain.
  fn clear(&self) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}

// ─── In-memory store ─────────────────────────────────────────────────────────

/// A `StateStore` that keeps the record in process memory. No durability —
/// intended for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryStateStore {
  record: std::sync::Mutex<Option<TrainingRecord>>,
}

impl MemoryStateStore {
  pub fn new() -> Self { Self::default() }
}

impl StateStore for MemoryStateStore {
  type Error = std::convert::Infallible;

  async fn load(&self) -> Result<Option<TrainingRecord>, Self::Error> {
    Ok(self.record.lock().expect("state lock poisoned").clone())
  }

  async fn commit(&self, record: TrainingRecord) -> Result<(), Self::Error> {
    *self.record.lock().expect("state lock poisoned") = Some(record);
    Ok(())
  }

  async fn clear(&self) -> Result<(), Self::Error> {
    *self.record.lock().expect("state lock poisoned") = None;
    Ok(())
  }
}
