//! [`FileStateStore`] — the JSON-file implementation of `StateStore`.

use std::{
  io::Write as _,
  path::{Path, PathBuf},
};

use sqlsage_core::{record::TrainingRecord, state::StateStore};
use tokio::sync::Mutex;
use tracing::warn;

use crate::{Error, Result};

/// A training-state store backed by a single JSON file.
///
/// Writers (`commit`, `clear`) are serialized behind a mutex so two sessions
/// sharing one store cannot race to overwrite each other's record. Readers
/// need no lock: rename is atomic, so `load` sees either the old record or
/// the new one, never a partial write.
pub struct FileStateStore {
  path:       PathBuf,
  write_lock: Mutex<()>,
}

impl FileStateStore {
  pub fn new(path: impl Into<PathBuf>) -> Self {
    Self { path: path.into(), write_lock: Mutex::new(()) }
  }

  pub fn path(&self) -> &Path { &self.path }
}

impl StateStore for FileStateStore {
  type Error = Error;

  /// Read the record. A missing, unreadable, or malformed file is treated
  /// as "never trained", not as an error.
  async fn load(&self) -> Result<Option<TrainingRecord>> {
    let bytes = match tokio::fs::read(&self.path).await {
      Ok(bytes) => bytes,
      Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
      Err(e) => {
        warn!(path = %self.path.display(), error = %e, "training record unreadable, treating as absent");
        return Ok(None);
      }
    };

    match serde_json::from_slice(&bytes) {
      Ok(record) => Ok(Some(record)),
      Err(e) => {
        warn!(path = %self.path.display(), error = %e, "training record corrupt, treating as absent");
        Ok(None)
      }
    }
  }

  /// Atomically replace the record: write to a temp file in the record's
  /// directory, fsync, then rename over the target.
  async fn commit(&self, record: TrainingRecord) -> Result<()> {
    let _guard = self.write_lock.lock().await;

    let json = serde_json::to_vec_pretty(&record)?;
    let path = self.path.clone();

    tokio::task::spawn_blocking(move || write_atomically(&path, &json))
      .await
      .map_err(|e| Error::Persist(format!("write task failed: {e}")))?
  }

  async fn clear(&self) -> Result<()> {
    let _guard = self.write_lock.lock().await;

    match tokio::fs::remove_file(&self.path).await {
      Ok(()) => Ok(()),
      Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
      Err(e) => Err(e.into()),
    }
  }
}

/// Temp-file-then-rename write. The temp file lives in the target's
/// directory so the rename stays on one filesystem.
fn write_atomically(path: &Path, bytes: &[u8]) -> Result<()> {
  let dir = path.parent().unwrap_or_else(|| Path::new("."));
  std::fs::create_dir_all(dir)?;

  let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
  tmp.write_all(bytes)?;
  tmp.as_file().sync_all()?;
  tmp
    .persist(path)
    .map_err(|e| Error::Persist(e.to_string()))?;
  Ok(())
}
