//! The persisted training record and the reconciliation decision rule.
//!
//! The record on disk is the single authoritative source of training state.
//! Conceptually the component is a two-state machine — Untrained, or
//! Trained(fingerprint) — and [`needs_training`] is its transition guard.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::fingerprint::Fingerprint;

// ─── Record ──────────────────────────────────────────────────────────────────

/// What the last successful training run looked like.
///
/// Exclusively owned by the state store; overwritten atomically on each
/// retrain, deleted on an explicit clear.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingRecord {
  /// Fingerprint of the schema the model was trained against.
  pub fingerprint:     Fingerprint,
  pub trained:         bool,
  /// How many training examples were fed from the examples file.
  pub example_count:   u32,
  pub last_trained_at: DateTime<Utc>,
}

impl TrainingRecord {
  /// A freshly-trained record stamped with the current time.
  pub fn trained_now(fingerprint: Fingerprint, example_count: u32) -> Self {
    Self {
      fingerprint,
      trained: true,
      example_count,
      last_trained_at: Utc::now(),
    }
  }
}

// ─── Decision rule ───────────────────────────────────────────────────────────

/// Decide whether the model must be (re)trained for the schema identified by
/// `current`.
///
/// True when no record exists, when the record is not marked trained, or
/// when the stored fingerprint differs from `current` — a fingerprint
/// mismatch wins over the trained flag.
pub fn needs_training(
  record: Option<&TrainingRecord>,
  current: &Fingerprint,
) -> bool {
  match record {
    None => true,
    Some(rec) => !rec.trained || rec.fingerprint != *current,
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{
    fingerprint::fingerprint,
    snapshot::{ColumnDescriptor, KeyRole, SchemaSnapshot},
  };

  fn fp(table: &str) -> Fingerprint {
    fingerprint(&SchemaSnapshot::new(vec![ColumnDescriptor {
      table:    table.into(),
      column:   "id".into(),
      sql_type: "INTEGER".into(),
      nullable: false,
      key:      KeyRole::PrimaryKey,
    }]))
  }

  #[test]
  fn absent_record_needs_training() {
    assert!(needs_training(None, &fp("employees")));
  }

  #[test]
  fn matching_trained_record_skips_training() {
    let current = fp("employees");
    let record = TrainingRecord::trained_now(current, 12);
    assert!(!needs_training(Some(&record), &current));
  }

  #[test]
  fn untrained_flag_forces_training_even_on_match() {
    let current = fp("employees");
    let mut record = TrainingRecord::trained_now(current, 12);
    record.trained = false;
    assert!(needs_training(Some(&record), &current));
  }

  #[test]
  fn fingerprint_mismatch_forces_training_regardless_of_flag() {
    let record = TrainingRecord::trained_now(fp("employees"), 12);
    assert!(needs_training(Some(&record), &fp("departments")));
  }

  #[test]
  fn record_roundtrips_through_json() {
    let record = TrainingRecord::trained_now(fp("employees"), 14);
    let json = serde_json::to_string(&record).unwrap();
    let back: TrainingRecord = serde_json::from_str(&json).unwrap();
    assert_eq!(record, back);
  }
}
