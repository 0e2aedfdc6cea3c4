//! Training reconciliation — decide whether the remote model needs
//! (re)training for the current schema, run the batch if so, and persist the
//! outcome.
//!
//! An individual failed training call is logged and skipped; the batch
//! continues. The batch as a whole counts as trained only if at least one
//! call succeeded — an all-failure batch leaves the prior record untouched
//! and surfaces [`Error::Training`].

use tracing::{debug, info, warn};

use crate::{
  Error, Result,
  examples::{ExampleSet, TrainingExample},
  fingerprint::fingerprint,
  generator::SqlGenerator,
  record::{TrainingRecord, needs_training},
  snapshot::SchemaSnapshot,
  state::StateStore,
};

// ─── Outcome ─────────────────────────────────────────────────────────────────

/// What a reconciliation pass did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrainingOutcome {
  /// The stored record matched the current fingerprint; nothing to do.
  Fresh,
  /// A training batch ran and the record was committed.
  Trained { succeeded: usize, failed: usize },
}

// ─── Trainer ─────────────────────────────────────────────────────────────────

/// Couples a [`SqlGenerator`] with a [`StateStore`] and drives the
/// schema-check → maybe-train → commit sequence.
pub struct Trainer<G, S> {
  generator: G,
  store:     S,
}

impl<G: SqlGenerator, S: StateStore> Trainer<G, S> {
  pub fn new(generator: G, store: S) -> Self { Self { generator, store } }

  pub fn generator(&self) -> &G { &self.generator }

  pub fn store(&self) -> &S { &self.store }

  /// Reconcile the training state against `snapshot`.
  ///
  /// With `force`, the stored record is ignored and a full retrain runs
  /// regardless of fingerprint; the decision rule is otherwise
  /// [`needs_training`].
  pub async fn ensure_trained(
    &self,
    snapshot: &SchemaSnapshot,
    examples: &ExampleSet,
    force: bool,
  ) -> Result<TrainingOutcome> {
    let current = fingerprint(snapshot);
    let record = self
      .store
      .load()
      .await
      .map_err(|e| Error::Persistence(e.to_string()))?;

    if !force && !needs_training(record.as_ref(), &current) {
      debug!(fingerprint = %current, "schema unchanged, training skipped");
      return Ok(TrainingOutcome::Fresh);
    }

    match &record {
      Some(rec) if rec.fingerprint != current => {
        info!(
          old = %rec.fingerprint,
          new = %current,
          "schema drift detected, retraining"
        );
      }
      Some(_) => info!("retraining requested"),
      None => info!("no training record found, training from scratch"),
    }

    let (succeeded, failed) = self.run_batch(snapshot, examples).await;
    let attempted = succeeded + failed;

    if succeeded == 0 {
      return Err(Error::Training { attempted });
    }

    let record =
      TrainingRecord::trained_now(current, examples.len() as u32);
    self
      .store
      .commit(record)
      .await
      .map_err(|e| Error::Persistence(e.to_string()))?;

    info!(succeeded, failed, "training complete");
    Ok(TrainingOutcome::Trained { succeeded, failed })
  }

  /// Drop the persisted record so the next reconciliation retrains.
  pub async fn clear(&self) -> Result<()> {
    self
      .store
      .clear()
      .await
      .map_err(|e| Error::Persistence(e.to_string()))
  }

  /// Feed the schema-derived items and the example file to the generator.
  /// Returns the (succeeded, failed) tally.
  async fn run_batch(
    &self,
    snapshot: &SchemaSnapshot,
    examples: &ExampleSet,
  ) -> (usize, usize) {
    let mut batch: Vec<TrainingExample> = snapshot
      .ddl_statements()
      .into_iter()
      .map(TrainingExample::Ddl)
      .chain(
        snapshot
          .relationship_docs()
          .into_iter()
          .map(TrainingExample::Documentation),
      )
      .collect();
    batch.extend(examples.examples());

    let mut succeeded = 0;
    let mut failed = 0;
    for example in &batch {
      match self.generator.train(example).await {
        Ok(()) => succeeded += 1,
        Err(e) => {
          warn!(kind = ?example.kind(), error = %e, "training call failed, skipping");
          failed += 1;
        }
      }
    }
    (succeeded, failed)
  }
}

#[cfg(test)]
mod tests {
  use std::sync::{
    Mutex,
    atomic::{AtomicUsize, Ordering},
  };

  use super::*;
  use crate::{
    examples::{DocEntry, PairGroup, QuestionSql, StatementGroup},
    snapshot::{ColumnDescriptor, KeyRole},
    state::MemoryStateStore,
  };

  // ── Scripted generator double ──────────────────────────────────────────────

  #[derive(Debug, thiserror::Error)]
  #[error("inference service rejected the example")]
  struct Rejected;

  /// Fails the first `fail_first` training calls, then succeeds.
  #[derive(Default)]
  struct ScriptedGenerator {
    fail_first: usize,
    calls:      AtomicUsize,
    trained:    Mutex<Vec<TrainingExample>>,
  }

  impl SqlGenerator for ScriptedGenerator {
    type Error = Rejected;

    async fn train(&self, example: &TrainingExample) -> Result<(), Rejected> {
      let n = self.calls.fetch_add(1, Ordering::SeqCst);
      if n < self.fail_first {
        return Err(Rejected);
      }
      self.trained.lock().unwrap().push(example.clone());
      Ok(())
    }

    async fn generate_sql(
      &self,
      _question: &str,
    ) -> Result<Option<String>, Rejected> {
      Ok(Some("SELECT 1".into()))
    }
  }

  // ── Fixtures ───────────────────────────────────────────────────────────────

  fn col(
    table: &str,
    column: &str,
    nullable: bool,
    key: KeyRole,
  ) -> ColumnDescriptor {
    ColumnDescriptor {
      table: table.into(),
      column: column.into(),
      sql_type: "INTEGER".into(),
      nullable,
      key,
    }
  }

  fn company_schema() -> SchemaSnapshot {
    SchemaSnapshot::new(vec![
      col("departments", "dept_id", false, KeyRole::PrimaryKey),
      col("departments", "dept_name", false, KeyRole::None),
      col("employees", "emp_id", false, KeyRole::PrimaryKey),
      col("employees", "dept_id", true, KeyRole::ForeignKey),
      col("employees", "manager_id", true, KeyRole::ForeignKey),
    ])
  }

  fn company_schema_with_salary() -> SchemaSnapshot {
    let mut cols = vec![
      col("departments", "dept_id", false, KeyRole::PrimaryKey),
      col("departments", "dept_name", false, KeyRole::None),
      col("employees", "emp_id", false, KeyRole::PrimaryKey),
      col("employees", "dept_id", true, KeyRole::ForeignKey),
      col("employees", "manager_id", true, KeyRole::ForeignKey),
    ];
    cols.push(col("employees", "salary", true, KeyRole::None));
    SchemaSnapshot::new(cols)
  }

  fn example_set(pairs: usize) -> ExampleSet {
    ExampleSet {
      documentation:      vec![DocEntry {
        text: "Salaries are monthly, in euros.".into(),
      }],
      ddl_statements:     vec![StatementGroup {
        name:       None,
        statements: vec!["CREATE INDEX emp_dept ON employees(dept_id)".into()],
      }],
      sql_examples:       vec![],
      question_sql_pairs: vec![PairGroup {
        category: None,
        pairs:    (0..pairs)
          .map(|i| QuestionSql {
            question: format!("question {i}"),
            sql:      format!("SELECT {i}"),
          })
          .collect(),
      }],
    }
  }

  // ── Scenarios ──────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn first_run_trains_and_commits() {
    let trainer =
      Trainer::new(ScriptedGenerator::default(), MemoryStateStore::new());
    let examples = example_set(10); // 12 examples total

    let outcome = trainer
      .ensure_trained(&company_schema(), &examples, false)
      .await
      .unwrap();
    assert!(matches!(outcome, TrainingOutcome::Trained { failed: 0, .. }));

    let record = trainer.store().load().await.unwrap().unwrap();
    assert!(record.trained);
    assert_eq!(record.example_count, 12);
    assert_eq!(record.fingerprint, fingerprint(&company_schema()));
  }

  #[tokio::test]
  async fn unchanged_schema_skips_training() {
    let trainer =
      Trainer::new(ScriptedGenerator::default(), MemoryStateStore::new());
    let examples = example_set(10);

    trainer
      .ensure_trained(&company_schema(), &examples, false)
      .await
      .unwrap();
    let calls_after_first = trainer.generator().calls.load(Ordering::SeqCst);

    let outcome = trainer
      .ensure_trained(&company_schema(), &examples, false)
      .await
      .unwrap();
    assert_eq!(outcome, TrainingOutcome::Fresh);
    assert_eq!(
      trainer.generator().calls.load(Ordering::SeqCst),
      calls_after_first
    );
  }

  #[tokio::test]
  async fn schema_drift_retrains_even_when_trained() {
    let trainer =
      Trainer::new(ScriptedGenerator::default(), MemoryStateStore::new());

    trainer
      .ensure_trained(&company_schema(), &example_set(10), false)
      .await
      .unwrap();

    // employees.salary appears; fingerprint changes, so a trained record
    // must not suppress retraining.
    let outcome = trainer
      .ensure_trained(&company_schema_with_salary(), &example_set(12), false)
      .await
      .unwrap();
    assert!(matches!(outcome, TrainingOutcome::Trained { .. }));

    let record = trainer.store().load().await.unwrap().unwrap();
    assert_eq!(record.example_count, 14);
    assert_eq!(
      record.fingerprint,
      fingerprint(&company_schema_with_salary())
    );
  }

  #[tokio::test]
  async fn force_retrains_on_matching_fingerprint() {
    let trainer =
      Trainer::new(ScriptedGenerator::default(), MemoryStateStore::new());
    let examples = example_set(2);

    trainer
      .ensure_trained(&company_schema(), &examples, false)
      .await
      .unwrap();
    let outcome = trainer
      .ensure_trained(&company_schema(), &examples, true)
      .await
      .unwrap();
    assert!(matches!(outcome, TrainingOutcome::Trained { .. }));
  }

  #[tokio::test]
  async fn partial_failure_still_counts_as_trained() {
    let generator = ScriptedGenerator { fail_first: 3, ..Default::default() };
    let trainer = Trainer::new(generator, MemoryStateStore::new());

    let outcome = trainer
      .ensure_trained(&company_schema(), &example_set(5), false)
      .await
      .unwrap();
    let TrainingOutcome::Trained { succeeded, failed } = outcome else {
      panic!("expected a trained outcome");
    };
    assert_eq!(failed, 3);
    assert!(succeeded > 0);
    assert!(trainer.store().load().await.unwrap().is_some());
  }

  #[tokio::test]
  async fn total_failure_commits_nothing() {
    let generator =
      ScriptedGenerator { fail_first: usize::MAX, ..Default::default() };
    let trainer = Trainer::new(generator, MemoryStateStore::new());

    let err = trainer
      .ensure_trained(&company_schema(), &example_set(2), false)
      .await
      .unwrap_err();
    assert!(matches!(err, Error::Training { .. }));
    assert!(trainer.store().load().await.unwrap().is_none());
  }

  #[tokio::test]
  async fn total_failure_preserves_prior_record() {
    let generator = ScriptedGenerator::default();
    let trainer = Trainer::new(generator, MemoryStateStore::new());
    trainer
      .ensure_trained(&company_schema(), &example_set(3), false)
      .await
      .unwrap();
    let prior = trainer.store().load().await.unwrap().unwrap();

    // Every call in the drift-triggered batch fails.
    let all_fail = ScriptedGenerator {
      fail_first: usize::MAX,
      ..Default::default()
    };
    let trainer2 = Trainer::new(all_fail, trainer.store);
    trainer2
      .ensure_trained(&company_schema_with_salary(), &example_set(3), false)
      .await
      .unwrap_err();

    assert_eq!(trainer2.store().load().await.unwrap().unwrap(), prior);
  }

  #[tokio::test]
  async fn clear_forces_next_run_to_retrain() {
    let trainer =
      Trainer::new(ScriptedGenerator::default(), MemoryStateStore::new());
    let examples = example_set(1);

    trainer
      .ensure_trained(&company_schema(), &examples, false)
      .await
      .unwrap();
    trainer.clear().await.unwrap();
    assert!(trainer.store().load().await.unwrap().is_none());

    let outcome = trainer
      .ensure_trained(&company_schema(), &examples, false)
      .await
      .unwrap();
    assert!(matches!(outcome, TrainingOutcome::Trained { .. }));
  }

  #[tokio::test]
  async fn batch_includes_schema_ddl_and_relationship_docs() {
    let trainer =
      Trainer::new(ScriptedGenerator::default(), MemoryStateStore::new());

    trainer
      .ensure_trained(&company_schema(), &ExampleSet::default(), false)
      .await
      .unwrap();

    let trained = trainer.generator().trained.lock().unwrap();
    let ddl = trained
      .iter()
      .filter(|e| matches!(e, TrainingExample::Ddl(_)))
      .count();
    let docs = trained
      .iter()
      .filter(|e| matches!(e, TrainingExample::Documentation(_)))
      .count();
    assert_eq!(ddl, 2); // departments, employees
    assert_eq!(docs, 2); // dept_id, manager_id foreign keys
  }
}
