//! Training examples — the structured file of documentation strings, DDL,
//! standalone SQL, and question/SQL pairs fed to the inference service.
//!
//! The on-disk format is TOML; this module only defines the shapes. Parsing
//! happens at the edge (the CLI reads the file and hands an [`ExampleSet`]
//! to the trainer).

use serde::{Deserialize, Serialize};

// ─── Flattened examples ──────────────────────────────────────────────────────

/// The kind of a training example, as the inference service's train endpoint
/// distinguishes them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExampleKind {
  Documentation,
  Ddl,
  Sql,
  QuestionSqlPair,
}

/// One unit of training input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrainingExample {
  Documentation(String),
  Ddl(String),
  Sql(String),
  Pair { question: String, sql: String },
}

impl TrainingExample {
  pub fn kind(&self) -> ExampleKind {
    match self {
      Self::Documentation(_) => ExampleKind::Documentation,
      Self::Ddl(_) => ExampleKind::Ddl,
      Self::Sql(_) => ExampleKind::Sql,
      Self::Pair { .. } => ExampleKind::QuestionSqlPair,
    }
  }
}

// ─── File shapes ─────────────────────────────────────────────────────────────

/// A documentation entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocEntry {
  pub text: String,
}

/// A named group of DDL or SQL statements.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatementGroup {
  pub name:       Option<String>,
  pub statements: Vec<String>,
}

/// One question with its reference SQL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionSql {
  pub question: String,
  pub sql:      String,
}

/// A category of question/SQL pairs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PairGroup {
  pub category: Option<String>,
  pub pairs:    Vec<QuestionSql>,
}

/// The full contents of a training-examples file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExampleSet {
  #[serde(default)]
  pub documentation:      Vec<DocEntry>,
  #[serde(default)]
  pub ddl_statements:     Vec<StatementGroup>,
  #[serde(default)]
  pub sql_examples:       Vec<StatementGroup>,
  #[serde(default)]
  pub question_sql_pairs: Vec<PairGroup>,
}

impl ExampleSet {
  /// Flatten the grouped file structure into training units, preserving
  /// file order within each section.
  pub fn examples(&self) -> Vec<TrainingExample> {
    let mut out = Vec::new();
    for doc in &self.documentation {
      out.push(TrainingExample::Documentation(doc.text.clone()));
    }
    for group in &self.ddl_statements {
      for stmt in &group.statements {
        out.push(TrainingExample::Ddl(stmt.clone()));
      }
    }
    for group in &self.sql_examples {
      for stmt in &group.statements {
        out.push(TrainingExample::Sql(stmt.clone()));
      }
    }
    for group in &self.question_sql_pairs {
      for pair in &group.pairs {
        out.push(TrainingExample::Pair {
          question: pair.question.clone(),
          sql:      pair.sql.clone(),
        });
      }
    }
    out
  }

  pub fn len(&self) -> usize {
    self.documentation.len()
      + self.ddl_statements.iter().map(|g| g.statements.len()).sum::<usize>()
      + self.sql_examples.iter().map(|g| g.statements.len()).sum::<usize>()
      + self.question_sql_pairs.iter().map(|g| g.pairs.len()).sum::<usize>()
  }

  pub fn is_empty(&self) -> bool { self.len() == 0 }
}
