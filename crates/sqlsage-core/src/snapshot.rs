//! Schema snapshots — the canonical, ordered description of a database's
//! tables and columns at a point in time.
//!
//! A snapshot is the input to fingerprinting, so its construction must be
//! deterministic: columns are sorted by (table, column) regardless of the
//! order the metadata catalog returned them in.

use serde::{Deserialize, Serialize};

// ─── Column metadata ─────────────────────────────────────────────────────────

/// The role a column plays in its table's keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyRole {
  #[default]
  None,
  PrimaryKey,
  ForeignKey,
}

/// One column of one table, as reported by the metadata catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
  pub table:    String,
  pub column:   String,
  /// Declared SQL type, verbatim from the catalog (e.g. `INTEGER`,
  /// `VARCHAR(80)`).
  pub sql_type: String,
  pub nullable: bool,
  pub key:      KeyRole,
}

// ─── Snapshot ────────────────────────────────────────────────────────────────

/// An ordered sequence of column descriptors covering every table of the
/// target schema.
///
/// Invariant: the columns are sorted by (table, column), so two snapshots of
/// the same schema compare equal and fingerprint equal no matter what order
/// the catalog enumerated them in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaSnapshot {
  columns: Vec<ColumnDescriptor>,
}

impl SchemaSnapshot {
  /// Build a snapshot from catalog rows in any order.
  pub fn new(mut columns: Vec<ColumnDescriptor>) -> Self {
    columns.sort_by(|a, b| {
      a.table.cmp(&b.table).then_with(|| a.column.cmp(&b.column))
    });
    Self { columns }
  }

  pub fn columns(&self) -> &[ColumnDescriptor] { &self.columns }

  pub fn is_empty(&self) -> bool { self.columns.is_empty() }

  /// Distinct table names, in snapshot (sorted) order.
  pub fn tables(&self) -> Vec<&str> {
    let mut tables: Vec<&str> = Vec::new();
    for col in &self.columns {
      if tables.last() != Some(&col.table.as_str()) {
        tables.push(&col.table);
      }
    }
    tables
  }

  /// Synthesize one `CREATE TABLE` statement per table.
  ///
  /// These are fed to the inference service as schema training input; they
  /// are not meant to be executable against the source database.
  pub fn ddl_statements(&self) -> Vec<String> {
    self
      .tables()
      .into_iter()
      .map(|table| {
        let body = self
          .columns
          .iter()
          .filter(|c| c.table == table)
          .map(|c| {
            let mut line = format!("  {} {}", c.column, c.sql_type);
            if !c.nullable {
              line.push_str(" NOT NULL");
            }
            if c.key == KeyRole::PrimaryKey {
              line.push_str(" PRIMARY KEY");
            }
            line
          })
          .collect::<Vec<_>>()
          .join(",\n");
        format!("CREATE TABLE {table} (\n{body}\n);")
      })
      .collect()
  }

  /// Documentation strings describing the schema's foreign-key columns,
  /// used to ground the inference service's join generation.
  pub fn relationship_docs(&self) -> Vec<String> {
    self
      .columns
      .iter()
      .filter(|c| c.key == KeyRole::ForeignKey)
      .map(|c| {
        format!(
          "In the {} table, {} is a foreign key referencing another table",
          c.table, c.column
        )
      })
      .collect()
  }
}
