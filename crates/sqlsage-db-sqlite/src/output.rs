//! Tabular query results.

/// The result of executing one SQL statement: ordered column names and rows
/// of values rendered to display strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryOutput {
  pub columns: Vec<String>,
  pub rows:    Vec<Vec<String>>,
}

impl QueryOutput {
  pub fn is_empty(&self) -> bool { self.rows.is_empty() }
}
