//! Plain-text rendering of query results.

use sqlsage_db_sqlite::QueryOutput;

/// Render a result set as an aligned text table.
///
/// Column widths fit the widest cell (or header); no truncation — terminals
/// wrap long lines themselves.
pub fn render(out: &QueryOutput) -> String {
  let mut widths: Vec<usize> =
    out.columns.iter().map(|c| c.chars().count()).collect();
  for row in &out.rows {
    for (i, cell) in row.iter().enumerate() {
      widths[i] = widths[i].max(cell.chars().count());
    }
  }

  let mut buf = String::new();
  push_row(&mut buf, &out.columns, &widths);

  let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
  push_row(&mut buf, &rule, &widths);

  for row in &out.rows {
    push_row(&mut buf, row, &widths);
  }
  buf
}

fn push_row<S: AsRef<str>>(buf: &mut String, cells: &[S], widths: &[usize]) {
  let line = cells
    .iter()
    .zip(widths.iter().copied())
    .map(|(cell, w)| format!("{:<w$}", cell.as_ref()))
    .collect::<Vec<_>>()
    .join(" | ");
  buf.push_str(line.trim_end());
  buf.push('\n');
}
