//! [`Database`] — connection handle, schema introspection, and query
//! execution.

use std::{collections::HashSet, path::Path};

use rusqlite::types::ValueRef;
use sqlsage_core::snapshot::{ColumnDescriptor, KeyRole, SchemaSnapshot};

use crate::{Error, QueryOutput, Result};

// ─── Connection ──────────────────────────────────────────────────────────────

/// A sqlsage database handle backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct Database {
  conn: tokio_rusqlite::Connection,
}

impl Database {
  /// Open (or create) a database at `path`.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    Ok(Self { conn })
  }

  /// Open an in-memory database — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    Ok(Self { conn })
  }

  /// One cheap round trip to confirm the connection is alive.
  pub async fn ping(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.query_row("SELECT 1", [], |_| Ok(()))?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Run a batch of statements. Used to seed fixture schemas in tests and
  /// demos; the assistant itself never writes.
  pub async fn execute_batch(&self, sql: &str) -> Result<()> {
    let sql = sql.to_owned();
    self
      .conn
      .call(move |conn| {
        conn.execute_batch(&sql)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  // ── Introspection ──────────────────────────────────────────────────────────

  /// Snapshot the schema: every column of every user table, sorted by
  /// table then column.
  ///
  /// One read-only round trip over the metadata catalog (`sqlite_master`
  /// plus the `pragma_table_info` and `pragma_foreign_key_list`
  /// table-valued functions). Fails with [`Error::SchemaUnavailable`] when
  /// the catalog cannot be read.
  pub async fn schema_snapshot(&self) -> Result<SchemaSnapshot> {
    let columns = self
      .conn
      .call(|conn| {
        let mut tables_stmt = conn.prepare(
          "SELECT name FROM sqlite_master
           WHERE type = 'table' AND name NOT LIKE 'sqlite_%'
           ORDER BY name",
        )?;
        let tables = tables_stmt
          .query_map([], |row| row.get::<_, String>(0))?
          .collect::<std::result::Result<Vec<_>, _>>()?;

        let mut columns = Vec::new();
        for table in tables {
          let mut fk_stmt = conn
            .prepare("SELECT \"from\" FROM pragma_foreign_key_list(?1)")?;
          let fk_columns = fk_stmt
            .query_map([&table], |row| row.get::<_, String>(0))?
            .collect::<std::result::Result<HashSet<_>, _>>()?;

          let mut col_stmt = conn.prepare(
            "SELECT name, type, \"notnull\", pk FROM pragma_table_info(?1)",
          )?;
          let rows = col_stmt.query_map([&table], |row| {
            Ok((
              row.get::<_, String>(0)?,
              row.get::<_, String>(1)?,
              row.get::<_, i64>(2)?,
              row.get::<_, i64>(3)?,
            ))
          })?;

          for row in rows {
            let (column, sql_type, notnull, pk) = row?;
            let key = if pk > 0 {
              KeyRole::PrimaryKey
            } else if fk_columns.contains(&column) {
              KeyRole::ForeignKey
            } else {
              KeyRole::None
            };
            columns.push(ColumnDescriptor {
              table: table.clone(),
              column,
              sql_type,
              nullable: notnull == 0,
              key,
            });
          }
        }
        Ok(columns)
      })
      .await
      .map_err(|e| Error::SchemaUnavailable(e.to_string()))?;

    Ok(SchemaSnapshot::new(columns))
  }

  // ── Query execution ────────────────────────────────────────────────────────

  /// Execute one SQL statement and collect its result as display strings.
  pub async fn run_query(&self, sql: &str) -> Result<QueryOutput> {
    let sql = sql.to_owned();
    let output = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let columns: Vec<String> =
          stmt.column_names().iter().map(|c| c.to_string()).collect();
        let width = columns.len();

        let mut out_rows = Vec::new();
        let mut rows = stmt.query([])?;
        while let Some(row) = rows.next()? {
          let mut rendered = Vec::with_capacity(width);
          for i in 0..width {
            rendered.push(render_value(row.get_ref(i)?));
          }
          out_rows.push(rendered);
        }

        Ok(QueryOutput { columns, rows: out_rows })
      })
      .await?;
    Ok(output)
  }
}

/// Render one SQLite value for display.
fn render_value(value: ValueRef<'_>) -> String {
  match value {
    ValueRef::Null => "NULL".to_owned(),
    ValueRef::Integer(i) => i.to_string(),
    ValueRef::Real(f) => f.to_string(),
    ValueRef::Text(t) => String::from_utf8_lossy(t).into_owned(),
    ValueRef::Blob(b) => format!("x'{}'", hex::encode(b)),
  }
}
