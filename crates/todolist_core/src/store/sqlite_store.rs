//! SQLite-backed todo store.
//!
//! # Responsibility
//! - Persist the collection as rows of the `todo_items` table.
//! - Keep SQL details inside the store boundary.
//!
//! # Invariants
//! - `save` replaces every row inside one transaction.
//! - Rows are read back in the order they were saved.
//! - Rows with out-of-range flag values are rejected instead of coerced.

use super::{StoreError, StoreResult, TodoStore};
use crate::db::database_label;
use crate::model::record::Record;
use log::{error, info};
use rusqlite::{params, Connection, Row};
use std::time::Instant;

/// Default database file name used when the caller does not pick one.
pub const DEFAULT_DB_FILE: &str = "todolist.sqlite3";

const SELECT_SQL: &str = "SELECT id, created, title, body, done, archived
FROM todo_items
ORDER BY position ASC;";

/// Store over a connection opened by `db::open_db` or `db::open_db_in_memory`.
pub struct SqliteTodoStore<'conn> {
    conn: &'conn Connection,
    label: String,
}

impl<'conn> SqliteTodoStore<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self {
            conn,
            label: database_label(conn),
        }
    }

    fn read_rows(&self) -> StoreResult<Vec<Record>> {
        let mut stmt = self
            .conn
            .prepare(SELECT_SQL)
            .map_err(|err| self.sqlite_error(err))?;
        let mut rows = stmt.query([]).map_err(|err| self.sqlite_error(err))?;

        let mut records = Vec::new();
        while let Some(row) = rows.next().map_err(|err| self.sqlite_error(err))? {
            records.push(self.parse_row(row)?);
        }
        Ok(records)
    }

    fn write_rows(&self, items: &[Record]) -> StoreResult<()> {
        // Why: `&Connection` cannot open a checked transaction; the store never
        // nests transactions, so the unchecked variant is sufficient.
        let tx = self
            .conn
            .unchecked_transaction()
            .map_err(|err| self.sqlite_error(err))?;
        tx.execute("DELETE FROM todo_items;", [])
            .map_err(|err| self.sqlite_error(err))?;
        {
            let mut insert = tx
                .prepare(
                    "INSERT INTO todo_items (position, id, created, title, body, done, archived)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
                )
                .map_err(|err| self.sqlite_error(err))?;
            for (position, record) in items.iter().enumerate() {
                insert
                    .execute(params![
                        i64::try_from(position).unwrap_or(i64::MAX),
                        record.id(),
                        record.created(),
                        record.title(),
                        record.body(),
                        bool_to_int(record.is_done()),
                        bool_to_int(record.is_archived()),
                    ])
                    .map_err(|err| self.sqlite_error(err))?;
            }
        }
        tx.commit().map_err(|err| self.sqlite_error(err))
    }

    fn parse_row(&self, row: &Row<'_>) -> StoreResult<Record> {
        let field = |name: &str, err: rusqlite::Error| {
            StoreError::deserialization(self.name(), format!("todo_items.{name}: {err}"))
        };

        let id: i64 = row.get("id").map_err(|err| field("id", err))?;
        let created: i64 = row.get("created").map_err(|err| field("created", err))?;
        let title: String = row.get("title").map_err(|err| field("title", err))?;
        let body: String = row.get("body").map_err(|err| field("body", err))?;
        let done = self.parse_flag(row, "done")?;
        let archived = self.parse_flag(row, "archived")?;

        Ok(Record::from_parts(id, created, title, body, done, archived))
    }

    fn parse_flag(&self, row: &Row<'_>, column: &str) -> StoreResult<bool> {
        let value: i64 = row.get(column).map_err(|err| {
            StoreError::deserialization(self.name(), format!("todo_items.{column}: {err}"))
        })?;
        match value {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(StoreError::deserialization(
                self.name(),
                format!("invalid {column} value `{other}` in todo_items.{column}"),
            )),
        }
    }

    fn sqlite_error(&self, err: rusqlite::Error) -> StoreError {
        StoreError::io(self.name(), err.to_string())
    }
}

impl TodoStore for SqliteTodoStore<'_> {
    fn name(&self) -> String {
        self.label.clone()
    }

    fn load(&self) -> StoreResult<Vec<Record>> {
        let started_at = Instant::now();
        let result = self.read_rows();
        match &result {
            Ok(records) => info!(
                "event=store_load module=store status=ok backend=sqlite count={} duration_ms={}",
                records.len(),
                started_at.elapsed().as_millis()
            ),
            Err(err) => error!(
                "event=store_load module=store status=error backend=sqlite duration_ms={} error_code={} error={}",
                started_at.elapsed().as_millis(),
                err.code(),
                err
            ),
        }
        result
    }

    fn save(&self, items: &[Record]) -> StoreResult<()> {
        let started_at = Instant::now();
        let result = self.write_rows(items);
        match &result {
            Ok(()) => info!(
                "event=store_save module=store status=ok backend=sqlite count={} duration_ms={}",
                items.len(),
                started_at.elapsed().as_millis()
            ),
            Err(err) => error!(
                "event=store_save module=store status=error backend=sqlite duration_ms={} error_code={} error={}",
                started_at.elapsed().as_millis(),
                err.code(),
                err
            ),
        }
        result
    }
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}
