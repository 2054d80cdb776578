//! Todo table schema bootstrap.
//!
//! # Invariants
//! - A database at version 0 is initialized and stamped with `SCHEMA_VERSION`.
//! - Any other version than `SCHEMA_VERSION` is rejected; there is no migration path.

use crate::db::database_label;
use crate::store::{StoreError, StoreResult};
use rusqlite::Connection;

/// Schema version written to `PRAGMA user_version`.
pub const SCHEMA_VERSION: u32 = 1;

const SCHEMA_SQL: &str = include_str!("schema_v1.sql");

/// Creates the todo table on an empty database, or verifies an existing one.
///
/// # Errors
/// - `UnsupportedSchema` when the database is stamped with another version.
/// - `Io` when SQLite rejects a statement.
pub fn ensure_schema(conn: &mut Connection) -> StoreResult<()> {
    let label = database_label(conn);
    let io = |err: rusqlite::Error| StoreError::io(label.clone(), err.to_string());

    let current = current_user_version(conn).map_err(io)?;
    if current == SCHEMA_VERSION {
        return Ok(());
    }
    if current != 0 {
        return Err(StoreError::UnsupportedSchema {
            store: label,
            found: current,
            supported: SCHEMA_VERSION,
        });
    }

    let tx = conn.transaction().map_err(io)?;
    tx.execute_batch(SCHEMA_SQL).map_err(io)?;
    tx.execute_batch(&format!("PRAGMA user_version = {SCHEMA_VERSION};"))
        .map_err(io)?;
    tx.commit().map_err(io)
}

/// Reads `PRAGMA user_version` from the connection.
pub fn current_user_version(conn: &Connection) -> rusqlite::Result<u32> {
    conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))
}
