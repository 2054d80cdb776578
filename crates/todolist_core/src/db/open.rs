//! Connection bootstrap utilities for SQLite.
//!
//! # Responsibility
//! - Open file or in-memory SQLite connections.
//! - Ensure the todo schema exists before returning a usable connection.

use super::schema::ensure_schema;
use crate::store::{StoreError, StoreResult};
use log::{error, info};
use rusqlite::Connection;
use std::path::Path;
use std::time::{Duration, Instant};

/// Opens (creating if needed) a SQLite database file holding todo records.
///
/// # Side effects
/// - Creates the file and the todo table on first use.
/// - Emits `db_open` logging events with duration and status.
pub fn open_db(path: impl AsRef<Path>) -> StoreResult<Connection> {
    let path = path.as_ref();
    let label = format!("sqlite:{}", path.display());
    open_with("file", &label, || Connection::open(path))
}

/// Opens an in-memory SQLite database holding todo records.
pub fn open_db_in_memory() -> StoreResult<Connection> {
    open_with("memory", "sqlite::memory", Connection::open_in_memory)
}

fn open_with(
    mode: &str,
    label: &str,
    connect: impl FnOnce() -> rusqlite::Result<Connection>,
) -> StoreResult<Connection> {
    let started_at = Instant::now();
    info!("event=db_open module=db status=start mode={mode}");

    let result = connect()
        .map_err(|err| StoreError::io(label, err.to_string()))
        .and_then(|mut conn| {
            conn.busy_timeout(Duration::from_secs(5))
                .map_err(|err| StoreError::io(label, err.to_string()))?;
            ensure_schema(&mut conn)?;
            Ok(conn)
        });

    match &result {
        Ok(_) => info!(
            "event=db_open module=db status=ok mode={} duration_ms={}",
            mode,
            started_at.elapsed().as_millis()
        ),
        Err(err) => error!(
            "event=db_open module=db status=error mode={} duration_ms={} error_code={} error={}",
            mode,
            started_at.elapsed().as_millis(),
            err.code(),
            err
        ),
    }
    result
}
