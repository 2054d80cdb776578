//! SQLite bootstrap for the database-backed todo store.
//!
//! Failures surface as `StoreError`, labelled with the database they concern.

mod open;
pub mod schema;

pub use open::{open_db, open_db_in_memory};

use rusqlite::Connection;

/// Label used for `conn` in errors and log lines: `sqlite:<path>` for file
/// databases, `sqlite::memory` otherwise.
pub fn database_label(conn: &Connection) -> String {
    conn.query_row(
        "SELECT file FROM pragma_database_list WHERE name = 'main';",
        [],
        |row| row.get::<_, String>(0),
    )
    .ok()
    .filter(|path| !path.is_empty())
    .map_or_else(|| "sqlite::memory".to_string(), |path| format!("sqlite:{path}"))
}
