//! Core record management for the todo list.
//! This crate owns the todo invariants: id allocation, load/save consistency
//! and change notification.

pub mod config;
pub mod db;
pub mod digest;
pub mod logging;
pub mod manager;
pub mod model;
pub mod service;
pub mod store;
pub mod view;

pub use config::{ConfigError, StoreBackend, TodoConfig};
pub use db::{database_label, open_db, open_db_in_memory};
pub use digest::{DigestBuilder, DIGEST_FOOTER, DIGEST_HEADER};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use manager::events::{IoFailure, IoOperation, ListenerHandle};
pub use manager::todo_manager::{RecordEdit, TodoManager};
pub use model::record::{Record, RecordId, UNASSIGNED_ID};
pub use service::todo_service::{CommitOutcome, EditDraft, TodoService};
pub use store::{
    JsonFileStore, SqliteTodoStore, StoreError, StoreResult, TodoStore, DEFAULT_DB_FILE,
    DEFAULT_SAVE_FILE,
};
pub use view::filter::{active, archived, everything, RecordFilter};
pub use view::projection::FilteredView;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
