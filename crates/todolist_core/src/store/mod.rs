//! Persistence boundary for the todo collection.
//!
//! # Responsibility
//! - Translate the whole record collection to and from durable bytes.
//! - Report medium failures and corrupt data as distinct errors.
//!
//! # Invariants
//! - `save` is a full overwrite; a reader never observes a partial write.
//! - `load` on a store that was never written returns an empty collection.
//! - `save` followed by `load` returns the same records, ids included.

use crate::model::record::Record;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod json_store;
pub mod sqlite_store;

pub use json_store::{JsonFileStore, DEFAULT_SAVE_FILE};
pub use sqlite_store::{SqliteTodoStore, DEFAULT_DB_FILE};

pub type StoreResult<T> = Result<T, StoreError>;

/// Failure raised by a `TodoStore` operation.
#[derive(Debug)]
pub enum StoreError {
    /// The medium could not be read or written.
    Io { store: String, message: String },
    /// Persisted bytes exist but are not a valid record collection.
    Deserialization { store: String, message: String },
    /// The database carries a schema version this build cannot read.
    UnsupportedSchema {
        store: String,
        found: u32,
        supported: u32,
    },
}

impl StoreError {
    pub fn io(store: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Io {
            store: store.into(),
            message: message.into(),
        }
    }

    pub fn deserialization(store: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Deserialization {
            store: store.into(),
            message: message.into(),
        }
    }

    /// Stable short code used in log lines.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Io { .. } => "store_io_failed",
            Self::Deserialization { .. } => "store_data_invalid",
            Self::UnsupportedSchema { .. } => "store_schema_unsupported",
        }
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { store, message } => write!(f, "store `{store}` I/O error: {message}"),
            Self::Deserialization { store, message } => {
                write!(f, "store `{store}` holds invalid todo data: {message}")
            }
            Self::UnsupportedSchema {
                store,
                found,
                supported,
            } => write!(
                f,
                "store `{store}` has schema version {found}; only version {supported} is supported"
            ),
        }
    }
}

impl Error for StoreError {}

/// Whole-collection persistence contract used by `TodoManager`.
pub trait TodoStore {
    /// Human-readable name (file path or database label) for diagnostics.
    fn name(&self) -> String;

    /// Reads every persisted record.
    ///
    /// # Errors
    /// - `StoreError::Io` when the medium exists but cannot be read.
    /// - `StoreError::Deserialization` when the bytes are not a record collection.
    fn load(&self) -> StoreResult<Vec<Record>>;

    /// Replaces the persisted collection with `items`.
    ///
    /// # Errors
    /// - `StoreError::Io` when the medium cannot be written.
    fn save(&self, items: &[Record]) -> StoreResult<()>;
}

impl<S: TodoStore + ?Sized> TodoStore for &S {
    fn name(&self) -> String {
        (**self).name()
    }

    fn load(&self) -> StoreResult<Vec<Record>> {
        (**self).load()
    }

    fn save(&self, items: &[Record]) -> StoreResult<()> {
        (**self).save(items)
    }
}
