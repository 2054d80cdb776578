//! Domain model for todo entries.
//!
//! # Responsibility
//! - Define the record shape shared by the manager, stores and views.
//!
//! # Invariants
//! - Record ids are allocated by a `TodoManager`, never by callers.
//! - The creation timestamp is fixed when a record is constructed.

pub mod record;
