//! Live todo collection and its observers.
//!
//! # Responsibility
//! - Own the in-memory record list and allocate record ids.
//! - Bridge the list to a `TodoStore` and fan out change notifications.
//!
//! # Invariants
//! - The manager is the only writer of record ids and list membership.
//! - Store failures never escape as errors; they raise io-failed instead.

pub mod events;
pub mod todo_manager;
