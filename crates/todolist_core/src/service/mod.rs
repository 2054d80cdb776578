//! Use-case level command surface for UI hosts.
//!
//! # Responsibility
//! - Map user intents (create, edit, toggle, delete, list, export) onto
//!   manager operations.
//! - Persist after every mutation so edits survive a crash.

pub mod todo_service;
