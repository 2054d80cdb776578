//! Read-only, filtered projections of the live collection.
//!
//! # Responsibility
//! - Define the record predicate capability shared by views and digests.
//! - Keep a filtered copy of a manager's records current on every update.

pub mod filter;
pub mod projection;
