//! Todo record model.
//!
//! # Responsibility
//! - Define the single value type persisted by stores and owned by the manager.
//!
//! # Invariants
//! - `id` is only assigned through `TodoManager::add` (or restored by a store).
//! - `created` never changes after construction.
//! - No validation happens here: empty title/body are legal.

use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// Identifier for one todo record, unique within a `TodoManager`.
pub type RecordId = i64;

/// Sentinel id carried by records that were never added to a manager.
pub const UNASSIGNED_ID: RecordId = -1;

/// One todo entry.
///
/// `title`, `body`, `done` and `archived` are freely editable. Callers that
/// edit a record owned by a manager must call `TodoManager::mark_dirty`
/// afterwards so observers re-render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Record {
    id: RecordId,
    /// Unix epoch milliseconds.
    created: i64,
    title: String,
    body: String,
    done: bool,
    archived: bool,
}

impl Record {
    /// Creates a blank record with an unassigned id, stamped with the current time.
    pub fn new() -> Self {
        Self::from_parts(UNASSIGNED_ID, now_epoch_ms(), "", "", false, false)
    }

    /// Creates a blank record with the given title and body.
    pub fn with_text(title: impl Into<String>, body: impl Into<String>) -> Self {
        let mut record = Self::new();
        record.title = title.into();
        record.body = body.into();
        record
    }

    /// Rebuilds a record from every persisted field.
    ///
    /// Used by store implementations when loading. Does not validate.
    pub fn from_parts(
        id: RecordId,
        created: i64,
        title: impl Into<String>,
        body: impl Into<String>,
        done: bool,
        archived: bool,
    ) -> Self {
        Self {
            id,
            created,
            title: title.into(),
            body: body.into(),
            done,
            archived,
        }
    }

    pub fn id(&self) -> RecordId {
        self.id
    }

    /// Returns whether a manager has assigned this record an id.
    pub fn is_assigned(&self) -> bool {
        self.id != UNASSIGNED_ID
    }

    pub(crate) fn assign_id(&mut self, id: RecordId) {
        self.id = id;
    }

    /// Creation time in Unix epoch milliseconds.
    pub fn created(&self) -> i64 {
        self.created
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn set_body(&mut self, body: impl Into<String>) {
        self.body = body.into();
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    pub fn set_done(&mut self, done: bool) {
        self.done = done;
    }

    /// Archived records are hidden from the primary list but kept.
    pub fn is_archived(&self) -> bool {
        self.archived
    }

    pub fn set_archived(&mut self, archived: bool) {
        self.archived = archived;
    }

    /// Returns whether both title and body are empty.
    pub fn is_blank(&self) -> bool {
        self.title.is_empty() && self.body.is_empty()
    }
}

impl Default for Record {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::{Record, UNASSIGNED_ID};

    #[test]
    fn new_record_is_blank_and_unassigned() {
        let record = Record::new();
        assert_eq!(record.id(), UNASSIGNED_ID);
        assert!(!record.is_assigned());
        assert!(record.is_blank());
        assert!(!record.is_done());
        assert!(!record.is_archived());
        assert!(record.created() > 0);
    }

    #[test]
    fn setters_only_touch_their_field() {
        let mut record = Record::from_parts(3, 42, "title", "body", false, false);
        record.set_done(true);
        record.set_archived(true);
        record.set_title("renamed");

        assert_eq!(record.id(), 3);
        assert_eq!(record.created(), 42);
        assert_eq!(record.title(), "renamed");
        assert_eq!(record.body(), "body");
        assert!(record.is_done());
        assert!(record.is_archived());
    }
}
