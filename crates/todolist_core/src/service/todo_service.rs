//! Todo use-case service.
//!
//! # Responsibility
//! - Provide one entry point per user-facing command.
//! - Save through the manager right after each mutation.
//!
//! # Invariants
//! - The service never bypasses manager id allocation or notification.
//! - Committing a blank edit never leaves a blank record behind.

use crate::digest::DigestBuilder;
use crate::manager::todo_manager::TodoManager;
use crate::model::record::{Record, RecordId};
use crate::store::TodoStore;
use crate::view::filter::RecordFilter;
use log::info;

/// Edit session started by `create_blank` or `begin_edit`.
///
/// `title` and `body` hold the values an editor should show initially.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditDraft {
    target: EditTarget,
    pub title: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum EditTarget {
    New(Record),
    Existing(RecordId),
}

impl EditDraft {
    /// Returns whether committing this draft would add a new record.
    pub fn is_new(&self) -> bool {
        matches!(self.target, EditTarget::New(_))
    }

    /// Id of the edited record, `None` for a new draft.
    pub fn record_id(&self) -> Option<RecordId> {
        match self.target {
            EditTarget::New(_) => None,
            EditTarget::Existing(id) => Some(id),
        }
    }
}

/// Result of `TodoService::commit_edit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    /// A new record was added under this id.
    Added(RecordId),
    /// An existing record received the new title/body.
    Updated(RecordId),
    /// A new draft was left blank and dropped.
    Discarded,
    /// An existing record was edited to blank and removed.
    Removed(RecordId),
    /// The edited record no longer exists in the manager.
    Missing(RecordId),
    /// No id is left to assign to a new record.
    IdsExhausted,
}

/// Command surface over a `TodoManager`.
pub struct TodoService<S: TodoStore> {
    manager: TodoManager<S>,
}

impl<S: TodoStore> TodoService<S> {
    pub fn new(manager: TodoManager<S>) -> Self {
        Self { manager }
    }

    /// Builds a manager over `store` and loads it.
    pub fn open(store: S) -> Self {
        let mut manager = TodoManager::new(store);
        manager.load();
        Self::new(manager)
    }

    pub fn manager(&self) -> &TodoManager<S> {
        &self.manager
    }

    pub fn manager_mut(&mut self) -> &mut TodoManager<S> {
        &mut self.manager
    }

    pub fn into_manager(self) -> TodoManager<S> {
        self.manager
    }

    /// Starts a draft for a record that does not exist yet.
    pub fn create_blank(&self) -> EditDraft {
        EditDraft {
            target: EditTarget::New(Record::new()),
            title: String::new(),
            body: String::new(),
        }
    }

    /// Starts a draft pre-filled from the record with `id`.
    pub fn begin_edit(&self, id: RecordId) -> Option<EditDraft> {
        let record = self.manager.get_by_id(id)?;
        Some(EditDraft {
            target: EditTarget::Existing(id),
            title: record.title().to_string(),
            body: record.body().to_string(),
        })
    }

    /// Writes `title` and `body` into the draft's record and persists.
    ///
    /// # Contract
    /// - New draft, blank text: nothing is added (`Discarded`).
    /// - New draft, some text: added with a fresh id (`Added`), or
    ///   `IdsExhausted` when the manager has no id left.
    /// - Existing record, blank text: removed (`Removed`).
    /// - Existing record, some text: updated in place (`Updated`).
    pub fn commit_edit(
        &mut self,
        draft: EditDraft,
        title: impl Into<String>,
        body: impl Into<String>,
    ) -> CommitOutcome {
        let (title, body) = (title.into(), body.into());
        let blank = title.is_empty() && body.is_empty();

        let outcome = match draft.target {
            EditTarget::New(_) if blank => return CommitOutcome::Discarded,
            EditTarget::New(mut record) => {
                record.set_title(title);
                record.set_body(body);
                match self.manager.add(record) {
                    Some(id) => CommitOutcome::Added(id),
                    None => return CommitOutcome::IdsExhausted,
                }
            }
            EditTarget::Existing(id) if blank => {
                if !self.manager.remove_by_id(id) {
                    return CommitOutcome::Missing(id);
                }
                CommitOutcome::Removed(id)
            }
            EditTarget::Existing(id) => {
                let Some(mut record) = self.manager.edit(id) else {
                    return CommitOutcome::Missing(id);
                };
                record.set_title(title);
                record.set_body(body);
                self.manager.mark_dirty(id);
                CommitOutcome::Updated(id)
            }
        };

        info!("event=todo_commit module=service status=ok outcome={outcome:?}");
        self.manager.save();
        outcome
    }

    /// Sets the done flag. Returns `false` when `id` is unknown.
    pub fn set_done(&mut self, id: RecordId, done: bool) -> bool {
        let Some(mut record) = self.manager.edit(id) else {
            return false;
        };
        record.set_done(done);
        self.manager.mark_dirty(id);
        self.manager.save();
        true
    }

    /// Flips the archived flag and returns the new value, or `None` for an unknown id.
    pub fn toggle_archived(&mut self, id: RecordId) -> Option<bool> {
        let mut record = self.manager.edit(id)?;
        let archived = !record.is_archived();
        record.set_archived(archived);
        self.manager.mark_dirty(id);
        self.manager.save();
        Some(archived)
    }

    /// Removes the record with `id` and persists. Returns whether it existed.
    pub fn delete(&mut self, id: RecordId) -> bool {
        let removed = self.manager.remove_by_id(id);
        self.manager.save();
        removed
    }

    pub fn list_all(&self) -> &[Record] {
        self.manager.records()
    }

    pub fn list_filtered(&self, filter: &impl RecordFilter) -> Vec<&Record> {
        self.manager
            .records()
            .iter()
            .filter(|record| filter.pass(record))
            .collect()
    }

    /// Export body for the current list.
    pub fn digest(&self, include_archived: bool) -> String {
        DigestBuilder::new(self.manager.records())
            .include_archived(include_archived)
            .build()
    }

    /// Like `digest`, but `None` when no record would appear in it.
    pub fn export(&self, include_archived: bool) -> Option<String> {
        let any = self
            .manager
            .records()
            .iter()
            .any(|record| include_archived || !record.is_archived());
        if !any {
            info!("event=todo_export module=service status=skipped reason=empty");
            return None;
        }
        Some(self.digest(include_archived))
    }
}
