//! Todo manager: the sole mutation authority over the live collection.
//!
//! # Responsibility
//! - Keep the live list in insertion order and hand out read-only views.
//! - Allocate ids that never collide with any id seen since construction.
//! - Convert store failures into a sticky flag plus io-failed notifications.
//!
//! # Invariants
//! - `next_id` only grows; after `load` it exceeds every loaded id.
//! - A failed `load` leaves the list empty; a failed `save` leaves it untouched.
//! - Every membership change raises exactly one *updated* notification.
//! - Listeners run inline, before the triggering call returns.

use crate::manager::events::{EventEmitter, IoFailure, IoOperation, ListenerHandle};
use crate::model::record::{Record, RecordId};
use crate::store::TodoStore;
use log::{debug, error, info};
use std::ops::Deref;

/// Owner of the live todo list, backed by a `TodoStore`.
pub struct TodoManager<S: TodoStore> {
    store: S,
    records: Vec<Record>,
    next_id: RecordId,
    failed: bool,
    events: EventEmitter,
}

impl<S: TodoStore> TodoManager<S> {
    /// Creates an empty manager over `store`. Call `load` to populate it.
    pub fn new(store: S) -> Self {
        Self {
            store,
            records: Vec::new(),
            next_id: 0,
            failed: false,
            events: EventEmitter::new(),
        }
    }

    /// Replaces the live list with a fresh copy from the store.
    ///
    /// # Side effects
    /// - On success raises *updated* once.
    /// - On failure sets the failed flag, raises *io-failed* once and leaves
    ///   the list empty. A loaded id of `RecordId::MAX` counts as a failure,
    ///   since no later id could be allocated after it.
    pub fn load(&mut self) {
        self.records.clear();

        let loaded = match self.store.load() {
            Ok(loaded) => loaded,
            Err(err) => {
                error!(
                    "event=todo_load module=manager status=error store={} error_code={} error={}",
                    self.store.name(),
                    err.code(),
                    err
                );
                self.fail_load(err.to_string());
                return;
            }
        };

        let Some(next_id) = advance_past(self.next_id, &loaded) else {
            error!(
                "event=todo_load module=manager status=error store={} error_code=id_space_exhausted",
                self.store.name()
            );
            self.fail_load(format!(
                "store `{}` holds id {} which leaves no room for new ids",
                self.store.name(),
                RecordId::MAX
            ));
            return;
        };

        self.next_id = next_id;
        self.records = loaded;
        info!(
            "event=todo_load module=manager status=ok count={} next_id={}",
            self.records.len(),
            self.next_id
        );
        self.notify_updated();
    }

    /// Writes the live list to the store verbatim.
    ///
    /// # Side effects
    /// - On failure sets the failed flag and raises *io-failed* once; the
    ///   live list is not touched.
    pub fn save(&mut self) {
        info!(
            "event=todo_save module=manager status=start count={}",
            self.records.len()
        );
        if let Err(err) = self.store.save(&self.records) {
            self.failed = true;
            error!(
                "event=todo_save module=manager status=error store={} error_code={} error={}",
                self.store.name(),
                err.code(),
                err
            );
            self.notify_io_failed(IoOperation::Save, err.to_string());
        }
    }

    /// Returns whether any load or save has failed on this manager.
    ///
    /// Informational only: further loads and saves are still attempted.
    pub fn has_failed(&self) -> bool {
        self.failed
    }

    /// Read-only view of the live list in insertion order.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Id the next `add` will assign.
    pub fn next_id(&self) -> RecordId {
        self.next_id
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn get_by_id(&self, id: RecordId) -> Option<&Record> {
        self.records.iter().find(|record| record.id() == id)
    }

    /// Field-level edit access to the record with `id`.
    ///
    /// Does not notify; call `mark_dirty` once the edits are done. The guard
    /// exposes setters only, so the id and creation time stay fixed.
    pub fn edit(&mut self, id: RecordId) -> Option<RecordEdit<'_>> {
        self.records
            .iter_mut()
            .find(|record| record.id() == id)
            .map(|record| RecordEdit { record })
    }

    /// Assigns the next id to `record`, appends it and raises *updated*.
    ///
    /// Any id already carried by `record` is overwritten. Returns `None`
    /// without touching the list once the id space is used up.
    pub fn add(&mut self, mut record: Record) -> Option<RecordId> {
        let id = self.next_id;
        let Some(next_id) = id.checked_add(1) else {
            error!("event=todo_add module=manager status=error error_code=id_space_exhausted");
            return None;
        };
        self.next_id = next_id;
        record.assign_id(id);
        self.records.push(record);
        debug!("event=todo_add module=manager status=ok id={id}");
        self.notify_updated();
        Some(id)
    }

    /// Removes the first entry equal to `record`.
    ///
    /// Raises *updated* even when nothing matched. Returns whether an entry
    /// was removed.
    pub fn remove(&mut self, record: &Record) -> bool {
        let removed = match self.records.iter().position(|candidate| candidate == record) {
            Some(index) => {
                self.records.remove(index);
                true
            }
            None => false,
        };
        debug!(
            "event=todo_remove module=manager status=ok id={} removed={}",
            record.id(),
            removed
        );
        self.notify_updated();
        removed
    }

    /// Removes the first entry with `id`.
    ///
    /// Raises *updated* even when nothing matched. Returns whether an entry
    /// was removed.
    pub fn remove_by_id(&mut self, id: RecordId) -> bool {
        let removed = match self.records.iter().position(|record| record.id() == id) {
            Some(index) => {
                self.records.remove(index);
                true
            }
            None => false,
        };
        debug!("event=todo_remove module=manager status=ok id={id} removed={removed}");
        self.notify_updated();
        removed
    }

    /// Raises *updated* after the caller edited a record in place.
    ///
    /// The record itself is not touched, and `id` is not required to exist.
    pub fn mark_dirty(&mut self, id: RecordId) {
        debug!("event=todo_dirty module=manager status=ok id={id}");
        self.notify_updated();
    }

    /// Registers a callback invoked with the live list after every change.
    pub fn subscribe_updated(
        &mut self,
        listener: impl FnMut(&[Record]) + 'static,
    ) -> ListenerHandle {
        self.events.subscribe_updated(listener)
    }

    /// Registers a callback invoked whenever a load or save fails.
    pub fn subscribe_io_failed(
        &mut self,
        listener: impl FnMut(&IoFailure) + 'static,
    ) -> ListenerHandle {
        self.events.subscribe_io_failed(listener)
    }

    /// Deregisters a listener. Returns `false` for an unknown handle.
    pub fn unsubscribe(&mut self, handle: ListenerHandle) -> bool {
        self.events.unsubscribe(handle)
    }

    fn fail_load(&mut self, message: String) {
        self.failed = true;
        self.notify_io_failed(IoOperation::Load, message);
    }

    fn notify_updated(&mut self) {
        self.events.emit_updated(&self.records);
    }

    fn notify_io_failed(&mut self, operation: IoOperation, message: String) {
        let failure = IoFailure { operation, message };
        self.events.emit_io_failed(&failure);
    }
}

/// Write access to one managed record, limited to its editable fields.
///
/// Only shared access to the whole `Record` is available, so the record
/// cannot be replaced or swapped out:
///
/// ```compile_fail
/// use todolist_core::{JsonFileStore, Record, TodoManager};
///
/// let mut manager = TodoManager::new(JsonFileStore::new("todo_save.json"));
/// let id = manager.add(Record::new()).unwrap();
/// let mut edit = manager.edit(id).unwrap();
/// *edit = Record::from_parts(id + 1, 0, "", "", false, false);
/// ```
pub struct RecordEdit<'a> {
    record: &'a mut Record,
}

impl RecordEdit<'_> {
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.record.set_title(title);
    }

    pub fn set_body(&mut self, body: impl Into<String>) {
        self.record.set_body(body);
    }

    pub fn set_done(&mut self, done: bool) {
        self.record.set_done(done);
    }

    pub fn set_archived(&mut self, archived: bool) {
        self.record.set_archived(archived);
    }
}

impl Deref for RecordEdit<'_> {
    type Target = Record;

    fn deref(&self) -> &Record {
        self.record
    }
}

/// Smallest counter value above both `current` and every id in `records`.
fn advance_past(current: RecordId, records: &[Record]) -> Option<RecordId> {
    records.iter().try_fold(current, |next, record| {
        Some(next.max(record.id().checked_add(1)?))
    })
}
