//! Filtered view kept in sync with a manager.
//!
//! # Invariants
//! - `items()` always equals the manager's records passing the filter, in
//!   list order, as of the last *updated* notification.
//! - A failed load empties the view along with the manager.
//! - A view stays subscribed until `detach` is called; dropping it without
//!   detaching leaves a listener behind on the manager.

use crate::manager::events::{IoOperation, ListenerHandle};
use crate::manager::todo_manager::TodoManager;
use crate::model::record::{Record, RecordId};
use crate::store::TodoStore;
use crate::view::filter::RecordFilter;
use std::cell::{Ref, RefCell};
use std::rc::Rc;

/// Derived, read-only list of the records passing one filter.
pub struct FilteredView {
    items: Rc<RefCell<Vec<Record>>>,
    on_updated: ListenerHandle,
    on_io_failed: ListenerHandle,
}

impl FilteredView {
    /// Computes the initial projection and subscribes to `manager` updates
    /// and load failures.
    pub fn attach<S, F>(manager: &mut TodoManager<S>, filter: F) -> Self
    where
        S: TodoStore,
        F: RecordFilter + 'static,
    {
        let items = Rc::new(RefCell::new(project(manager.records(), &filter)));
        let sink = Rc::clone(&items);
        let on_updated = manager.subscribe_updated(move |records| {
            *sink.borrow_mut() = project(records, &filter);
        });
        let sink = Rc::clone(&items);
        let on_io_failed = manager.subscribe_io_failed(move |failure| {
            if failure.operation == IoOperation::Load {
                sink.borrow_mut().clear();
            }
        });
        Self {
            items,
            on_updated,
            on_io_failed,
        }
    }

    /// Current projected records.
    pub fn items(&self) -> Ref<'_, [Record]> {
        Ref::map(self.items.borrow(), Vec::as_slice)
    }

    pub fn ids(&self) -> Vec<RecordId> {
        self.items.borrow().iter().map(Record::id).collect()
    }

    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }

    /// Listener handles registered on the manager: *updated*, then *io-failed*.
    pub fn handles(&self) -> [ListenerHandle; 2] {
        [self.on_updated, self.on_io_failed]
    }

    /// Stops observing `manager`. Returns `false` if either listener was
    /// already gone (for example, removed through `unsubscribe`).
    pub fn detach<S: TodoStore>(self, manager: &mut TodoManager<S>) -> bool {
        let updated = manager.unsubscribe(self.on_updated);
        let io_failed = manager.unsubscribe(self.on_io_failed);
        updated && io_failed
    }
}

fn project(records: &[Record], filter: &impl RecordFilter) -> Vec<Record> {
    records
        .iter()
        .filter(|record| filter.pass(record))
        .cloned()
        .collect()
}
