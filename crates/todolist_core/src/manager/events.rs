//! Per-manager listener registries.
//!
//! # Responsibility
//! - Hold the *updated* and *io-failed* callback lists of one manager.
//! - Hand out handles so holders can deregister explicitly.
//!
//! # Invariants
//! - Listeners run in registration order.
//! - Registering the same callback twice yields two independent entries.
//! - Nothing is deregistered automatically.

use crate::model::record::Record;
use std::fmt::{Display, Formatter};

/// Store operation that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoOperation {
    Load,
    Save,
}

impl IoOperation {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Load => "load",
            Self::Save => "save",
        }
    }
}

/// Payload delivered to io-failed listeners.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IoFailure {
    pub operation: IoOperation,
    pub message: String,
}

impl Display for IoFailure {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "failed to {} todos: {}", self.operation.as_str(), self.message)
    }
}

/// Token returned by a subscription; pass it back to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerHandle(u64);

pub type UpdatedListener = Box<dyn FnMut(&[Record])>;
pub type IoFailedListener = Box<dyn FnMut(&IoFailure)>;

/// Two independent ordered listener lists.
#[derive(Default)]
pub struct EventEmitter {
    next_handle: u64,
    updated: Vec<(ListenerHandle, UpdatedListener)>,
    io_failed: Vec<(ListenerHandle, IoFailedListener)>,
}

impl EventEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe_updated(
        &mut self,
        listener: impl FnMut(&[Record]) + 'static,
    ) -> ListenerHandle {
        let handle = self.allocate_handle();
        self.updated.push((handle, Box::new(listener)));
        handle
    }

    pub fn subscribe_io_failed(
        &mut self,
        listener: impl FnMut(&IoFailure) + 'static,
    ) -> ListenerHandle {
        let handle = self.allocate_handle();
        self.io_failed.push((handle, Box::new(listener)));
        handle
    }

    /// Removes the listener registered under `handle` from whichever list holds it.
    ///
    /// Returns `false` when the handle is unknown or already removed.
    pub fn unsubscribe(&mut self, handle: ListenerHandle) -> bool {
        if let Some(index) = self.updated.iter().position(|(h, _)| *h == handle) {
            self.updated.remove(index);
            return true;
        }
        if let Some(index) = self.io_failed.iter().position(|(h, _)| *h == handle) {
            self.io_failed.remove(index);
            return true;
        }
        false
    }

    pub fn updated_count(&self) -> usize {
        self.updated.len()
    }

    pub fn io_failed_count(&self) -> usize {
        self.io_failed.len()
    }

    pub(crate) fn emit_updated(&mut self, records: &[Record]) {
        for (_, listener) in self.updated.iter_mut() {
            listener(records);
        }
    }

    pub(crate) fn emit_io_failed(&mut self, failure: &IoFailure) {
        for (_, listener) in self.io_failed.iter_mut() {
            listener(failure);
        }
    }

    fn allocate_handle(&mut self) -> ListenerHandle {
        let handle = ListenerHandle(self.next_handle);
        self.next_handle += 1;
        handle
    }
}

#[cfg(test)]
mod tests {
    use super::{EventEmitter, IoFailure, IoOperation};
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn listeners_run_in_registration_order() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let mut emitter = EventEmitter::new();
        for tag in ["first", "second", "third"] {
            let calls = Rc::clone(&calls);
            emitter.subscribe_updated(move |_| calls.borrow_mut().push(tag));
        }

        emitter.emit_updated(&[]);
        assert_eq!(*calls.borrow(), vec!["first", "second", "third"]);
    }

    #[test]
    fn unsubscribe_removes_only_the_given_handle() {
        let hits = Rc::new(RefCell::new(0));
        let mut emitter = EventEmitter::new();
        let first = {
            let hits = Rc::clone(&hits);
            emitter.subscribe_io_failed(move |_| *hits.borrow_mut() += 1)
        };
        {
            let hits = Rc::clone(&hits);
            emitter.subscribe_io_failed(move |_| *hits.borrow_mut() += 10);
        }

        assert!(emitter.unsubscribe(first));
        assert!(!emitter.unsubscribe(first));
        emitter.emit_io_failed(&IoFailure {
            operation: IoOperation::Save,
            message: "disk full".to_string(),
        });

        assert_eq!(*hits.borrow(), 10);
        assert_eq!(emitter.io_failed_count(), 1);
        assert_eq!(emitter.updated_count(), 0);
    }

    #[test]
    fn io_failure_display_names_the_operation() {
        let failure = IoFailure {
            operation: IoOperation::Load,
            message: "corrupt".to_string(),
        };
        assert_eq!(failure.to_string(), "failed to load todos: corrupt");
    }
}
