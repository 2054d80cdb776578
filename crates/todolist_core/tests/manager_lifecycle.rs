use std::cell::{Cell, RefCell};
use std::fs;
use std::rc::Rc;
use todolist_core::{
    IoFailure, IoOperation, JsonFileStore, Record, StoreError, StoreResult, TodoManager, TodoStore,
};

/// Store whose next load/save outcomes can be scripted by the test.
#[derive(Default)]
struct ScriptedStore {
    contents: RefCell<Vec<Record>>,
    fail_load: Cell<bool>,
    fail_save: Cell<bool>,
    saves: Cell<usize>,
}

impl ScriptedStore {
    fn with_records(records: Vec<Record>) -> Self {
        let store = Self::default();
        *store.contents.borrow_mut() = records;
        store
    }
}

impl TodoStore for ScriptedStore {
    fn name(&self) -> String {
        "scripted".to_string()
    }

    fn load(&self) -> StoreResult<Vec<Record>> {
        if self.fail_load.get() {
            return Err(StoreError::deserialization(self.name(), "garbage bytes"));
        }
        Ok(self.contents.borrow().clone())
    }

    fn save(&self, items: &[Record]) -> StoreResult<()> {
        if self.fail_save.get() {
            return Err(StoreError::io(self.name(), "disk full"));
        }
        self.saves.set(self.saves.get() + 1);
        *self.contents.borrow_mut() = items.to_vec();
        Ok(())
    }
}

struct Counters {
    updated: Rc<Cell<usize>>,
    failures: Rc<RefCell<Vec<IoFailure>>>,
}

fn observe<S: TodoStore>(manager: &mut TodoManager<S>) -> Counters {
    let updated = Rc::new(Cell::new(0));
    let failures = Rc::new(RefCell::new(Vec::new()));
    {
        let updated = Rc::clone(&updated);
        manager.subscribe_updated(move |_| updated.set(updated.get() + 1));
    }
    {
        let failures = Rc::clone(&failures);
        manager.subscribe_io_failed(move |failure| failures.borrow_mut().push(failure.clone()));
    }
    Counters { updated, failures }
}

#[test]
fn sequential_adds_assign_zero_based_distinct_ids() {
    let mut manager = TodoManager::new(ScriptedStore::default());

    let ids: Vec<_> = (0..5)
        .map(|n| manager.add(Record::with_text(format!("todo {n}"), "")).unwrap())
        .collect();

    assert_eq!(ids, vec![0, 1, 2, 3, 4]);
    let stored: Vec<_> = manager.records().iter().map(Record::id).collect();
    assert_eq!(stored, ids);
}

#[test]
fn load_advances_next_id_past_highest_loaded_id() {
    let store = ScriptedStore::with_records(vec![
        Record::from_parts(5, 0, "five", "", false, false),
        Record::from_parts(9, 0, "nine", "", false, false),
        Record::from_parts(2, 0, "two", "", false, false),
    ]);
    let mut manager = TodoManager::new(store);

    manager.load();
    let id = manager.add(Record::with_text("new", ""));

    assert_eq!(id, Some(10));
    assert_eq!(manager.len(), 4);
}

#[test]
fn load_of_largest_possible_id_is_a_failure() {
    let store = ScriptedStore::with_records(vec![
        Record::from_parts(3, 0, "ok", "", false, false),
        Record::from_parts(i64::MAX, 0, "no successor", "", false, false),
    ]);
    let mut manager = TodoManager::new(store);
    let counters = observe(&mut manager);

    manager.load();

    assert!(manager.is_empty());
    assert!(manager.has_failed());
    assert_eq!(manager.next_id(), 0);
    assert_eq!(counters.updated.get(), 0);
    let failures = counters.failures.borrow();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].operation, IoOperation::Load);
}

#[test]
fn add_refuses_once_ids_run_out() {
    let store = ScriptedStore::with_records(vec![Record::from_parts(
        i64::MAX - 1,
        0,
        "last",
        "",
        false,
        false,
    )]);
    let mut manager = TodoManager::new(store);
    manager.load();
    assert_eq!(manager.next_id(), i64::MAX);
    let counters = observe(&mut manager);

    assert_eq!(manager.add(Record::with_text("one more", "")), None);
    assert_eq!(manager.add(Record::with_text("and another", "")), None);

    assert_eq!(manager.len(), 1);
    assert_eq!(manager.next_id(), i64::MAX);
    assert_eq!(counters.updated.get(), 0);
    assert!(!manager.has_failed());
}

#[test]
fn edits_never_produce_duplicate_ids() {
    let mut manager = TodoManager::new(ScriptedStore::default());
    let a = manager.add(Record::with_text("a", "")).unwrap();
    let b = manager.add(Record::with_text("b", "")).unwrap();
    let created = manager.get_by_id(b).unwrap().created();

    {
        let mut record = manager.edit(b).unwrap();
        record.set_title("renamed");
        record.set_body("new body");
        record.set_done(true);
        record.set_archived(true);
        assert_eq!(record.id(), b);
    }
    manager.mark_dirty(b);

    let ids: Vec<_> = manager.records().iter().map(Record::id).collect();
    assert_eq!(ids, vec![a, b]);
    let edited = manager.get_by_id(b).unwrap();
    assert_eq!(edited.title(), "renamed");
    assert_eq!(edited.created(), created);
    assert!(manager.edit(42).is_none());
}

#[test]
fn loading_empty_store_raises_updated_and_no_failure() {
    let dir = tempfile::tempdir().unwrap();
    let mut manager = TodoManager::new(JsonFileStore::in_dir(dir.path()));
    let counters = observe(&mut manager);

    manager.load();

    assert!(manager.is_empty());
    assert_eq!(counters.updated.get(), 1);
    assert!(counters.failures.borrow().is_empty());
    assert!(!manager.has_failed());
}

#[test]
fn save_then_load_in_fresh_manager_restores_collection() {
    let dir = tempfile::tempdir().unwrap();
    let mut first = TodoManager::new(JsonFileStore::in_dir(dir.path()));
    first.add(Record::with_text("A", "alpha"));
    let b = first.add(Record::with_text("B", "beta")).unwrap();
    if let Some(mut record) = first.edit(b) {
        record.set_done(true);
        record.set_archived(true);
    }
    first.mark_dirty(b);
    first.save();

    let mut second = TodoManager::new(JsonFileStore::in_dir(dir.path()));
    second.load();

    assert_eq!(second.records(), first.records());
    assert_eq!(second.next_id(), 2);
}

#[test]
fn corrupt_load_leaves_list_empty_and_fires_single_failure() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::in_dir(dir.path());
    fs::write(store.path(), b"\x00\x01 definitely not json").unwrap();
    let mut manager = TodoManager::new(store);
    let counters = observe(&mut manager);

    manager.load();

    assert!(manager.records().is_empty());
    assert_eq!(counters.updated.get(), 0);
    let failures = counters.failures.borrow();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].operation, IoOperation::Load);
    assert!(manager.has_failed());
}

#[test]
fn failed_load_discards_previously_loaded_records() {
    let store = ScriptedStore::with_records(vec![Record::from_parts(0, 0, "a", "", false, false)]);
    let mut manager = TodoManager::new(store);
    manager.load();
    assert_eq!(manager.len(), 1);

    manager.store().fail_load.set(true);
    manager.load();

    assert!(manager.is_empty());
}

#[test]
fn failed_save_keeps_in_memory_list_and_sets_sticky_flag() {
    let mut manager = TodoManager::new(ScriptedStore::default());
    let counters = observe(&mut manager);
    manager.add(Record::with_text("keep me", ""));
    let before = manager.records().to_vec();

    manager.store().fail_save.set(true);
    manager.save();

    assert_eq!(manager.records(), before.as_slice());
    assert!(manager.has_failed());
    assert_eq!(counters.failures.borrow().len(), 1);
    assert_eq!(counters.failures.borrow()[0].operation, IoOperation::Save);
    assert!(counters.failures.borrow()[0].message.contains("disk full"));

    // The flag is informational: a retry after the medium recovers succeeds.
    manager.store().fail_save.set(false);
    manager.save();
    assert_eq!(manager.store().saves.get(), 1);
    assert_eq!(*manager.store().contents.borrow(), before);
    assert!(manager.has_failed());
}

#[test]
fn remove_by_missing_id_changes_nothing_but_still_notifies_once() {
    let mut manager = TodoManager::new(ScriptedStore::default());
    manager.add(Record::with_text("only", ""));
    let counters = observe(&mut manager);
    let before = manager.records().to_vec();

    let removed = manager.remove_by_id(42);

    assert!(!removed);
    assert_eq!(manager.records(), before.as_slice());
    assert_eq!(counters.updated.get(), 1);
}

// Removal notifies unconditionally, even when nothing matched; callers that
// want "notify only on change" must check the returned flag themselves.
#[test]
fn remove_by_value_notifies_unconditionally() {
    let mut manager = TodoManager::new(ScriptedStore::default());
    let id = manager.add(Record::with_text("x", "")).unwrap();
    let counters = observe(&mut manager);
    let snapshot = manager.get_by_id(id).cloned().unwrap();

    assert!(manager.remove(&snapshot));
    assert!(!manager.remove(&snapshot));

    assert!(manager.is_empty());
    assert_eq!(counters.updated.get(), 2);
}

#[test]
fn remove_by_id_removes_only_first_match() {
    let store = ScriptedStore::with_records(vec![
        Record::from_parts(1, 0, "first", "", false, false),
        Record::from_parts(1, 0, "duplicate", "", false, false),
    ]);
    let mut manager = TodoManager::new(store);
    manager.load();

    assert!(manager.remove_by_id(1));
    assert_eq!(manager.len(), 1);
    assert_eq!(manager.records()[0].title(), "duplicate");
}

#[test]
fn mark_dirty_only_notifies() {
    let mut manager = TodoManager::new(ScriptedStore::default());
    let id = manager.add(Record::with_text("t", "b")).unwrap();
    let before = manager.records().to_vec();
    let counters = observe(&mut manager);

    manager.mark_dirty(id);

    assert_eq!(manager.records(), before.as_slice());
    assert_eq!(counters.updated.get(), 1);
    assert_eq!(manager.store().saves.get(), 0);
}

#[test]
fn get_by_id_absent_is_none() {
    let manager = TodoManager::new(ScriptedStore::default());
    assert!(manager.get_by_id(0).is_none());
}

#[test]
fn listeners_fire_in_order_allow_duplicates_and_unsubscribe() {
    let mut manager = TodoManager::new(ScriptedStore::default());
    let log = Rc::new(RefCell::new(Vec::new()));

    let make = |tag: &'static str| {
        let log = Rc::clone(&log);
        move |records: &[Record]| log.borrow_mut().push((tag, records.len()))
    };
    let first = manager.subscribe_updated(make("first"));
    manager.subscribe_updated(make("second"));
    manager.subscribe_updated(make("first"));

    manager.add(Record::new());
    assert_eq!(
        *log.borrow(),
        vec![("first", 1), ("second", 1), ("first", 1)]
    );

    log.borrow_mut().clear();
    assert!(manager.unsubscribe(first));
    manager.add(Record::new());
    assert_eq!(*log.borrow(), vec![("second", 2), ("first", 2)]);
}

#[test]
fn updated_listener_sees_list_after_change() {
    let mut manager = TodoManager::new(ScriptedStore::default());
    let seen = Rc::new(RefCell::new(Vec::new()));
    {
        let seen = Rc::clone(&seen);
        manager.subscribe_updated(move |records| {
            *seen.borrow_mut() = records.iter().map(|r| r.title().to_string()).collect();
        });
    }

    manager.add(Record::with_text("a", ""));
    let b = manager.add(Record::with_text("b", "")).unwrap();
    manager.remove_by_id(b);

    assert_eq!(*seen.borrow(), vec!["a".to_string()]);
}
