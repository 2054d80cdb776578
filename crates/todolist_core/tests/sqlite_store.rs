use todolist_core::db::schema::{current_user_version, SCHEMA_VERSION};
use todolist_core::{open_db, open_db_in_memory, Record, SqliteTodoStore, StoreError, TodoStore};

fn sample_records() -> Vec<Record> {
    vec![
        Record::from_parts(9, 1_000, "Last id first", "order matters", false, false),
        Record::from_parts(2, 2_000, "Second", "", true, true),
        Record::from_parts(5, 3_000, "Third", "line 1\nline 2", false, true),
    ]
}

#[test]
fn fresh_database_loads_empty_and_is_stamped() {
    let conn = open_db_in_memory().unwrap();
    assert_eq!(current_user_version(&conn).unwrap(), SCHEMA_VERSION);

    let store = SqliteTodoStore::new(&conn);
    assert!(store.load().unwrap().is_empty());
}

#[test]
fn save_then_load_roundtrip_keeps_order_and_fields() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteTodoStore::new(&conn);
    let records = sample_records();

    store.save(&records).unwrap();
    assert_eq!(store.load().unwrap(), records);

    store.save(&records[..1]).unwrap();
    assert_eq!(store.load().unwrap(), records[..1].to_vec());
}

#[test]
fn file_database_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("todolist.sqlite3");

    {
        let conn = open_db(&path).unwrap();
        SqliteTodoStore::new(&conn).save(&sample_records()).unwrap();
    }

    let conn = open_db(&path).unwrap();
    let store = SqliteTodoStore::new(&conn);
    assert_eq!(store.load().unwrap(), sample_records());
    assert!(store.name().contains("todolist.sqlite3"));
}

#[test]
fn invalid_flag_value_fails_with_deserialization_error() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO todo_items (position, id, created, title, body, done, archived)
         VALUES (0, 1, 0, 't', 'b', 2, 0);",
        [],
    )
    .unwrap();

    let err = SqliteTodoStore::new(&conn).load().unwrap_err();
    assert!(matches!(err, StoreError::Deserialization { .. }), "got {err}");
    assert!(err.to_string().contains("todo_items.done"));
}

#[test]
fn newer_schema_version_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.sqlite3");
    {
        let conn = rusqlite::Connection::open(&path).unwrap();
        conn.execute_batch("PRAGMA user_version = 99;").unwrap();
    }

    let err = open_db(&path).unwrap_err();
    assert!(matches!(
        err,
        StoreError::UnsupportedSchema {
            found: 99,
            supported: SCHEMA_VERSION,
            ..
        }
    ));
    assert_eq!(err.code(), "store_schema_unsupported");
    assert!(err.to_string().contains("future.sqlite3"), "got {err}");
}
