use super::*;

#[test]
fn memory_store_clones_share_values() {
    let handle = MemorySlotStore::new();
    let mut writer = handle.clone();

    writer.set("tasks", "[]").expect("set");

    assert_eq!(handle.raw("tasks").as_deref(), Some("[]"));
    assert_eq!(handle.write_count(), 1);
}

#[test]
fn memory_store_rejects_writes_while_unavailable() {
    let mut store = MemorySlotStore::with_value("tasks", "[1]");
    store.set_unavailable(true);

    assert!(store.set("tasks", "[]").is_err());
    assert_eq!(store.get("tasks").expect("get").as_deref(), Some("[1]"));
    assert_eq!(store.write_count(), 0);

    store.set_unavailable(false);
    store.set("tasks", "[]").expect("set after recovery");
    assert_eq!(store.write_count(), 1);
}

#[test]
fn file_store_survives_reopen() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("nested").join("slots.json");

    let mut store = FileSlotStore::open(&path).expect("open");
    store.set("tasks", r#"[{"id":1}]"#).expect("set");
    store.set("other", "x").expect("set other");
    store.remove("other").expect("remove");
    drop(store);

    let reopened = FileSlotStore::open(&path).expect("reopen");
    assert_eq!(
        reopened.get("tasks").expect("get").as_deref(),
        Some(r#"[{"id":1}]"#)
    );
    assert_eq!(reopened.get("other").expect("get"), None);
}

#[test]
fn file_store_moves_unreadable_file_aside() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("slots.json");
    fs::write(&path, "not json at all").expect("seed");

    let store = FileSlotStore::open(&path).expect("open");

    assert_eq!(store.get("tasks").expect("get"), None);
    let backup = dir.path().join("slots.json.corrupt");
    assert_eq!(
        fs::read_to_string(backup).expect("backup kept"),
        "not json at all"
    );
}

#[test]
fn missing_key_reads_as_none() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = FileSlotStore::open(dir.path().join("slots.json")).expect("open");
    assert_eq!(store.get("tasks").expect("get"), None);
}

#[test]
fn sqlite_store_round_trips_and_overwrites() {
    let mut store = SqliteSlotStore::open("sqlite::memory:").expect("db");
    store.health_check().expect("health check");

    assert_eq!(store.get("tasks").expect("get"), None);
    store.set("tasks", "[]").expect("set");
    store.set("tasks", "[1]").expect("overwrite");
    assert_eq!(store.get("tasks").expect("get").as_deref(), Some("[1]"));

    store.remove("tasks").expect("remove");
    assert_eq!(store.get("tasks").expect("get"), None);
}

#[test]
fn sqlite_store_creates_database_file_when_missing() {
    let dir = tempfile::tempdir().expect("tempdir");
    let db_path = dir.path().join("nested").join("tasks.db");
    let database_url = format!("sqlite://{}", db_path.to_string_lossy().replace('\\', "/"));

    let mut store = SqliteSlotStore::open(&database_url).expect("db");
    store.set("tasks", "[]").expect("set");
    drop(store);

    assert!(
        db_path.exists(),
        "database file should exist: {}",
        db_path.display()
    );

    let reopened = SqliteSlotStore::open(&database_url).expect("reopen");
    assert_eq!(reopened.get("tasks").expect("get").as_deref(), Some("[]"));
}

#[test]
fn normalizes_plain_file_path_to_sqlite_url() {
    assert_eq!(
        normalize_database_url("./data/tasks.db"),
        "sqlite://./data/tasks.db"
    );
    assert_eq!(normalize_database_url("sqlite::memory:"), "sqlite::memory:");
}
