use super::*;
use crate::{
    clock::ManualClock,
    confirm::{AlwaysConfirm, NeverConfirm},
    ids::SequentialIds,
};
use chrono::{TimeZone, Utc};
use shared::error::ErrorCode;
use std::{cell::RefCell, rc::Rc};
use storage::MemorySlotStore;

fn clock() -> ManualClock {
    ManualClock::new(Utc.with_ymd_and_hms(2024, 3, 9, 8, 30, 0).unwrap())
}

fn loaded_store(slot: MemorySlotStore) -> TaskStore<MemorySlotStore> {
    let mut store = TaskStore::with_sources(slot, SequentialIds::default(), clock());
    store.load();
    store
}

fn persisted(slot: &MemorySlotStore) -> Vec<Task> {
    decode_task_list(&slot.raw(TASKS_KEY).expect("tasks slot written")).expect("decode")
}

#[test]
fn add_trims_text_and_appends_in_order() {
    let slot = MemorySlotStore::new();
    let mut store = loaded_store(slot.clone());

    let first = store.add("  Buy milk  ").expect("added");
    let second = store.add("Walk dog").expect("added");

    let texts: Vec<&str> = store.tasks().iter().map(|task| task.text.as_str()).collect();
    assert_eq!(texts, ["Buy milk", "Walk dog"]);
    assert_eq!(store.tasks()[0].id, first);
    assert_eq!(store.tasks()[1].id, second);
    assert!(store.tasks().iter().all(|task| !task.completed));
    assert_eq!(store.tasks()[0].created_at, clock().now());
    assert_eq!(persisted(&slot), store.tasks());
}

#[test]
fn blank_add_writes_nothing_and_signals_nothing() {
    let slot = MemorySlotStore::new();
    let mut store = loaded_store(slot.clone());
    let signals = Rc::new(RefCell::new(0));
    let counter = Rc::clone(&signals);
    store.subscribe(move |_, _| *counter.borrow_mut() += 1);

    assert_eq!(store.add(""), None);
    assert_eq!(store.add("   \t"), None);

    assert!(store.is_empty());
    assert_eq!(slot.write_count(), 0);
    assert_eq!(*signals.borrow(), 0);
}

#[test]
fn toggle_twice_restores_original_state() {
    let slot = MemorySlotStore::new();
    let mut store = loaded_store(slot.clone());
    let milk = store.add("Buy milk").expect("added");
    let dog = store.add("Walk dog").expect("added");

    assert!(store.toggle(milk));
    assert!(store.get(milk).expect("milk").completed);
    assert!(!store.get(dog).expect("dog").completed);

    let before = store.tasks().to_vec();
    assert!(store.toggle(dog));
    assert!(store.toggle(dog));
    assert_eq!(store.tasks(), before.as_slice());
    assert_eq!(persisted(&slot), before);
}

#[test]
fn unknown_ids_are_silent_no_ops() {
    let slot = MemorySlotStore::new();
    let mut store = loaded_store(slot.clone());
    store.add("X").expect("added");
    let writes = slot.write_count();

    assert!(!store.toggle(TaskId(999)));
    assert!(!store.delete(TaskId(999)));

    assert_eq!(slot.write_count(), writes);
    assert_eq!(store.len(), 1);
}

#[test]
fn delete_is_idempotent() {
    let slot = MemorySlotStore::new();
    let mut store = loaded_store(slot.clone());
    let keep = store.add("keep").expect("added");
    let gone = store.add("gone").expect("added");

    assert!(store.delete(gone));
    let after_once = store.tasks().to_vec();
    assert!(!store.delete(gone));

    assert_eq!(store.tasks(), after_once.as_slice());
    assert_eq!(store.tasks()[0].id, keep);
    assert_eq!(persisted(&slot), after_once);
}

#[test]
fn clear_all_requires_confirmation() {
    let slot = MemorySlotStore::new();
    let mut store = loaded_store(slot.clone());
    store.add("A").expect("added");
    store.add("B").expect("added");

    assert!(!store.clear_all(&mut NeverConfirm));
    assert_eq!(store.len(), 2);

    let mut asked = Vec::new();
    let cleared = store.clear_all(&mut |question: &str| {
        asked.push(question.to_string());
        true
    });

    assert!(cleared);
    assert!(store.is_empty());
    assert_eq!(asked, [CLEAR_ALL_PROMPT]);
    assert_eq!(slot.raw(TASKS_KEY).as_deref(), Some("[]"));
}

#[test]
fn clear_all_on_empty_list_never_prompts() {
    let slot = MemorySlotStore::new();
    let mut store = loaded_store(slot.clone());
    let mut prompted = false;

    let cleared = store.clear_all(&mut |_: &str| {
        prompted = true;
        true
    });

    assert!(!cleared);
    assert!(!prompted);
    assert_eq!(slot.write_count(), 0);
}

#[test]
fn listeners_receive_each_change_after_it_is_persisted() {
    let slot = MemorySlotStore::new();
    let mut store = TaskStore::with_sources(slot.clone(), SequentialIds::default(), clock());
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&events);
    let observed_slot = slot.clone();
    store.subscribe(move |event, tasks| {
        let on_disk = observed_slot
            .raw(TASKS_KEY)
            .map(|raw| decode_task_list(&raw).expect("decode"))
            .unwrap_or_default();
        assert_eq!(on_disk, tasks);
        sink.borrow_mut().push((*event, tasks.len()));
    });

    store.load();
    let id = store.add("A").expect("added");
    store.toggle(id);
    store.delete(id);
    store.add("B").expect("added");
    store.clear_all(&mut AlwaysConfirm);

    assert_eq!(
        *events.borrow(),
        vec![
            (StoreEvent::Loaded, 0),
            (StoreEvent::Added(id), 1),
            (StoreEvent::Toggled(id), 1),
            (StoreEvent::Deleted(id), 0),
            (StoreEvent::Added(TaskId(2)), 1),
            (StoreEvent::Cleared, 0),
        ]
    );
}

#[test]
fn load_restores_persisted_list_and_skips_used_ids() {
    let raw = r#"[{"id":5,"text":"Done already","completed":true,"createdAt":"2024-01-01T00:00:00.000Z"}]"#;
    let slot = MemorySlotStore::with_value(TASKS_KEY, raw);
    let mut store = loaded_store(slot);

    assert_eq!(store.len(), 1);
    assert_eq!(
        store.counts(),
        TaskCounts {
            total: 1,
            completed: 1
        }
    );
    assert_eq!(store.add("next"), Some(TaskId(6)));
}

#[test]
fn malformed_slot_fails_closed_and_keeps_a_copy() {
    let slot = MemorySlotStore::with_value(TASKS_KEY, "[{broken");
    let mut store = loaded_store(slot.clone());

    assert!(store.is_empty());
    assert_eq!(slot.raw(CORRUPT_TASKS_KEY).as_deref(), Some("[{broken"));
    let notice = store.take_notice().expect("notice raised");
    assert_eq!(notice.code, ErrorCode::CorruptState);
    assert_eq!(store.take_notice(), None);

    store.add("fresh start").expect("added");
    assert_eq!(persisted(&slot).len(), 1);
}

#[test]
fn load_drops_blank_and_duplicate_records() {
    let raw = r#"[
        {"id":1,"text":"one","completed":false,"createdAt":"2024-01-01T00:00:00.000Z"},
        {"id":1,"text":"dupe","completed":false,"createdAt":"2024-01-01T00:00:00.000Z"},
        {"id":2,"text":"   ","completed":false,"createdAt":"2024-01-01T00:00:00.000Z"}
    ]"#;
    let store = loaded_store(MemorySlotStore::with_value(TASKS_KEY, raw));

    assert_eq!(store.len(), 1);
    assert_eq!(store.tasks()[0].text, "one");
}

#[test]
fn failed_write_keeps_memory_state_and_raises_notice() {
    let slot = MemorySlotStore::new();
    let mut store = loaded_store(slot.clone());
    slot.set_unavailable(true);

    let id = store.add("offline").expect("still added in memory");

    assert_eq!(store.get(id).map(|task| task.text.as_str()), Some("offline"));
    assert_eq!(slot.raw(TASKS_KEY), None);
    let notice = store.take_notice().expect("notice raised");
    assert_eq!(notice.code, ErrorCode::StorageUnavailable);

    slot.set_unavailable(false);
    store.toggle(id);
    assert_eq!(persisted(&slot), store.tasks());
    assert_eq!(store.take_notice(), None);
}

#[test]
fn counts_track_completed_tasks() {
    let mut store = loaded_store(MemorySlotStore::new());
    let a = store.add("a").expect("added");
    store.add("b").expect("added");
    store.toggle(a);

    let counts = store.counts();
    assert_eq!(counts.total, 2);
    assert_eq!(counts.completed, 1);
    assert_eq!(counts.total_label(), "Total : 2");
    assert_eq!(counts.completed_label(), "Completed: 1");
}

#[test]
fn add_after_loading_the_largest_id_reports_exhaustion() {
    let raw = format!(
        r#"[{{"id":{},"text":"last one","completed":false,"createdAt":"2024-01-01T00:00:00.000Z"}}]"#,
        i64::MAX
    );
    let slot = MemorySlotStore::with_value(TASKS_KEY, &raw);
    let mut store = TaskStore::new(slot.clone());
    store.load();
    let writes = slot.write_count();

    assert_eq!(store.add("y"), None);

    assert_eq!(store.len(), 1);
    assert_eq!(slot.write_count(), writes);
    let notice = store.take_notice().expect("notice raised");
    assert_eq!(notice.code, ErrorCode::IdsExhausted);

    assert!(store.toggle(TaskId(i64::MAX)));
    assert!(store.delete(TaskId(i64::MAX)));
}

#[test]
fn byte_order_mark_only_text_is_rejected() {
    let slot = MemorySlotStore::new();
    let mut store = loaded_store(slot.clone());

    assert_eq!(store.add("\u{FEFF}"), None);
    assert_eq!(store.add(" \u{FEFF}\t"), None);
    assert!(store.is_empty());
    assert_eq!(slot.write_count(), 0);

    store.add("\u{FEFF}Buy milk ").expect("added");
    assert_eq!(store.tasks()[0].text, "Buy milk");
}
