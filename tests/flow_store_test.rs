//! Persistence-store semantics: idempotent save/load, sidecars, and the
//! observability records.

mod common;

use common::temp_store;
use flowsync::{ChangeNotification, SyncStatusRecord};

#[test]
fn save_then_load_round_trips() {
    let (_dir, store) = temp_store();

    for id in ["flow-1", "a2b4-ccdd", "x"] {
        store.save(id).unwrap();
        assert_eq!(store.load().as_deref(), Some(id));
    }
}

#[test]
fn double_save_is_idempotent() {
    let (_dir, store) = temp_store();

    store.save("flow-7").unwrap();
    store.save("flow-7").unwrap();
    assert_eq!(store.load().as_deref(), Some("flow-7"));
}

#[test]
fn save_overwrites_previous_value() {
    let (_dir, store) = temp_store();

    store.save("old").unwrap();
    store.save("new").unwrap();
    assert_eq!(store.load().as_deref(), Some("new"));
}

#[test]
fn load_absent_is_none() {
    let (_dir, store) = temp_store();
    assert!(store.load().is_none());
}

#[test]
fn two_stores_share_the_record() {
    // Two processes over the same directory: a reader sees what the
    // other wrote; the last writer wins.
    let (dir, writer) = temp_store();
    let reader = flowsync::FlowIdStore::new(dir.path());

    writer.save("flow-a").unwrap();
    assert_eq!(reader.load().as_deref(), Some("flow-a"));

    reader.save("flow-b").unwrap();
    assert_eq!(writer.load().as_deref(), Some("flow-b"));
}

#[test]
fn sync_status_round_trips() {
    let (_dir, store) = temp_store();

    let record = SyncStatusRecord::new("flow-9", 3, 4);
    store.write_sync_status(&record).unwrap();

    let back = store.read_sync_status().unwrap();
    assert_eq!(back.flow_id, "flow-9");
    assert_eq!(back.tasks_completed, 3);
    assert_eq!(back.total_tasks, 4);
    assert!(!back.sync_success);
}

#[test]
fn sync_status_is_fully_overwritten() {
    let (_dir, store) = temp_store();

    store
        .write_sync_status(&SyncStatusRecord::new("flow-1", 2, 4))
        .unwrap();
    store
        .write_sync_status(&SyncStatusRecord::new("flow-2", 4, 4))
        .unwrap();

    let back = store.read_sync_status().unwrap();
    assert_eq!(back.flow_id, "flow-2");
    assert!(back.sync_success);
}

#[test]
fn change_notification_round_trips() {
    let (_dir, store) = temp_store();

    let notification = ChangeNotification::new(Some("a".to_string()), "b");
    store.write_change_notification(&notification).unwrap();

    let back = store.read_change_notification().unwrap();
    assert_eq!(back.old_flow_id.as_deref(), Some("a"));
    assert_eq!(back.new_flow_id, "b");
    assert!(back.message.contains("a"));
    assert!(back.message.contains("b"));
}

#[test]
fn dependent_sync_records_written() {
    let (dir, store) = temp_store();

    store.write_backend_sync("flow-5").unwrap();
    store.write_frontend_sync("flow-5").unwrap();

    for name in ["backend_env_sync.json", "frontend_sync.json"] {
        let raw = std::fs::read_to_string(dir.path().join(name)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["flow_id"], "flow-5");
        assert!(value["timestamp"].as_i64().unwrap() > 0);
    }
}

#[test]
fn no_temp_files_left_behind() {
    let (dir, store) = temp_store();

    store.save("flow-1").unwrap();
    store
        .write_sync_status(&SyncStatusRecord::new("flow-1", 4, 4))
        .unwrap();

    let leftovers: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .filter_map(Result::ok)
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .filter(|name| name.ends_with(".tmp"))
        .collect();
    assert!(leftovers.is_empty(), "temp files left behind: {leftovers:?}");
}
