use d_engine_rocksdb_store::LogStore;
use d_engine_rocksdb_store::StableStore;

use crate::common::open_store;
use crate::common::records;

#[test]
fn test_state_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let written = records(1..=50);
    {
        let store = open_store(dir.path());
        store.store_logs(&written).unwrap();
        store.set(b"vote", b"node-3").unwrap();
        store.set(b"empty", b"").unwrap();
        store.set_uint64(b"term", 12).unwrap();
        store.close().unwrap();
    }

    let store = open_store(dir.path());
    assert_eq!(store.first_index().unwrap(), 1);
    assert_eq!(store.last_index().unwrap(), 50);
    for record in &written {
        assert_eq!(&store.get_log(record.index).unwrap(), record);
    }
    assert_eq!(store.get(b"vote").unwrap(), b"node-3".to_vec());
    assert_eq!(store.get(b"empty").unwrap(), Vec::<u8>::new());
    assert_eq!(store.get_uint64(b"term").unwrap(), 12);
}

#[test]
fn test_synced_truncation_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    {
        let store = open_store(dir.path());
        store.store_logs(&records(1..=20)).unwrap();
        store.delete_range(1, 15).unwrap();
        store.sync().unwrap();
        store.close().unwrap();
    }

    let store = open_store(dir.path());
    assert_eq!(store.first_index().unwrap(), 16);
    assert_eq!(store.last_index().unwrap(), 20);
    assert!(store.get_log(15).unwrap_err().is_log_not_found());
}

#[test]
fn test_dropped_store_releases_the_database() {
    let dir = tempfile::tempdir().unwrap();
    {
        let store = open_store(dir.path());
        store.set_uint64(b"term", 1).unwrap();
    }

    // reopening would fail on the engine's lock file if the handle leaked
    let store = open_store(dir.path());
    assert_eq!(store.get_uint64(b"term").unwrap(), 1);
}

#[test]
fn test_missing_stable_keys_stay_missing_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    drop(open_store(dir.path()));

    let store = open_store(dir.path());
    assert!(store.get_uint64(b"term").unwrap_err().is_not_found());
    assert!(store.get(b"vote").unwrap_err().is_not_found());
    assert_eq!(store.last_index().unwrap(), 0);
}
