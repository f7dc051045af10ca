use d_engine_rocksdb_store::Error;
use d_engine_rocksdb_store::LogRecord;
use d_engine_rocksdb_store::LogStore;
use d_engine_rocksdb_store::StableStore;

use crate::common::open_store;

#[test]
fn test_store_truncate_and_close() {
    let dir = tempfile::tempdir().unwrap();
    let store = open_store(dir.path());

    store
        .store_logs(&[LogRecord::noop(1, 1), LogRecord::noop(2, 1), LogRecord::noop(3, 1)])
        .unwrap();
    assert_eq!(store.first_index().unwrap(), 1);
    assert_eq!(store.last_index().unwrap(), 3);

    store.delete_range(1, 2).unwrap();
    assert_eq!(store.first_index().unwrap(), 3);
    assert!(store.get_log(1).unwrap_err().is_log_not_found());
    assert_eq!(store.get_log(3).unwrap(), LogRecord::noop(3, 1));

    store.set_uint64(b"term", 5).unwrap();
    assert_eq!(store.get_uint64(b"term").unwrap(), 5);

    store.close().unwrap();
    assert!(matches!(store.get(b"term"), Err(Error::Closed)));
    assert!(store.diagnostics().fatal().is_none());
}

#[test]
fn test_follower_conflict_truncation() {
    let dir = tempfile::tempdir().unwrap();
    let store = open_store(dir.path());
    store.store_logs(&crate::common::records(1..=10)).unwrap();

    // a new leader overwrites the divergent suffix
    store.delete_range(8, u64::MAX).unwrap();
    store
        .store_logs(&[LogRecord::command(8, 3, b"a".to_vec()), LogRecord::command(9, 3, b"b".to_vec())])
        .unwrap();

    assert_eq!(store.last_index().unwrap(), 9);
    assert_eq!(store.get_log(8).unwrap().term, 3);
    assert!(store.get_log(10).unwrap_err().is_log_not_found());
}
