use std::sync::Arc;
use std::thread;

use d_engine_rocksdb_store::Error;
use d_engine_rocksdb_store::LogRecord;
use d_engine_rocksdb_store::LogStore;
use d_engine_rocksdb_store::StableStore;
use rand::Rng;

use crate::common::open_store;

const WRITERS: u64 = 8;
const PER_WRITER: u64 = 500;

fn random_record(
    rng: &mut impl Rng,
    index: u64,
) -> LogRecord {
    let len = rng.gen_range(0..512);
    let payload: Vec<u8> = (0..len).map(|_| rng.gen()).collect();
    LogRecord::command(index, rng.gen_range(1..100), payload)
}

#[test]
fn test_concurrent_writers_on_disjoint_indices() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(open_store(dir.path()));

    let handles: Vec<_> = (0..WRITERS)
        .map(|writer| {
            let store = store.clone();
            thread::spawn(move || {
                let mut rng = rand::thread_rng();
                let base = writer * PER_WRITER + 1;
                let mut written = Vec::with_capacity(PER_WRITER as usize);
                let mut next = base;

                while next < base + PER_WRITER {
                    let batch_len = rng.gen_range(1..=16).min(base + PER_WRITER - next);
                    let batch: Vec<LogRecord> =
                        (next..next + batch_len).map(|i| random_record(&mut rng, i)).collect();
                    store.store_logs(&batch).unwrap();

                    // read back something this writer already wrote
                    let probe = rng.gen_range(base..next + batch_len);
                    assert_eq!(store.get_log(probe).unwrap().index, probe);

                    written.extend(batch);
                    next += batch_len;
                }
                store.set_uint64(format!("writer-{writer}").as_bytes(), next).unwrap();
                written
            })
        })
        .collect();

    let mut all = Vec::new();
    for handle in handles {
        all.extend(handle.join().unwrap());
    }

    assert_eq!(all.len() as u64, WRITERS * PER_WRITER);
    for record in &all {
        assert_eq!(&store.get_log(record.index).unwrap(), record);
    }
    assert_eq!(store.first_index().unwrap(), 1);
    assert_eq!(store.last_index().unwrap(), WRITERS * PER_WRITER);
    for writer in 0..WRITERS {
        let end = store.get_uint64(format!("writer-{writer}").as_bytes()).unwrap();
        assert_eq!(end, (writer + 1) * PER_WRITER + 1);
    }
}

#[test]
fn test_close_racing_operations_only_yields_closed() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(open_store(dir.path()));

    let handles: Vec<_> = (0..4u64)
        .map(|worker| {
            let store = store.clone();
            thread::spawn(move || {
                for i in 0..10_000u64 {
                    let index = worker * 10_000 + i + 1;
                    let result = store
                        .store_log(&LogRecord::noop(index, 1))
                        .and_then(|_| store.get_log(index).map(|_| ()));
                    match result {
                        Ok(()) => {}
                        Err(Error::Closed) => return,
                        Err(e) => panic!("unexpected error: {e:?}"),
                    }
                }
            })
        })
        .collect();

    thread::sleep(std::time::Duration::from_millis(20));
    store.close().unwrap();

    for handle in handles {
        handle.join().unwrap();
    }
    assert!(store.is_closed());
}
