use std::ops::RangeInclusive;
use std::path::Path;

use d_engine_rocksdb_store::LogRecord;
use d_engine_rocksdb_store::RaftStore;
use d_engine_rocksdb_store::StoreConfig;

pub fn test_config() -> StoreConfig {
    let mut config = StoreConfig::default();
    config.engine.lru_cache_size = 8 * 1024 * 1024;
    config.engine.write_buffer_size = 4 * 1024 * 1024;
    config.engine.max_open_files = 256;
    config.engine.max_concurrent_compactions = 2;
    config.diagnostics.poll_interval_in_ms = 50;
    config
}

pub fn open_store(path: &Path) -> RaftStore {
    RaftStore::open(path, test_config()).expect("open store")
}

pub fn records(range: RangeInclusive<u64>) -> Vec<LogRecord> {
    range
        .map(|i| LogRecord::command(i, 1 + i / 10, format!("cmd-{i}").into_bytes()))
        .collect()
}
