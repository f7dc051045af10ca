use std::ops::RangeInclusive;
use std::sync::Arc;

use parking_lot::Mutex;
use tempfile::TempDir;

use crate::BincodeCodec;
use crate::DiagnosticsSink;
use crate::EngineEvent;
use crate::EventListener;
use crate::LogRecord;
use crate::MemEngine;
use crate::RaftStore;
use crate::StoreConfig;

/// Records with index and term `i` and a 1KB payload.
pub fn create_records(range: RangeInclusive<u64>) -> Vec<LogRecord> {
    range
        .map(|i| LogRecord::command(i, i, vec![i as u8; 1024]).with_metadata(i.to_be_bytes().to_vec()))
        .collect()
}

/// Collects every event it is handed.
#[derive(Default)]
pub struct RecordingListener {
    events: Mutex<Vec<EngineEvent>>,
}

impl RecordingListener {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn events(&self) -> Vec<EngineEvent> {
        self.events.lock().clone()
    }

    pub fn kinds(&self) -> Vec<&'static str> {
        self.events.lock().iter().map(EngineEvent::kind).collect()
    }

    pub fn contains(
        &self,
        kind: &str,
    ) -> bool {
        self.events.lock().iter().any(|e| e.kind() == kind)
    }
}

impl EventListener for RecordingListener {
    fn on_event(
        &self,
        event: &EngineEvent,
    ) {
        self.events.lock().push(event.clone());
    }
}

/// Store over a [`MemEngine`] whose events go to the store's own sink.
pub fn mem_store() -> RaftStore<MemEngine, BincodeCodec> {
    let diagnostics = Arc::new(DiagnosticsSink::new());
    let engine = MemEngine::with_listener(diagnostics.clone());
    RaftStore::from_parts(engine, BincodeCodec, diagnostics)
}

/// Small-footprint configuration for on-disk tests.
pub fn test_config() -> StoreConfig {
    let mut config = StoreConfig::default();
    config.engine.lru_cache_size = 8 * 1024 * 1024;
    config.engine.write_buffer_size = 4 * 1024 * 1024;
    config.engine.max_open_files = 256;
    config.engine.max_concurrent_compactions = 2;
    config.diagnostics.poll_interval_in_ms = 20;
    config
}

/// RocksDB store in a fresh temporary directory.
///
/// The directory must outlive the store.
pub fn rocksdb_store() -> (RaftStore, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let store = RaftStore::open(dir.path(), test_config()).unwrap();
    (store, dir)
}
