mod event_monitor;
mod rocksdb_engine;

pub(crate) use event_monitor::EventMonitor;
pub(crate) use event_monitor::MonitoredPaths;
pub use rocksdb_engine::RocksDbEngine;
