use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use std::time::Instant;

use parking_lot::Mutex;
use rocksdb::BlockBasedOptions;
use rocksdb::Cache;
use rocksdb::DBCompressionType;
use rocksdb::Options;
use rocksdb::ReadOptions;
use rocksdb::WriteOptions;
use rocksdb::DB;
use tracing::debug;
use tracing::instrument;
use tracing::warn;

use super::EventMonitor;
use super::MonitoredPaths;
use crate::constants::DATA_DIR;
use crate::constants::WAL_DIR;
use crate::BatchOp;
use crate::DiskSlowInfo;
use crate::Durability;
use crate::EngineConfig;
use crate::EngineEvent;
use crate::Error;
use crate::EventListener;
use crate::KvEngine;
use crate::Result;
use crate::StorageError;
use crate::StoreConfig;
use crate::WriteBatch;

/// [`KvEngine`] over a single RocksDB instance.
///
/// Data files live in `<root>/data`, the write-ahead log in `<root>/wal`.
pub struct RocksDbEngine {
    db: Arc<DB>,
    listener: Arc<dyn EventListener>,
    disk_slow_threshold: Duration,
    monitor: Mutex<Option<EventMonitor>>,
}

impl From<rocksdb::Error> for Error {
    fn from(e: rocksdb::Error) -> Self {
        StorageError::DbError(e.into_string()).into()
    }
}

impl RocksDbEngine {
    /// Opens the database, creating directories as needed, and starts the
    /// background event monitor when enabled.
    ///
    /// `listener` receives every background event; it is also called from
    /// foreground threads for disk slow reports.
    pub fn open(
        path: impl AsRef<Path>,
        config: &StoreConfig,
        listener: Arc<dyn EventListener>,
    ) -> Result<Self> {
        let root = path.as_ref();
        let data_dir = root.join(DATA_DIR);
        let wal_dir = root.join(WAL_DIR);

        for dir in [&data_dir, &wal_dir] {
            fs::create_dir_all(dir).map_err(|source| StorageError::PathError {
                path: dir.clone(),
                source,
            })?;
        }

        let opts = build_options(&config.engine, &wal_dir);
        let db = DB::open(&opts, &data_dir).map_err(|e| {
            warn!("Try to open DB at this location: {:?} and failed: {:?}", data_dir, e);
            e
        })?;
        let db = Arc::new(db);

        let monitor = if config.diagnostics.enable_event_monitor {
            let paths = MonitoredPaths {
                data_dir: data_dir.clone(),
                wal_dir: wal_dir.clone(),
            };
            Some(EventMonitor::spawn(
                db.clone(),
                paths,
                listener.clone(),
                config.diagnostics.poll_interval(),
            )?)
        } else {
            None
        };

        debug!(?data_dir, ?wal_dir, monitored = monitor.is_some(), "rocksdb engine opened");

        Ok(Self {
            db,
            listener,
            disk_slow_threshold: config.diagnostics.disk_slow_threshold(),
            monitor: Mutex::new(monitor),
        })
    }

    fn write_options(durability: Durability) -> WriteOptions {
        let mut opts = WriteOptions::default();
        opts.set_sync(durability.is_sync());
        opts
    }

    /// Reports synced commits that took longer than the disk slow threshold.
    fn observe_latency(
        &self,
        operation: &'static str,
        durability: Durability,
        started: Instant,
    ) {
        if !durability.is_sync() {
            return;
        }
        let duration = started.elapsed();
        if duration >= self.disk_slow_threshold {
            warn!(operation, ?duration, "slow disk");
            self.listener.on_event(&EngineEvent::DiskSlow(DiskSlowInfo {
                operation,
                duration,
            }));
        }
    }

    fn commit(
        &self,
        batch: rocksdb::WriteBatch,
        durability: Durability,
        operation: &'static str,
    ) -> Result<()> {
        let started = Instant::now();
        self.db.write_opt(batch, &Self::write_options(durability))?;
        self.observe_latency(operation, durability, started);
        Ok(())
    }

    fn bounded_read_options(
        lower: &[u8],
        upper: &[u8],
    ) -> ReadOptions {
        let mut opts = ReadOptions::default();
        opts.set_iterate_lower_bound(lower.to_vec());
        opts.set_iterate_upper_bound(upper.to_vec());
        opts
    }

    /// First or last key of `[lower, upper)`. The iterator is dropped on
    /// every path out of this function.
    fn edge_key(
        &self,
        lower: &[u8],
        upper: &[u8],
        last: bool,
    ) -> Result<Option<Vec<u8>>> {
        let mut iter = self.db.raw_iterator_opt(Self::bounded_read_options(lower, upper));
        if last {
            iter.seek_to_last();
        } else {
            iter.seek_to_first();
        }

        let key = if iter.valid() { iter.key().map(<[u8]>::to_vec) } else { None };
        iter.status()?;
        Ok(key)
    }

    #[cfg(test)]
    pub(crate) fn db(&self) -> &DB {
        &self.db
    }
}

impl KvEngine for RocksDbEngine {
    fn get(
        &self,
        key: &[u8],
    ) -> Result<Option<Vec<u8>>> {
        Ok(self.db.get(key)?)
    }

    fn put(
        &self,
        key: &[u8],
        value: &[u8],
        durability: Durability,
    ) -> Result<()> {
        let started = Instant::now();
        self.db.put_opt(key, value, &Self::write_options(durability))?;
        self.observe_latency("put", durability, started);
        Ok(())
    }

    fn write(
        &self,
        batch: WriteBatch,
        durability: Durability,
    ) -> Result<()> {
        let mut wb = rocksdb::WriteBatch::default();
        for op in batch.into_ops() {
            match op {
                BatchOp::Put { key, value } => wb.put(key, value),
                BatchOp::Delete { key } => wb.delete(key),
            }
        }
        self.commit(wb, durability, "write_batch")
    }

    fn delete_range(
        &self,
        start: &[u8],
        end: &[u8],
        durability: Durability,
    ) -> Result<()> {
        let mut wb = rocksdb::WriteBatch::default();
        wb.delete_range(start, end);
        self.commit(wb, durability, "delete_range")
    }

    fn first_key_in(
        &self,
        lower: &[u8],
        upper: &[u8],
    ) -> Result<Option<Vec<u8>>> {
        self.edge_key(lower, upper, false)
    }

    fn last_key_in(
        &self,
        lower: &[u8],
        upper: &[u8],
    ) -> Result<Option<Vec<u8>>> {
        self.edge_key(lower, upper, true)
    }

    #[instrument(skip(self))]
    fn flush(&self) -> Result<()> {
        let started = Instant::now();
        self.db.flush_wal(true)?;
        self.db.flush()?;
        self.observe_latency("flush", Durability::Sync, started);
        Ok(())
    }

    fn close(&self) -> Result<()> {
        if let Some(monitor) = self.monitor.lock().take() {
            monitor.stop();
        }
        Ok(())
    }
}

impl fmt::Debug for RocksDbEngine {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_struct("RocksDbEngine")
            .field("path", &self.db.path())
            .field("disk_slow_threshold", &self.disk_slow_threshold)
            .field("monitored", &self.monitor.lock().is_some())
            .finish()
    }
}

/// Translates the tuning knobs into engine options.
pub(crate) fn build_options(
    engine: &EngineConfig,
    wal_dir: &Path,
) -> Options {
    let mut opts = Options::default();
    opts.create_if_missing(true);

    let cache = Cache::new_lru_cache(engine.lru_cache_size as usize);
    let mut table = BlockBasedOptions::default();
    table.set_block_size(engine.block_size as usize);
    table.set_block_cache(&cache);
    opts.set_block_based_table_factory(&table);

    opts.set_write_buffer_size(engine.write_buffer_size as usize);
    opts.set_max_write_buffer_number(engine.max_write_buffer_number);
    opts.set_level_zero_file_num_compaction_trigger(engine.level0_file_num_compaction_trigger);
    opts.set_level_zero_stop_writes_trigger(engine.level0_stop_writes_trigger);
    opts.set_max_bytes_for_level_base(engine.max_bytes_for_level_base);
    opts.set_target_file_size_base(engine.target_file_size_base);
    opts.set_target_file_size_multiplier(engine.target_file_size_multiplier);
    opts.set_num_levels(engine.num_levels);
    opts.set_compression_per_level(&vec![DBCompressionType::Lz4; engine.num_levels as usize]);

    opts.set_max_open_files(engine.max_open_files);
    opts.set_max_background_jobs(engine.max_concurrent_compactions);
    opts.set_max_manifest_file_size(engine.max_manifest_file_size as usize);
    opts.set_bytes_per_sync(engine.bytes_per_sync);
    opts.set_wal_bytes_per_sync(engine.wal_bytes_per_sync);
    opts.set_wal_dir(wal_dir);
    opts
}
