//! Raft log and stable state over one partitioned key-value engine.

use std::fmt;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;

use tracing::debug;
use tracing::instrument;
use tracing::trace;

use crate::convert::safe_kv;
use crate::convert::safe_vk;
use crate::storage::durability::flush_unsynced;
use crate::storage::keyspace::log_range_end;
use crate::storage::lifecycle::LifecycleGuard;
use crate::BincodeCodec;
use crate::DiagnosticsSink;
use crate::EventListener;
use crate::KvEngine;
use crate::ListenerSet;
use crate::LogCodec;
use crate::LogRecord;
use crate::LogStore;
use crate::Partition;
use crate::Result;
use crate::RocksDbEngine;
use crate::StableStore;
use crate::StorageError;
use crate::StoreConfig;
use crate::WriteBatch;
use crate::WriteKind;
use crate::build_key;
use crate::log_key;
use crate::parse_log_index;

/// Durable [`LogStore`] and [`StableStore`] sharing one engine.
///
/// Log entries, opaque stable values and counters live in three disjoint
/// partitions of the same keyspace. Every operation fails with
/// [`crate::Error::Closed`] once [`RaftStore::close`] has run.
pub struct RaftStore<E: KvEngine = RocksDbEngine, C: LogCodec = BincodeCodec> {
    lifecycle: LifecycleGuard<E>,
    codec: C,
    diagnostics: Arc<DiagnosticsSink>,
}

impl RaftStore {
    /// Opens (or creates) a RocksDB-backed store under `path`.
    pub fn open(
        path: impl AsRef<Path>,
        config: StoreConfig,
    ) -> Result<Self> {
        StoreBuilder::new(path).config(config).open()
    }
}

impl<E: KvEngine, C: LogCodec> RaftStore<E, C> {
    /// Wraps an already opened engine.
    ///
    /// `diagnostics` should be the sink the engine reports its background
    /// events to, so that [`RaftStore::diagnostics`] observes them.
    pub fn from_parts(
        engine: E,
        codec: C,
        diagnostics: Arc<DiagnosticsSink>,
    ) -> Self {
        Self {
            lifecycle: LifecycleGuard::new(engine),
            codec,
            diagnostics,
        }
    }

    /// Background event relay and fatal escalation channel.
    pub fn diagnostics(&self) -> &Arc<DiagnosticsSink> {
        &self.diagnostics
    }

    pub fn is_closed(&self) -> bool {
        self.lifecycle.is_closed()
    }

    /// Persists every buffered write that was committed without sync.
    #[instrument(skip(self))]
    pub fn sync(&self) -> Result<()> {
        let engine = self.lifecycle.acquire()?;
        flush_unsynced(engine.as_ref())
    }

    /// Shuts the store down.
    ///
    /// Best effort: flush and engine close failures are logged, never
    /// returned. Calling it again is a no-op.
    pub fn close(&self) -> Result<()> {
        self.lifecycle.shutdown()
    }

    fn index_at(
        &self,
        key: Option<Vec<u8>>,
    ) -> Result<u64> {
        match key {
            Some(key) => parse_log_index(&key),
            None => Ok(0),
        }
    }
}

impl<E: KvEngine, C: LogCodec> LogStore for RaftStore<E, C> {
    #[instrument(skip(self))]
    fn first_index(&self) -> Result<u64> {
        let engine = self.lifecycle.acquire()?;
        let key = engine.first_key_in(&Partition::Log.lower_bound(), &Partition::Log.upper_bound())?;
        self.index_at(key)
    }

    #[instrument(skip(self))]
    fn last_index(&self) -> Result<u64> {
        let engine = self.lifecycle.acquire()?;
        let key = engine.last_key_in(&Partition::Log.lower_bound(), &Partition::Log.upper_bound())?;
        self.index_at(key)
    }

    #[instrument(skip(self))]
    fn get_log(
        &self,
        index: u64,
    ) -> Result<LogRecord> {
        let engine = self.lifecycle.acquire()?;
        match engine.get(&log_key(index))? {
            Some(bytes) => self.codec.decode(&bytes),
            None => Err(StorageError::LogNotFound(index).into()),
        }
    }

    #[instrument(skip(self, records), fields(count = records.len()))]
    fn store_logs(
        &self,
        records: &[LogRecord],
    ) -> Result<()> {
        let engine = self.lifecycle.acquire()?;
        if records.is_empty() {
            return Ok(());
        }

        let mut batch = WriteBatch::with_capacity(records.len());
        for record in records {
            batch.put(log_key(record.index), self.codec.encode(record)?);
        }

        engine.write(batch, WriteKind::AppendLogs.durability())?;
        trace!(
            first = records[0].index,
            last = records[records.len() - 1].index,
            "appended log entries"
        );
        Ok(())
    }

    #[instrument(skip(self))]
    fn delete_range(
        &self,
        min: u64,
        max: u64,
    ) -> Result<()> {
        let engine = self.lifecycle.acquire()?;
        if min > max {
            trace!("empty range, nothing to delete");
            return Ok(());
        }

        engine.delete_range(&log_key(min), &log_range_end(max), WriteKind::DeleteLogRange.durability())
    }
}

impl<E: KvEngine, C: LogCodec> StableStore for RaftStore<E, C> {
    #[instrument(skip(self, value), fields(len = value.len()))]
    fn set(
        &self,
        key: &[u8],
        value: &[u8],
    ) -> Result<()> {
        let engine = self.lifecycle.acquire()?;
        engine.put(&build_key(Partition::Config, key), value, WriteKind::SetConfig.durability())
    }

    #[instrument(skip(self))]
    fn get(
        &self,
        key: &[u8],
    ) -> Result<Vec<u8>> {
        let engine = self.lifecycle.acquire()?;
        engine
            .get(&build_key(Partition::Config, key))?
            .ok_or_else(|| StorageError::NotFound { partition: Partition::Config }.into())
    }

    #[instrument(skip(self))]
    fn set_uint64(
        &self,
        key: &[u8],
        value: u64,
    ) -> Result<()> {
        let engine = self.lifecycle.acquire()?;
        engine.put(
            &build_key(Partition::Counter, key),
            &safe_kv(value),
            WriteKind::SetCounter.durability(),
        )
    }

    #[instrument(skip(self))]
    fn get_uint64(
        &self,
        key: &[u8],
    ) -> Result<u64> {
        let engine = self.lifecycle.acquire()?;
        match engine.get(&build_key(Partition::Counter, key))? {
            Some(bytes) => safe_vk(bytes),
            None => Err(StorageError::NotFound {
                partition: Partition::Counter,
            }
            .into()),
        }
    }
}

impl<E: KvEngine, C: LogCodec> Drop for RaftStore<E, C> {
    fn drop(&mut self) {
        if !self.lifecycle.is_closed() {
            debug!("store dropped without close, shutting down");
            let _ = self.lifecycle.shutdown();
        }
    }
}

impl<E: KvEngine, C: LogCodec> fmt::Debug for RaftStore<E, C> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_struct("RaftStore")
            .field("closed", &self.is_closed())
            .field("diagnostics", &self.diagnostics)
            .finish()
    }
}

/// Assembles a RocksDB-backed [`RaftStore`].
///
/// ```ignore
/// let store = StoreBuilder::new("/var/lib/raft")
///     .config(StoreConfig::new()?)
///     .listener(Arc::new(|event: &EngineEvent| println!("{event}")))
///     .open()?;
/// ```
pub struct StoreBuilder<C: LogCodec = BincodeCodec> {
    path: PathBuf,
    config: StoreConfig,
    listeners: ListenerSet,
    codec: C,
}

impl StoreBuilder {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            config: StoreConfig::default(),
            listeners: ListenerSet::new(),
            codec: BincodeCodec,
        }
    }
}

impl<C: LogCodec> StoreBuilder<C> {
    pub fn config(
        mut self,
        config: StoreConfig,
    ) -> Self {
        self.config = config;
        self
    }

    /// Registers an extra observer of engine background events.
    ///
    /// Extra listeners run after the built-in diagnostics sink.
    pub fn listener(
        mut self,
        listener: Arc<dyn EventListener>,
    ) -> Self {
        self.listeners.push(listener);
        self
    }

    /// Replaces the log record codec.
    pub fn codec<C2: LogCodec>(
        self,
        codec: C2,
    ) -> StoreBuilder<C2> {
        StoreBuilder {
            path: self.path,
            config: self.config,
            listeners: self.listeners,
            codec,
        }
    }

    /// Validates the configuration and opens the engine.
    ///
    /// Nothing is left open when this fails.
    pub fn open(self) -> Result<RaftStore<RocksDbEngine, C>> {
        let config = self.config.validate()?;
        let diagnostics = Arc::new(DiagnosticsSink::new());

        let mut listeners = ListenerSet::new();
        listeners.push(diagnostics.clone());
        for listener in self.listeners.iter() {
            listeners.push(listener.clone());
        }

        debug!(path = ?self.path, listeners = listeners.len(), "opening raft store");
        let engine = RocksDbEngine::open(&self.path, &config, Arc::new(listeners))?;
        Ok(RaftStore::from_parts(engine, self.codec, diagnostics))
    }
}
