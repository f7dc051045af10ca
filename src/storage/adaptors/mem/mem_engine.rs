use std::collections::BTreeMap;
use std::fmt;
use std::ops::Bound;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::trace;

use crate::BatchOp;
use crate::Durability;
use crate::EngineEvent;
use crate::EventListener;
use crate::FlushInfo;
use crate::KvEngine;
use crate::Result;
use crate::StorageError;
use crate::WriteBatch;

/// Volatile [`KvEngine`] backed by an ordered map.
///
/// Durability levels are accepted and ignored. Flushes are reported to the
/// listener as a flush begin/end pair so diagnostics can be exercised
/// without a disk.
#[derive(Default)]
pub struct MemEngine {
    data: RwLock<BTreeMap<Vec<u8>, Vec<u8>>>,
    listener: Option<Arc<dyn EventListener>>,
    /// Writes fail with a database error while set
    fail_writes: AtomicBool,
    flushes: AtomicU64,
}

impl MemEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_listener(listener: Arc<dyn EventListener>) -> Self {
        Self {
            listener: Some(listener),
            ..Default::default()
        }
    }

    /// Makes every subsequent write fail until reset.
    pub fn fail_writes(
        &self,
        fail: bool,
    ) {
        self.fail_writes.store(fail, Ordering::Release);
    }

    /// Completed flushes.
    pub fn flush_count(&self) -> u64 {
        self.flushes.load(Ordering::Acquire)
    }

    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.read().is_empty()
    }

    /// Delivers `event` to the listener as if the engine raised it.
    pub fn emit(
        &self,
        event: &EngineEvent,
    ) {
        if let Some(listener) = &self.listener {
            listener.on_event(event);
        }
    }

    fn check_writable(&self) -> Result<()> {
        if self.fail_writes.load(Ordering::Acquire) {
            return Err(StorageError::DbError("injected write failure".to_string()).into());
        }
        Ok(())
    }

    fn bounded(
        lower: &[u8],
        upper: &[u8],
    ) -> (Bound<Vec<u8>>, Bound<Vec<u8>>) {
        (Bound::Included(lower.to_vec()), Bound::Excluded(upper.to_vec()))
    }
}

impl KvEngine for MemEngine {
    fn get(
        &self,
        key: &[u8],
    ) -> Result<Option<Vec<u8>>> {
        Ok(self.data.read().get(key).cloned())
    }

    fn put(
        &self,
        key: &[u8],
        value: &[u8],
        _durability: Durability,
    ) -> Result<()> {
        self.check_writable()?;
        self.data.write().insert(key.to_vec(), value.to_vec());
        Ok(())
    }

    fn write(
        &self,
        batch: WriteBatch,
        _durability: Durability,
    ) -> Result<()> {
        self.check_writable()?;
        let mut data = self.data.write();
        for op in batch.into_ops() {
            match op {
                BatchOp::Put { key, value } => {
                    data.insert(key, value);
                }
                BatchOp::Delete { key } => {
                    data.remove(&key);
                }
            }
        }
        Ok(())
    }

    fn delete_range(
        &self,
        start: &[u8],
        end: &[u8],
        _durability: Durability,
    ) -> Result<()> {
        self.check_writable()?;
        if start >= end {
            return Ok(());
        }
        let mut data = self.data.write();
        let doomed: Vec<Vec<u8>> = data.range(Self::bounded(start, end)).map(|(k, _)| k.clone()).collect();
        for key in &doomed {
            data.remove(key);
        }
        trace!(removed = doomed.len(), "range deleted");
        Ok(())
    }

    fn first_key_in(
        &self,
        lower: &[u8],
        upper: &[u8],
    ) -> Result<Option<Vec<u8>>> {
        if lower >= upper {
            return Ok(None);
        }
        Ok(self.data.read().range(Self::bounded(lower, upper)).next().map(|(k, _)| k.clone()))
    }

    fn last_key_in(
        &self,
        lower: &[u8],
        upper: &[u8],
    ) -> Result<Option<Vec<u8>>> {
        if lower >= upper {
            return Ok(None);
        }
        Ok(self.data.read().range(Self::bounded(lower, upper)).next_back().map(|(k, _)| k.clone()))
    }

    fn flush(&self) -> Result<()> {
        self.emit(&EngineEvent::FlushBegin(FlushInfo { running: 1, err: None }));
        self.flushes.fetch_add(1, Ordering::AcqRel);
        self.emit(&EngineEvent::FlushEnd(FlushInfo { running: 0, err: None }));
        Ok(())
    }

    fn close(&self) -> Result<()> {
        trace!("MemEngine close (no-op)");
        Ok(())
    }
}

impl fmt::Debug for MemEngine {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_struct("MemEngine")
            .field("len", &self.len())
            .field("flushes", &self.flush_count())
            .finish()
    }
}
