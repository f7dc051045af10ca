//! Lock-free gate between foreground operations and store shutdown.
//!
//! Operations read the closed flag before anything else and fail fast with
//! [`Error::Closed`]. The engine handle sits in an [`ArcSwapOption`]: every
//! operation that passes the gate holds its own `Arc` for its duration, and
//! shutdown only detaches the shared slot. The engine is therefore released
//! by whichever of shutdown or the last in-flight operation drops its `Arc`
//! last, so teardown can never happen underneath a running call.

use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use arc_swap::ArcSwapOption;
use tracing::debug;
use tracing::warn;

use crate::storage::durability::flush_unsynced;
use crate::Error;
use crate::KvEngine;
use crate::Result;

pub(crate) struct LifecycleGuard<E: KvEngine> {
    closed: AtomicBool,
    engine: ArcSwapOption<E>,
}

impl<E: KvEngine> LifecycleGuard<E> {
    pub(crate) fn new(engine: E) -> Self {
        Self {
            closed: AtomicBool::new(false),
            engine: ArcSwapOption::from_pointee(engine),
        }
    }

    #[inline]
    pub(crate) fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Hands out the engine for one operation, or `Closed`.
    #[inline]
    pub(crate) fn acquire(&self) -> Result<Arc<E>> {
        if self.is_closed() {
            return Err(Error::Closed);
        }
        self.engine.load_full().ok_or(Error::Closed)
    }

    /// Flips the flag, then best-effort flushes and closes the engine.
    ///
    /// Only the first caller performs the teardown; every call returns `Ok`.
    pub(crate) fn shutdown(&self) -> Result<()> {
        if self.closed.swap(true, Ordering::AcqRel) {
            debug!("storage already closed");
            return Ok(());
        }

        let Some(engine) = self.engine.swap(None) else {
            return Ok(());
        };

        if let Err(e) = flush_unsynced(engine.as_ref()) {
            warn!(?e, "flush on close failed");
        }
        if let Err(e) = engine.close() {
            warn!(?e, "engine close failed");
        }

        let in_flight = Arc::strong_count(&engine) - 1;
        if in_flight > 0 {
            debug!(in_flight, "engine released after in-flight operations finish");
        }
        drop(engine);

        debug!("storage closed");
        Ok(())
    }
}
