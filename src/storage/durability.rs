//! Commit durability policy.
//!
//! Log appends and stable-store writes must reach stable media before they
//! are acknowledged. Range deletion only discards entries already covered by
//! an installed snapshot, so it commits relaxed; callers that need the
//! truncation itself to be durable follow it with an explicit sync.

use std::time::Instant;

use serde::Deserialize;
use serde::Serialize;
use tracing::trace;

use crate::KvEngine;
use crate::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Durability {
    /// Acknowledged only after the write-ahead log is synced
    Sync,
    /// Buffered; persisted by a later sync or flush
    Relaxed,
}

impl Durability {
    #[inline]
    pub fn is_sync(self) -> bool {
        matches!(self, Durability::Sync)
    }
}

/// Every write the adapter issues against the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WriteKind {
    AppendLogs,
    SetConfig,
    SetCounter,
    DeleteLogRange,
}

impl WriteKind {
    /// Fixed policy table.
    pub const fn durability(self) -> Durability {
        match self {
            WriteKind::AppendLogs => Durability::Sync,
            WriteKind::SetConfig => Durability::Sync,
            WriteKind::SetCounter => Durability::Sync,
            WriteKind::DeleteLogRange => Durability::Relaxed,
        }
    }
}

/// Flushes all buffered, not-yet-synced writes of `engine`.
pub(crate) fn flush_unsynced<E: KvEngine + ?Sized>(engine: &E) -> Result<()> {
    let started = Instant::now();
    engine.flush()?;
    trace!(elapsed = ?started.elapsed(), "flushed unsynced writes");
    Ok(())
}
