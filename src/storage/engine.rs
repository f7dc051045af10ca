//! The ordered key-value engine seam consumed by [`crate::RaftStore`].

#[cfg(test)]
use mockall::automock;

use crate::Durability;
use crate::Result;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchOp {
    Put { key: Vec<u8>, value: Vec<u8> },
    Delete { key: Vec<u8> },
}

/// Engine-agnostic write batch, committed atomically by [`KvEngine::write`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteBatch {
    ops: Vec<BatchOp>,
}

impl WriteBatch {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            ops: Vec::with_capacity(capacity),
        }
    }

    pub fn put(
        &mut self,
        key: impl Into<Vec<u8>>,
        value: impl Into<Vec<u8>>,
    ) {
        self.ops.push(BatchOp::Put {
            key: key.into(),
            value: value.into(),
        });
    }

    pub fn delete(
        &mut self,
        key: impl Into<Vec<u8>>,
    ) {
        self.ops.push(BatchOp::Delete { key: key.into() });
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn ops(&self) -> &[BatchOp] {
        &self.ops
    }

    pub fn into_ops(self) -> Vec<BatchOp> {
        self.ops
    }
}

/// Byte-ordered key-value engine.
///
/// Implementations must be safe to call concurrently from many threads; each
/// individual call is atomic. Scans are bounded: `lower` is inclusive and
/// `upper` exclusive, and keys outside the bounds must never be returned.
#[cfg_attr(test, automock)]
pub trait KvEngine: Send + Sync + 'static {
    fn get(
        &self,
        key: &[u8],
    ) -> Result<Option<Vec<u8>>>;

    fn put(
        &self,
        key: &[u8],
        value: &[u8],
        durability: Durability,
    ) -> Result<()>;

    /// Commits every operation of `batch` or none of them.
    fn write(
        &self,
        batch: WriteBatch,
        durability: Durability,
    ) -> Result<()>;

    /// Native range deletion of `[start, end)`.
    fn delete_range(
        &self,
        start: &[u8],
        end: &[u8],
        durability: Durability,
    ) -> Result<()>;

    /// Smallest key in `[lower, upper)`.
    fn first_key_in(
        &self,
        lower: &[u8],
        upper: &[u8],
    ) -> Result<Option<Vec<u8>>>;

    /// Largest key in `[lower, upper)`.
    fn last_key_in(
        &self,
        lower: &[u8],
        upper: &[u8],
    ) -> Result<Option<Vec<u8>>>;

    /// Synchronously persists all buffered writes.
    fn flush(&self) -> Result<()>;

    /// Stops engine-owned background activity. The handle itself is
    /// released when the last reference is dropped.
    fn close(&self) -> Result<()>;
}
