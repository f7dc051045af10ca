use crate::Result;

/// Small durable state: persisted vote, term and counters.
///
/// Every write is synced before it returns.
pub trait StableStore: Send + Sync + 'static {
    fn set(
        &self,
        key: &[u8],
        value: &[u8],
    ) -> Result<()>;

    /// Fails with [`crate::StorageError::NotFound`] if `key` was never set.
    fn get(
        &self,
        key: &[u8],
    ) -> Result<Vec<u8>>;

    fn set_uint64(
        &self,
        key: &[u8],
        value: u64,
    ) -> Result<()>;

    /// Missing counters are reported as [`crate::StorageError::NotFound`],
    /// never defaulted to zero.
    fn get_uint64(
        &self,
        key: &[u8],
    ) -> Result<u64>;
}
