use crate::LogRecord;
use crate::Result;

/// Persistent replicated log, addressed by index.
///
/// Indices are caller-assigned. The store neither enforces contiguity nor
/// monotonicity; writing an index that is already present overwrites it.
pub trait LogStore: Send + Sync + 'static {
    /// Smallest stored index, or 0 if the log is empty.
    fn first_index(&self) -> Result<u64>;

    /// Largest stored index, or 0 if the log is empty.
    fn last_index(&self) -> Result<u64>;

    /// Fails with [`crate::StorageError::LogNotFound`] if `index` was never
    /// written or has been deleted.
    fn get_log(
        &self,
        index: u64,
    ) -> Result<LogRecord>;

    fn store_log(
        &self,
        record: &LogRecord,
    ) -> Result<()> {
        self.store_logs(std::slice::from_ref(record))
    }

    /// Durably appends `records` as one atomic batch.
    ///
    /// Every record is encoded before anything is staged, so an encode
    /// failure leaves the log untouched.
    fn store_logs(
        &self,
        records: &[LogRecord],
    ) -> Result<()>;

    /// Removes every entry in `[min, max]`.
    ///
    /// Not synced. Call `sync` afterwards when the truncation itself has to
    /// survive a crash.
    fn delete_range(
        &self,
        min: u64,
        max: u64,
    ) -> Result<()>;
}
