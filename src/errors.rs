//! Storage Adapter Error Hierarchy
//!
//! Defines the error types surfaced by the Raft log store and stable store,
//! categorized by the layer that produced them.

use std::path::PathBuf;

use config::ConfigError;

use crate::Partition;

#[doc(hidden)]
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Operation attempted after the store was shut down
    #[error("Storage is closed")]
    Closed,

    /// Engine-level and key lookup failures
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Log record encode/decode failures
    #[error(transparent)]
    Serialization(#[from] SerializationError),

    /// Configuration loading and validation failures
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Unrecoverable background engine failure, requires process termination
    #[error("Fatal error: {0}")]
    Fatal(String),
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// No log entry stored at the requested index
    #[error("Log entry not found at index {0}")]
    LogNotFound(u64),

    /// Key absent from a stable-store partition
    #[error("Key not found in {partition} partition")]
    NotFound { partition: Partition },

    /// Embedded database errors (I/O, corruption, invalid options)
    #[error("Embedded database error: {0}")]
    DbError(String),

    /// Disk I/O failures outside the engine
    #[error(transparent)]
    IoError(#[from] std::io::Error),

    /// Directory setup failures with the offending path
    #[error("Error occurred at path: {path}")]
    PathError {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Error type for value conversion operations
    #[error("Value convert failed")]
    Convert(#[from] ConvertError),
}

/// Error type for value conversion operations
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    /// Invalid input length error
    ///
    /// This occurs when the input byte slice length doesn't match the required 8 bytes.
    #[error("invalid byte length: expected 8 bytes, received {0} bytes")]
    InvalidLength(usize),

    /// Key does not belong to the partition it was parsed for
    #[error("key tag {found:#04x} does not match {expected} partition")]
    PartitionMismatch { expected: Partition, found: u8 },

    /// Key shorter than a partition tag
    #[error("empty key")]
    EmptyKey,
}

// Serialization is classified separately from engine failures
#[derive(Debug, thiserror::Error)]
pub enum SerializationError {
    #[error("Log entry encode failed: {0}")]
    Encode(String),

    #[error("Log entry decode failed: {0}")]
    Decode(String),
}

impl Error {
    /// True if the store had already been closed
    pub fn is_closed(&self) -> bool {
        matches!(self, Error::Closed)
    }

    /// True only for a missing log entry, distinct from a missing stable key
    pub fn is_log_not_found(&self) -> bool {
        matches!(self, Error::Storage(StorageError::LogNotFound(_)))
    }

    /// True for a missing stable-store key
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::Storage(StorageError::NotFound { .. }))
    }
}

// ============== Conversion Implementations ============== //
impl From<ConvertError> for Error {
    fn from(e: ConvertError) -> Self {
        Error::Storage(StorageError::Convert(e))
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Storage(StorageError::IoError(e))
    }
}
