//! # d-engine-rocksdb-store
//!
//! Durable Raft log and stable-state storage on top of RocksDB.
//!
//! One engine instance holds three disjoint keyspace partitions:
//!
//! - **Log** - replicated log entries keyed by big-endian index
//! - **Config** - opaque stable values such as the persisted vote
//! - **Counter** - fixed 8-byte counters such as the current term
//!
//! ## Key Traits
//!
//! - [`LogStore`] - append, read and truncate log entries
//! - [`StableStore`] - durable key/value and counter state
//! - [`KvEngine`] - the ordered key-value engine seam
//! - [`EventListener`] - observer of engine background activity
//!
//! ## Quick Start
//!
//! ```ignore
//! use d_engine_rocksdb_store::{LogRecord, LogStore, RaftStore, StableStore, StoreConfig};
//!
//! let store = RaftStore::open("/var/lib/raft", StoreConfig::new()?.validate()?)?;
//! store.store_logs(&[LogRecord::command(1, 1, b"put x".to_vec())])?;
//! store.set_uint64(b"term", 1)?;
//!
//! // Background failures are escalated, never handled in place.
//! let mut fatal = store.diagnostics().subscribe();
//! ```

mod config;
mod constants;
mod diagnostics;
mod errors;
mod storage;
pub mod utils;

pub use self::config::*;
pub use diagnostics::*;
pub use errors::*;
pub use storage::*;
pub use utils::*;

//-----------------------------------------------------------
// Test utils

#[cfg(test)]
pub mod test_utils;
