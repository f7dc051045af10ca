/// In-memory engine for tests and embedding.
pub mod mem;
pub use mem::*;

/// RocksDB engine, the production backend.
pub mod rocksdb;
pub use self::rocksdb::*;
