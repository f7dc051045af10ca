//! Storage layer of the Raft store.
//!
//! Key responsibilities include:
//! - Partitioning one ordered keyspace between log entries and stable state.
//! - Choosing the commit durability of every write.
//! - Gating every operation against a closed store.
//! - Providing the engine seam (`KvEngine`) and its RocksDB and in-memory
//!   implementations.
mod adaptors;
mod codec;
mod durability;
mod engine;
mod keyspace;
mod lifecycle;
mod log_record;
mod log_store;
mod raft_store;
mod stable_store;

pub use adaptors::*;
pub use codec::*;
pub use durability::*;
pub use engine::*;
pub use keyspace::*;
pub use log_record::*;
pub use log_store::*;
pub use raft_store::*;
pub use stable_store::*;

#[cfg(test)]
mod engine_test;
