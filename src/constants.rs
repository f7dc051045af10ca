// -
// Keyspace partition tags
//
// One reserved byte per partition. Distinct single-byte tags keep every
// partition's key range `[tag, tag + 1)` disjoint from the others.

pub(crate) const LOG_PARTITION_TAG: u8 = 0x01;
pub(crate) const CONFIG_PARTITION_TAG: u8 = 0x02;
pub(crate) const COUNTER_PARTITION_TAG: u8 = 0x03;

/// Fixed width of the big-endian index suffix of a log key
pub(crate) const LOG_INDEX_LEN: usize = 8;

/// On-disk layout under the store root
pub(crate) const DATA_DIR: &str = "data";
pub(crate) const WAL_DIR: &str = "wal";

/// File name prefixes RocksDB uses for manifests and write-ahead logs
pub(crate) const MANIFEST_FILE_PREFIX: &str = "MANIFEST-";
pub(crate) const WAL_FILE_SUFFIX: &str = ".log";
