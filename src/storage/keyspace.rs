//! Keyspace partitioning over the single shared, byte-ordered engine keyspace.
//!
//! Every engine key is `tag ‖ suffix` where `tag` is one reserved byte per
//! [`Partition`]. Because each partition owns exactly the half-open range
//! `[tag, tag + 1)`, no two partitions can interleave in sort order no matter
//! what suffixes callers supply.

use std::fmt;

use crate::constants::CONFIG_PARTITION_TAG;
use crate::constants::COUNTER_PARTITION_TAG;
use crate::constants::LOG_INDEX_LEN;
use crate::constants::LOG_PARTITION_TAG;
use crate::convert::safe_kv;
use crate::convert::safe_vk;
use crate::ConvertError;
use crate::Result;

/// Length of a log key: tag byte plus big-endian index
pub const LOG_KEY_LEN: usize = 1 + LOG_INDEX_LEN;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Partition {
    /// Raft log entries keyed by big-endian index
    Log,
    /// Opaque stable-store blobs (vote, term, configuration)
    Config,
    /// Fixed 8-byte counters
    Counter,
}

impl Partition {
    pub const ALL: [Partition; 3] = [Partition::Log, Partition::Config, Partition::Counter];

    #[inline]
    pub const fn tag(self) -> u8 {
        match self {
            Partition::Log => LOG_PARTITION_TAG,
            Partition::Config => CONFIG_PARTITION_TAG,
            Partition::Counter => COUNTER_PARTITION_TAG,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Partition::Log => "log",
            Partition::Config => "config",
            Partition::Counter => "counter",
        }
    }

    /// Inclusive lower bound of this partition's key range
    #[inline]
    pub fn lower_bound(self) -> [u8; 1] {
        [self.tag()]
    }

    /// Exclusive upper bound of this partition's key range
    #[inline]
    pub fn upper_bound(self) -> [u8; 1] {
        [self.tag() + 1]
    }

    #[inline]
    pub fn contains(
        self,
        key: &[u8],
    ) -> bool {
        key.first() == Some(&self.tag())
    }
}

impl fmt::Display for Partition {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Concatenates the partition tag with a caller-supplied suffix.
pub fn build_key(
    partition: Partition,
    suffix: &[u8],
) -> Vec<u8> {
    let mut key = Vec::with_capacity(1 + suffix.len());
    key.push(partition.tag());
    key.extend_from_slice(suffix);
    key
}

/// Renders the fixed-width engine key of a log index.
#[inline]
pub fn log_key(index: u64) -> [u8; LOG_KEY_LEN] {
    let mut key = [0u8; LOG_KEY_LEN];
    key[0] = LOG_PARTITION_TAG;
    key[1..].copy_from_slice(&safe_kv(index));
    key
}

/// Strips the log partition tag and decodes the big-endian index.
pub fn parse_log_index(key: &[u8]) -> Result<u64> {
    let (&tag, suffix) = key.split_first().ok_or(ConvertError::EmptyKey)?;
    if tag != LOG_PARTITION_TAG {
        return Err(ConvertError::PartitionMismatch {
            expected: Partition::Log,
            found: tag,
        }
        .into());
    }
    safe_vk(suffix)
}

/// Exclusive end key covering every index up to and including `max`.
///
/// `u64::MAX` has no successor index, so the partition's own upper bound
/// is used instead.
pub(crate) fn log_range_end(max: u64) -> Vec<u8> {
    match max.checked_add(1) {
        Some(next) => log_key(next).to_vec(),
        None => Partition::Log.upper_bound().to_vec(),
    }
}
