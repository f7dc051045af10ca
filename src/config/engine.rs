use std::fmt::Debug;

use config::ConfigError;
use serde::Deserialize;
use serde::Serialize;

use crate::Error;
use crate::Result;

const KIB: u64 = 1024;
const MIB: u64 = 1024 * KIB;

/// Tuning knobs of the embedded LSM engine
///
/// Defaults favour a write-heavy log workload: large write buffers, an
/// eagerly compacted level 0 and wide target files.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct EngineConfig {
    /// Shared block cache capacity in bytes
    #[serde(default = "default_lru_cache_size")]
    pub lru_cache_size: u64,

    /// Size of a single memtable before it is flushed
    #[serde(default = "default_write_buffer_size")]
    pub write_buffer_size: u64,

    /// Memtables kept in memory before writes stop
    #[serde(default = "default_max_write_buffer_number")]
    pub max_write_buffer_number: i32,

    /// Number of level-0 files that triggers a compaction
    #[serde(default = "default_level0_file_num_compaction_trigger")]
    pub level0_file_num_compaction_trigger: i32,

    /// Number of level-0 files at which writes stop
    #[serde(default = "default_level0_stop_writes_trigger")]
    pub level0_stop_writes_trigger: i32,

    /// Total size budget of level 1
    #[serde(default = "default_max_bytes_for_level_base")]
    pub max_bytes_for_level_base: u64,

    /// Target SST size at level 1
    #[serde(default = "default_target_file_size_base")]
    pub target_file_size_base: u64,

    /// Growth factor of the target SST size per level
    #[serde(default = "default_target_file_size_multiplier")]
    pub target_file_size_multiplier: i32,

    #[serde(default = "default_num_levels")]
    pub num_levels: i32,

    #[serde(default = "default_max_open_files")]
    pub max_open_files: i32,

    /// Upper bound of background compaction and flush jobs
    #[serde(default = "default_max_concurrent_compactions")]
    pub max_concurrent_compactions: i32,

    /// Uncompressed data block size
    #[serde(default = "default_block_size")]
    pub block_size: u64,

    /// Manifest size at which a new manifest is rolled
    #[serde(default = "default_max_manifest_file_size")]
    pub max_manifest_file_size: u64,

    /// Incremental sync threshold for SST writes
    #[serde(default = "default_bytes_per_sync")]
    pub bytes_per_sync: u64,

    /// Incremental sync threshold for WAL writes
    #[serde(default = "default_wal_bytes_per_sync")]
    pub wal_bytes_per_sync: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            lru_cache_size: default_lru_cache_size(),
            write_buffer_size: default_write_buffer_size(),
            max_write_buffer_number: default_max_write_buffer_number(),
            level0_file_num_compaction_trigger: default_level0_file_num_compaction_trigger(),
            level0_stop_writes_trigger: default_level0_stop_writes_trigger(),
            max_bytes_for_level_base: default_max_bytes_for_level_base(),
            target_file_size_base: default_target_file_size_base(),
            target_file_size_multiplier: default_target_file_size_multiplier(),
            num_levels: default_num_levels(),
            max_open_files: default_max_open_files(),
            max_concurrent_compactions: default_max_concurrent_compactions(),
            block_size: default_block_size(),
            max_manifest_file_size: default_max_manifest_file_size(),
            bytes_per_sync: default_bytes_per_sync(),
            wal_bytes_per_sync: default_wal_bytes_per_sync(),
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<()> {
        if self.write_buffer_size == 0 {
            return Err(invalid("write_buffer_size must be greater than 0"));
        }

        if self.max_write_buffer_number < 2 {
            return Err(invalid("max_write_buffer_number must be at least 2"));
        }

        if self.level0_file_num_compaction_trigger < 1 {
            return Err(invalid("level0_file_num_compaction_trigger must be at least 1"));
        }

        if self.level0_stop_writes_trigger < self.level0_file_num_compaction_trigger {
            return Err(invalid(format!(
                "level0_stop_writes_trigger({}) must not be lower than level0_file_num_compaction_trigger({})",
                self.level0_stop_writes_trigger, self.level0_file_num_compaction_trigger
            )));
        }

        if !(1..=64).contains(&self.num_levels) {
            return Err(invalid(format!("num_levels({}) must be within 1..=64", self.num_levels)));
        }

        if self.target_file_size_base == 0 || self.target_file_size_multiplier < 1 {
            return Err(invalid(
                "target_file_size_base must be > 0 and target_file_size_multiplier >= 1",
            ));
        }

        if self.block_size == 0 {
            return Err(invalid("block_size must be greater than 0"));
        }

        if self.max_concurrent_compactions < 1 {
            return Err(invalid("max_concurrent_compactions must be at least 1"));
        }

        // -1 asks the engine to keep every file open
        if self.max_open_files == 0 || self.max_open_files < -1 {
            return Err(invalid("max_open_files must be -1 or positive"));
        }

        Ok(())
    }

    /// Target SST size of each level, level 1 first.
    pub fn level_target_file_sizes(&self) -> Vec<u64> {
        let mut size = self.target_file_size_base;
        (0..self.num_levels)
            .map(|_| {
                let current = size;
                size = size.saturating_mul(self.target_file_size_multiplier as u64);
                current
            })
            .collect()
    }
}

fn invalid(msg: impl Into<String>) -> Error {
    Error::Config(ConfigError::Message(msg.into()))
}

fn default_lru_cache_size() -> u64 {
    128 * MIB
}
fn default_write_buffer_size() -> u64 {
    32 * MIB
}
fn default_max_write_buffer_number() -> i32 {
    4
}
fn default_level0_file_num_compaction_trigger() -> i32 {
    1
}
fn default_level0_stop_writes_trigger() -> i32 {
    24
}
fn default_max_bytes_for_level_base() -> u64 {
    512 * MIB
}
fn default_target_file_size_base() -> u64 {
    128 * MIB
}
fn default_target_file_size_multiplier() -> i32 {
    1
}
fn default_num_levels() -> i32 {
    7
}
fn default_max_open_files() -> i32 {
    102_400
}
fn default_max_concurrent_compactions() -> i32 {
    8
}
fn default_block_size() -> u64 {
    64 * KIB
}
fn default_max_manifest_file_size() -> u64 {
    128 * MIB
}
fn default_bytes_per_sync() -> u64 {
    2 * MIB
}
fn default_wal_bytes_per_sync() -> u64 {
    2 * MIB
}
