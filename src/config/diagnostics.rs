use std::time::Duration;

use config::ConfigError;
use serde::Deserialize;
use serde::Serialize;

use crate::Error;
use crate::Result;

/// Background event monitoring configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct DiagnosticsConfig {
    /// Sample engine state on a background thread and report lifecycle events
    #[serde(default = "default_enable_event_monitor")]
    pub enable_event_monitor: bool,

    /// Interval between two engine samples (milliseconds)
    #[serde(default = "default_poll_interval_in_ms")]
    pub poll_interval_in_ms: u64,

    /// Synced writes and flushes slower than this are reported as disk slow (milliseconds)
    #[serde(default = "default_disk_slow_threshold_in_ms")]
    pub disk_slow_threshold_in_ms: u64,
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self {
            enable_event_monitor: default_enable_event_monitor(),
            poll_interval_in_ms: default_poll_interval_in_ms(),
            disk_slow_threshold_in_ms: default_disk_slow_threshold_in_ms(),
        }
    }
}

impl DiagnosticsConfig {
    pub fn validate(&self) -> Result<()> {
        if self.enable_event_monitor && self.poll_interval_in_ms == 0 {
            return Err(Error::Config(ConfigError::Message(
                "poll_interval_in_ms must be greater than 0 when the event monitor is enabled".into(),
            )));
        }

        if self.disk_slow_threshold_in_ms == 0 {
            return Err(Error::Config(ConfigError::Message(
                "disk_slow_threshold_in_ms must be greater than 0".into(),
            )));
        }

        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_in_ms)
    }

    pub fn disk_slow_threshold(&self) -> Duration {
        Duration::from_millis(self.disk_slow_threshold_in_ms)
    }
}

fn default_enable_event_monitor() -> bool {
    true
}
fn default_poll_interval_in_ms() -> u64 {
    1000
}
fn default_disk_slow_threshold_in_ms() -> u64 {
    2000
}
