//! Core model in Raft: a single replicated log entry as persisted by the store

use std::time::SystemTime;

use serde::Deserialize;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LogType {
    /// Applied to the user state machine
    #[default]
    Command,
    /// Appended by a new leader to commit entries of earlier terms
    Noop,
    /// Ensures all preceding entries are applied before proceeding
    Barrier,
    /// Cluster membership change
    Configuration,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LogRecord {
    /// Caller-assigned position in the log
    pub index: u64,
    /// Election term the entry was created in
    pub term: u64,
    pub log_type: LogType,
    /// Opaque entry body
    pub payload: Vec<u8>,
    /// Opaque per-entry metadata carried alongside the payload
    pub metadata: Vec<u8>,
    /// When the leader appended the entry, if recorded
    pub appended_at: Option<SystemTime>,
}

impl LogRecord {
    pub fn command(
        index: u64,
        term: u64,
        payload: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            index,
            term,
            log_type: LogType::Command,
            payload: payload.into(),
            ..Default::default()
        }
    }

    pub fn noop(
        index: u64,
        term: u64,
    ) -> Self {
        Self {
            index,
            term,
            log_type: LogType::Noop,
            ..Default::default()
        }
    }

    pub fn configuration(
        index: u64,
        term: u64,
        payload: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            index,
            term,
            log_type: LogType::Configuration,
            payload: payload.into(),
            ..Default::default()
        }
    }

    pub fn with_metadata(
        mut self,
        metadata: impl Into<Vec<u8>>,
    ) -> Self {
        self.metadata = metadata.into();
        self
    }

    pub fn with_appended_at(
        mut self,
        at: SystemTime,
    ) -> Self {
        self.appended_at = Some(at);
        self
    }
}
