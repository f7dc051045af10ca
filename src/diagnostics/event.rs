use std::fmt;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompactionInfo {
    /// Compactions running when the event was observed
    pub running: u64,
    pub err: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlushInfo {
    /// Memtable flushes running when the event was observed
    pub running: u64,
    pub err: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteStallInfo {
    pub reason: String,
}

/// A manifest or write-ahead log file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileInfo {
    pub path: String,
    pub err: Option<String>,
}

/// A sorted table file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableInfo {
    pub name: String,
    pub level: i32,
    pub size: u64,
    pub err: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiskSlowInfo {
    pub operation: &'static str,
    pub duration: Duration,
}

/// Background lifecycle activity reported by the storage engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    CompactionBegin(CompactionInfo),
    CompactionEnd(CompactionInfo),
    FlushBegin(FlushInfo),
    FlushEnd(FlushInfo),
    WriteStallBegin(WriteStallInfo),
    WriteStallEnd,
    ManifestCreated(FileInfo),
    ManifestDeleted(FileInfo),
    WalCreated(FileInfo),
    WalDeleted(FileInfo),
    TableCreated(TableInfo),
    TableDeleted(TableInfo),
    TableStatsLoaded { tables: usize },
    DiskSlow(DiskSlowInfo),
    BackgroundError(String),
}

impl EngineEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            EngineEvent::CompactionBegin(_) => "compaction_begin",
            EngineEvent::CompactionEnd(_) => "compaction_end",
            EngineEvent::FlushBegin(_) => "flush_begin",
            EngineEvent::FlushEnd(_) => "flush_end",
            EngineEvent::WriteStallBegin(_) => "write_stall_begin",
            EngineEvent::WriteStallEnd => "write_stall_end",
            EngineEvent::ManifestCreated(_) => "manifest_created",
            EngineEvent::ManifestDeleted(_) => "manifest_deleted",
            EngineEvent::WalCreated(_) => "wal_created",
            EngineEvent::WalDeleted(_) => "wal_deleted",
            EngineEvent::TableCreated(_) => "table_created",
            EngineEvent::TableDeleted(_) => "table_deleted",
            EngineEvent::TableStatsLoaded { .. } => "table_stats_loaded",
            EngineEvent::DiskSlow(_) => "disk_slow",
            EngineEvent::BackgroundError(_) => "background_error",
        }
    }

    /// The error carried by the event, if any.
    pub fn error(&self) -> Option<&str> {
        match self {
            EngineEvent::CompactionBegin(info) | EngineEvent::CompactionEnd(info) => info.err.as_deref(),
            EngineEvent::FlushBegin(info) | EngineEvent::FlushEnd(info) => info.err.as_deref(),
            EngineEvent::ManifestCreated(info)
            | EngineEvent::ManifestDeleted(info)
            | EngineEvent::WalCreated(info)
            | EngineEvent::WalDeleted(info) => info.err.as_deref(),
            EngineEvent::TableCreated(info) | EngineEvent::TableDeleted(info) => info.err.as_deref(),
            EngineEvent::BackgroundError(err) => Some(err.as_str()),
            EngineEvent::WriteStallBegin(_)
            | EngineEvent::WriteStallEnd
            | EngineEvent::TableStatsLoaded { .. }
            | EngineEvent::DiskSlow(_) => None,
        }
    }
}

impl fmt::Display for EngineEvent {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            EngineEvent::CompactionBegin(info) | EngineEvent::CompactionEnd(info) => {
                write!(f, "{} running={}", self.kind(), info.running)
            }
            EngineEvent::FlushBegin(info) | EngineEvent::FlushEnd(info) => {
                write!(f, "{} running={}", self.kind(), info.running)
            }
            EngineEvent::WriteStallBegin(info) => write!(f, "{} reason={}", self.kind(), info.reason),
            EngineEvent::ManifestCreated(info)
            | EngineEvent::ManifestDeleted(info)
            | EngineEvent::WalCreated(info)
            | EngineEvent::WalDeleted(info) => write!(f, "{} path={}", self.kind(), info.path),
            EngineEvent::TableCreated(info) | EngineEvent::TableDeleted(info) => write!(
                f,
                "{} name={} level={} size={}",
                self.kind(),
                info.name,
                info.level,
                info.size
            ),
            EngineEvent::TableStatsLoaded { tables } => write!(f, "{} tables={}", self.kind(), tables),
            EngineEvent::DiskSlow(info) => {
                write!(f, "{} operation={} duration={:?}", self.kind(), info.operation, info.duration)
            }
            EngineEvent::BackgroundError(err) => write!(f, "{} {}", self.kind(), err),
            EngineEvent::WriteStallEnd => f.write_str(self.kind()),
        }
    }
}
