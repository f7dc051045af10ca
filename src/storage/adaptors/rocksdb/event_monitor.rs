//! Background observer of RocksDB lifecycle activity.
//!
//! The engine offers no callback hook, so a dedicated thread samples engine
//! properties and the on-disk file set every poll interval and reports the
//! difference between two consecutive samples as [`EngineEvent`]s.

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::sync::mpsc;
use std::sync::mpsc::RecvTimeoutError;
use std::sync::Arc;
use std::thread;
use std::thread::JoinHandle;
use std::time::Duration;

use rocksdb::DB;
use tracing::debug;
use tracing::trace;
use tracing::warn;

use crate::constants::MANIFEST_FILE_PREFIX;
use crate::constants::WAL_FILE_SUFFIX;
use crate::CompactionInfo;
use crate::EngineEvent;
use crate::EventListener;
use crate::FileInfo;
use crate::FlushInfo;
use crate::Result;
use crate::TableInfo;
use crate::WriteStallInfo;

const MONITOR_THREAD_NAME: &str = "raft-store-events";

const PROP_BACKGROUND_ERRORS: &str = "rocksdb.background-errors";
const PROP_RUNNING_COMPACTIONS: &str = "rocksdb.num-running-compactions";
const PROP_RUNNING_FLUSHES: &str = "rocksdb.num-running-flushes";
const PROP_WRITE_STOPPED: &str = "rocksdb.is-write-stopped";
const PROP_DELAYED_WRITE_RATE: &str = "rocksdb.actual-delayed-write-rate";

#[derive(Debug, Clone)]
pub(crate) struct MonitoredPaths {
    pub(crate) data_dir: PathBuf,
    pub(crate) wal_dir: PathBuf,
}

/// Point-in-time view of the engine.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct EngineStats {
    pub(crate) background_errors: u64,
    pub(crate) running_compactions: u64,
    pub(crate) running_flushes: u64,
    pub(crate) write_stopped: bool,
    pub(crate) delayed_write_rate: u64,
    /// Live tables by file name
    pub(crate) tables: BTreeMap<String, TableInfo>,
    pub(crate) wal_files: BTreeSet<String>,
    pub(crate) manifests: BTreeSet<String>,
}

impl EngineStats {
    pub(crate) fn sample(
        db: &DB,
        paths: &MonitoredPaths,
    ) -> Result<Self> {
        let tables = db
            .live_files()?
            .into_iter()
            .map(|file| {
                let info = TableInfo {
                    name: file.name.clone(),
                    level: file.level,
                    size: file.size as u64,
                    err: None,
                };
                (file.name, info)
            })
            .collect();

        Ok(Self {
            background_errors: int_property(db, PROP_BACKGROUND_ERRORS)?,
            running_compactions: int_property(db, PROP_RUNNING_COMPACTIONS)?,
            running_flushes: int_property(db, PROP_RUNNING_FLUSHES)?,
            write_stopped: int_property(db, PROP_WRITE_STOPPED)? != 0,
            delayed_write_rate: int_property(db, PROP_DELAYED_WRITE_RATE)?,
            tables,
            wal_files: list_files(&paths.wal_dir, |name| name.ends_with(WAL_FILE_SUFFIX))?,
            manifests: list_files(&paths.data_dir, |name| name.starts_with(MANIFEST_FILE_PREFIX))?,
        })
    }

    fn stall_reason(&self) -> Option<&'static str> {
        if self.write_stopped {
            Some("stopped")
        } else if self.delayed_write_rate > 0 {
            Some("delayed")
        } else {
            None
        }
    }
}

fn int_property(
    db: &DB,
    name: &str,
) -> Result<u64> {
    Ok(db.property_int_value(name)?.unwrap_or(0))
}

fn list_files(
    dir: &Path,
    matches: impl Fn(&str) -> bool,
) -> Result<BTreeSet<String>> {
    let mut files = BTreeSet::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if let Some(name) = entry.file_name().to_str() {
            if matches(name) {
                files.insert(entry.path().display().to_string());
            }
        }
    }
    Ok(files)
}

/// Events explaining the transition from `prev` to `next`.
///
/// Activity that starts and finishes between two samples is only visible
/// through the files it left behind.
pub(crate) fn diff(
    prev: &EngineStats,
    next: &EngineStats,
) -> Vec<EngineEvent> {
    let mut events = Vec::new();

    if next.running_flushes > prev.running_flushes {
        events.push(EngineEvent::FlushBegin(FlushInfo {
            running: next.running_flushes,
            err: None,
        }));
    }
    if next.running_compactions > prev.running_compactions {
        events.push(EngineEvent::CompactionBegin(CompactionInfo {
            running: next.running_compactions,
            err: None,
        }));
    }

    match (prev.stall_reason(), next.stall_reason()) {
        (None, Some(reason)) => events.push(EngineEvent::WriteStallBegin(WriteStallInfo {
            reason: reason.to_string(),
        })),
        (Some(_), None) => events.push(EngineEvent::WriteStallEnd),
        _ => {}
    }

    for path in next.manifests.difference(&prev.manifests) {
        events.push(EngineEvent::ManifestCreated(file_info(path)));
    }
    for path in prev.manifests.difference(&next.manifests) {
        events.push(EngineEvent::ManifestDeleted(file_info(path)));
    }
    for path in next.wal_files.difference(&prev.wal_files) {
        events.push(EngineEvent::WalCreated(file_info(path)));
    }
    for path in prev.wal_files.difference(&next.wal_files) {
        events.push(EngineEvent::WalDeleted(file_info(path)));
    }

    for (name, table) in &next.tables {
        if !prev.tables.contains_key(name) {
            events.push(EngineEvent::TableCreated(table.clone()));
        }
    }
    for (name, table) in &prev.tables {
        if !next.tables.contains_key(name) {
            events.push(EngineEvent::TableDeleted(table.clone()));
        }
    }

    if next.running_compactions < prev.running_compactions {
        events.push(EngineEvent::CompactionEnd(CompactionInfo {
            running: next.running_compactions,
            err: None,
        }));
    }
    if next.running_flushes < prev.running_flushes {
        events.push(EngineEvent::FlushEnd(FlushInfo {
            running: next.running_flushes,
            err: None,
        }));
    }

    if next.background_errors > prev.background_errors {
        events.push(EngineEvent::BackgroundError(format!(
            "engine reported {} new background error(s), {} in total",
            next.background_errors - prev.background_errors,
            next.background_errors
        )));
    }

    events
}

fn file_info(path: &str) -> FileInfo {
    FileInfo {
        path: path.to_string(),
        err: None,
    }
}

/// Handle of the sampling thread. Dropping it stops and joins the thread.
pub(crate) struct EventMonitor {
    stop_tx: Option<mpsc::Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl EventMonitor {
    pub(crate) fn spawn(
        db: Arc<DB>,
        paths: MonitoredPaths,
        listener: Arc<dyn EventListener>,
        poll_interval: Duration,
    ) -> Result<Self> {
        let (stop_tx, stop_rx) = mpsc::channel();
        let handle = thread::Builder::new()
            .name(MONITOR_THREAD_NAME.to_string())
            .spawn(move || run(db, paths, listener, poll_interval, stop_rx))?;

        Ok(Self {
            stop_tx: Some(stop_tx),
            handle: Some(handle),
        })
    }

    pub(crate) fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        // Disconnecting the channel wakes the thread immediately.
        drop(self.stop_tx.take());
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("event monitor thread panicked");
            }
        }
    }
}

impl Drop for EventMonitor {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn run(
    db: Arc<DB>,
    paths: MonitoredPaths,
    listener: Arc<dyn EventListener>,
    poll_interval: Duration,
    stop_rx: mpsc::Receiver<()>,
) {
    debug!(?poll_interval, "event monitor started");

    let mut prev = EngineStats::sample(&db, &paths).unwrap_or_else(|e| {
        warn!(?e, "initial engine sample failed");
        EngineStats::default()
    });
    listener.on_event(&EngineEvent::TableStatsLoaded {
        tables: prev.tables.len(),
    });

    loop {
        match stop_rx.recv_timeout(poll_interval) {
            Err(RecvTimeoutError::Timeout) => {}
            Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
        }

        let next = match EngineStats::sample(&db, &paths) {
            Ok(next) => next,
            Err(e) => {
                warn!(?e, "engine sample failed");
                continue;
            }
        };

        let events = diff(&prev, &next);
        trace!(count = events.len(), "engine sampled");
        for event in &events {
            listener.on_event(event);
        }
        prev = next;
    }

    debug!("event monitor stopped");
}
