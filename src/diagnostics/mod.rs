//! Relay of asynchronous engine lifecycle events to structured logging.
//!
//! Engines report background activity (flushes, compactions, write stalls,
//! file churn, background failures) through the [`EventListener`] observer.
//! [`DiagnosticsSink`] is the listener every store installs: it logs each
//! event and turns any event that carries an error into a [`FatalSignal`],
//! published on a watch channel for the process supervisor. The sink never
//! terminates the process itself.

mod event;


pub use event::*;

use std::fmt;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use tokio::sync::watch;
use tracing::error;
use tracing::info;
use tracing::warn;

use crate::Error;
use crate::Result;

/// Observer of engine background events.
///
/// Invoked from engine-owned background threads, possibly concurrently with
/// foreground operations and with other invocations of the same listener.
/// Implementations must not block for long.
pub trait EventListener: Send + Sync + 'static {
    fn on_event(
        &self,
        event: &EngineEvent,
    );
}

impl<F> EventListener for F
where
    F: Fn(&EngineEvent) + Send + Sync + 'static,
{
    fn on_event(
        &self,
        event: &EngineEvent,
    ) {
        self(event)
    }
}

/// Fans one event stream out to several listeners, in registration order.
#[derive(Clone, Default)]
pub struct ListenerSet {
    listeners: Vec<Arc<dyn EventListener>>,
}

impl ListenerSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(
        &mut self,
        listener: Arc<dyn EventListener>,
    ) {
        self.listeners.push(listener);
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn EventListener>> {
        self.listeners.iter()
    }
}

impl EventListener for ListenerSet {
    fn on_event(
        &self,
        event: &EngineEvent,
    ) {
        for listener in &self.listeners {
            listener.on_event(event);
        }
    }
}

impl fmt::Debug for ListenerSet {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_struct("ListenerSet").field("len", &self.listeners.len()).finish()
    }
}

/// Irrecoverable background failure awaiting the supervisor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FatalSignal {
    pub event: &'static str,
    pub reason: String,
}

impl From<FatalSignal> for Error {
    fn from(signal: FatalSignal) -> Self {
        Error::Fatal(format!("{}: {}", signal.event, signal.reason))
    }
}

pub struct DiagnosticsSink {
    fatal_tx: watch::Sender<Option<FatalSignal>>,
    events_seen: AtomicU64,
}

impl DiagnosticsSink {
    pub fn new() -> Self {
        let (fatal_tx, _) = watch::channel(None);
        Self {
            fatal_tx,
            events_seen: AtomicU64::new(0),
        }
    }

    /// Escalation channel. Holds `Some` once a fatal event was observed.
    pub fn subscribe(&self) -> watch::Receiver<Option<FatalSignal>> {
        self.fatal_tx.subscribe()
    }

    /// First fatal signal raised, if any.
    pub fn fatal(&self) -> Option<FatalSignal> {
        self.fatal_tx.borrow().clone()
    }

    /// Fails with [`Error::Fatal`] once a background failure was escalated.
    pub fn check(&self) -> Result<()> {
        match self.fatal() {
            Some(signal) => Err(signal.into()),
            None => Ok(()),
        }
    }

    pub fn events_seen(&self) -> u64 {
        self.events_seen.load(Ordering::Relaxed)
    }

    fn escalate(
        &self,
        signal: FatalSignal,
    ) {
        // First failure wins; later ones are only logged.
        let raised = self.fatal_tx.send_if_modified(|slot| {
            if slot.is_some() {
                return false;
            }
            *slot = Some(signal);
            true
        });
        if !raised {
            warn!("background failure already escalated");
        }
    }
}

impl Default for DiagnosticsSink {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for DiagnosticsSink {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_struct("DiagnosticsSink")
            .field("events_seen", &self.events_seen())
            .field("fatal", &self.fatal())
            .finish()
    }
}

impl EventListener for DiagnosticsSink {
    fn on_event(
        &self,
        event: &EngineEvent,
    ) {
        self.events_seen.fetch_add(1, Ordering::Relaxed);

        match event.error() {
            Some(err) => {
                error!(fatal = true, event = event.kind(), error = err, "storage engine background failure");
                self.escalate(FatalSignal {
                    event: event.kind(),
                    reason: err.to_string(),
                });
            }
            None => info!(event = event.kind(), "{}", event),
        }
    }
}
