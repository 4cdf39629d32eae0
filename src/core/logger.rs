//! Event reporting for the demo.
//!
//! Every lifecycle event flows through one [`EventSink`], which fans out to
//! up to three destinations: human-readable console lines, an optional
//! machine-readable JSON-lines file, and an optional in-process callback.
//! The sink is shared by the launcher, the workers, and the lock wrappers.

use crate::core::types::{Event, EventKind, ThreadId};
use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;

/// Structure for a single file-log line
#[derive(Debug, Serialize)]
struct LogEntry<'a> {
    /// Seconds since the Unix epoch, with microsecond precision
    timestamp: f64,
    /// Thread that emitted the event
    thread: ThreadId,
    /// Worker the event concerns
    subject: &'a str,
    /// What happened
    kind: EventKind,
    /// Lock involved, for lock events
    lock: Option<&'static str>,
}

/// The file half of the sink: one JSON object per line, append-only.
#[derive(Debug)]
pub(crate) struct EventLog {
    file: Mutex<File>,
}

impl EventLog {
    /// Open (or create) the log file at `path`.
    pub(crate) fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .context("Failed to open event log file")?;

        Ok(EventLog {
            file: Mutex::new(file),
        })
    }

    fn record(&self, event: &Event) {
        // Absolute timestamp as f64: seconds since Unix epoch with
        // microsecond precision
        let now = Utc::now();
        let timestamp = now.timestamp() as f64 + now.timestamp_subsec_micros() as f64 / 1_000_000.0;

        let entry = LogEntry {
            timestamp,
            thread: event.thread,
            subject: &event.subject,
            kind: event.kind,
            lock: event.lock,
        };

        if let Ok(json) = serde_json::to_string(&entry) {
            // A full disk must not take the demo down with it
            if let Ok(mut file) = self.file.lock() {
                let _ = writeln!(file, "{}", json);
            }
        }
    }
}

pub(crate) type EventCallback = Box<dyn Fn(&Event) + Send + Sync + 'static>;

/// Fan-out point for lifecycle events.
///
/// A default-constructed sink swallows everything, which is what unit tests
/// and doc examples want; [`Gridlock::build`](crate::Gridlock::build) wires
/// up the console, file, and callback destinations from the builder.
#[derive(Default)]
pub struct EventSink {
    console: bool,
    log: Option<EventLog>,
    callback: Option<EventCallback>,
}

impl EventSink {
    pub(crate) fn new(console: bool, log: Option<EventLog>, callback: Option<EventCallback>) -> Self {
        EventSink {
            console,
            log,
            callback,
        }
    }

    /// Report one event to every configured destination.
    pub fn emit(&self, event: Event) {
        if self.console {
            println!("{}", event);
        }
        if let Some(log) = &self.log {
            log.record(&event);
        }
        if let Some(callback) = &self.callback {
            callback(&event);
        }
    }
}

impl std::fmt::Debug for EventSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventSink")
            .field("console", &self.console)
            .field("log", &self.log)
            .field("callback", &self.callback.as_ref().map(|_| "Fn"))
            .finish()
    }
}
