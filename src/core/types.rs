use serde::Serialize;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Thread identifier type
///
/// Uniquely identifies a thread for the lifetime of the process. Worker
/// threads additionally carry a human-readable name; the numeric id is what
/// ties events together when a thread has no name.
pub type ThreadId = usize;

// Global counter for assigning unique thread IDs
static THREAD_ID_COUNTER: AtomicUsize = AtomicUsize::new(1);

// Thread-local storage for each thread's assigned ID
thread_local! {
    static THREAD_ID: ThreadId = {
        // Each thread gets a unique ID once, when this is first accessed
        THREAD_ID_COUNTER.fetch_add(1, Ordering::SeqCst)
    };
}

/// Get a unique identifier of the current thread
/// This will always return the same ID for the lifetime of the thread
pub fn get_current_thread_id() -> ThreadId {
    THREAD_ID.with(|&id| id)
}

/// Label used to tag events emitted by the current thread.
///
/// Worker threads are spawned with their worker name as the OS thread name;
/// anything else (the launcher, test threads) falls back to `thread-<id>`.
pub fn current_thread_label() -> String {
    std::thread::current()
        .name()
        .map(str::to_owned)
        .unwrap_or_else(|| format!("thread-{}", get_current_thread_id()))
}

/// The kind of lifecycle event that occurred
///
/// These are the observable steps of the demo: the launcher announcing a
/// start, a worker coming up, the three lock transitions, and termination.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum EventKind {
    /// The launcher started a worker thread
    Launching,
    /// A worker thread began running
    Started,
    /// A worker is blocking on a lock
    Attempt,
    /// A worker acquired a lock
    Acquired,
    /// A worker released a lock
    Released,
    /// A worker completed all of its repetitions
    Finished,
}

/// A single lifecycle event
///
/// `subject` is the worker the event is about. For lock events it is the
/// worker performing the operation; for `Launching` it is the worker being
/// started, emitted from the launcher's thread.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Event {
    /// Thread that emitted the event
    pub thread: ThreadId,
    /// Worker the event concerns
    pub subject: String,
    /// What happened
    pub kind: EventKind,
    /// Lock involved, for lock events
    pub lock: Option<&'static str>,
}

impl Event {
    /// Event about the current thread's own worker
    pub(crate) fn here(kind: EventKind, lock: Option<&'static str>) -> Self {
        Event {
            thread: get_current_thread_id(),
            subject: current_thread_label(),
            kind,
            lock,
        }
    }

    /// Event emitted on behalf of another worker (launcher announcements)
    pub(crate) fn about(subject: &str, kind: EventKind) -> Self {
        Event {
            thread: get_current_thread_id(),
            subject: subject.to_owned(),
            kind,
            lock: None,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.kind, self.lock) {
            (EventKind::Launching, _) => write!(f, " starting {}", self.subject),
            (EventKind::Started, _) => write!(f, "{} started", self.subject),
            (EventKind::Attempt, Some(lock)) => {
                write!(f, "  {} waiting for {}", self.subject, lock)
            }
            (EventKind::Acquired, Some(lock)) => {
                write!(f, "  --- {} got {} ---", self.subject, lock)
            }
            (EventKind::Released, Some(lock)) => {
                write!(f, "  {} released {}", self.subject, lock)
            }
            (EventKind::Finished, _) => write!(f, "{} finished", self.subject),
            // Lock events always carry a lock name; render something useful anyway
            (kind, None) => write!(f, "{} {:?}", self.subject, kind),
        }
    }
}
