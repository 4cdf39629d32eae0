//! # Gridlock
//!
//! A lock-ordering deadlock demonstrator.
//!
//! Gridlock spawns two kinds of workers over one shared pair of locks: the
//! ascending role takes lock1 then lock2, the descending role takes lock2
//! then lock1, and randomized jitter widens the window in which both roles
//! hold their first lock while blocking on the second. The resulting
//! circular wait is the product, not a bug: the crate exists to give
//! deadlock detectors, tracers, and schedulers something real to observe.
//!
//! ## Features
//!
//! - Opposite-order nested lock acquisition with tunable jitter
//! - Lifecycle events (launching, started, waiting, acquired, released,
//!   finished) fanned out to the console, an optional JSON-lines log file,
//!   and an optional callback
//! - Externally observable worker states, including the blocked-waiting
//!   state a harness needs to recognize a wedged pair
//! - A deliberately unsynchronized shared cell, for exercising race
//!   detectors alongside the deadlock
//! - `reentrant-stress` feature: redundant re-entrant self-locking around
//!   the descending worker's critical section
//!
//! ## Example
//!
//! ```no_run
//! use gridlock::Gridlock;
//!
//! let scenario = Gridlock::new().build().expect("failed to set up scenario");
//! let workers = scenario.launch();
//! // The launcher has already returned; joining is the caller's choice.
//! // With default tuning this join is likely to block forever.
//! for worker in workers {
//!     let _ = worker.join();
//! }
//! ```

mod core;
pub use crate::core::{
    Gridlock, Scenario, ScenarioConfig,
    jitter::{jitter_duration, jitter_sleep},
    launcher::Launcher,
    locks::mutex::{ObservedMutex, ObservedMutexGuard},
    logger::EventSink,
    race::RaceCell,
    types::{Event, EventKind, ThreadId},
    worker::{Worker, WorkerHandle, WorkerRole, WorkerState},
};

#[cfg(feature = "reentrant-stress")]
pub use crate::core::locks::reentrant::SelfLock;

const BANNER: &str = r#"
      ▄▖▄▖▄▖▄▖▖ ▄▖▄▖▖▗
      ▌▌▙▘▐ ▌▌▌ ▌▌▌ ▙▘
      ▙▌▌▌▟▖▙▘▙▖▙▌▙▖▌▌
"#;
