// Core types
pub mod types;

// Bounded random delays
pub mod jitter;

// Start-and-forget launching
pub mod launcher;

// Observed lock primitives
pub mod locks;

// Event fan-out (console, file, callback)
pub mod logger;

// The intentionally unsynchronized cell
pub mod race;

// Worker roles and lifecycle
pub mod worker;

use crate::core::launcher::Launcher;
use crate::core::locks::mutex::ObservedMutex;
use crate::core::logger::{EventCallback, EventLog, EventSink};
use crate::core::race::RaceCell;
use crate::core::types::Event;
use crate::core::worker::{Worker, WorkerHandle, WorkerRole};
use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;

/// Demo tuning knobs.
///
/// The defaults are the demo's fixed constants; the binary never deviates
/// from them. Tests construct non-default configs to stretch or shrink the
/// contention window.
#[derive(Debug, Clone)]
pub struct ScenarioConfig {
    /// Worker pairs to launch (one ascending + one descending per pair)
    pub worker_pairs: usize,
    /// Nested-lock cycles each worker attempts before terminating
    pub repetitions: usize,
    /// Upper bound for every jitter sleep, in milliseconds
    pub max_jitter_ms: u64,
    /// Fixed warm-up delay before the launcher starts anything
    pub startup_delay_ms: u64,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        ScenarioConfig {
            worker_pairs: 2,
            repetitions: 1,
            max_jitter_ms: 100,
            startup_delay_ms: 1000,
        }
    }
}

/// Everything the workers share: the contended lock pair, the race cell,
/// and the event sink. Created once per scenario and never torn down while
/// any worker might still be blocked on it.
pub(crate) struct SharedState {
    pub(crate) lock1: ObservedMutex<()>,
    pub(crate) lock2: ObservedMutex<()>,
    pub(crate) race: RaceCell,
    pub(crate) sink: Arc<EventSink>,
}

impl SharedState {
    pub(crate) fn new(sink: Arc<EventSink>) -> Self {
        SharedState {
            lock1: ObservedMutex::new("lock1", (), Arc::clone(&sink)),
            lock2: ObservedMutex::new("lock2", (), Arc::clone(&sink)),
            race: RaceCell::new(),
            sink,
        }
    }
}

/// Gridlock scenario builder
///
/// By default:
/// - Console lines are printed
/// - No event log file is written
/// - No callback is installed
pub struct Gridlock {
    config: ScenarioConfig,
    log_path: Option<PathBuf>,
    console: bool,
    callback: Option<EventCallback>,
}

impl Default for Gridlock {
    fn default() -> Self {
        Self::new()
    }
}

impl Gridlock {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Gridlock {
            config: ScenarioConfig::default(),
            log_path: None,
            console: true,
            callback: None,
        }
    }

    /// Replace the demo constants wholesale.
    pub fn config(mut self, config: ScenarioConfig) -> Self {
        self.config = config;
        self
    }

    /// Also write every event as a JSON line to the file at `path`.
    pub fn with_log<P: AsRef<std::path::Path>>(mut self, path: P) -> Self {
        self.log_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Suppress console output. Tests want the events, not the noise.
    pub fn silent(mut self) -> Self {
        self.console = false;
        self
    }

    /// Install a callback invoked (from the emitting thread) for every
    /// event. The callback runs on worker threads concurrently, hence the
    /// `Sync` bound.
    pub fn callback<F>(mut self, callback: F) -> Self
    where
        F: Fn(&Event) + Send + Sync + 'static,
    {
        self.callback = Some(Box::new(callback));
        self
    }

    /// Materialize the scenario: open the event log (if any), wire up the
    /// sink, and allocate the shared lock pair and race cell.
    ///
    /// # Errors
    /// Returns an error if the event log file cannot be opened.
    pub fn build(self) -> Result<Scenario> {
        let log = match &self.log_path {
            Some(path) => {
                Some(EventLog::create(path).context("Failed to initialize event log")?)
            }
            None => None,
        };
        let sink = Arc::new(EventSink::new(self.console, log, self.callback));

        if self.console {
            println!("{}", crate::BANNER);
        }

        Ok(Scenario {
            shared: Arc::new(SharedState::new(sink)),
            config: self.config,
        })
    }
}

/// A built scenario: one lock pair, one race cell, ready to launch.
pub struct Scenario {
    shared: Arc<SharedState>,
    config: ScenarioConfig,
}

impl Scenario {
    /// Run the launcher: warm-up delay, then start every worker interleaved
    /// with jitter. Returns all handles without joining any of them.
    pub fn launch(&self) -> Vec<WorkerHandle> {
        Launcher::new(Arc::clone(&self.shared), self.config.clone()).run()
    }

    /// Start a single worker of `role` immediately, bypassing the launcher.
    /// Useful for observing one role in isolation.
    pub fn spawn_worker(&self, role: WorkerRole, index: usize) -> WorkerHandle {
        Worker::new(
            role,
            index,
            self.config.repetitions,
            self.config.max_jitter_ms,
            Arc::clone(&self.shared),
        )
        .start()
    }

    /// Current value of the race cell.
    pub fn race_value(&self) -> Option<i32> {
        self.shared.race.get()
    }

    /// The lock the ascending role takes first.
    pub fn lock1(&self) -> &ObservedMutex<()> {
        &self.shared.lock1
    }

    /// The lock the descending role takes first.
    pub fn lock2(&self) -> &ObservedMutex<()> {
        &self.shared.lock2
    }

    pub fn config(&self) -> &ScenarioConfig {
        &self.config
    }
}
