//! Start-and-forget worker launching.
//!
//! The launcher's contract ends at the last `start`: it warms up, brings the
//! workers up interleaved with jitter so neither role gets a head start, and
//! hands the handles back without joining anything. Whether the workers go
//! on to finish or wedge is not the launcher's concern.

use crate::core::jitter::jitter_sleep;
use crate::core::types::{Event, EventKind};
use crate::core::worker::{Worker, WorkerHandle, WorkerRole};
use crate::core::{ScenarioConfig, SharedState};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

pub struct Launcher {
    shared: Arc<SharedState>,
    config: ScenarioConfig,
}

impl Launcher {
    pub(crate) fn new(shared: Arc<SharedState>, config: ScenarioConfig) -> Self {
        Launcher { shared, config }
    }

    /// Start every worker and return their handles.
    ///
    /// Construction happens up front, then starts go A, B, A, B with a
    /// jitter sleep after each so the interleaving varies run to run.
    /// Returns immediately after the last start; completion (or deadlock)
    /// of the workers is deliberately not waited on here.
    pub fn run(&self) -> Vec<WorkerHandle> {
        let config = &self.config;

        // Fixed warm-up, not jittered
        thread::sleep(Duration::from_millis(config.startup_delay_ms));

        let mut ascending = Vec::with_capacity(config.worker_pairs);
        let mut descending = Vec::with_capacity(config.worker_pairs);
        for i in 0..config.worker_pairs {
            ascending.push(self.make_worker(WorkerRole::Ascending, i));
            descending.push(self.make_worker(WorkerRole::Descending, i));
        }

        let mut handles = Vec::with_capacity(config.worker_pairs * 2);
        for (a, b) in ascending.into_iter().zip(descending) {
            for worker in [a, b] {
                let name = worker.name().to_owned();
                handles.push(worker.start());
                self.shared
                    .sink
                    .emit(Event::about(&name, EventKind::Launching));
                jitter_sleep(config.max_jitter_ms);
            }
        }
        handles
    }

    fn make_worker(&self, role: WorkerRole, index: usize) -> Worker {
        Worker::new(
            role,
            index,
            self.config.repetitions,
            self.config.max_jitter_ms,
            Arc::clone(&self.shared),
        )
    }
}
