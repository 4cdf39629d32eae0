//! The two worker roles and their nested-lock cycle.
//!
//! An ascending worker takes lock1 then lock2; a descending worker takes
//! lock2 then lock1. Each holds its first lock across a jitter sleep before
//! blocking on the second, which is exactly the window in which an opposite
//! pair wedges into a circular wait. A wedged worker is not an error: it
//! simply never leaves [`WorkerState::AttemptingSecond`].

use crate::core::SharedState;
use crate::core::jitter::jitter_sleep;
use crate::core::locks::mutex::ObservedMutex;
#[cfg(feature = "reentrant-stress")]
use crate::core::locks::reentrant::SelfLock;
use crate::core::types::{Event, EventKind};
use parking_lot::Mutex as ParkingLotMutex;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// Which acquisition order a worker uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerRole {
    /// lock1 first, then lock2 nested
    Ascending,
    /// lock2 first, then lock1 nested
    Descending,
}

impl WorkerRole {
    /// Short tag used in worker names ("worker-A-0", "worker-B-0").
    pub fn tag(&self) -> &'static str {
        match self {
            WorkerRole::Ascending => "A",
            WorkerRole::Descending => "B",
        }
    }

    /// Sentinel this role writes into the race cell on first execution.
    pub fn race_sentinel(&self) -> i32 {
        match self {
            WorkerRole::Ascending => 10,
            WorkerRole::Descending => 20,
        }
    }

    /// The (first, second) locks for this role's nested acquisition.
    pub(crate) fn lock_order<'a>(
        &self,
        shared: &'a SharedState,
    ) -> (&'a ObservedMutex<()>, &'a ObservedMutex<()>) {
        match self {
            WorkerRole::Ascending => (&shared.lock1, &shared.lock2),
            WorkerRole::Descending => (&shared.lock2, &shared.lock1),
        }
    }
}

/// Externally observable position in the worker's lifecycle.
///
/// `AttemptingSecond` is the interesting one: a worker parked there holds
/// its first lock and is blocked on the second. Two workers of opposite
/// roles both parked there are deadlocked, permanently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    /// Constructed, not yet started
    Created,
    /// Thread running, outside the lock cycle
    Running,
    /// Blocking on the first lock
    AttemptingFirst,
    /// First lock held, jittering before the nested acquisition
    HoldingFirst,
    /// First lock held, blocking on the second
    AttemptingSecond,
    /// Both locks held
    HoldingBoth,
    /// All repetitions completed
    Terminated,
}

/// One concurrent unit of execution in the demo.
pub struct Worker {
    name: String,
    role: WorkerRole,
    repetitions: usize,
    max_jitter_ms: u64,
    shared: Arc<SharedState>,
    state: Arc<ParkingLotMutex<WorkerState>>,
    #[cfg(feature = "reentrant-stress")]
    self_lock: SelfLock,
}

impl Worker {
    pub(crate) fn new(
        role: WorkerRole,
        index: usize,
        repetitions: usize,
        max_jitter_ms: u64,
        shared: Arc<SharedState>,
    ) -> Self {
        Worker {
            name: format!("worker-{}-{}", role.tag(), index),
            role,
            repetitions,
            max_jitter_ms,
            shared,
            state: Arc::new(ParkingLotMutex::new(WorkerState::Created)),
            #[cfg(feature = "reentrant-stress")]
            self_lock: SelfLock::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn role(&self) -> WorkerRole {
        self.role
    }

    /// Start the worker on its own named OS thread.
    ///
    /// Failure to spawn a thread is fatal to the whole process; there is no
    /// degraded mode for a demo whose entire point is the running threads.
    pub fn start(self) -> WorkerHandle {
        let name = self.name.clone();
        let role = self.role;
        let state = Arc::clone(&self.state);

        let handle = thread::Builder::new()
            .name(self.name.clone())
            .spawn(move || self.run())
            .expect("failed to spawn worker thread");

        WorkerHandle {
            name,
            role,
            state,
            handle,
        }
    }

    fn run(self) {
        self.set_state(WorkerState::Running);
        self.shared.sink.emit(Event::here(EventKind::Started, None));

        self.work();

        self.set_state(WorkerState::Terminated);
        self.shared.sink.emit(Event::here(EventKind::Finished, None));
    }

    /// The nested-lock cycle, `repetitions` times.
    fn work(&self) {
        // First execution seeds the race cell. The write is unsynchronized,
        // so which role's sentinel sticks depends on scheduling.
        self.shared.race.set_if_unset(self.role.race_sentinel());

        let (first, second) = self.role.lock_order(&self.shared);

        for _ in 0..self.repetitions {
            jitter_sleep(self.max_jitter_ms);

            #[cfg(feature = "reentrant-stress")]
            let _reentry = self.reenter();

            self.set_state(WorkerState::AttemptingFirst);
            {
                let _first = first.lock();
                self.set_state(WorkerState::HoldingFirst);
                jitter_sleep(self.max_jitter_ms);

                self.set_state(WorkerState::AttemptingSecond);
                {
                    let _second = second.lock();
                    self.set_state(WorkerState::HoldingBoth);
                    jitter_sleep(self.max_jitter_ms);
                } // second lock released here
            } // first lock released here
            self.set_state(WorkerState::Running);
        }
    }

    /// Redundant self-locking layers: the descending worker re-enters its
    /// own lock four levels deep around the cycle. Same thread, same lock,
    /// no contention possible, pure re-entrancy stress.
    #[cfg(feature = "reentrant-stress")]
    fn reenter(&self) -> Vec<parking_lot::ReentrantMutexGuard<'_, ()>> {
        match self.role {
            WorkerRole::Descending => (0..4).map(|_| self.self_lock.enter()).collect(),
            WorkerRole::Ascending => Vec::new(),
        }
    }

    fn set_state(&self, state: WorkerState) {
        *self.state.lock() = state;
    }
}

/// Handle to a started worker.
///
/// Holding or dropping the handle has no effect on the worker; it exists so
/// callers (and test harnesses) can inspect progress or choose to wait.
pub struct WorkerHandle {
    name: String,
    role: WorkerRole,
    state: Arc<ParkingLotMutex<WorkerState>>,
    handle: JoinHandle<()>,
}

impl WorkerHandle {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn role(&self) -> WorkerRole {
        self.role
    }

    /// Snapshot of the worker's current state.
    ///
    /// Readable while the worker is blocked: the worker never holds the
    /// state cell across a suspension point.
    pub fn state(&self) -> WorkerState {
        *self.state.lock()
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the worker. Blocks forever if the worker is deadlocked.
    pub fn join(self) -> thread::Result<()> {
        self.handle.join()
    }
}
