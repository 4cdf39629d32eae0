//! Redundant re-entrant self-locking, for stress-testing re-entrancy.
//!
//! The descending worker can wrap its whole lock cycle in several nested
//! acquisitions of a lock it alone owns. The layers are semantic no-ops
//! (the same thread re-entering a lock it already holds) and exist purely to
//! exercise re-entrant lock handling in whatever tooling is watching the
//! demo. Compiled only under the `reentrant-stress` feature.

use parking_lot::{ReentrantMutex, ReentrantMutexGuard};

/// A per-worker re-entrant lock with no protected data.
///
/// The owning worker may call [`enter`](SelfLock::enter) any number of times
/// nested without self-blocking; each guard releases one level on drop.
#[derive(Debug, Default)]
pub struct SelfLock {
    inner: ReentrantMutex<()>,
}

impl SelfLock {
    pub fn new() -> Self {
        SelfLock {
            inner: ReentrantMutex::new(()),
        }
    }

    /// Acquire one re-entrant level.
    pub fn enter(&self) -> ReentrantMutexGuard<'_, ()> {
        self.inner.lock()
    }
}
