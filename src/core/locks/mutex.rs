use crate::core::logger::EventSink;
use crate::core::types::{Event, EventKind};
use parking_lot::{Mutex as ParkingLotMutex, MutexGuard as ParkingLotMutexGuard};
use std::ops::{Deref, DerefMut};
use std::sync::Arc;

/// A mutex that reports its lifecycle to an [`EventSink`].
///
/// The ObservedMutex behaves like a plain mutex but emits an `Attempt` event
/// before blocking, an `Acquired` event once the lock is held, and a
/// `Released` event when the guard drops. That makes every step of the
/// demo's nested acquisitions visible to the console, the event log, and
/// any observer callback, including the step that never completes when the
/// scenario deadlocks.
///
/// # Example
///
/// ```rust
/// use gridlock::{EventSink, ObservedMutex};
/// use std::sync::Arc;
///
/// let sink = Arc::new(EventSink::default());
/// let lock = ObservedMutex::new("cache", 42, sink);
/// {
///     let guard = lock.lock();
///     assert_eq!(*guard, 42);
/// } // released (and reported) here
/// assert!(lock.try_lock().is_some());
/// ```
pub struct ObservedMutex<T> {
    /// Name used in emitted events ("lock1", "lock2")
    name: &'static str,
    /// The wrapped mutex
    inner: ParkingLotMutex<T>,
    /// Destination for lifecycle events
    sink: Arc<EventSink>,
}

/// Guard for an [`ObservedMutex`]; reports the release when dropped.
pub struct ObservedMutexGuard<'a, T> {
    lock: &'a ObservedMutex<T>,
    guard: ParkingLotMutexGuard<'a, T>,
}

impl<T> ObservedMutex<T> {
    /// Create a new ObservedMutex reporting to `sink`.
    pub fn new(name: &'static str, value: T, sink: Arc<EventSink>) -> Self {
        ObservedMutex {
            name,
            inner: ParkingLotMutex::new(value),
            sink,
        }
    }

    /// Name this mutex reports under.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Acquire the lock, blocking as long as it takes.
    ///
    /// The `Attempt` event fires before the blocking call, so a thread that
    /// never gets the lock still leaves a record of what it was waiting
    /// for. There is no timeout: a circular wait parks the caller forever,
    /// which is the demo's designed failure mode.
    pub fn lock(&self) -> ObservedMutexGuard<'_, T> {
        self.sink
            .emit(Event::here(EventKind::Attempt, Some(self.name)));

        let guard = self.inner.lock();

        self.sink
            .emit(Event::here(EventKind::Acquired, Some(self.name)));
        ObservedMutexGuard { lock: self, guard }
    }

    /// Try to acquire the lock without blocking.
    ///
    /// Used by probes that check a lock is actually free; emits the same
    /// `Attempt`/`Acquired` pair as [`lock`](ObservedMutex::lock) when it
    /// succeeds, and nothing further when it doesn't.
    pub fn try_lock(&self) -> Option<ObservedMutexGuard<'_, T>> {
        self.sink
            .emit(Event::here(EventKind::Attempt, Some(self.name)));

        let guard = self.inner.try_lock()?;

        self.sink
            .emit(Event::here(EventKind::Acquired, Some(self.name)));
        Some(ObservedMutexGuard { lock: self, guard })
    }
}

impl<T> Deref for ObservedMutexGuard<'_, T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        self.guard.deref()
    }
}

impl<T> DerefMut for ObservedMutexGuard<'_, T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.guard.deref_mut()
    }
}

impl<T> Drop for ObservedMutexGuard<'_, T> {
    fn drop(&mut self) {
        // Runs on the owning thread, so the event carries the right label
        self.lock
            .sink
            .emit(Event::here(EventKind::Released, Some(self.lock.name)));
    }
}
