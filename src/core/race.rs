//! The intentionally unsynchronized shared cell.
//!
//! Both worker roles write a role-specific sentinel here on first execution,
//! with no lock and no atomics. Which write wins depends entirely on
//! scheduling: an observable race condition, kept alongside the deadlock so
//! race detectors have something to flag too.

use std::cell::UnsafeCell;

/// A shared `Option<i32>` with deliberately no synchronization.
///
/// This is the textbook unsynchronized check-then-act: [`set_if_unset`]
/// performs a plain read followed by a plain write on memory shared between
/// threads, so two racing writers can both observe `None` and both store.
/// By the language memory model that concurrent access is a data race; the
/// cell exists precisely so tooling can catch it. Do not "fix" it with an
/// atomic or a mutex; that would delete the phenomenon being demonstrated.
///
/// [`set_if_unset`]: RaceCell::set_if_unset
#[derive(Debug, Default)]
pub struct RaceCell {
    value: UnsafeCell<Option<i32>>,
}

// Safety: sharing is the point. The cell intentionally admits unsynchronized
// concurrent access; callers get scheduling-dependent results.
unsafe impl Send for RaceCell {}
unsafe impl Sync for RaceCell {}

impl RaceCell {
    /// Create an uninitialized cell.
    pub const fn new() -> Self {
        RaceCell {
            value: UnsafeCell::new(None),
        }
    }

    /// Store `value` if no write has been observed yet.
    ///
    /// The emptiness check and the store are separate plain memory
    /// operations; under contention either writer (or both, in either
    /// order) may run the store. The cell only ever holds values that some
    /// caller passed in.
    pub fn set_if_unset(&self, value: i32) {
        // Safety: plain access to the shared cell is the documented contract
        // of this type; see the type-level docs.
        unsafe {
            let slot = self.value.get();
            if (*slot).is_none() {
                *slot = Some(value);
            }
        }
    }

    /// Read the current value.
    ///
    /// Returns `None` only before any writer has run.
    pub fn get(&self) -> Option<i32> {
        // Safety: see set_if_unset.
        unsafe { *self.value.get() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_starts_empty() {
        assert_eq!(RaceCell::new().get(), None);
    }

    #[test]
    fn test_first_write_wins_single_threaded() {
        let cell = RaceCell::new();
        cell.set_if_unset(10);
        cell.set_if_unset(20);
        assert_eq!(cell.get(), Some(10));
    }

    #[test]
    fn test_sequential_writers_see_one_sentinel() {
        // Writers serialized by join, so the accesses are ordered; the
        // contract under test is value ∈ {10, 20}, never None.
        let cell = Arc::new(RaceCell::new());

        let first = Arc::clone(&cell);
        thread::spawn(move || first.set_if_unset(10))
            .join()
            .unwrap();

        let second = Arc::clone(&cell);
        thread::spawn(move || second.set_if_unset(20))
            .join()
            .unwrap();

        assert!(matches!(cell.get(), Some(10) | Some(20)));
    }
}
