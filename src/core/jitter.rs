//! Bounded random delays.
//!
//! Every suspension point in the demo goes through here: the launcher sleeps
//! between worker starts and the workers sleep between and inside their
//! critical sections. Spreading the threads out in time is what makes the
//! opposite-order lock windows overlap often, but not always.

use rand::{Rng, rng};
use std::thread;
use std::time::Duration;

/// Draw a uniformly random duration in `[0, max_ms)` milliseconds.
///
/// `max_ms == 0` yields a zero duration. Exposed separately from
/// [`jitter_sleep`] so the distribution itself can be sampled without
/// actually sleeping.
pub fn jitter_duration(max_ms: u64) -> Duration {
    if max_ms == 0 {
        return Duration::ZERO;
    }
    Duration::from_millis(rng().random_range(0..max_ms))
}

/// Suspend the calling thread for a uniformly random duration in
/// `[0, max_ms)` milliseconds.
///
/// There is no error path: `thread::sleep` cannot be interrupted, so the
/// caller never sees a cancellation condition out of a jitter sleep.
pub fn jitter_sleep(max_ms: u64) {
    thread::sleep(jitter_duration(max_ms));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_bound_is_zero() {
        assert_eq!(jitter_duration(0), Duration::ZERO);
        // Must return immediately rather than panic on an empty range
        jitter_sleep(0);
    }

    #[test]
    fn test_durations_stay_below_bound() {
        for _ in 0..10_000 {
            assert!(jitter_duration(50) < Duration::from_millis(50));
        }
    }

    #[test]
    fn test_rough_uniformity() {
        // Bucket [0, 100) into quarters; with 10k samples each quarter
        // expects ~2500, so 1500 is a generous floor.
        let mut buckets = [0usize; 4];
        for _ in 0..10_000 {
            let ms = jitter_duration(100).as_millis() as u64;
            buckets[(ms / 25) as usize] += 1;
        }
        for (i, count) in buckets.iter().enumerate() {
            assert!(
                *count >= 1_500,
                "bucket {} badly underpopulated: {} samples",
                i,
                count
            );
        }
    }
}
