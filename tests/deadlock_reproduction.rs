mod common;
use common::{all_finished, deadlock_sustained, observed_scenario};
use gridlock::ScenarioConfig;
use std::time::{Duration, Instant};

enum Trial {
    Completed,
    Deadlocked,
    Unresolved,
}

/// One fresh pair, small jitter, then watch what happens.
fn run_trial() -> Trial {
    let harness = observed_scenario(ScenarioConfig {
        worker_pairs: 1,
        repetitions: 1,
        max_jitter_ms: 30,
        startup_delay_ms: 0,
    });
    let handles = harness.scenario.launch();

    let deadline = Instant::now() + Duration::from_secs(2);
    loop {
        if all_finished(&handles) {
            for handle in handles {
                handle.join().unwrap();
            }
            return Trial::Completed;
        }
        if deadlock_sustained(&handles, Duration::from_millis(250)) {
            // Permanently wedged. Joining the stuck threads would hang
            // the test, so they are left behind.
            return Trial::Deadlocked;
        }
        if Instant::now() >= deadline {
            // Neither clearly done nor clearly wedged; don't risk a join.
            return Trial::Unresolved;
        }
        std::thread::sleep(Duration::from_millis(10));
    }
}

/// Deadlock is statistical, not per-run: opposite acquisition orders must
/// wedge at least once across repeated trials.
#[test]
fn test_opposite_lock_orders_eventually_deadlock() {
    let mut completed = 0;
    for trial in 0..200 {
        match run_trial() {
            Trial::Deadlocked => {
                println!(
                    "deadlock reproduced on trial {} ({} clean completions first)",
                    trial, completed
                );
                return;
            }
            Trial::Completed => completed += 1,
            Trial::Unresolved => {}
        }
    }
    panic!("no deadlock in 200 trials of opposite-order lock acquisition");
}
