use crossbeam_channel::{Receiver, unbounded};
use gridlock::{Event, EventKind, Gridlock, Scenario, ScenarioConfig, WorkerHandle, WorkerRole, WorkerState};
use std::time::{Duration, Instant};

#[allow(dead_code)]
pub const SETTLE_TIMEOUT: Duration = Duration::from_secs(5);

/// A scenario plus a channel that receives every event it emits.
pub struct ScenarioHarness {
    pub scenario: Scenario,
    #[allow(dead_code)]
    pub events: Receiver<Event>,
}

pub fn observed_scenario(config: ScenarioConfig) -> ScenarioHarness {
    let (tx, rx) = unbounded::<Event>();

    let scenario = Gridlock::new()
        .silent()
        .config(config)
        .callback(move |event| {
            let _ = tx.send(event.clone());
        })
        .build()
        .expect("failed to build scenario");

    ScenarioHarness {
        scenario,
        events: rx,
    }
}

/// True while some unfinished worker of `role` is blocked on its second
/// lock (i.e. parked in `AttemptingSecond`, holding its first).
#[allow(dead_code)]
fn role_blocked_on_second(handles: &[WorkerHandle], role: WorkerRole) -> bool {
    handles
        .iter()
        .any(|h| h.role() == role && !h.is_finished() && h.state() == WorkerState::AttemptingSecond)
}

/// A wedged pair: both roles simultaneously hold their first lock and block
/// on the second. Sustained over `over`, this cannot resolve: the waits
/// are circular and nothing in the demo times out.
#[allow(dead_code)]
pub fn deadlock_sustained(handles: &[WorkerHandle], over: Duration) -> bool {
    let deadline = Instant::now() + over;
    loop {
        if !(role_blocked_on_second(handles, WorkerRole::Ascending)
            && role_blocked_on_second(handles, WorkerRole::Descending))
        {
            return false;
        }
        if Instant::now() >= deadline {
            return true;
        }
        std::thread::sleep(Duration::from_millis(20));
    }
}

#[allow(dead_code)]
pub fn all_finished(handles: &[WorkerHandle]) -> bool {
    handles.iter().all(|h| h.is_finished())
}

/// Drain the channel, counting events of `kind`. Discards the rest.
#[allow(dead_code)]
pub fn drain_count(events: &Receiver<Event>, kind: EventKind) -> usize {
    events.try_iter().filter(|e| e.kind == kind).count()
}
