use gridlock::{Gridlock, ScenarioConfig, WorkerRole};
use serde_json::Value;
use std::fs;

/// A deterministic single-worker run writes one JSON line per event:
/// started, two attempt/acquired pairs, two releases, finished.
#[test]
fn test_event_log_writes_one_json_line_per_event() {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let path = dir.path().join("events.log");

    let scenario = Gridlock::new()
        .silent()
        .config(ScenarioConfig {
            worker_pairs: 1,
            repetitions: 1,
            max_jitter_ms: 0,
            startup_delay_ms: 0,
        })
        .with_log(&path)
        .build()
        .expect("failed to build scenario");

    scenario
        .spawn_worker(WorkerRole::Ascending, 0)
        .join()
        .unwrap();

    let contents = fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 8, "one line per lifecycle event");

    let entries: Vec<Value> = lines
        .iter()
        .map(|line| serde_json::from_str(line).expect("log line is not valid JSON"))
        .collect();

    for entry in &entries {
        assert!(entry["timestamp"].as_f64().unwrap() > 0.0);
        assert_eq!(entry["subject"], "worker-A-0");
        assert!(entry["kind"].is_string());
    }

    assert_eq!(entries.first().unwrap()["kind"], "Started");
    assert_eq!(entries.last().unwrap()["kind"], "Finished");

    // Nested order: lock1 before lock2 on the way in, lock2 before lock1
    // on the way out.
    let lock_sequence: Vec<(String, String)> = entries
        .iter()
        .filter(|e| e["lock"].is_string())
        .map(|e| {
            (
                e["kind"].as_str().unwrap().to_owned(),
                e["lock"].as_str().unwrap().to_owned(),
            )
        })
        .collect();
    assert_eq!(
        lock_sequence,
        vec![
            ("Attempt".to_owned(), "lock1".to_owned()),
            ("Acquired".to_owned(), "lock1".to_owned()),
            ("Attempt".to_owned(), "lock2".to_owned()),
            ("Acquired".to_owned(), "lock2".to_owned()),
            ("Released".to_owned(), "lock2".to_owned()),
            ("Released".to_owned(), "lock1".to_owned()),
        ]
    );
}
