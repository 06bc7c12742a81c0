use assert_cmd::prelude::*;
use predicates::str::contains;
use std::process::Command;

// `wpool` with a small workload should report every task
#[test]
fn cli_runs_workload() {
    Command::cargo_bin("wpool")
        .unwrap()
        .args(&["--threads", "2", "--tasks", "20", "--max-sleep-ms", "1"])
        .assert()
        .success()
        .stdout(contains("20 tasks on 2 workers"))
        .stdout(contains("20 returned, 0 panicked"));
}

// `wpool --json` should print the final statistics as JSON
#[test]
fn cli_prints_json_stats() {
    let output = Command::cargo_bin("wpool")
        .unwrap()
        .args(&["--threads", "3", "--tasks", "12", "--max-sleep-ms", "0"])
        .args(&["--panic-every", "4", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stats: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(3, stats["threads"]);
    assert_eq!(12, stats["completed"]);
    assert_eq!(3, stats["panicked"]);
    assert_eq!(0, stats["queued"]);
    assert_eq!(0, stats["active"]);
}

// Negative thread counts are clamped to a single worker
#[test]
fn cli_clamps_thread_count() {
    Command::cargo_bin("wpool")
        .unwrap()
        .args(&["--threads", "-4", "--tasks", "5", "--max-sleep-ms", "0"])
        .assert()
        .success()
        .stdout(contains("5 tasks on 1 workers"));
}

// A zero queue capacity is a configuration error
#[test]
fn cli_rejects_zero_queue_capacity() {
    Command::cargo_bin("wpool")
        .unwrap()
        .args(&["--queue-capacity", "0", "--tasks", "1"])
        .assert()
        .failure()
        .stderr(contains("Invalid pool configuration"));
}

// A bounded queue still completes every task
#[test]
fn cli_bounded_queue() {
    Command::cargo_bin("wpool")
        .unwrap()
        .args(&["--threads", "2", "--tasks", "30", "--max-sleep-ms", "1"])
        .args(&["--queue-capacity", "4"])
        .assert()
        .success()
        .stdout(contains("30 returned"));
}
