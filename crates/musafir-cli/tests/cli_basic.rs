//! Basic CLI E2E tests.
//!
//! Each test runs the `musafir` binary against its own temporary data
//! directory and checks exit codes and output.

use std::path::Path;
use std::process::Command;

/// Run a CLI command with `MUSAFIR_HOME` set to `home`.
fn run_cli(home: &Path, args: &[&str]) -> (i32, String, String) {
    let output = Command::new(env!("CARGO_BIN_EXE_musafir"))
        .args(args)
        .env("MUSAFIR_HOME", home)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (code, stdout, stderr)
}

fn run_json(home: &Path, args: &[&str]) -> serde_json::Value {
    let (code, stdout, stderr) = run_cli(home, args);
    assert_eq!(code, 0, "CLI command failed: {:?}\n{}", args, stderr);
    serde_json::from_str(&stdout).expect("Failed to parse JSON output")
}

#[test]
fn test_tasks_json() {
    let home = tempfile::tempdir().unwrap();
    let tasks = run_json(home.path(), &["tasks", "--json"]);
    let tasks = tasks.as_array().unwrap();
    assert_eq!(tasks.len(), 4);
    assert_eq!(tasks[0]["id"], 1);
    assert_eq!(tasks[0]["points"], 10);
    assert_eq!(tasks[1]["category"], "ego_work");
}

#[test]
fn test_status_fresh() {
    let home = tempfile::tempdir().unwrap();
    let status = run_json(home.path(), &["status", "--json"]);
    assert_eq!(status["type"], "StateSnapshot");
    assert_eq!(status["level"], 1);
    assert_eq!(status["points"], 0);
    assert_eq!(status["gauge_value"], 0);
    assert_eq!(status["gauge_band"], "obscured");
}

#[test]
fn test_record_persists_between_runs() {
    let home = tempfile::tempdir().unwrap();
    let (code, stdout, stderr) = run_cli(home.path(), &["record", "1", "I felt calm"]);
    assert_eq!(code, 0, "record failed: {stderr}");
    assert!(stderr.contains("+10 points"));
    let result: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(result["total_points"], 10);
    assert_eq!(result["gauge_value"], 5);

    let status = run_json(home.path(), &["status", "--json"]);
    assert_eq!(status["points"], 10);

    let journal = run_json(home.path(), &["journal", "--json"]);
    let journal = journal.as_array().unwrap();
    assert_eq!(journal.len(), 1);
    assert_eq!(journal[0]["content"], "I felt calm");
    assert_eq!(journal[0]["points_awarded"], 10);
}

#[test]
fn test_record_rejects_blank_reflection() {
    let home = tempfile::tempdir().unwrap();
    let (code, _, stderr) = run_cli(home.path(), &["record", "1", "   "]);
    assert_ne!(code, 0);
    assert!(stderr.contains("Reflection text must not be empty"));

    let journal = run_json(home.path(), &["journal", "--json"]);
    assert!(journal.as_array().unwrap().is_empty());
}

#[test]
fn test_record_rejects_unknown_task() {
    let home = tempfile::tempdir().unwrap();
    let (code, _, stderr) = run_cli(home.path(), &["record", "no-such-task", "valid text"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("Unknown task: no-such-task"));

    let status = run_json(home.path(), &["status", "--json"]);
    assert_eq!(status["points"], 0);
}

#[test]
fn test_stage_unlocks_after_level_up() {
    let home = tempfile::tempdir().unwrap();
    for _ in 0..5 {
        let (code, _, stderr) = run_cli(home.path(), &["record", "2", "patience"]);
        assert_eq!(code, 0, "record failed: {stderr}");
    }
    let stages = run_json(home.path(), &["stages", "--json"]);
    let unlocked: Vec<bool> = stages
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["unlocked"].as_bool().unwrap())
        .collect();
    assert_eq!(unlocked, vec![true, true, false]);
}

#[test]
fn test_journal_limit() {
    let home = tempfile::tempdir().unwrap();
    let (code, _, stderr) = run_cli(home.path(), &["record", "1", "first"]);
    assert_eq!(code, 0, "record failed: {stderr}");
    let (code, _, stderr) = run_cli(home.path(), &["record", "4", "second"]);
    assert_eq!(code, 0, "record failed: {stderr}");
    let journal = run_json(home.path(), &["journal", "--json", "--limit", "1"]);
    let journal = journal.as_array().unwrap();
    assert_eq!(journal.len(), 1);
    assert_eq!(journal[0]["content"], "second");
}

#[test]
fn test_ephemeral_session_when_persistence_disabled() {
    let home = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(home.path(), &["config", "set", "storage.persist", "false"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("ok"));

    let (code, _, _) = run_cli(home.path(), &["record", "1", "calm"]);
    assert_eq!(code, 0);
    let status = run_json(home.path(), &["status", "--json"]);
    assert_eq!(status["points"], 0);
}

#[test]
fn test_config_get_and_unknown_key() {
    let home = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(home.path(), &["config", "get", "notifications.duration_secs"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "3");

    let (code, _, stderr) = run_cli(home.path(), &["config", "get", "nope"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("Unknown configuration key: nope"));
}

#[test]
fn test_stats() {
    let home = tempfile::tempdir().unwrap();
    let (code, _, stderr) = run_cli(home.path(), &["record", "3", "gave quietly"]);
    assert_eq!(code, 0, "record failed: {stderr}");
    let stats = run_json(home.path(), &["stats"]);
    assert_eq!(stats["total_efforts"], 1);
}

#[test]
fn test_zero_duration_suppresses_confirmation() {
    let home = tempfile::tempdir().unwrap();
    let (code, _, _) = run_cli(
        home.path(),
        &["config", "set", "notifications.duration_secs", "0"],
    );
    assert_eq!(code, 0);

    let (code, stdout, stderr) = run_cli(home.path(), &["record", "1", "calm"]);
    assert_eq!(code, 0, "record failed: {stderr}");
    assert!(!stderr.contains("+10 points"));
    let result: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(result["total_points"], 10);
}

#[test]
fn test_unreadable_database_is_left_alone() {
    let home = tempfile::tempdir().unwrap();
    for _ in 0..5 {
        let (code, _, stderr) = run_cli(home.path(), &["record", "2", "patience"]);
        assert_eq!(code, 0, "record failed: {stderr}");
    }

    let db = home.path().join("musafir.db");
    {
        let conn = rusqlite::Connection::open(&db).unwrap();
        conn.execute("UPDATE journal SET category = 'gratitude'", []).unwrap();
    }

    let (code, _, stderr) = run_cli(home.path(), &["record", "1", "calm"]);
    assert_eq!(code, 0, "record failed: {stderr}");
    assert!(stderr.contains("progress will not be kept"));

    let conn = rusqlite::Connection::open(&db).unwrap();
    let points: u32 = conn
        .query_row("SELECT points FROM progress WHERE id = 1", [], |row| row.get(0))
        .unwrap();
    assert_eq!(points, 125);
}
