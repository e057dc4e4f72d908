//! Basic CLI E2E tests.
//!
//! Tests invoke CLI commands via cargo run against a scratch home
//! directory, so no real user data is touched.

use std::path::Path;
use std::process::Command;

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(home: &Path, args: &[&str]) -> (String, String, i32) {
    let output = Command::new("cargo")
        .args(["run", "-p", "stillmind-cli", "--"])
        .args(args)
        .env("HOME", home)
        .env("STILLMIND_ENV", "dev")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

fn scratch_home() -> tempfile::TempDir {
    tempfile::tempdir().expect("Failed to create scratch home")
}

#[test]
fn test_stats_summary() {
    let home = scratch_home();
    let (stdout, _, code) = run_cli(home.path(), &["stats", "summary"]);
    assert_eq!(code, 0, "stats summary failed");
    assert!(stdout.contains("Session Summary:"));
    assert!(stdout.contains("Completed sessions"));
}

#[test]
fn test_stats_summary_json() {
    let home = scratch_home();
    let (stdout, _, code) = run_cli(home.path(), &["stats", "summary", "--json"]);
    assert_eq!(code, 0, "stats summary JSON failed");
    let stats: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(stats["totalSessions"], 0);
    assert_eq!(stats["completionRate"], 0.0);
}

#[test]
fn test_stats_advice_json() {
    let home = scratch_home();
    let (stdout, _, code) = run_cli(home.path(), &["stats", "advice", "--json"]);
    assert_eq!(code, 0, "stats advice JSON failed");
    let advice: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(advice["focusMinutes"], 25);
    assert_eq!(advice["breakMinutes"], 5);
}

#[test]
fn test_stats_chart() {
    let home = scratch_home();
    let (stdout, _, code) = run_cli(home.path(), &["stats", "chart"]);
    assert_eq!(code, 0, "stats chart failed");
    assert!(stdout.contains("Daily Minutes (last 7 days):"));
}

#[test]
fn test_stats_chart_caps_days() {
    let home = scratch_home();
    let (stdout, _, code) = run_cli(home.path(), &["stats", "chart", "--days", "4000000000"]);
    assert_eq!(code, 0, "stats chart with huge day count failed");
    assert!(stdout.contains("(last 365 days)"));
}

#[test]
fn test_history_add_and_list() {
    let home = scratch_home();
    let (stdout, _, code) = run_cli(home.path(), &["history", "add", "--minutes", "12"]);
    assert_eq!(code, 0, "history add failed");
    let record: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(record["duration"], 12);
    assert_eq!(record["endType"], "completed");

    let (stdout, _, code) = run_cli(home.path(), &["history", "list"]);
    assert_eq!(code, 0, "history list failed");
    assert!(stdout.contains("12 min"));
    assert!(stdout.contains("completed"));

    let (stdout, _, code) = run_cli(home.path(), &["stats", "summary", "--json"]);
    assert_eq!(code, 0, "stats summary JSON failed");
    let stats: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(stats["totalSessions"], 1);
    assert_eq!(stats["totalMinutes"], 12);
}

#[test]
fn test_history_clear_requires_yes() {
    let home = scratch_home();
    let (_, _, code) = run_cli(home.path(), &["history", "add", "--minutes", "10"]);
    assert_eq!(code, 0, "history add failed");

    let (_, stderr, code) = run_cli(home.path(), &["history", "clear"]);
    assert_eq!(code, 1, "history clear without --yes must fail");
    assert!(stderr.contains("refusing to clear"));

    let (stdout, _, code) = run_cli(home.path(), &["history", "clear", "--yes"]);
    assert_eq!(code, 0, "history clear --yes failed");
    assert!(stdout.contains("deleted 1 sessions"));
}

#[test]
fn test_session_completes_across_invocations() {
    let home = scratch_home();
    let (stdout, _, code) = run_cli(home.path(), &["session", "start", "--minutes", "0"]);
    assert_eq!(code, 0, "session start failed");
    let snapshot: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(snapshot["state"], "running");

    // Status ticks the parked runner; a zero-length session finishes
    // immediately and its record is appended.
    let (stdout, _, code) = run_cli(home.path(), &["session", "status"]);
    assert_eq!(code, 0, "session status failed");
    assert!(stdout.contains("\"finished\""));
    assert!(stdout.contains("\"endType\": \"completed\""));

    let (stdout, _, code) = run_cli(home.path(), &["history", "list"]);
    assert_eq!(code, 0, "history list failed");
    assert!(stdout.contains("completed"));
}

#[test]
fn test_session_pause_resume_give_up() {
    let home = scratch_home();
    let (_, _, code) = run_cli(home.path(), &["session", "start", "--minutes", "10"]);
    assert_eq!(code, 0, "session start failed");

    let (stdout, _, code) = run_cli(home.path(), &["session", "pause"]);
    assert_eq!(code, 0, "session pause failed");
    let snapshot: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(snapshot["state"], "paused");

    let (stdout, _, code) = run_cli(home.path(), &["session", "resume"]);
    assert_eq!(code, 0, "session resume failed");
    let snapshot: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(snapshot["state"], "running");

    let (stdout, _, code) = run_cli(home.path(), &["session", "give-up"]);
    assert_eq!(code, 0, "session give-up failed");
    let record: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(record["endType"], "gave_up");
    assert_eq!(record["completed"], false);

    let (stdout, _, code) = run_cli(home.path(), &["history", "list"]);
    assert_eq!(code, 0, "history list failed");
    assert!(stdout.contains("gave up"));
}

#[test]
fn test_session_start_while_running_is_refused() {
    let home = scratch_home();
    let (_, _, code) = run_cli(home.path(), &["session", "start", "--minutes", "10"]);
    assert_eq!(code, 0, "session start failed");

    let (stdout, stderr, code) = run_cli(home.path(), &["session", "start", "--minutes", "25"]);
    assert_eq!(code, 0, "second session start failed");
    assert!(stdout.trim().is_empty());
    assert!(stderr.contains("already underway"));
}

#[test]
fn test_config_get_and_set() {
    let home = scratch_home();
    let (stdout, _, code) = run_cli(home.path(), &["config", "get", "session.default_duration_min"]);
    assert_eq!(code, 0, "config get failed");
    assert_eq!(stdout.trim(), "10");

    let (stdout, _, code) = run_cli(
        home.path(),
        &["config", "set", "session.default_duration_min", "25"],
    );
    assert_eq!(code, 0, "config set failed");
    assert_eq!(stdout.trim(), "ok");

    let (stdout, _, code) = run_cli(home.path(), &["config", "get", "session.default_duration_min"]);
    assert_eq!(code, 0, "config get after set failed");
    assert_eq!(stdout.trim(), "25");
}

#[test]
fn test_config_get_unknown_key_fails() {
    let home = scratch_home();
    let (_, stderr, code) = run_cli(home.path(), &["config", "get", "nope.nope"]);
    assert_eq!(code, 1, "config get of unknown key must fail");
    assert!(stderr.contains("unknown key"));
}

#[test]
fn test_config_show() {
    let home = scratch_home();
    let (stdout, _, code) = run_cli(home.path(), &["config", "show"]);
    assert_eq!(code, 0, "config show failed");
    let config: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert!(config.get("session").is_some());
    assert!(config.get("audio").is_some());
}
