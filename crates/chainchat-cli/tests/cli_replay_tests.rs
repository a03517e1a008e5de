//! CLI integration tests
//!
//! Drive the built `chainchat` binary against scripts written to a temp dir.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use serde_json::{json, Value};
use tempfile::TempDir;

fn write_file(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_chainchat"))
        .args(args)
        .output()
        .expect("Failed to execute CLI")
}

fn replay(script: &Path, extra: &[&str]) -> Output {
    let mut args = vec!["replay", script.to_str().unwrap()];
    args.extend_from_slice(extra);
    run(&args)
}

fn stdout_lines(output: &Output) -> Vec<Value> {
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

#[test]
fn test_parse_known_command() {
    let output = run(&["parse", "start safe strategy"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("strategyId 1"), "stdout: {}", stdout);
}

#[test]
fn test_parse_unknown_command_fails_with_402() {
    let output = run(&["parse", "Start Safe Strategy"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("[402] ERR_INVALID_COMMAND"), "stderr: {}", stderr);
}

#[test]
fn test_replay_prints_one_line_per_step_and_digest() {
    // GIVEN a script that starts, fails a second start, then exits
    let dir = TempDir::new().unwrap();
    let script = write_file(
        &dir,
        "script.json",
        &json!([
            {"caller": "wallet_1", "height": 5,
             "call": {"type": "execute_command", "command": "start safe strategy", "amount": 5_000_000}},
            {"caller": "wallet_1", "height": 6,
             "call": {"type": "execute_command", "command": "start growth strategy", "amount": 1}},
            {"caller": "wallet_1", "height": 7,
             "call": {"type": "execute_command", "command": "exit all positions"}},
            {"caller": "wallet_1", "height": 8,
             "call": {"type": "get_user_strategy", "principal": "wallet_1"}}
        ])
        .to_string(),
    );

    // WHEN it is replayed
    let output = replay(&script, &[]);

    // THEN the process succeeds and reports each outcome in order
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let lines = stdout_lines(&output);
    assert_eq!(lines.len(), 5);
    assert_eq!(lines[0], json!({"ok": {"strategyId": 1, "timestamp": 5}}));
    assert_eq!(lines[1]["err"]["code"], 405);
    assert_eq!(lines[1]["err"]["kind"], "ERR_STRATEGY_ACTIVE");
    assert_eq!(
        lines[2],
        json!({"ok": {"amountReturned": 5_000_000, "timestamp": 7}})
    );
    assert_eq!(lines[3]["ok"]["isActive"], false);
    assert_eq!(lines[4]["digest"].as_str().unwrap().len(), 64);
    assert_eq!(lines[4]["activeAccounts"], 0);
    assert_eq!(lines[4]["totalLocked"], 0);
}

#[test]
fn test_replay_summary_counts_running_strategies() {
    let dir = TempDir::new().unwrap();
    let script = write_file(
        &dir,
        "script.json",
        &json!([
            {"caller": "wallet_1", "height": 1,
             "call": {"type": "execute_command", "command": "start safe strategy", "amount": 3_000_000}},
            {"caller": "wallet_2", "height": 2,
             "call": {"type": "execute_command", "command": "start growth strategy", "amount": 4_000_000}},
            {"caller": "wallet_3", "height": 3,
             "call": {"type": "execute_command", "command": "set risk low"}}
        ])
        .to_string(),
    );

    let output = replay(&script, &[]);
    assert!(output.status.success());

    let lines = stdout_lines(&output);
    let summary = lines.last().unwrap();
    assert_eq!(summary["activeAccounts"], 2);
    assert_eq!(summary["totalLocked"], 7_000_000);
}

#[test]
fn test_replay_reports_failing_batch_entry() {
    let dir = TempDir::new().unwrap();
    let script = write_file(
        &dir,
        "script.json",
        &json!([
            {"caller": "wallet_1", "height": 1,
             "call": {"type": "bulk_execute_commands", "entries": [
                 {"command": "set risk low", "amount": 0},
                 {"command": "invalid command", "amount": 0}
             ]}}
        ])
        .to_string(),
    );

    let output = replay(&script, &[]);
    assert!(output.status.success());
    let lines = stdout_lines(&output);
    assert_eq!(lines[0]["err"]["code"], 402);
    assert_eq!(lines[0]["err"]["entry"], 1);
}

#[test]
fn test_replay_admin_flag_and_config() {
    // GIVEN a config naming an admin and an admin-only risk policy
    let dir = TempDir::new().unwrap();
    let config = write_file(
        &dir,
        "engine.toml",
        r#"
admin = "ops"
risk_update_policy = "admin-only"
log_profile = "test"
"#,
    );
    let script = write_file(
        &dir,
        "script.json",
        &json!([
            {"caller": "wallet_1", "height": 1,
             "call": {"type": "bulk_update_risk_settings",
                      "updates": [{"user": "wallet_1", "riskLevel": 1}]}},
            {"caller": "ops", "height": 2, "call": {"type": "pause_engine"}},
            {"caller": "root", "height": 3, "call": {"type": "resume_engine"}}
        ])
        .to_string(),
    );

    // WHEN replayed with the config only
    let output = replay(&script, &["--config", config.to_str().unwrap()]);
    let lines = stdout_lines(&output);

    // THEN self-service risk updates are refused and the configured admin can pause
    assert_eq!(lines[0]["err"]["code"], 401);
    assert_eq!(lines[1], json!({"ok": true}));
    assert_eq!(lines[2]["err"]["code"], 401);

    // WHEN replayed with --admin overriding the configured admin
    let output = replay(
        &script,
        &["--config", config.to_str().unwrap(), "--admin", "root"],
    );
    let lines = stdout_lines(&output);
    assert_eq!(lines[1]["err"]["code"], 401);
    assert_eq!(lines[2], json!({"ok": true}));
}

#[test]
fn test_replay_is_deterministic() {
    let dir = TempDir::new().unwrap();
    let script = write_file(
        &dir,
        "script.json",
        &json!([
            {"caller": "wallet_2", "height": 1,
             "call": {"type": "execute_command", "command": "set risk high", "amount": 0}}
        ])
        .to_string(),
    );

    let first = replay(&script, &[]);
    let second = replay(&script, &[]);
    assert_eq!(first.stdout, second.stdout);
}

#[test]
fn test_malformed_script_exits_nonzero() {
    let dir = TempDir::new().unwrap();
    let script = write_file(&dir, "script.json", r#"[{"caller": "wallet_1"}]"#);

    let output = replay(&script, &[]);
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
}

#[test]
fn test_malformed_config_exits_nonzero() {
    let dir = TempDir::new().unwrap();
    let config = write_file(&dir, "engine.toml", "admin = 42");
    let script = write_file(&dir, "script.json", "[]");

    let output = replay(&script, &["--config", config.to_str().unwrap()]);
    assert!(!output.status.success());
}
