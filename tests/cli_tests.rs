#![cfg(feature = "cli_api")]

use assert_cmd::Command;
use predicates::str::contains as str_contains;
use tempfile::NamedTempFile;

#[allow(deprecated)]
fn run_cli(script: &str) -> assert_cmd::assert::Assert {
    let mut cmd = Command::cargo_bin("cli").expect("cli binary");
    cmd.env_remove("NEXFLOW_CONFIG")
        .write_stdin(script.to_string())
        .assert()
}

#[test]
fn cli_shows_waiting_dependents() {
    run_cli("add Design 2\nadd Build 3 Design\nshow\nquit\n")
        .success()
        .stdout(str_contains("Waiting for Design to be completed"))
        .stdout(str_contains("In Progress"));
}

#[test]
fn cli_refuses_to_complete_blocked_task() {
    run_cli("add Design 2\nadd Build 3 Design\ndone Build\nquit\n")
        .success()
        .stdout(str_contains("task 'Build' is waiting for Design to be completed"));
}

#[test]
fn cli_reports_cycles() {
    run_cli("add A 1 B\nadd B 1 A\nshow\nquit\n")
        .success()
        .stdout(str_contains("Invalid dependency graph"));
}

#[test]
fn cli_summary_counts_statuses() {
    run_cli("add Design 2\nadd Build 3 Design\ndone Design\nsummary\nquit\n")
        .success()
        .stdout(str_contains("tasks=2, done=1, in_progress=1"));
}

#[test]
fn cli_save_and_load_json_round_trip() {
    let tmp = NamedTempFile::new().expect("create temp file");
    let path = tmp.path().to_string_lossy().replace('\\', "\\\\");
    let script = format!(
        "add TaskPersist 4\ndone TaskPersist\nsave json {}\nadd Temp 1\nload json {}\ntasks\nquit\n",
        path, path
    );
    let assert = run_cli(&script).success();
    let output = String::from_utf8_lossy(&assert.get_output().stdout);
    assert!(output.contains("Session loaded from"));
    let after_reload = output
        .split("Session loaded from")
        .last()
        .unwrap_or_default();
    assert!(after_reload.contains("TaskPersist (4h) [done]"));
    assert!(!after_reload.contains("Temp (1h)"));
}

#[test]
fn cli_timeline_draws_one_bar_per_task() {
    run_cli("add Design 2\nadd Build 2 Design\ntimeline 10\nquit\n")
        .success()
        .stdout(str_contains("Design |#####     | 2h"))
        .stdout(str_contains("Build  |     -----| 2h"));
}

#[test]
fn cli_timeline_rejects_bad_width() {
    run_cli("add Design 2\ntimeline 0\nquit\n")
        .success()
        .stdout(str_contains("Usage: timeline [width]"));
}

#[test]
fn cli_done_and_undo_take_the_same_single_token_name_as_add() {
    run_cli("add Design 2\ndone Design\nundo Design\ndone\nquit\n")
        .success()
        .stdout(str_contains("'Design' marked as completed."))
        .stdout(str_contains("'Design' is no longer completed."))
        .stdout(str_contains("Usage: done <name>"));
}
