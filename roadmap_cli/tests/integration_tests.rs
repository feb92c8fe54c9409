//! Integration tests for the manabi binary.
//!
//! These tests verify end-to-end behavior including:
//! - Roadmap planning output
//! - Scripted answer sessions and completion rules
//! - WAL logging and CSV rollup
//! - Attempt history

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Helper to create a test data directory
fn setup_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Helper to get the path to the CLI binary
fn cli() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("manabi"))
}

#[test]
fn test_cli_help() {
    cli()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Adaptive learning roadmap and session runner",
        ));
}

#[test]
fn test_plan_lists_all_topics() {
    let temp_dir = setup_test_dir();

    cli()
        .arg("plan")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Learning roadmap"))
        .stdout(predicate::str::contains("algebra_expand_basic"))
        .stdout(predicate::str::contains("quad_solve_basic"))
        .stdout(predicate::str::contains("not started"));
}

#[test]
fn test_plan_is_default_command() {
    let temp_dir = setup_test_dir();

    cli()
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Learning roadmap"));
}

#[test]
fn test_plan_prereqs_come_before_dependents() {
    let temp_dir = setup_test_dir();

    let output = cli()
        .arg("plan")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let stdout = String::from_utf8_lossy(&output);
    let factor = stdout.find("algebra_factor_basic").unwrap();
    let quad = stdout.find("quad_solve_basic").unwrap();
    assert!(factor < quad, "prerequisite should be listed first");
}

#[test]
fn test_session_unknown_topic_fails() {
    let temp_dir = setup_test_dir();

    cli()
        .arg("session")
        .arg("--topic")
        .arg("no_such_topic")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown topic"));
}

#[test]
fn test_session_unknown_mode_fails() {
    let temp_dir = setup_test_dir();

    cli()
        .arg("session")
        .arg("--topic")
        .arg("quad_solve_basic")
        .arg("--mode")
        .arg("exam")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown session mode"));
}

#[test]
fn test_review_completes_on_streak() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    cli()
        .arg("session")
        .arg("--topic")
        .arg("quad_solve_basic")
        .arg("--mode")
        .arg("review")
        .arg("--answers")
        .arg("ccc")
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("3 correct in a row"));

    // All three attempts land in the WAL; only the streak-completing
    // answer carries the SRS flag.
    let wal = fs::read_to_string(data_dir.join("wal/attempts.wal")).expect("read WAL");
    let lines: Vec<&str> = wal.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].contains("\"srs_event\":false"));
    assert!(lines[1].contains("\"srs_event\":false"));
    assert!(lines[2].contains("\"srs_event\":true"));
}

#[test]
fn test_review_streak_resets_on_miss() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    // Miss on the third answer, then three straight
    cli()
        .arg("session")
        .arg("--topic")
        .arg("quad_solve_basic")
        .arg("--mode")
        .arg("review")
        .arg("--answers")
        .arg("ccxccc")
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("3 correct in a row"));

    let wal = fs::read_to_string(data_dir.join("wal/attempts.wal")).expect("read WAL");
    assert_eq!(wal.lines().count(), 6);
}

#[test]
fn test_review_completes_on_cap() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    cli()
        .arg("session")
        .arg("--topic")
        .arg("quad_solve_basic")
        .arg("--mode")
        .arg("review")
        .arg("--max")
        .arg("4")
        .arg("--answers")
        .arg("xxxx")
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("question cap reached"));

    // A cap completion is not an SRS event
    let wal = fs::read_to_string(data_dir.join("wal/attempts.wal")).expect("read WAL");
    assert!(!wal.contains("\"srs_event\":true"));
}

#[test]
fn test_final_passes_at_threshold() {
    let temp_dir = setup_test_dir();

    cli()
        .arg("session")
        .arg("--topic")
        .arg("quad_solve_basic")
        .arg("--mode")
        .arg("final")
        .arg("--max")
        .arg("5")
        .arg("--answers")
        .arg("ccccx")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("4 / 5 correct"))
        .stdout(predicate::str::contains("PASSED"));
}

#[test]
fn test_final_fails_below_threshold() {
    let temp_dir = setup_test_dir();

    cli()
        .arg("session")
        .arg("--topic")
        .arg("quad_solve_basic")
        .arg("--mode")
        .arg("final")
        .arg("--max")
        .arg("5")
        .arg("--answers")
        .arg("cccxx")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("3 / 5 correct"))
        .stdout(predicate::str::contains("not passed"));
}

#[test]
fn test_practice_never_completes() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    let output = cli()
        .arg("session")
        .arg("--topic")
        .arg("quad_solve_basic")
        .arg("--answers")
        .arg("cccccc")
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let stdout = String::from_utf8_lossy(&output);
    assert!(!stdout.contains("complete"));

    // Practice attempts are still logged, never flagged for SRS
    let wal = fs::read_to_string(data_dir.join("wal/attempts.wal")).expect("read WAL");
    assert_eq!(wal.lines().count(), 6);
    assert!(!wal.contains("\"srs_event\":true"));
}

#[test]
fn test_session_warns_when_topic_locked() {
    let temp_dir = setup_test_dir();

    // quad_solve_basic has prerequisites and this learner has no records
    cli()
        .arg("session")
        .arg("--topic")
        .arg("quad_solve_basic")
        .arg("--answers")
        .arg("c")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("prerequisites not yet solid"))
        .stdout(predicate::str::contains("algebra_factor_basic"));
}

#[test]
fn test_rollup_creates_csv() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    cli()
        .arg("session")
        .arg("--topic")
        .arg("quad_solve_basic")
        .arg("--mode")
        .arg("review")
        .arg("--answers")
        .arg("ccc")
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success();

    cli()
        .arg("rollup")
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Rolled up 3 attempts"));

    let csv_path = data_dir.join("attempts.csv");
    assert!(csv_path.exists());

    let csv_content = fs::read_to_string(&csv_path).expect("Failed to read CSV");
    assert!(csv_content.contains("id,topic_id"));
    assert!(csv_content.contains("quad_solve_basic"));
}

#[test]
fn test_rollup_without_wal_is_noop() {
    let temp_dir = setup_test_dir();

    cli()
        .arg("rollup")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("nothing to roll up"));
}

#[test]
fn test_rollup_with_cleanup() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    cli()
        .arg("session")
        .arg("--topic")
        .arg("algebra_expand_basic")
        .arg("--answers")
        .arg("cx")
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success();

    cli()
        .arg("rollup")
        .arg("--data-dir")
        .arg(&data_dir)
        .arg("--cleanup")
        .assert()
        .success()
        .stdout(predicate::str::contains("Cleaned up 1 processed WAL"));

    let entries: Vec<_> = fs::read_dir(data_dir.join("wal"))
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().ends_with(".wal.processed"))
        .collect();
    assert_eq!(entries.len(), 0);
}

#[test]
fn test_history_shows_recent_attempts() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    cli()
        .arg("session")
        .arg("--topic")
        .arg("algebra_expand_basic")
        .arg("--answers")
        .arg("cx")
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success();

    cli()
        .arg("history")
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("algebra_expand_basic"))
        .stdout(predicate::str::contains("correct"));
}

#[test]
fn test_history_merges_wal_and_csv() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    // First batch rolled up to CSV
    cli()
        .arg("session")
        .arg("--topic")
        .arg("algebra_expand_basic")
        .arg("--answers")
        .arg("cc")
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success();
    cli()
        .arg("rollup")
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success();

    // Second batch still in the WAL
    cli()
        .arg("session")
        .arg("--topic")
        .arg("quad_solve_basic")
        .arg("--answers")
        .arg("x")
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success();

    cli()
        .arg("history")
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("algebra_expand_basic"))
        .stdout(predicate::str::contains("quad_solve_basic"));
}

#[test]
fn test_history_empty_window() {
    let temp_dir = setup_test_dir();

    cli()
        .arg("history")
        .arg("--days")
        .arg("7")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("No attempts"));
}
