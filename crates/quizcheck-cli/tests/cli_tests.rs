//! CLI integration tests using assert_cmd.

use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// A command running inside `dir`, isolated from the caller's config.
fn quizcheck(dir: &Path) -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("quizcheck").unwrap();
    cmd.current_dir(dir)
        .env("HOME", dir)
        .env_remove("QUIZCHECK_BANK_DIR")
        .env_remove("QUIZCHECK_STATE_DIR");
    cmd
}

fn initialized() -> TempDir {
    let dir = TempDir::new().unwrap();
    quizcheck(dir.path()).arg("init").assert().success();
    dir
}

#[test]
fn init_creates_files() {
    let dir = TempDir::new().unwrap();

    quizcheck(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created quizcheck.toml"))
        .stdout(predicate::str::contains("Created banks/sample.json"));

    assert!(dir.path().join("quizcheck.toml").exists());
    assert!(dir.path().join("banks/sample.json").exists());
}

#[test]
fn init_skips_existing() {
    let dir = initialized();

    quizcheck(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn validate_sample_bank() {
    let dir = initialized();

    quizcheck(dir.path())
        .arg("validate")
        .assert()
        .success()
        .stdout(predicate::str::contains("5 questions"))
        .stdout(predicate::str::contains("All question banks valid."));
}

#[test]
fn validate_reports_warnings() {
    let dir = TempDir::new().unwrap();
    let bank = dir.path().join("bad.json");
    std::fs::write(
        &bank,
        r#"{"questions": [
            {"id": "q1", "type": "mcq_single", "prompt": "Pick", "options": ["x", "y"], "correctAnswer": 5}
        ]}"#,
    )
    .unwrap();

    quizcheck(dir.path())
        .arg("validate")
        .arg("--bank")
        .arg(&bank)
        .assert()
        .success()
        .stdout(predicate::str::contains("[q1] WARNING: correctAnswer 5 is out of range"))
        .stdout(predicate::str::contains("1 warning(s) found."));
}

#[test]
fn validate_nonexistent_file() {
    let dir = TempDir::new().unwrap();

    quizcheck(dir.path())
        .arg("validate")
        .arg("--bank")
        .arg("nonexistent.json")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn missing_explicit_config_fails() {
    let dir = TempDir::new().unwrap();

    quizcheck(dir.path())
        .arg("--config")
        .arg("missing.toml")
        .arg("bookmarks")
        .assert()
        .failure()
        .stderr(predicate::str::contains("config file not found"));
}

#[test]
fn categories_lists_sections() {
    let dir = initialized();

    quizcheck(dir.path())
        .arg("categories")
        .assert()
        .success()
        .stdout(predicate::str::contains("MCQ questions (One answer)"))
        .stdout(predicate::str::contains("Fill in the Gaps"))
        .stdout(predicate::str::contains("code"));
}

#[test]
fn play_practice_gives_feedback() {
    let dir = initialized();

    quizcheck(dir.path())
        .args(["play", "--section", "single", "--seed", "1"])
        .write_stdin("hint\n1\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("The correct answer starts with: \"Exactly...\""))
        .stdout(predicate::str::contains("Correct!"))
        .stdout(predicate::str::contains("Quiz complete: 1/1 correct (100%)"));
}

#[test]
fn play_exam_saves_review_list() {
    let dir = initialized();

    quizcheck(dir.path())
        .args(["play", "--section", "multi", "--mode", "exam"])
        .write_stdin("1\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Partially correct.").not())
        .stdout(predicate::str::contains("Quiz complete: 0/1 correct (0%)"))
        .stdout(predicate::str::contains("1 question(s) saved for review"));

    assert!(dir.path().join(".quizcheck/review.json").exists());

    quizcheck(dir.path())
        .arg("review")
        .assert()
        .success()
        .stdout(predicate::str::contains("rust-copy"))
        .stdout(predicate::str::contains("Your answer: 1"))
        .stdout(predicate::str::contains("Correct answer: 1, 3"))
        .stdout(predicate::str::contains("- bool"));
}

#[test]
fn play_code_section_writes_report() {
    let dir = initialized();
    let report = dir.path().join("out/report.json");

    quizcheck(dir.path())
        .args(["play", "--section", "code", "--seed", "5", "--output"])
        .arg(&report)
        .write_stdin("v.push(1)\n\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Question 2/2"))
        .stdout(predicate::str::contains("Skipped."))
        .stdout(predicate::str::contains("Report written to"));

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&report).unwrap()).unwrap();
    assert_eq!(json["summary"]["correct"], 1);
    assert_eq!(json["mode"], "practice");
}

#[test]
fn play_unknown_section_fails() {
    let dir = initialized();

    quizcheck(dir.path())
        .args(["play", "--section", "essays"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown section"));
}

#[test]
fn review_with_nothing_pending() {
    let dir = TempDir::new().unwrap();

    quizcheck(dir.path())
        .arg("review")
        .assert()
        .success()
        .stdout(predicate::str::contains("No questions to review."));
}

#[test]
fn grade_answers_file() {
    let dir = initialized();
    let answers = dir.path().join("answers.json");
    std::fs::write(
        &answers,
        r#"{
            "rust-owner": 0,
            "rust-copy": [0, 2],
            "rust-keywords": ["MUT", "fn"],
            "rust-vec-push": ["v.push(1)"],
            "nope": 1
        }"#,
    )
    .unwrap();

    quizcheck(dir.path())
        .args(["grade", "--seed", "3", "--answers"])
        .arg(&answers)
        .arg("--output")
        .arg(dir.path().join("graded.json"))
        .assert()
        .success()
        .stdout(predicate::str::contains("rust-sum"))
        .stdout(predicate::str::contains("Score: 4/5 correct (80%), 4 answered"));

    assert!(dir.path().join("graded.json").exists());
}

#[test]
fn grade_malformed_answers_fails() {
    let dir = initialized();
    let answers = dir.path().join("answers.json");
    std::fs::write(&answers, "[1, 2").unwrap();

    quizcheck(dir.path())
        .arg("grade")
        .arg("--answers")
        .arg(&answers)
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to parse answers"));
}

#[test]
fn bookmark_toggle_and_list() {
    let dir = initialized();

    quizcheck(dir.path())
        .args(["bookmark", "rust-owner"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Bookmarked rust-owner"))
        .stderr(predicate::str::contains("not found in question bank").not());

    quizcheck(dir.path())
        .arg("bookmarks")
        .assert()
        .success()
        .stdout(predicate::str::contains("1 bookmarked question(s):"))
        .stdout(predicate::str::contains("Rust\n"))
        .stdout(predicate::str::contains(
            "  rust-owner [MCQ questions (One answer)] How many owners can a value have at a time?",
        ));

    quizcheck(dir.path())
        .args(["bookmark", "rust-owner"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed bookmark rust-owner"));

    quizcheck(dir.path())
        .arg("bookmarks")
        .assert()
        .success()
        .stdout(predicate::str::contains("No bookmarks yet."));
}

#[test]
fn bookmark_unknown_id_warns() {
    let dir = initialized();

    quizcheck(dir.path())
        .args(["bookmark", "no-such-question"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Bookmarked no-such-question"))
        .stderr(predicate::str::contains("bookmarked id not found in question bank"));

    quizcheck(dir.path())
        .arg("bookmarks")
        .assert()
        .success()
        .stdout(predicate::str::contains("Not in question bank\n  no-such-question"));
}

#[test]
fn bookmarks_without_bank_list_bare_ids() {
    let dir = TempDir::new().unwrap();

    quizcheck(dir.path())
        .args(["bookmark", "rust-owner"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Bookmarked rust-owner"));

    quizcheck(dir.path())
        .arg("bookmarks")
        .assert()
        .success()
        .stdout(predicate::str::contains("Not in question bank\n  rust-owner"))
        .stderr(predicate::str::contains("question bank not loaded"));
}

#[test]
fn play_bookmark_reply_is_saved() {
    let dir = initialized();

    quizcheck(dir.path())
        .args(["play", "--section", "multi"])
        .write_stdin("bookmark\n1,3\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Bookmarked rust-copy"))
        .stdout(predicate::str::contains("Correct!"));

    quizcheck(dir.path())
        .arg("bookmarks")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "rust-copy [MCQ questions (Multiple answers)] Which of these types are Copy?",
        ));
}
