#![forbid(unsafe_code)]
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn write_inputs(dir: &Path, time: &str) {
    let header = |scope: &str| {
        format!("Organization:\nSmartCare\nTime:\n{time}\nDate:\n10:12:2023\n{scope}:\n")
    };
    fs::write(
        dir.join("staff.txt"),
        header("Doctors") + "Ana Silva, 1, 09h00, 0, 00h00\nRui Costa, 3, 09h10, 0, 05h00\n",
    )
    .unwrap();
    fs::write(dir.join("schedule.txt"), header("Schedule")).unwrap();
    fs::write(
        dir.join("requests.txt"),
        header("Mothers") + "Eva Lima, 31, green, low\nInes Reis, 28, red, high\n",
    )
    .unwrap();
}

fn triage() -> Command {
    Command::cargo_bin("triage-rota").unwrap()
}

#[test]
fn plan_writes_both_snapshots() {
    let dir = tempdir().unwrap();
    write_inputs(dir.path(), "08h30");
    let report = dir.path().join("report.json");

    triage()
        .current_dir(dir.path())
        .args(["plan", "staff.txt", "schedule.txt", "requests.txt", "--out-dir", "."])
        .arg("--report")
        .arg(&report)
        .assert()
        .success()
        .stdout(predicate::str::contains("assigned:     2"))
        .stdout(predicate::str::contains("wrote"));

    let schedule = fs::read_to_string(dir.path().join("schedule09h00.txt")).unwrap();
    assert!(schedule.contains("09h00, Eva Lima, Ana Silva"));
    assert!(schedule.contains("09h10, Ines Reis, Rui Costa"));
    let staff = fs::read_to_string(dir.path().join("doctors09h00.txt")).unwrap();
    assert!(staff.contains("Rui Costa, 3, 09h30, 20, 05h20"));

    let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(report).unwrap()).unwrap();
    assert_eq!(json["redirected"], 0);
}

#[test]
fn scope_mismatch_aborts_without_output() {
    let dir = tempdir().unwrap();
    write_inputs(dir.path(), "08h30");

    triage()
        .current_dir(dir.path())
        .args(["plan", "requests.txt", "schedule.txt", "staff.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("scope mismatch"));

    assert!(!dir.path().join("schedule09h00.txt").exists());
    assert!(!dir.path().join("doctors09h00.txt").exists());
}

#[test]
fn end_of_day_writes_nothing() {
    let dir = tempdir().unwrap();
    write_inputs(dir.path(), "19h30");

    triage()
        .current_dir(dir.path())
        .args(["plan", "staff.txt", "schedule.txt", "requests.txt", "--report", "report.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("End of day"));

    assert!(!dir.path().join("schedule20h00.txt").exists());
    assert!(!dir.path().join("report.json").exists());
}

#[test]
fn failed_publish_leaves_no_report() {
    let dir = tempdir().unwrap();
    write_inputs(dir.path(), "08h30");
    fs::create_dir(dir.path().join("doctors09h00.txt")).unwrap();
    fs::write(dir.path().join("doctors09h00.txt").join("keep"), "x").unwrap();

    triage()
        .current_dir(dir.path())
        .args(["plan", "staff.txt", "schedule.txt", "requests.txt", "--report", "report.json"])
        .assert()
        .failure();

    assert!(!dir.path().join("schedule09h00.txt").exists());
    assert!(!dir.path().join("report.json").exists());
}

#[test]
fn dry_run_prints_instead_of_writing() {
    let dir = tempdir().unwrap();
    write_inputs(dir.path(), "08h30");

    triage()
        .current_dir(dir.path())
        .args(["plan", "staff.txt", "schedule.txt", "requests.txt", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--- schedule09h00.txt"))
        .stdout(predicate::str::contains("Ana Silva, 1, 09h20, 20, 00h20"));

    assert!(!dir.path().join("schedule09h00.txt").exists());
}

#[test]
fn min_category_flag_overrides_default() {
    let dir = tempdir().unwrap();
    write_inputs(dir.path(), "08h30");

    triage()
        .current_dir(dir.path())
        .args(["plan", "staff.txt", "schedule.txt", "requests.txt", "--dry-run"])
        .args(["--min-category", "4"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Ines Reis, redirected to other network"));
}

#[test]
fn check_reports_consistent_headers() {
    let dir = tempdir().unwrap();
    write_inputs(dir.path(), "08h30");

    triage()
        .current_dir(dir.path())
        .args(["check", "staff.txt", "schedule.txt", "requests.txt"])
        .assert()
        .success()
        .stdout(predicate::str::contains("OK"));

    let stale = fs::read_to_string(dir.path().join("schedule.txt"))
        .unwrap()
        .replace("08h30", "08h00");
    fs::write(dir.path().join("schedule.txt"), stale).unwrap();

    triage()
        .current_dir(dir.path())
        .args(["check", "staff.txt", "schedule.txt", "requests.txt"])
        .assert()
        .code(2);
}
