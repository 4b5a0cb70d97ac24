//! End-to-end `plan` tests against golden fixtures.
//!
//! Each directory in `tests/fixtures/` contains:
//! - `incoming.json`: the batch (JSON array or JSON Lines)
//! - `known.json` (optional): stored-grant snapshots
//! - `grantprint.toml` (optional): config
//! - `expected.report.json`: the expected report, with `__TIMESTAMP__` / `__VERSION__` placeholders
//!
//! The exit code is checked against the expected verdict (0 = pass/warn, 2 = fail).

use assert_cmd::Command;
use grantprint_test_util::normalize_nondeterministic;
use serde_json::Value;
use std::path::PathBuf;
use tempfile::TempDir;

#[allow(deprecated)]
fn grantprint_cmd() -> Command {
    Command::cargo_bin("grantprint").expect("grantprint binary not found - run `cargo build` first")
}

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .expect("grantprint-cli crate should have a parent directory")
        .parent()
        .expect("crates directory should have a parent (repo root)")
        .join("tests")
        .join("fixtures")
}

fn run_plan_on_fixture(name: &str) -> (i32, Value, Value) {
    let dir = fixtures_dir().join(name);
    let temp_dir = TempDir::new().expect("create temp dir");
    let report_path = temp_dir.path().join("report.json");

    let mut cmd = grantprint_cmd();
    cmd.arg("--config")
        .arg(dir.join("grantprint.toml"))
        .arg("plan")
        .arg("--incoming")
        .arg(dir.join("incoming.json"))
        .arg("--report-out")
        .arg(&report_path);
    let known = dir.join("known.json");
    if known.exists() {
        cmd.arg("--known").arg(known);
    }

    let output = cmd.output().expect("run grantprint");
    let exit_code = output.status.code().unwrap_or(-1);

    let actual: Value = serde_json::from_str(
        &std::fs::read_to_string(&report_path).expect("report written"),
    )
    .expect("report is JSON");
    let expected: Value = serde_json::from_str(
        &std::fs::read_to_string(dir.join("expected.report.json")).expect("expected report"),
    )
    .expect("expected report is JSON");

    (exit_code, normalize_nondeterministic(actual), expected)
}

fn assert_fixture(name: &str, expected_exit: i32) {
    let (exit_code, actual, expected) = run_plan_on_fixture(name);
    assert_eq!(
        actual,
        expected,
        "report mismatch for fixture {name}:\n{}",
        serde_json::to_string_pretty(&actual).unwrap_or_default()
    );
    assert_eq!(exit_code, expected_exit, "exit code for fixture {name}");
}

#[test]
fn fixture_mixed_batch() {
    assert_fixture("mixed_batch", 0);
}

#[test]
fn fixture_checksum_mismatch() {
    assert_fixture("checksum_mismatch", 0);
}

#[test]
fn fixture_invalid_record() {
    assert_fixture("invalid_record", 2);
}

#[test]
fn fixture_audit_profile() {
    assert_fixture("audit_profile", 2);
}

#[test]
fn every_fixture_has_an_expected_report() {
    let entries = std::fs::read_dir(fixtures_dir()).expect("read fixtures dir");
    for entry in entries {
        let dir = entry.expect("dir entry").path();
        assert!(
            dir.join("incoming.json").exists() && dir.join("expected.report.json").exists(),
            "incomplete fixture: {}",
            dir.display()
        );
    }
}
