//! Smoke tests for the formprobe CLI
//!
//! Everything here runs without a browser; `run` uses `--simulate`.

#![allow(deprecated)] // Command::cargo_bin
#![allow(clippy::expect_used, clippy::unwrap_used)]

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Get a command for the formprobe binary
fn formprobe() -> Command {
    let mut cmd = Command::cargo_bin("formprobe").expect("formprobe binary should exist");
    cmd.env_remove("FORMPROBE_BASE_URL")
        .env_remove("RUST_LOG")
        .arg("--color")
        .arg("never");
    cmd
}

// ============================================================================
// Basic CLI Tests
// ============================================================================

#[test]
fn test_version_flag() {
    formprobe()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_help_flag() {
    formprobe()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("profile"))
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("fixtures"));
}

#[test]
fn test_no_args_fails() {
    formprobe().assert().failure();
}

#[test]
fn test_run_subcommand_help() {
    formprobe()
        .args(["run", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--base-url"))
        .stdout(predicate::str::contains("--simulate"))
        .stdout(predicate::str::contains("--fail-fast"));
}

// ============================================================================
// Catalog and fixtures
// ============================================================================

#[test]
fn test_list_prints_catalog() {
    formprobe()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("all-mandatory-fields-valid"))
        .stdout(predicate::str::contains("success-message"));
}

#[test]
fn test_list_suite_filter() {
    formprobe()
        .args(["list", "--suite", "ui"])
        .assert()
        .success()
        .stdout(predicate::str::contains("address-label-spelling"))
        .stdout(predicate::str::contains("first-name-missing").not());
}

#[test]
fn test_list_json() {
    let output = formprobe()
        .args(["list", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let scenarios = json.as_array().unwrap();
    assert_eq!(scenarios.len(), 24);
    assert_eq!(scenarios[0]["name"], "all-mandatory-fields-valid");
    assert_eq!(scenarios[0]["suite"], "mandatory-fields");
}

#[test]
fn test_fixtures_to_stdout() {
    formprobe()
        .arg("fixtures")
        .assert()
        .success()
        .stdout(predicate::str::contains("first_name: John"))
        .stdout(predicate::str::contains("Passwords do not match"));
}

#[test]
fn test_fixtures_to_file_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("fixtures.yaml");
    formprobe()
        .args(["fixtures", "--output"])
        .arg(&path)
        .assert()
        .success();

    let content = fs::read_to_string(&path).unwrap();
    assert!(content.contains("linkedin_url"));

    formprobe()
        .args(["run", "--simulate", "--fixtures"])
        .arg(&path)
        .assert()
        .success();
}

#[test]
fn test_config_shows_defaults() {
    formprobe()
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("localhost:3000"))
        .stdout(predicate::str::contains("headless: true"));
}

// ============================================================================
// Simulated runs
// ============================================================================

#[test]
fn test_simulated_run_passes_with_known_defects() {
    formprobe()
        .args(["run", "--simulate"])
        .assert()
        .success()
        .stderr(predicate::str::contains("XFAIL"))
        .stderr(predicate::str::contains("PASSED 24 scenarios"))
        .stderr(predicate::str::contains("11 known defects"));
}

#[test]
fn test_simulated_run_json_report() {
    let output = formprobe()
        .args(["run", "--simulate", "--format", "json", "--suite", "mandatory"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let results = report["results"].as_array().unwrap();
    assert_eq!(results.len(), 6);
    assert_eq!(results[0]["outcome"]["status"], "passed");
    assert!(report["run_id"].is_string());
}

#[test]
fn test_simulated_run_filter() {
    formprobe()
        .args(["run", "--simulate", "--filter", "phone"])
        .assert()
        .success()
        .stderr(predicate::str::contains("3 scenarios"));
}

#[test]
fn test_changed_message_fixture_fails_run() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("fixtures.yaml");
    fs::write(
        &path,
        "messages:\n  first_name_required: First name is mandatory\n",
    )
    .unwrap();

    formprobe()
        .args(["run", "--simulate", "--filter", "first-name-missing", "--fixtures"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("FAIL"))
        .stderr(predicate::str::contains("First name is mandatory"));
}

#[test]
fn test_invalid_base_url_reported() {
    formprobe()
        .args(["run", "--simulate", "--base-url", "localhost"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("base_url"));
}

#[test]
fn test_config_file_is_applied() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("formprobe.yaml");
    fs::write(&path, "element_timeout_ms: 1234\nbrowser:\n  sandbox: false\n").unwrap();
    formprobe()
        .arg("config")
        .arg("--config")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("element_timeout_ms: 1234"))
        .stdout(predicate::str::contains("sandbox: false"));
}
