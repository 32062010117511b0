//! Integration tests for the CLI

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::PathBuf;

fn fixture_manifest() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("sample_project")
        .join("package.json")
}

#[test]
fn test_cli_help() {
    let mut cmd = Command::cargo_bin("license-report").unwrap();
    cmd.arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Check the licenses of package.json dependencies"))
        .stdout(predicate::str::contains("--no-cache-file"));
}

#[test]
fn test_cli_writes_report_in_working_directory() {
    let mut server = mockito::Server::new();
    server
        .mock("GET", "/left-pad")
        .with_status(200)
        .with_body(r#"{"license": "MIT", "description": "String left pad"}"#)
        .create();

    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("package.json"),
        r#"{"dependencies": {"left-pad": "1.3.0"}}"#,
    )
    .unwrap();

    let mut cmd = Command::cargo_bin("license-report").unwrap();
    cmd.current_dir(dir.path())
        .arg("--quiet")
        .arg("--registry")
        .arg(server.url());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Total dependencies: 1"))
        .stdout(predicate::str::contains("All licenses are permissive"));

    let report = std::fs::read_to_string(dir.path().join("DEPENDENCY_LICENSES.md")).unwrap();
    assert!(report.contains("\n### left-pad\n"));
    assert!(dir.path().join(".dependency-licenses.json").exists());
}

#[test]
fn test_cli_non_permissive_still_exits_zero() {
    let mut server = mockito::Server::new();
    server
        .mock("GET", mockito::Matcher::Any)
        .with_status(200)
        .with_body(r#"{"license": "GPL-3.0"}"#)
        .create();

    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("LICENSES.md");

    let mut cmd = Command::cargo_bin("license-report").unwrap();
    cmd.arg("--quiet")
        .arg("--no-cache-file")
        .arg("--manifest")
        .arg(fixture_manifest())
        .arg("--output")
        .arg(&output)
        .arg("--registry")
        .arg(server.url());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Non-permissive licenses: 3"));

    assert!(output.exists());
}

#[test]
fn test_cli_missing_manifest_fails() {
    let dir = tempfile::tempdir().unwrap();

    let mut cmd = Command::cargo_bin("license-report").unwrap();
    cmd.current_dir(dir.path()).arg("--quiet");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Report generation failed"));
}

#[test]
fn test_cli_rejects_zero_concurrency() {
    let mut cmd = Command::cargo_bin("license-report").unwrap();
    cmd.arg("--quiet")
        .arg("--manifest")
        .arg(fixture_manifest())
        .arg("--concurrency")
        .arg("0");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("concurrency must be at least 1"));
}
