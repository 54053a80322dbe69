mod common;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn cmd() -> assert_cmd::Command {
    let mut c = cargo_bin_cmd!("comply-ctl");
    c.env("NO_COLOR", "1");
    c
}

#[test]
fn test_policies_lists_the_catalog() {
    cmd()
        .arg("policies")
        .assert()
        .success()
        .stdout(predicate::str::contains("K8S-SEC-001"))
        .stdout(predicate::str::contains("FILE-COMPOSE-004"))
        .stdout(predicate::str::contains("Total: 41 policies"));
}

#[test]
fn test_policies_json_filtered_by_severity() {
    let output = cmd()
        .args(["rules", "--severity", "critical", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let policies: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let ids: Vec<&str> = policies
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["K8S-SEC-001", "DOCKER-SEC-001", "FILE-COMPOSE-001"]);
}

#[test]
fn test_policies_rejects_unknown_severity() {
    cmd()
        .args(["policies", "--severity", "urgent"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid severity 'urgent'"));
}

#[test]
fn test_check_files_fails_on_high_findings() {
    let temp_dir = TempDir::new().unwrap();
    common::create_noncompliant_project(temp_dir.path());

    cmd()
        .args(["check", "files", "--path"])
        .arg(temp_dir.path())
        .assert()
        .code(1)
        .stdout(predicate::str::contains("FILE-COMPOSE-001"))
        .stdout(predicate::str::contains("Total Checks: 11"))
        .stderr(predicate::str::contains("Compliance check failed"));
}

#[test]
fn test_check_files_passes_below_threshold() {
    let temp_dir = TempDir::new().unwrap();
    common::create_noncompliant_project(temp_dir.path());

    cmd()
        .args(["check", "files", "--only", "FILE-DOCKER-001", "--path"])
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("FILE-DOCKER-001"))
        .stdout(predicate::str::contains("Compliance check passed"));

    cmd()
        .args(["check", "files", "--only", "FILE-DOCKER-001", "--fail-on-warn", "--path"])
        .arg(temp_dir.path())
        .assert()
        .code(1);
}

#[test]
fn test_check_clean_project() {
    let temp_dir = TempDir::new().unwrap();
    common::create_clean_project(temp_dir.path());

    cmd()
        .args(["check", "files", "--path"])
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("No issues found!"));
}

#[test]
fn test_check_rejects_unknown_target() {
    cmd()
        .args(["check", "mainframe"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown target 'mainframe'"));
}

#[test]
fn test_report_junit_to_file() {
    let temp_dir = TempDir::new().unwrap();
    common::create_noncompliant_project(temp_dir.path());
    let output = temp_dir.path().join("out").join("compliance.xml");
    fs::create_dir_all(output.parent().unwrap()).unwrap();

    cmd()
        .args(["report", "files", "-f", "junit", "--path"])
        .arg(temp_dir.path())
        .arg("-o")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("Report written to"));

    let xml = fs::read_to_string(&output).unwrap();
    assert!(xml.contains("tests=\"11\" failures=\"11\""));
    assert!(xml.ends_with("</testsuites>"));
}

#[test]
fn test_report_uses_local_config() {
    let temp_dir = TempDir::new().unwrap();
    common::create_noncompliant_project(temp_dir.path());
    fs::write(
        temp_dir.path().join(".compliance.toml"),
        r#"
[check]
min_severity = "critical"

[report]
title = "Shop Compliance"
format = "json"
"#,
    )
    .unwrap();

    let output = cmd()
        .args(["report", "files", "--path"])
        .arg(temp_dir.path())
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["title"], "Shop Compliance");
    assert_eq!(report["summary"]["total"], 1);
    assert_eq!(report["results"][0]["rule_id"], "FILE-COMPOSE-001");
}

#[test]
fn test_report_rejects_unknown_format() {
    let temp_dir = TempDir::new().unwrap();
    common::create_clean_project(temp_dir.path());

    cmd()
        .args(["report", "files", "-f", "pdf", "--path"])
        .arg(temp_dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown output format 'pdf'"));
}
