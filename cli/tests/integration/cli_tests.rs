//! Integration tests for the CLI surface: help, version, usage errors.

#![allow(clippy::expect_used)]

use assert_cmd::Command;
use predicates::prelude::*;

pub fn unitdeploy() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("unitdeploy"));
    cmd.env_clear();
    if let Some(path) = std::env::var_os("PATH") {
        cmd.env("PATH", path);
    }
    cmd.env("NO_COLOR", "1");
    cmd
}

/// `unitdeploy()` with all four deployment variables set.
pub fn unitdeploy_with_env() -> Command {
    let mut cmd = unitdeploy();
    cmd.env("SERVICE_USER", "svc")
        .env("APP_ROOT", "/opt/app")
        .env("RUNTIME_EXEC_PATH", "/usr/bin/runtime")
        .env("SERVICE_NAME", "example-api");
    cmd
}

#[test]
fn test_cli_no_args_shows_help_and_exits_two() {
    unitdeploy().assert().code(2).stderr(predicate::str::contains(
        "Install an application as a managed system service",
    ));
}

#[test]
fn test_cli_help_lists_commands() {
    unitdeploy()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("deploy"))
        .stdout(predicate::str::contains("render"))
        .stdout(predicate::str::contains("dev"));
}

#[test]
fn test_cli_version_flag_shows_version() {
    unitdeploy()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("unitdeploy"));
}

#[test]
fn test_version_command_shows_version() {
    unitdeploy()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("unitdeploy 0.1.0"));
}

#[test]
fn test_version_command_json_outputs_valid_json() {
    let output = unitdeploy()
        .args(["version", "--json"])
        .output()
        .expect("run");
    assert!(output.status.success());
    let v: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(v["version"], "0.1.0");
}

#[test]
fn test_no_color_accepts_conventional_values() {
    for value in ["1", "true", "0", ""] {
        unitdeploy()
            .env("NO_COLOR", value)
            .arg("version")
            .assert()
            .success()
            .stdout(predicate::str::contains("unitdeploy 0.1.0"));
    }
}

#[test]
fn test_unknown_command_is_usage_error() {
    unitdeploy().arg("install").assert().code(2);
}
