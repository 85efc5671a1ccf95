//! Integration tests for `unitdeploy dev`.

use predicates::prelude::*;

use crate::cli_tests::unitdeploy;

#[test]
fn test_dev_prepends_project_dir_and_forwards_exit_code() {
    unitdeploy()
        .env("PYTHONPATH", "/usr/lib/site")
        .args([
            "dev",
            "--path",
            "/srv/app",
            "--",
            "sh",
            "-c",
            "echo \"$PYTHONPATH\"; exit 3",
        ])
        .assert()
        .code(3)
        .stdout(predicate::str::contains("/srv/app:/usr/lib/site"));
}

#[test]
fn test_dev_custom_path_var() {
    unitdeploy()
        .args([
            "dev",
            "--path-var",
            "NODE_PATH",
            "--path",
            "/srv/app",
            "--",
            "sh",
            "-c",
            "echo \"$NODE_PATH\"",
        ])
        .assert()
        .success()
        .stdout(predicate::str::diff("/srv/app\n"));
}

#[test]
fn test_dev_without_command_is_usage_error() {
    unitdeploy().arg("dev").assert().code(2);
}

#[test]
fn test_dev_unknown_program_fails() {
    unitdeploy()
        .args(["dev", "--", "unitdeploy-no-such-server"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Error:"));
}
