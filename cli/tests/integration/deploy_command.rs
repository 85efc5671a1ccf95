//! Integration tests for `unitdeploy deploy` against a stand-in `systemctl`.

#![allow(clippy::expect_used)]

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use predicates::prelude::*;

use crate::cli_tests::{unitdeploy, unitdeploy_with_env};

/// A temp dir holding a unit directory and a `systemctl` script that appends
/// its arguments to `calls.log` and fails on `fail_on`, if given.
struct Host {
    dir: tempfile::TempDir,
}

impl Host {
    fn new(fail_on: Option<&str>) -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::create_dir(dir.path().join("units")).expect("unit dir");
        let log = dir.path().join("calls.log");
        let fail = fail_on.unwrap_or("");
        let script = format!(
            "#!/bin/sh\n\
             echo \"$*\" >> '{log}'\n\
             if [ \"$1\" = '{fail}' ]; then echo \"Failed to $1: Access denied\" >&2; exit 4; fi\n\
             exit 0\n",
            log = log.display(),
        );
        let path = dir.path().join("systemctl");
        std::fs::write(&path, script).expect("write script");
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).expect("chmod");
        Self { dir }
    }

    fn unit_dir(&self) -> PathBuf {
        self.dir.path().join("units")
    }

    fn systemctl(&self) -> PathBuf {
        self.dir.path().join("systemctl")
    }

    fn calls(&self) -> Vec<String> {
        std::fs::read_to_string(self.dir.path().join("calls.log"))
            .unwrap_or_default()
            .lines()
            .map(str::to_string)
            .collect()
    }
}

fn deploy(host: &Host) -> assert_cmd::Command {
    let mut cmd = unitdeploy_with_env();
    cmd.arg("deploy")
        .arg("--unit-dir")
        .arg(host.unit_dir())
        .arg("--systemctl")
        .arg(host.systemctl());
    cmd
}

fn read_unit(dir: &Path) -> Vec<u8> {
    std::fs::read(dir.join("example-api.service")).expect("read unit")
}

#[test]
fn test_deploy_installs_and_drives_service_manager_in_order() {
    let host = Host::new(None);

    deploy(&host)
        .assert()
        .success()
        .stdout(predicate::str::contains("example-api.service deployed"));

    assert_eq!(
        host.calls(),
        [
            "daemon-reload",
            "enable example-api.service",
            "restart example-api.service"
        ]
    );
    let unit = String::from_utf8(read_unit(&host.unit_dir())).expect("utf8");
    assert!(unit.contains("User=svc\n"));
    assert!(unit.contains("ExecReload=/bin/kill -HUP $MAINPID\n"));
    let mode = std::fs::metadata(host.unit_dir().join("example-api.service"))
        .expect("metadata")
        .permissions()
        .mode();
    assert_eq!(mode & 0o777, 0o644);
}

#[test]
fn test_deploy_twice_leaves_identical_unit() {
    let host = Host::new(None);

    deploy(&host).assert().success();
    let first = read_unit(&host.unit_dir());
    deploy(&host)
        .assert()
        .success()
        .stdout(predicate::str::contains("unchanged"));

    assert_eq!(read_unit(&host.unit_dir()), first);
    assert_eq!(host.calls().len(), 6);
}

#[test]
fn test_deploy_missing_env_fails_before_any_side_effect() {
    let host = Host::new(None);

    unitdeploy()
        .arg("deploy")
        .arg("--unit-dir")
        .arg(host.unit_dir())
        .arg("--systemctl")
        .arg(host.systemctl())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("ConfigurationError"))
        .stderr(predicate::str::contains("resolving"));

    assert!(host.calls().is_empty());
    assert_eq!(
        std::fs::read_dir(host.unit_dir()).expect("read dir").count(),
        0
    );
}

#[test]
fn test_deploy_stops_at_failed_enable() {
    let host = Host::new(Some("enable"));

    deploy(&host)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("ServiceControlError"))
        .stderr(predicate::str::contains("enabling"))
        .stderr(predicate::str::contains("Access denied"));

    assert_eq!(host.calls(), ["daemon-reload", "enable example-api.service"]);
}

#[test]
fn test_deploy_json_reports_outcome() {
    let host = Host::new(None);

    let output = deploy(&host).arg("--json").output().expect("run");
    assert!(output.status.success());
    let v: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(v["service_name"], "example-api.service");
    assert_eq!(v["install"], "written");
    assert_eq!(v["trace"][0], "idle");
    assert_eq!(v["trace"][7], "done");
}

#[test]
fn test_deploy_json_reports_failed_step() {
    let host = Host::new(Some("restart"));

    let output = deploy(&host).arg("--json").output().expect("run");
    assert_eq!(output.status.code(), Some(1));
    assert!(
        output.stderr.is_empty(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let v: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(v["code"], "service_control_error");
    assert_eq!(v["step"], "restarting");
    let trace = v["trace"].as_array().expect("trace");
    assert_eq!(trace.first().expect("first"), "idle");
    assert_eq!(trace.last().expect("last"), "failed");
    assert_eq!(trace.len(), 8);
}

#[test]
fn test_deploy_failure_is_reported_once() {
    let host = Host::new(Some("daemon-reload"));

    let output = deploy(&host).output().expect("run");
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(stderr.matches("ServiceControlError").count(), 1, "stderr: {stderr}");
}

#[test]
fn test_deploy_ignores_unrelated_non_utf8_variable() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let host = Host::new(None);

    deploy(&host)
        .env("UNRELATED", OsStr::from_bytes(b"\xff\xfe"))
        .assert()
        .success();
    assert_eq!(host.calls().len(), 3);
}

#[test]
fn test_deploy_missing_systemctl_is_service_control_error() {
    let host = Host::new(None);

    unitdeploy_with_env()
        .arg("deploy")
        .arg("--unit-dir")
        .arg(host.unit_dir())
        .arg("--systemctl")
        .arg(host.dir.path().join("no-such-systemctl"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("ServiceControlError"))
        .stderr(predicate::str::contains("reloading"));
}
