//! `systemctl`-backed implementation of the `ServiceController` port.

use std::process::Output;

use crate::application::ports::{CommandRunner, ServiceController};
use crate::domain::error::DeployError;

/// Default service-manager client binary.
pub const SYSTEMCTL: &str = "systemctl";

/// Drives systemd through its `systemctl` client.
pub struct SystemctlController<R: CommandRunner> {
    runner: R,
    program: String,
}

impl<R: CommandRunner> SystemctlController<R> {
    /// `program` is the `systemctl` binary to invoke (name or path).
    pub fn new(runner: R, program: impl Into<String>) -> Self {
        Self {
            runner,
            program: program.into(),
        }
    }

    async fn systemctl(&self, operation: &str, args: &[&str]) -> Result<(), DeployError> {
        let output = self
            .runner
            .run(&self.program, args)
            .await
            .map_err(|e| DeployError::ServiceControl {
                operation: operation.to_string(),
                exit_code: None,
                cause: format!("{e:#}"),
            })?;
        check_output(operation, &output)
    }
}

impl<R: CommandRunner> ServiceController for SystemctlController<R> {
    async fn reload_manager_config(&self) -> Result<(), DeployError> {
        self.systemctl("daemon-reload", &["daemon-reload"]).await
    }

    async fn enable(&self, service_name: &str) -> Result<(), DeployError> {
        self.systemctl("enable", &["enable", service_name]).await
    }

    async fn restart(&self, service_name: &str) -> Result<(), DeployError> {
        self.systemctl("restart", &["restart", service_name]).await
    }
}

/// Turns a non-zero `systemctl` exit into a `ServiceControl` error carrying
/// whatever the manager printed.
fn check_output(operation: &str, output: &Output) -> Result<(), DeployError> {
    if output.status.success() {
        return Ok(());
    }
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stdout = String::from_utf8_lossy(&output.stdout);
    let cause = match (stderr.trim(), stdout.trim()) {
        ("", "") => "no output from service manager".to_string(),
        ("", out) => out.to_string(),
        (err, _) => err.to_string(),
    };
    Err(DeployError::ServiceControl {
        operation: operation.to_string(),
        exit_code: output.status.code(),
        cause,
    })
}
