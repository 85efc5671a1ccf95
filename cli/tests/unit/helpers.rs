//! Shared test helpers: environment builders and in-memory ports.

#![allow(dead_code)]

use std::cell::Cell;

use unitdeploy_cli::application::{InstallOutcome, ProgressReporter, TemplateStore, UnitInstaller};
use unitdeploy_cli::domain::{DeployError, InstalledUnitPath, RenderedUnit, UnitTemplate};

pub const TEMPLATE: &str = "\
[Unit]
Description=${SERVICE_NAME}

[Service]
User=${SERVICE_USER}
WorkingDirectory=${APP_ROOT}
ExecStart=${RUNTIME_EXEC_PATH}
";

/// The four deployment variables, all valid.
pub fn full_env() -> Vec<(String, String)> {
    env(&[
        ("SERVICE_USER", "svc"),
        ("APP_ROOT", "/opt/app"),
        ("RUNTIME_EXEC_PATH", "/usr/bin/runtime"),
        ("SERVICE_NAME", "example-api.service"),
    ])
}

pub fn env(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect()
}

/// `full_env()` without `name`.
pub fn env_without(name: &str) -> Vec<(String, String)> {
    full_env().into_iter().filter(|(k, _)| k != name).collect()
}

// ── Ports ────────────────────────────────────────────────────────────────────

/// Serves a fixed template text.
pub struct StaticTemplate(pub &'static str);

impl TemplateStore for StaticTemplate {
    fn load(&self) -> Result<UnitTemplate, DeployError> {
        Ok(UnitTemplate::new(self.0, "test template"))
    }
}

/// Reporter that prints nothing.
pub struct SilentReporter;

impl ProgressReporter for SilentReporter {
    fn step(&self, _: &str) {}
    fn success(&self, _: &str) {}
    fn warn(&self, _: &str) {}
}

/// Reporter that counts warnings.
#[derive(Default)]
pub struct CountingReporter {
    pub warnings: Cell<usize>,
}

impl ProgressReporter for CountingReporter {
    fn step(&self, _: &str) {}
    fn success(&self, _: &str) {}
    fn warn(&self, _: &str) {
        self.warnings.set(self.warnings.get() + 1);
    }
}

/// Installer that refuses every write as if elevation were missing.
pub struct DeniedInstaller;

impl UnitInstaller for DeniedInstaller {
    fn install(
        &self,
        _: &RenderedUnit,
        destination: &InstalledUnitPath,
    ) -> Result<InstallOutcome, DeployError> {
        Err(DeployError::Privilege(format!(
            "cannot write to {}",
            destination.dir().display()
        )))
    }
}

/// Installer that must never be reached.
pub struct UnreachableInstaller;

impl UnitInstaller for UnreachableInstaller {
    fn install(&self, _: &RenderedUnit, _: &InstalledUnitPath) -> Result<InstallOutcome, DeployError> {
        panic!("install must not be attempted");
    }
}
