//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain`, never from `crate::infra`,
//! `crate::commands`, or `crate::output`.

use std::ffi::OsString;
use std::process::{ExitStatus, Output};

use anyhow::Result;
use serde::Serialize;

use crate::domain::error::DeployError;
use crate::domain::template::{RenderedUnit, UnitTemplate};
use crate::domain::unit::InstalledUnitPath;

// ── Command Runner Port ───────────────────────────────────────────────────────

/// Abstracts process execution so infrastructure can be swapped or mocked.
///
/// Calls block until the child exits; there is no timeout.
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    /// Run a program and capture its output.
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output>;
    /// Run a program with inherited stdio and extra environment variables,
    /// returning only its exit status.
    async fn run_status(
        &self,
        program: &str,
        args: &[String],
        env: &[(String, OsString)],
    ) -> Result<ExitStatus>;
}

// ── Service Manager Port ──────────────────────────────────────────────────────

/// The three service-manager operations a deployment needs.
///
/// Each call is idempotent on the manager side. Implementations return
/// [`DeployError::ServiceControl`] carrying the manager's reported cause.
#[allow(async_fn_in_trait)]
pub trait ServiceController {
    /// Make the manager re-read unit files from disk.
    async fn reload_manager_config(&self) -> Result<(), DeployError>;
    /// Enable `service_name` at boot.
    async fn enable(&self, service_name: &str) -> Result<(), DeployError>;
    /// Restart (or start) `service_name`.
    async fn restart(&self, service_name: &str) -> Result<(), DeployError>;
}

// ── Template Port ─────────────────────────────────────────────────────────────

/// Supplies the unit template for a deployment.
pub trait TemplateStore {
    /// Load the template text.
    ///
    /// # Errors
    ///
    /// [`DeployError::Io`] if the template cannot be read.
    fn load(&self) -> Result<UnitTemplate, DeployError>;
}

// ── Installer Port ────────────────────────────────────────────────────────────

/// What an install did to the destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InstallOutcome {
    /// New content was written.
    Written,
    /// The destination already held identical bytes.
    Unchanged,
}

/// Writes a rendered unit into the service manager's configuration directory.
pub trait UnitInstaller {
    /// Install `unit` at `destination`.
    ///
    /// After return the destination holds either its previous content or the
    /// complete new content, never a partial write.
    ///
    /// # Errors
    ///
    /// [`DeployError::Privilege`] when the caller lacks the rights to write
    /// the destination, [`DeployError::Io`] for any other filesystem failure.
    fn install(
        &self,
        unit: &RenderedUnit,
        destination: &InstalledUnitPath,
    ) -> Result<InstallOutcome, DeployError>;
}

// ── Progress Reporting Port ───────────────────────────────────────────────────

/// Abstracts progress reporting so services can emit events without
/// depending on the Presentation layer. Sync trait: no async needed.
pub trait ProgressReporter {
    /// Emit an in-progress step message.
    fn step(&self, message: &str);
    /// Emit a success message.
    fn success(&self, message: &str);
    /// Emit a warning message.
    fn warn(&self, message: &str);
}
