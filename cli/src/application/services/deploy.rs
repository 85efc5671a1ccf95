//! Application service: the deployment use-case.
//!
//! Walks the deployment state machine strictly in order:
//! resolve → render → install → reload → enable → restart. The first
//! failure stops the run; nothing after it is attempted.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::application::ports::{
    InstallOutcome, ProgressReporter, ServiceController, TemplateStore, UnitInstaller,
};
use crate::application::services::render;
use crate::domain::error::{DeployError, DeployFailure};
use crate::domain::stage::DeployStage;
use crate::domain::unit::InstalledUnitPath;

/// Result of a deployment that reached `Done`.
#[derive(Debug, Clone, Serialize)]
pub struct DeployOutcome {
    pub service_name: String,
    pub unit_path: PathBuf,
    pub sha256: String,
    pub install: InstallOutcome,
    /// Every stage visited, `idle` through `done`.
    pub trace: Vec<DeployStage>,
}

/// Tracks the active stage so a failure is attributed to the right step.
struct Progress<'a, R: ProgressReporter> {
    stage: DeployStage,
    trace: Vec<DeployStage>,
    reporter: &'a R,
}

impl<'a, R: ProgressReporter> Progress<'a, R> {
    fn new(reporter: &'a R) -> Self {
        Self {
            stage: DeployStage::Idle,
            trace: vec![DeployStage::Idle],
            reporter,
        }
    }

    fn advance(&mut self, message: &str) {
        if let Some(next) = self.stage.next() {
            tracing::debug!(from = %self.stage, to = %next, "deploy stage");
            self.stage = next;
            self.trace.push(next);
            if !next.is_terminal() {
                self.reporter.step(message);
            }
        }
    }

    /// Moves to `Failed`, attributing `error` to the stage that was active.
    fn fail(&mut self, error: DeployError) -> DeployFailure {
        let step = self.stage;
        self.stage = DeployStage::Failed;
        self.trace.push(self.stage);
        tracing::debug!(
            from = %step,
            to = %self.stage,
            kind = error.kind(),
            %error,
            "deploy stage"
        );
        DeployFailure {
            step,
            error,
            trace: self.trace.clone(),
        }
    }

    /// Re-attributes a failure raised by a shared helper to the active stage.
    fn refail(&mut self, failure: DeployFailure) -> DeployFailure {
        debug_assert_eq!(failure.step, self.stage);
        self.fail(failure.error)
    }
}

/// Deploy one service unit.
///
/// `environment` supplies `SERVICE_USER`, `APP_ROOT`, `RUNTIME_EXEC_PATH`
/// and `SERVICE_NAME`; it is read once, before anything else happens.
///
/// # Errors
///
/// Returns a [`DeployFailure`] naming the step that failed and why. Steps
/// before it have taken effect; steps after it were not attempted.
pub async fn run<I, K, V>(
    environment: I,
    templates: &impl TemplateStore,
    unit_dir: &Path,
    installer: &impl UnitInstaller,
    controller: &impl ServiceController,
    reporter: &impl ProgressReporter,
) -> Result<DeployOutcome, DeployFailure>
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<OsString>,
    V: Into<OsString>,
{
    let mut progress = Progress::new(reporter);

    progress.advance("Resolving deployment configuration...");
    let config = render::resolve_config(environment).map_err(|f| progress.refail(f))?;
    let service_name = config.service_name().to_string();

    progress.advance("Rendering unit template...");
    let unit =
        render::render_unit(templates, &config, reporter).map_err(|f| progress.refail(f))?;

    let destination = InstalledUnitPath::new(unit_dir, &service_name);
    progress.advance(&format!("Installing {}...", destination.path().display()));
    let install = installer
        .install(&unit, &destination)
        .map_err(|e| progress.fail(e))?;
    match install {
        InstallOutcome::Written => reporter.success(&format!("Installed {service_name}")),
        InstallOutcome::Unchanged => {
            reporter.success(&format!("{service_name} already up to date"));
        }
    }

    progress.advance("Reloading service manager configuration...");
    controller
        .reload_manager_config()
        .await
        .map_err(|e| progress.fail(e))?;

    progress.advance(&format!("Enabling {service_name}..."));
    controller
        .enable(&service_name)
        .await
        .map_err(|e| progress.fail(e))?;

    progress.advance(&format!("Restarting {service_name}..."));
    controller
        .restart(&service_name)
        .await
        .map_err(|e| progress.fail(e))?;

    progress.advance("");
    reporter.success(&format!("{service_name} deployed"));
    tracing::info!(service = %service_name, sha256 = %unit.sha256(), "deploy done");

    Ok(DeployOutcome {
        unit_path: destination.path(),
        sha256: unit.sha256(),
        service_name,
        install,
        trace: progress.trace,
    })
}
