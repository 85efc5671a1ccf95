//! `unitdeploy deploy`: render, install and activate the service unit.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::services::deploy::{self as service, DeployOutcome};
use crate::application::InstallOutcome;
use crate::domain::error::DeployFailure;
use crate::domain::unit::DEFAULT_UNIT_DIR;
use crate::infra::installer::PrivilegedInstaller;
use crate::infra::systemctl::{SYSTEMCTL, SystemctlController};
use crate::infra::templates::TemplateSource;
use crate::output::json;

/// Arguments for the deploy command.
#[derive(Args, Debug)]
pub struct DeployArgs {
    /// Unit template file (defaults to the built-in template)
    #[arg(long, env = "UNITDEPLOY_TEMPLATE", value_name = "PATH")]
    pub template: Option<PathBuf>,

    /// Service manager configuration directory
    #[arg(long, env = "UNITDEPLOY_UNIT_DIR", value_name = "DIR", default_value = DEFAULT_UNIT_DIR)]
    pub unit_dir: PathBuf,

    /// systemctl binary used to reload, enable and restart
    #[arg(long, env = "UNITDEPLOY_SYSTEMCTL", value_name = "PATH", default_value = SYSTEMCTL)]
    pub systemctl: String,
}

/// Run `unitdeploy deploy`.
///
/// Deployment failures are reported here and turned into a non-zero exit
/// code; only output failures surface as `Err`.
///
/// # Errors
///
/// Returns an error if the JSON report cannot be serialized.
pub async fn run(args: DeployArgs, app: &AppContext) -> Result<ExitCode> {
    let reporter = app.terminal_reporter();
    let templates = TemplateSource::from_option(args.template);
    let controller = SystemctlController::new(app.runner, args.systemctl);

    let result = service::run(
        std::env::vars_os(),
        &templates,
        &args.unit_dir,
        &PrivilegedInstaller,
        &controller,
        &reporter,
    )
    .await;

    match result {
        Ok(outcome) => {
            report_success(app, &outcome)?;
            Ok(ExitCode::SUCCESS)
        }
        Err(failure) => {
            report_failure(app, &failure)?;
            Ok(ExitCode::FAILURE)
        }
    }
}

fn report_success(app: &AppContext, outcome: &DeployOutcome) -> Result<()> {
    if app.is_json() {
        println!("{}", json::format_value(outcome)?);
        return Ok(());
    }
    let ctx = &app.output;
    ctx.kv("Unit:", &outcome.unit_path.display().to_string());
    ctx.kv("SHA-256:", &outcome.sha256);
    if outcome.install == InstallOutcome::Unchanged {
        ctx.info("Unit file unchanged; service restarted with existing definition.");
    }
    Ok(())
}

pub(crate) fn report_failure(app: &AppContext, failure: &DeployFailure) -> Result<()> {
    if app.is_json() {
        println!("{}", json::format_failure(failure)?);
        return Ok(());
    }
    app.output.error(&format!(
        "{} at step '{}': {}",
        failure.error.kind(),
        failure.step,
        failure.error
    ));
    Ok(())
}
