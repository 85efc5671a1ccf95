//! `unitdeploy render`: print the rendered unit without installing it.

use std::io::Write as _;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use crate::app::AppContext;
use crate::application::services::render as service;
use crate::commands::deploy::report_failure;
use crate::infra::templates::TemplateSource;
use crate::output::json;

/// Arguments for the render command.
#[derive(Args, Debug)]
pub struct RenderArgs {
    /// Unit template file (defaults to the built-in template)
    #[arg(long, env = "UNITDEPLOY_TEMPLATE", value_name = "PATH")]
    pub template: Option<PathBuf>,
}

#[derive(Serialize)]
struct RenderReport<'a> {
    service_name: &'a str,
    sha256: String,
    unit: &'a str,
}

/// Run `unitdeploy render`.
///
/// # Errors
///
/// Returns an error if stdout cannot be written.
pub fn run(args: RenderArgs, app: &AppContext) -> Result<ExitCode> {
    let reporter = app.terminal_reporter();
    let templates = TemplateSource::from_option(args.template);

    let (config, unit) = match service::run(std::env::vars_os(), &templates, &reporter) {
        Ok(rendered) => rendered,
        Err(failure) => {
            report_failure(app, &failure)?;
            return Ok(ExitCode::FAILURE);
        }
    };

    if app.is_json() {
        let report = RenderReport {
            service_name: config.service_name(),
            sha256: unit.sha256(),
            unit: unit.as_str(),
        };
        println!("{}", json::format_value(&report)?);
    } else {
        // Written raw, ignoring quiet: the unit text is the command's output.
        let mut stdout = std::io::stdout().lock();
        stdout
            .write_all(unit.as_bytes())
            .and_then(|()| stdout.flush())
            .context("cannot write rendered unit to stdout")?;
    }
    Ok(ExitCode::SUCCESS)
}
