//! `unitdeploy dev`: run the application server locally for development.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Args;

use crate::app::AppContext;
use crate::infra::launcher::{self, DEFAULT_PATH_VAR};

/// Arguments for the dev command.
#[derive(Args, Debug)]
pub struct DevArgs {
    /// Search-path variable the project directory is prepended to
    #[arg(long, value_name = "VAR", default_value = DEFAULT_PATH_VAR)]
    pub path_var: String,

    /// Project directory (defaults to the current directory)
    #[arg(long, value_name = "DIR")]
    pub path: Option<PathBuf>,

    /// Server command and its arguments
    #[arg(last = true, required = true, value_name = "COMMAND")]
    pub command: Vec<String>,
}

/// Run `unitdeploy dev`, exiting with the server's exit code.
///
/// # Errors
///
/// Returns an error if the project directory cannot be determined or the
/// server cannot be started.
pub async fn run(args: DevArgs, app: &AppContext) -> Result<ExitCode> {
    let dir = match args.path {
        Some(path) => path,
        None => std::env::current_dir().context("cannot determine current directory")?,
    };
    let status = launcher::launch(&app.runner, &args.path_var, &dir, &args.command).await?;
    tracing::debug!(%status, "development server exited");

    // Killed by a signal: no code to forward.
    let code = status
        .code()
        .and_then(|code| u8::try_from(code).ok())
        .unwrap_or(1);
    Ok(ExitCode::from(code))
}
