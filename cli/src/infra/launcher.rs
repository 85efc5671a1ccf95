//! Development launcher: runs an application server with the project
//! directory prepended to a module search path.
//!
//! Independent of the deployment state machine.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::ExitStatus;

use anyhow::{Context, Result};

use crate::application::ports::CommandRunner;

/// Search-path variable used when none is given.
pub const DEFAULT_PATH_VAR: &str = "PYTHONPATH";

/// Builds `var`'s new value: `dir` first, then the entries of `current`.
///
/// An entry equal to `dir` is not repeated.
///
/// # Errors
///
/// Returns an error if `dir` contains the platform's path separator.
pub fn prepend_search_path(dir: &Path, current: Option<&OsString>) -> Result<OsString> {
    let mut entries: Vec<PathBuf> = vec![dir.to_path_buf()];
    if let Some(current) = current {
        entries.extend(
            std::env::split_paths(current).filter(|p| !p.as_os_str().is_empty() && p != dir),
        );
    }
    std::env::join_paths(entries)
        .with_context(|| format!("cannot add {} to the search path", dir.display()))
}

/// Runs `command` with `dir` prepended to `path_var`, inheriting stdio and
/// the current working directory.
///
/// # Errors
///
/// Returns an error if `command` is empty, the search path cannot be built,
/// or the server process cannot be spawned.
pub async fn launch(
    runner: &impl CommandRunner,
    path_var: &str,
    dir: &Path,
    command: &[String],
) -> Result<ExitStatus> {
    let (program, args) = command
        .split_first()
        .context("no server command given")?;
    let current = std::env::var_os(path_var);
    let value = prepend_search_path(dir, current.as_ref())?;
    tracing::info!(
        var = path_var,
        value = %value.to_string_lossy(),
        program = %program,
        "starting development server"
    );
    runner
        .run_status(program, args, &[(path_var.to_string(), value)])
        .await
}
