//! Infrastructure implementation of the `CommandRunner` port.
//!
//! `TokioCommandRunner` is the production implementation that uses tokio
//! for async process execution. Each call waits for the child to exit.

use std::ffi::OsString;
use std::process::{ExitStatus, Output, Stdio};

use anyhow::{Context, Result};

use crate::application::ports::CommandRunner;

/// Production `CommandRunner`: spawns real processes via tokio.
///
/// Children are killed if the future running them is dropped.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioCommandRunner;

impl CommandRunner for TokioCommandRunner {
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output> {
        tracing::debug!(program, ?args, "running command");
        tokio::process::Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .with_context(|| format!("failed to spawn {program}"))
    }

    async fn run_status(
        &self,
        program: &str,
        args: &[String],
        env: &[(String, OsString)],
    ) -> Result<ExitStatus> {
        tracing::debug!(program, ?args, "running command with inherited stdio");
        let mut child = tokio::process::Command::new(program)
            .args(args)
            .envs(env.iter().map(|(k, v)| (k, v)))
            .kill_on_drop(true)
            .spawn()
            .with_context(|| format!("failed to spawn {program}"))?;

        child
            .wait()
            .await
            .with_context(|| format!("waiting for {program}"))
    }
}
