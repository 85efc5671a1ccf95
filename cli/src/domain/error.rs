//! Typed domain error enums.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All error types implement `thiserror::Error` and convert to `anyhow::Error`
//! via the `?` operator.

use thiserror::Error;

use crate::domain::stage::DeployStage;

// ── Deployment errors ─────────────────────────────────────────────────────────

/// Every way a deployment can fail. One variant per error kind an operator
/// can see; the first one raised aborts the run.
#[derive(Debug, Error)]
pub enum DeployError {
    #[error("{0}")]
    Configuration(String),

    #[error("{0}")]
    Render(String),

    #[error("{0}\n\nRe-run with elevated privileges (e.g. sudo).")]
    Privilege(String),

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("systemctl {operation} failed{}: {cause}", .exit_code.map(|c| format!(" (exit {c})")).unwrap_or_default())]
    ServiceControl {
        operation: String,
        exit_code: Option<i32>,
        cause: String,
    },
}

impl DeployError {
    /// Error kind as named in operator-facing reports.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "ConfigurationError",
            Self::Render(_) => "RenderError",
            Self::Privilege(_) => "PrivilegeError",
            Self::Io { .. } => "IOError",
            Self::ServiceControl { .. } => "ServiceControlError",
        }
    }

    /// Stable machine-readable code used in `--json` output.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "configuration_error",
            Self::Render(_) => "render_error",
            Self::Privilege(_) => "privilege_error",
            Self::Io { .. } => "io_error",
            Self::ServiceControl { .. } => "service_control_error",
        }
    }

    pub(crate) fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }
}

/// A failed deployment: the error, the stage that was active when it was
/// raised, and every stage visited, ending in [`DeployStage::Failed`].
#[derive(Debug, Error)]
#[error("{kind} during {step}: {error}", kind = .error.kind())]
pub struct DeployFailure {
    pub step: DeployStage,
    #[source]
    pub error: DeployError,
    pub trace: Vec<DeployStage>,
}

impl DeployFailure {
    /// A failure at `step` reached by the ordinary path from `Idle`.
    #[must_use]
    pub fn new(step: DeployStage, error: DeployError) -> Self {
        let mut trace = vec![DeployStage::Idle];
        let mut stage = DeployStage::Idle;
        while stage != step {
            let Some(next) = stage.next() else { break };
            trace.push(next);
            stage = next;
        }
        trace.push(DeployStage::Failed);
        Self { step, error, trace }
    }
}
