//! Deployment state machine.
//!
//! `Idle → Resolving → Rendering → Installing → Reloading → Enabling →
//! Restarting → Done`. Any step may move to `Failed`. `Done` and `Failed`
//! are terminal.

use std::fmt;

use serde::Serialize;

/// A stage of one deployment run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeployStage {
    Idle,
    Resolving,
    Rendering,
    Installing,
    Reloading,
    Enabling,
    Restarting,
    Done,
    Failed,
}

impl DeployStage {
    /// The stage that follows this one on success, or `None` when terminal.
    #[must_use]
    pub fn next(self) -> Option<Self> {
        match self {
            Self::Idle => Some(Self::Resolving),
            Self::Resolving => Some(Self::Rendering),
            Self::Rendering => Some(Self::Installing),
            Self::Installing => Some(Self::Reloading),
            Self::Reloading => Some(Self::Enabling),
            Self::Enabling => Some(Self::Restarting),
            Self::Restarting => Some(Self::Done),
            Self::Done | Self::Failed => None,
        }
    }

    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }

    /// Human label used in progress output.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Resolving => "resolving",
            Self::Rendering => "rendering",
            Self::Installing => "installing",
            Self::Reloading => "reloading",
            Self::Enabling => "enabling",
            Self::Restarting => "restarting",
            Self::Done => "done",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for DeployStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
