//! CLI argument parsing with clap derive

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::app::{AppContext, AppFlags};
use crate::commands;

/// Install an application as a managed system service
#[derive(Parser)]
#[command(
    name = "unitdeploy",
    version,
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(
        long,
        global = true,
        env = "NO_COLOR",
        value_parser = clap::builder::FalseyValueParser::new()
    )]
    pub no_color: bool,

    /// Log each step to stderr (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Render, install, enable and restart the service unit
    Deploy(commands::deploy::DeployArgs),

    /// Print the rendered unit without installing it
    Render(commands::render::RenderArgs),

    /// Run the application server locally
    Dev(commands::dev::DevArgs),

    /// Show version
    Version,
}

impl Cli {
    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if the command cannot produce its output. Failed
    /// deployments are reported by the command and yield a failure exit code.
    pub async fn run(self) -> Result<ExitCode> {
        let Cli {
            json,
            quiet,
            no_color,
            verbose: _,
            command,
        } = self;
        let app = AppContext::new(AppFlags {
            no_color,
            quiet,
            json,
        });
        match command {
            Command::Deploy(args) => commands::deploy::run(args, &app).await,
            Command::Render(args) => commands::render::run(args, &app),
            Command::Dev(args) => commands::dev::run(args, &app).await,
            Command::Version => {
                commands::version::run(json);
                Ok(ExitCode::SUCCESS)
            }
        }
    }
}
