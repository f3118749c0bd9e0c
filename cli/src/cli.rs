//! CLI argument parsing with clap derive

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::app::{AppContext, AppFlags};
use crate::commands;
use crate::domain::Phase;

/// Provision a machine to run a Habitat package under the Supervisor
#[derive(Parser)]
#[command(
    name = "habprov",
    version,
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Config file [default: $HABPROV_CONFIG, then ./habprov.yml]
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Log resolution decisions to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run install, init, prepare and run in order
    Converge,

    /// Install the hab CLI on the target
    Install,

    /// Create the hab user, the workspace and the Supervisor service
    Init,

    /// Upload the sandbox and stage configuration overrides
    Prepare,

    /// Install the package and load it under the Supervisor
    Run,

    /// Print a phase script without running it
    Script(commands::script::ScriptArgs),

    /// Parse an artifact file name
    Ident(commands::ident::IdentArgs),

    /// Show Supervisor and service options
    Options,

    /// Show version
    Version,
}

impl Cli {
    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if the command fails.
    pub async fn run(self) -> Result<()> {
        let Cli {
            config,
            json,
            quiet,
            no_color,
            command,
            ..
        } = self;
        let app = AppContext::new(&AppFlags {
            config,
            no_color,
            quiet,
            json,
        });
        match command {
            Command::Converge => commands::converge::run(&app).await,
            Command::Install => commands::phase::run(&app, Phase::Install).await,
            Command::Init => commands::phase::run(&app, Phase::Init).await,
            Command::Prepare => commands::phase::run(&app, Phase::Prepare).await,
            Command::Run => commands::phase::run(&app, Phase::Run).await,
            Command::Script(args) => commands::script::run(&app, &args),
            Command::Ident(args) => commands::ident::run(&app, &args),
            Command::Options => commands::options::run(&app),
            Command::Version => commands::version::run(&app),
        }
    }
}
