//! CLI argument parsing and command dispatch

use anyhow::Result;
use clap::{Parser, Subcommand};

use course_repo::output::OutputConfig;

use crate::commands;

/// Course Repository - Provision per-student course repositories
#[derive(Parser, Debug)]
#[command(name = "course-repo")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Colorize output (always, never, auto)
    #[arg(long, global = true, value_name = "WHEN", default_value = "auto")]
    color: String,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(long, global = true, value_name = "LEVEL", default_value = "info")]
    log_level: String,

    /// Print debug information (also honors DEBUG=true)
    #[arg(short = 'd', long, global = true)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Clone, fork, patch, and push the student repository for a task
    Provision(commands::provision::ProvisionArgs),

    /// Interactive first-time setup: clone a template and record your details
    Setup(commands::setup::SetupArgs),

    /// Verify that git and the GitHub CLI are installed and logged in
    Check,

    /// Generate shell completion scripts
    Completions(commands::completions::CompletionsArgs),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        let debug =
            self.debug || std::env::var("DEBUG").is_ok_and(|v| v.eq_ignore_ascii_case("true"));
        let filter = if debug {
            "debug"
        } else {
            self.log_level.as_str()
        };
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter))
            .try_init()
            .ok();

        let out = OutputConfig::from_env_and_flag(&self.color);

        match self.command {
            Commands::Provision(args) => commands::provision::execute(args, debug, &out),
            Commands::Setup(args) => commands::setup::execute(args, &out),
            Commands::Check => commands::check::execute(&out),
            Commands::Completions(args) => commands::completions::execute(args),
        }
    }
}
