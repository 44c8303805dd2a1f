//! CLI argument parsing using clap derive API
//!
//! This module defines the command-line interface structure using clap's derive macros.
//! It is purely declarative with no side effects or I/O.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Migcheck -- end-to-end verification harness for a migration-assessment hub.
///
/// Use `migcheck <COMMAND> --help` for subcommand details.
#[derive(Parser, Debug)]
#[command(name = "migcheck", version, about, long_about = None)]
pub struct Cli {
    /// Path to the migcheck.toml configuration file.
    #[arg(short, long, default_value = "migcheck.toml")]
    pub config: PathBuf,

    /// Override log level (trace, debug, info, warn, error).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Output format.
    #[arg(long, global = true, default_value = "text")]
    pub output: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Supported output formats.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table / text output.
    Text,
    /// Machine-readable JSON.
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a verification suite against the configured hub.
    Run(RunArgs),

    /// Manage configuration.
    Config(ConfigArgs),

    /// Inspect the fixture set.
    Fixtures(FixturesArgs),
}

// ---- run ----

/// Run a verification suite end to end.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Suite to run (source-analysis, binary-analysis).
    #[arg(default_value = "source-analysis")]
    pub suite: String,

    /// Override the fixture directory from the config file.
    #[arg(long)]
    pub fixtures: Option<String>,
}

// ---- config ----

/// Validate or display the effective configuration.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Load the config file and report whether it is valid.
    Validate,

    /// Display the effective configuration (file + env overrides + defaults).
    Show {
        /// Limit output to one section (general, hub, polling, fixtures, artifacts).
        #[arg(long)]
        section: Option<String>,
    },
}

// ---- fixtures ----

/// List the application and analysis fixture keys.
#[derive(Args, Debug)]
pub struct FixturesArgs {
    /// Override the fixture directory from the config file.
    #[arg(long)]
    pub dir: Option<String>,
}
