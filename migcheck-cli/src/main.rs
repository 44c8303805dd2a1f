//! migcheck CLI entry point.

mod cli;
mod commands;
mod error;
mod logging;
mod output;

use clap::Parser;
use colored::Colorize;

use crate::cli::{Cli, Commands};
use crate::error::CliError;
use crate::output::OutputWriter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let writer = OutputWriter::new(cli.output);

    if let Err(e) = run(cli, &writer).await {
        eprintln!("{} {e}", "error:".red().bold());
        std::process::exit(e.exit_code());
    }
}

async fn run(cli: Cli, writer: &OutputWriter) -> Result<(), CliError> {
    match cli.command {
        Commands::Run(args) => {
            commands::run::execute(args, &cli.config, cli.log_level.as_deref(), writer).await
        }
        Commands::Config(args) => commands::config::execute(args, &cli.config, writer).await,
        Commands::Fixtures(args) => commands::fixtures::execute(args, &cli.config, writer).await,
    }
}
