//! Loader configuration CLI
//!
//! Resolves override sources against the loader schema and prints the
//! resulting option tree together with any diagnostics.

mod cli;
mod commands;
mod error;
mod logging;
mod schema;

use clap::Parser;
use colored::Colorize;

use cli::{Cli, Commands};
use error::Result;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.verbose) {
        eprintln!("{}: could not set up logging: {}", "warning".yellow().bold(), e);
    }
    tracing::debug!("Verbose mode enabled");

    match cli.command {
        Some(Commands::Resolve(args)) => commands::run_resolve(&args, cli.verbose),
        Some(Commands::Options { all, json }) => commands::run_options(all, json),
        None => {
            println!("{} Loader configuration CLI", "loader-config".green().bold());
            println!();
            println!("Run {} for available commands.", "loader-config --help".cyan());
            Ok(())
        }
    }
}
