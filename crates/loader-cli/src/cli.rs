//! CLI argument parsing using clap derive

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Loader configuration - resolve and inspect loader options
#[derive(Parser, Debug)]
#[command(name = "loader-config")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Commands {
    /// Resolve override sources against the loader schema
    ///
    /// Sources are applied in order: every --source file first, then all
    /// --set flags as one final source. Later sources win.
    ///
    /// Examples:
    ///   loader-config resolve --set startup.entry=custom
    ///   loader-config resolve --source host.json --set loader.enabled=yes
    Resolve(ResolveArgs),

    /// List the options of the loader schema
    Options {
        /// Include hidden options
        #[arg(short, long)]
        all: bool,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct ResolveArgs {
    /// Override a single option, e.g. `loader.enabled=false`
    #[arg(short, long = "set", value_name = "KEY=VALUE", value_parser = parse_assignment)]
    pub set: Vec<(String, String)>,

    /// JSON file with nested overrides, applied before --set
    #[arg(short = 'f', long = "source", value_name = "FILE")]
    pub sources: Vec<PathBuf>,

    /// Output as JSON for scripting
    #[arg(long)]
    pub json: bool,

    /// Fail when any diagnostic or unrecognized parameter is reported
    #[arg(long, env = "LOADER_CONFIG_STRICT")]
    pub strict: bool,
}

fn parse_assignment(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{}'", raw))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing key in '{}'", raw));
    }
    Ok((key.to_string(), value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_assignment_splits_on_first_equals() {
        assert_eq!(
            parse_assignment("startup.entry=a=b"),
            Ok(("startup.entry".to_string(), "a=b".to_string()))
        );
    }

    #[test]
    fn parse_assignment_rejects_missing_parts() {
        assert!(parse_assignment("no-equals").is_err());
        assert!(parse_assignment("=value").is_err());
    }

    #[test]
    fn resolve_collects_repeated_flags() {
        let cli = Cli::parse_from([
            "loader-config",
            "resolve",
            "--set",
            "startup.entry=custom",
            "-s",
            "loader.enabled=yes",
            "--json",
        ]);
        let Some(Commands::Resolve(args)) = cli.command else {
            panic!("expected resolve command");
        };
        assert_eq!(args.set.len(), 2);
        assert!(args.json);
        assert!(args.sources.is_empty());
    }
}
