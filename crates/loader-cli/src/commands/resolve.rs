//! Resolve command implementation

use colored::Colorize;
use loader_config::{
    Diagnostic, DiagnosticSink, OverrideTree, QualifiedName, Resolver, Severity, TracingSink,
};
use serde::Serialize;
use std::collections::BTreeSet;
use std::fs;

use super::{format_value, provenance};
use crate::cli::ResolveArgs;
use crate::error::{CliError, Result};
use crate::schema::loader_schema;

/// Machine-readable resolution report
#[derive(Serialize)]
struct Report<'a> {
    options: &'a loader_config::Group,
    unrecognized: &'a BTreeSet<QualifiedName>,
    diagnostics: &'a [Diagnostic],
}

/// Run the resolve command.
///
/// Diagnostics are part of the printed output; `verbose` also forwards them
/// to the log.
pub fn run_resolve(args: &ResolveArgs, verbose: bool) -> Result<()> {
    let mut resolver = Resolver::new(loader_schema()?)?;
    let sources = load_sources(args)?;

    let mut diagnostics: Vec<Diagnostic> = Vec::new();
    let unrecognized = resolver.resolve(&sources, &mut diagnostics);
    if verbose {
        let mut log = TracingSink;
        for diagnostic in &diagnostics {
            log.report(diagnostic.clone());
        }
    }

    if args.json {
        let report = Report {
            options: resolver.root(),
            unrecognized: &unrecognized,
            diagnostics: &diagnostics,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_resolution(&resolver, &diagnostics);
    }

    if args.strict && !diagnostics.is_empty() {
        return Err(CliError::user(format!(
            "{} problem(s) found in the override sources",
            diagnostics.len()
        )));
    }
    Ok(())
}

/// Every --source file in order, then the --set flags as one final source
fn load_sources(args: &ResolveArgs) -> Result<Vec<OverrideTree>> {
    let mut sources = Vec::with_capacity(args.sources.len() + 1);
    for path in &args.sources {
        tracing::debug!(?path, "Loading override source");
        let content = fs::read_to_string(path)?;
        let tree = OverrideTree::from_json_str(&content)
            .map_err(|e| CliError::user(format!("{}: {}", path.display(), e)))?;
        sources.push(tree);
    }
    if !args.set.is_empty() {
        sources.push(OverrideTree::from_dotted_pairs(
            args.set.iter().map(|(k, v)| (k.as_str(), v.as_str())),
        ));
    }
    Ok(sources)
}

fn print_resolution(resolver: &Resolver, diagnostics: &[Diagnostic]) {
    println!("{}", "Resolved Configuration".bold());
    println!();

    let options = resolver.options();
    let width = options
        .iter()
        .map(|o| o.qualified_name().to_string().len())
        .max()
        .unwrap_or(0);
    for option in options {
        println!(
            "  {:<width$}  {} ({})",
            option.qualified_name().to_string().cyan(),
            format_value(option.value()),
            provenance(option),
            width = width
        );
    }

    if diagnostics.is_empty() {
        return;
    }
    println!();
    println!("{}:", "Diagnostics".bold());
    for diagnostic in diagnostics {
        let level = match diagnostic.level() {
            Severity::Error => "error".red().bold(),
            Severity::Warning => "warning".yellow().bold(),
        };
        println!("  {}: {}", level, diagnostic);
    }
}
