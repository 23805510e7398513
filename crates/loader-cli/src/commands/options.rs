//! Options command implementation

use colored::Colorize;
use loader_config::{Group, Node};

use super::format_value;
use crate::error::Result;
use crate::schema::loader_schema;

/// Run the options command
pub fn run_options(all: bool, json: bool) -> Result<()> {
    let schema = loader_schema()?;
    let resolver = loader_config::Resolver::new(schema)?;

    if json {
        println!("{}", serde_json::to_string_pretty(resolver.root())?);
        return Ok(());
    }

    println!("{}", "Loader Options".bold());
    print_group(resolver.root(), 0, all);
    if !all {
        println!();
        println!("Run {} to include hidden options.", "loader-config options --all".cyan());
    }
    Ok(())
}

fn print_group(group: &Group, depth: usize, all: bool) {
    let indent = "  ".repeat(depth);
    for (name, node) in group.children() {
        match node {
            Node::Branch(child) => {
                println!();
                println!("{}{}:", indent, name.bold());
                print_group(child, depth + 1, all);
            }
            Node::Leaf(option) => {
                if option.is_hidden() && !all {
                    continue;
                }
                let default = option
                    .default_description()
                    .map(str::to_string)
                    .unwrap_or_else(|| format_value(option.default()));
                let label = if option.is_primary() {
                    name.cyan()
                } else {
                    name.dimmed()
                };
                println!(
                    "{}{} {} (default: {})",
                    indent,
                    label,
                    format!("<{}>", option.option_type()).dimmed(),
                    default
                );
                println!("{}    {}", indent, option.description());
            }
        }
    }
}
