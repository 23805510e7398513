//! Command implementations for loader-cli

pub mod options;
pub mod resolve;

pub use options::run_options;
pub use resolve::run_resolve;

use colored::Colorize;
use loader_config::{ConfigOption, Value};

/// Render a value for terminal output
pub(crate) fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) if s.is_empty() => "\"\"".to_string(),
        Value::String(s) => format!("\"{}\"", s),
        other => other.to_string(),
    }
}

/// Where the current value of an option came from
pub(crate) fn provenance(option: &ConfigOption) -> colored::ColoredString {
    if option.set_by_user() {
        "user".green()
    } else if option.value() != option.default() {
        "derived".cyan()
    } else {
        "default".dimmed()
    }
}
