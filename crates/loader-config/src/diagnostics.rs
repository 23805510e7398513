//! Resolution diagnostics
//!
//! Recoverable problems found while merging schemas or applying overrides are
//! delivered to a caller-supplied [`DiagnosticSink`]. The engine never logs
//! them on its own and never drops them.

use serde::Serialize;
use std::fmt;

use crate::option::{CoercionError, OptionType, Value};
use crate::path::QualifiedName;

/// Severity level of a diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Potential problem, resolution continued
    Warning,
    /// Schema shape problem, resolution continued with the first definition
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Kind of a schema node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Option,
    Group,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Option => write!(f, "option"),
            Self::Group => write!(f, "group"),
        }
    }
}

/// A recoverable problem reported during merge or resolution
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// Raw input did not parse as the option's type; the old value was kept
    CoercionFailure {
        option: QualifiedName,
        input: String,
        expected: OptionType,
        retained: Value,
    },

    /// An override path has no matching option or group
    UnrecognizedParameter { path: QualifiedName },

    /// A schema merge replaced an option that already existed under the name
    ShadowedOption { option: QualifiedName },

    /// A schema merge met an option and a group under the same name
    InvalidShape { path: QualifiedName, kept: NodeKind },
}

impl Diagnostic {
    pub fn level(&self) -> Severity {
        match self {
            Self::CoercionFailure { .. }
            | Self::UnrecognizedParameter { .. }
            | Self::ShadowedOption { .. } => Severity::Warning,
            Self::InvalidShape { .. } => Severity::Error,
        }
    }

    /// Path of the option or override the diagnostic is about
    pub fn path(&self) -> &QualifiedName {
        match self {
            Self::CoercionFailure { option, .. } | Self::ShadowedOption { option } => option,
            Self::UnrecognizedParameter { path } | Self::InvalidShape { path, .. } => path,
        }
    }
}

impl From<CoercionError> for Diagnostic {
    fn from(err: CoercionError) -> Self {
        Self::CoercionFailure {
            option: err.option,
            input: err.input.to_string(),
            expected: err.expected,
            retained: err.retained,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CoercionFailure {
                option,
                input,
                expected,
                retained,
            } => write!(
                f,
                "Cannot use '{}' for {} option '{}', keeping '{}'",
                input, expected, option, retained
            ),
            Self::UnrecognizedParameter { path } => {
                write!(f, "Unrecognized parameter '{}'", path)
            }
            Self::ShadowedOption { option } => {
                write!(f, "Option '{}' is defined twice, the later definition wins", option)
            }
            Self::InvalidShape { path, kept } => write!(
                f,
                "'{}' is an option on one side and a group on the other, keeping the {}",
                path, kept
            ),
        }
    }
}

/// Receiver of diagnostics
pub trait DiagnosticSink {
    fn report(&mut self, diagnostic: Diagnostic);
}

impl DiagnosticSink for Vec<Diagnostic> {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

impl<S: DiagnosticSink + ?Sized> DiagnosticSink for &mut S {
    fn report(&mut self, diagnostic: Diagnostic) {
        (**self).report(diagnostic);
    }
}

/// Sink that forwards every diagnostic to `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&mut self, diagnostic: Diagnostic) {
        let path = diagnostic.path().to_string();
        match diagnostic.level() {
            Severity::Error => tracing::error!(%path, "{}", diagnostic),
            Severity::Warning => tracing::warn!(%path, "{}", diagnostic),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::option::RawScalar;

    #[test]
    fn coercion_error_converts_to_diagnostic() {
        let err = CoercionError {
            option: QualifiedName::parse("loader.enabled"),
            input: RawScalar::from("maybe"),
            expected: OptionType::Boolean,
            retained: Value::Boolean(true),
        };
        let diagnostic = Diagnostic::from(err);
        assert_eq!(diagnostic.level(), Severity::Warning);
        assert_eq!(diagnostic.path().to_string(), "loader.enabled");
        assert!(diagnostic.to_string().contains("maybe"));
    }

    #[test]
    fn invalid_shape_is_error_level() {
        let diagnostic = Diagnostic::InvalidShape {
            path: QualifiedName::parse("loader"),
            kept: NodeKind::Group,
        };
        assert_eq!(diagnostic.level(), Severity::Error);
        assert!(diagnostic.to_string().contains("keeping the group"));
    }

    #[test]
    fn serializes_with_kind_tag() {
        let diagnostic = Diagnostic::UnrecognizedParameter {
            path: QualifiedName::parse("foo.bar"),
        };
        let json = serde_json::to_value(&diagnostic).unwrap();
        assert_eq!(json["kind"], "unrecognized_parameter");
        assert_eq!(json["path"], "foo.bar");
    }

    #[test]
    fn tracing_sink_accepts_every_level() {
        let mut sink = TracingSink;
        sink.report(Diagnostic::ShadowedOption {
            option: QualifiedName::parse("a.b"),
        });
        sink.report(Diagnostic::InvalidShape {
            path: QualifiedName::parse("a"),
            kept: NodeKind::Option,
        });
    }
}
