//! Error types for loader-config
//!
//! Only schema-authoring mistakes and malformed source documents are errors.
//! Bad user input met during resolution is reported as a
//! [`Diagnostic`](crate::Diagnostic) instead.

use crate::option::OptionType;
use crate::path::QualifiedName;

/// Result type for loader-config operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building a schema or an override source
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Two children with the same name declared in one group construction
    #[error("Duplicate child '{name}' declared in one group")]
    DuplicateChild { name: String },

    /// A child name that can never be addressed by a dotted path
    #[error("Invalid child name '{name}': names must be non-empty and contain no '.'")]
    InvalidChildName { name: String },

    /// A derivation rule refers to an option that does not exist
    #[error("Rule '{rule}' refers to unknown option '{option}'")]
    UnknownRuleOption { rule: String, option: QualifiedName },

    /// A derivation rule uses a value of the wrong type for its option
    #[error("Rule '{rule}' uses a {found} value for {expected} option '{option}'")]
    RuleTypeMismatch {
        rule: String,
        option: QualifiedName,
        expected: OptionType,
        found: OptionType,
    },

    /// An override source could not be turned into an override tree
    #[error("Invalid override source: {message}")]
    InvalidOverrideSource { message: String },

    /// JSON deserialization error
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn invalid_source(message: impl Into<String>) -> Self {
        Self::InvalidOverrideSource {
            message: message.into(),
        }
    }
}
