//! Typed option leaves
//!
//! A [`ConfigOption`] holds one named parameter: its declared type, default,
//! current value and provenance. Raw override input is coerced into the
//! declared type by [`ConfigOption::load`].

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::path::QualifiedName;

/// Words accepted as boolean `true`
const TRUE_WORDS: [&str; 4] = ["true", "1", "yes", "enabled"];

/// Words accepted as boolean `false`
const FALSE_WORDS: [&str; 4] = ["false", "0", "no", "disabled"];

/// Declared type of an option
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionType {
    Boolean,
    Number,
    String,
}

impl fmt::Display for OptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Boolean => write!(f, "boolean"),
            Self::Number => write!(f, "number"),
            Self::String => write!(f, "string"),
        }
    }
}

/// A typed option value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Boolean(bool),
    Number(f64),
    String(String),
}

impl Value {
    /// The type tag matching this value's shape
    pub fn option_type(&self) -> OptionType {
        match self {
            Self::Boolean(_) => OptionType::Boolean,
            Self::Number(_) => OptionType::Number,
            Self::String(_) => OptionType::String,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Boolean(b) => write!(f, "{}", b),
            Self::Number(n) => write!(f, "{}", n),
            Self::String(s) => write!(f, "{}", s),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

/// A raw override leaf as delivered by an override source
///
/// URL parameters always arrive as text. Structured hosts (JSON documents,
/// build-time constants) may hand over booleans and numbers directly.
#[derive(Debug, Clone, PartialEq)]
pub enum RawScalar {
    Text(String),
    Boolean(bool),
    Number(f64),
}

impl fmt::Display for RawScalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => write!(f, "{}", s),
            Self::Boolean(b) => write!(f, "{}", b),
            Self::Number(n) => write!(f, "{}", n),
        }
    }
}

impl From<&str> for RawScalar {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for RawScalar {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<bool> for RawScalar {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<f64> for RawScalar {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

/// Raw input that could not be coerced into an option's declared type
///
/// The option keeps its previous value; `retained` records what it kept.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("Cannot use '{input}' for {expected} option '{option}', keeping '{retained}'")]
pub struct CoercionError {
    pub option: QualifiedName,
    pub input: RawScalar,
    pub expected: OptionType,
    pub retained: Value,
}

/// A single typed configuration leaf
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfigOption {
    name: String,
    #[serde(rename = "path")]
    qualified_name: QualifiedName,
    #[serde(rename = "type")]
    option_type: OptionType,
    default: Value,
    value: Value,
    set_by_user: bool,
    hidden: bool,
    primary: bool,
    description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    default_description: Option<String>,
}

impl ConfigOption {
    /// Create an option whose declared type is the type of `default`
    pub fn new(default: impl Into<Value>, description: impl Into<String>) -> Self {
        let default = default.into();
        Self {
            name: String::new(),
            qualified_name: QualifiedName::root(),
            option_type: default.option_type(),
            value: default.clone(),
            default,
            set_by_user: false,
            hidden: false,
            primary: true,
            description: description.into(),
            default_description: None,
        }
    }

    pub fn boolean(default: bool, description: impl Into<String>) -> Self {
        Self::new(default, description)
    }

    pub fn number(default: f64, description: impl Into<String>) -> Self {
        Self::new(default, description)
    }

    pub fn string(default: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(default.into(), description)
    }

    /// Text shown instead of the literal default, e.g. "derived from startup.entry"
    pub fn with_default_description(mut self, text: impl Into<String>) -> Self {
        self.default_description = Some(text.into());
        self
    }

    /// Exclude the option from regular help listings
    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    /// Mark the option as secondary (listed only in extended help)
    pub fn secondary(mut self) -> Self {
        self.primary = false;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Dotted path from the schema root to this option
    pub fn qualified_name(&self) -> &QualifiedName {
        &self.qualified_name
    }

    pub fn option_type(&self) -> OptionType {
        self.option_type
    }

    pub fn default(&self) -> &Value {
        &self.default
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Whether the current value came from an override source
    pub fn set_by_user(&self) -> bool {
        self.set_by_user
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    pub fn is_primary(&self) -> bool {
        self.primary
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn default_description(&self) -> Option<&str> {
        self.default_description.as_deref()
    }

    /// Coerce raw override input into this option's declared type.
    ///
    /// On success the value is replaced and the option is marked as set by
    /// the user. On failure nothing changes and the returned error carries the
    /// rejected input and the value kept.
    ///
    /// ```
    /// use loader_config::{ConfigOption, RawScalar, Value};
    ///
    /// let mut opt = ConfigOption::boolean(false, "Enable the loader");
    /// opt.load(&RawScalar::from("yes")).unwrap();
    /// assert_eq!(opt.value(), &Value::Boolean(true));
    /// assert!(opt.set_by_user());
    ///
    /// assert!(opt.load(&RawScalar::from("maybe")).is_err());
    /// assert_eq!(opt.value(), &Value::Boolean(true));
    /// ```
    pub fn load(&mut self, raw: &RawScalar) -> Result<(), CoercionError> {
        match coerce(self.option_type, raw) {
            Some(value) => {
                self.value = value;
                self.set_by_user = true;
                Ok(())
            }
            None => Err(CoercionError {
                option: self.qualified_name.clone(),
                input: raw.clone(),
                expected: self.option_type,
                retained: self.value.clone(),
            }),
        }
    }

    /// Restore the default value and clear provenance
    pub fn reset(&mut self) {
        self.value = self.default.clone();
        self.set_by_user = false;
    }

    /// Set a derived effective value without marking it as user-set.
    ///
    /// Returns `false` and leaves the option untouched when the value has the
    /// wrong type.
    pub(crate) fn derive(&mut self, value: Value) -> bool {
        if value.option_type() != self.option_type {
            return false;
        }
        self.value = value;
        true
    }

    pub(crate) fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
    }

    pub(crate) fn stamp(&mut self, path: QualifiedName) {
        self.qualified_name = path;
    }
}

fn coerce(expected: OptionType, raw: &RawScalar) -> Option<Value> {
    match (expected, raw) {
        (OptionType::Boolean, RawScalar::Boolean(b)) => Some(Value::Boolean(*b)),
        (OptionType::Boolean, RawScalar::Text(text)) => parse_bool(text).map(Value::Boolean),
        (OptionType::Number, RawScalar::Number(n)) if n.is_finite() => Some(Value::Number(*n)),
        (OptionType::Number, RawScalar::Text(text)) => parse_number(text).map(Value::Number),
        (OptionType::String, RawScalar::Text(text)) => Some(Value::String(text.clone())),
        (OptionType::String, other) => Some(Value::String(other.to_string())),
        _ => None,
    }
}

fn parse_bool(text: &str) -> Option<bool> {
    if TRUE_WORDS.iter().any(|w| w.eq_ignore_ascii_case(text)) {
        Some(true)
    } else if FALSE_WORDS.iter().any(|w| w.eq_ignore_ascii_case(text)) {
        Some(false)
    } else {
        None
    }
}

fn parse_number(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}
