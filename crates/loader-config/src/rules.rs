//! Derivation rules applied after resolution
//!
//! A rule derives one option's effective value from the state of others. Rules
//! are plain data, so they can be declared next to the schema or loaded from a
//! document, and the resolver stays generic over any option set.
//!
//! A rule never overrides an explicit user choice: when its target option was
//! set by an override source the rule is skipped.
//!
//! # Example
//!
//! ```
//! use loader_config::{Action, Condition, DerivationRule, Value};
//!
//! // Hide the loading indicator unless the default entry point is started.
//! let rule = DerivationRule::new(
//!     "loader-follows-entry",
//!     Condition::NotEquals {
//!         option: "startup.entry".into(),
//!         value: Value::from("ide"),
//!     },
//!     Action::Set {
//!         option: "loader.enabled".into(),
//!         value: Value::Boolean(false),
//!     },
//! );
//! assert_eq!(rule.then.target().to_string(), "loader.enabled");
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::group::Group;
use crate::option::{OptionType, Value};
use crate::path::QualifiedName;

/// Predicate over the resolved option tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    Always,
    Equals { option: QualifiedName, value: Value },
    NotEquals { option: QualifiedName, value: Value },
    IsSetByUser { option: QualifiedName },
    All(Vec<Condition>),
    Any(Vec<Condition>),
    Not(Box<Condition>),
}

impl Condition {
    /// Evaluate against the current option values.
    ///
    /// References to missing options evaluate to `false`.
    pub fn holds(&self, root: &Group) -> bool {
        match self {
            Self::Always => true,
            Self::Equals { option, value } => root
                .option_at(option)
                .is_some_and(|o| o.value() == value),
            Self::NotEquals { option, value } => root
                .option_at(option)
                .is_some_and(|o| o.value() != value),
            Self::IsSetByUser { option } => root.option_at(option).is_some_and(|o| o.set_by_user()),
            Self::All(conditions) => conditions.iter().all(|c| c.holds(root)),
            Self::Any(conditions) => conditions.iter().any(|c| c.holds(root)),
            Self::Not(condition) => !condition.holds(root),
        }
    }

    fn validate(&self, rule: &str, root: &Group) -> Result<()> {
        match self {
            Self::Always => Ok(()),
            Self::Equals { option, value } | Self::NotEquals { option, value } => {
                check_type(rule, root, option, value.option_type())
            }
            Self::IsSetByUser { option } => require_option(rule, root, option).map(|_| ()),
            Self::All(conditions) | Self::Any(conditions) => conditions
                .iter()
                .try_for_each(|c| c.validate(rule, root)),
            Self::Not(condition) => condition.validate(rule, root),
        }
    }
}

/// Effect of a rule on its target option
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Set the target to a literal value
    Set { option: QualifiedName, value: Value },
    /// Copy the current value of another option of the same type
    CopyFrom {
        option: QualifiedName,
        source: QualifiedName,
    },
}

impl Action {
    /// The option this action writes
    pub fn target(&self) -> &QualifiedName {
        match self {
            Self::Set { option, .. } | Self::CopyFrom { option, .. } => option,
        }
    }

    fn validate(&self, rule: &str, root: &Group) -> Result<()> {
        match self {
            Self::Set { option, value } => check_type(rule, root, option, value.option_type()),
            Self::CopyFrom { option, source } => {
                let source_type = require_option(rule, root, source)?;
                check_type(rule, root, option, source_type)
            }
        }
    }
}

/// What happened when a rule ran
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleOutcome {
    Applied,
    /// Target was set explicitly by an override source
    SkippedUserSet,
    ConditionFalse,
    /// Target or source option is missing or has the wrong type
    Invalid,
}

/// A post-resolution derivation: when `when` holds, perform `then`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivationRule {
    pub name: String,
    pub when: Condition,
    pub then: Action,
}

impl DerivationRule {
    pub fn new(name: impl Into<String>, when: Condition, then: Action) -> Self {
        Self {
            name: name.into(),
            when,
            then,
        }
    }

    /// Check that every referenced option exists with a compatible type
    pub fn validate(&self, root: &Group) -> Result<()> {
        self.when.validate(&self.name, root)?;
        self.then.validate(&self.name, root)
    }

    /// Run the rule once against `root`
    pub fn apply(&self, root: &mut Group) -> RuleOutcome {
        let target = self.then.target();
        match root.option_at(target) {
            None => return RuleOutcome::Invalid,
            Some(option) if option.set_by_user() => return RuleOutcome::SkippedUserSet,
            Some(_) => {}
        }
        if !self.when.holds(root) {
            return RuleOutcome::ConditionFalse;
        }

        let value = match &self.then {
            Action::Set { value, .. } => value.clone(),
            Action::CopyFrom { source, .. } => match root.option_at(source) {
                Some(option) => option.value().clone(),
                None => return RuleOutcome::Invalid,
            },
        };
        match root.option_at_mut(target) {
            Some(option) => {
                if option.derive(value) {
                    RuleOutcome::Applied
                } else {
                    RuleOutcome::Invalid
                }
            }
            None => RuleOutcome::Invalid,
        }
    }
}

fn require_option(rule: &str, root: &Group, option: &QualifiedName) -> Result<OptionType> {
    root.option_at(option)
        .map(|o| o.option_type())
        .ok_or_else(|| Error::UnknownRuleOption {
            rule: rule.to_string(),
            option: option.clone(),
        })
}

fn check_type(rule: &str, root: &Group, option: &QualifiedName, found: OptionType) -> Result<()> {
    let expected = require_option(rule, root, option)?;
    if expected != found {
        return Err(Error::RuleTypeMismatch {
            rule: rule.to_string(),
            option: option.clone(),
            expected,
            found,
        });
    }
    Ok(())
}
