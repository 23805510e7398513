//! The configurable surface of an application

use crate::diagnostics::DiagnosticSink;
use crate::group::Group;
use crate::rules::DerivationRule;

/// Root group plus the derivation rules declared with it
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schema {
    pub(crate) root: Group,
    pub(crate) rules: Vec<DerivationRule>,
}

impl Schema {
    pub fn new(root: Group) -> Self {
        Self {
            root,
            rules: Vec::new(),
        }
    }

    /// Append a derivation rule. Rules run in the order they are added.
    pub fn with_rule(mut self, rule: DerivationRule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn root(&self) -> &Group {
        &self.root
    }

    pub fn rules(&self) -> &[DerivationRule] {
        &self.rules
    }

    /// Combine two schemas: roots are merged with [`Group::merge`] and
    /// `other`'s rules run after `self`'s.
    pub fn merge(&self, other: &Schema, sink: &mut dyn DiagnosticSink) -> Schema {
        Schema {
            root: self.root.merge(&other.root, sink),
            rules: self.rules.iter().chain(&other.rules).cloned().collect(),
        }
    }
}
