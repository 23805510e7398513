//! Multi-source resolution
//!
//! The [`Resolver`] binds a [`Schema`], folds ordered override sources into a
//! single tree, walks the schema against it and finally runs the schema's
//! derivation rules.
//!
//! Resolution never fails on user input. Values that do not coerce are kept
//! at their previous state and reported, unknown paths are collected and
//! returned. Only schema-authoring mistakes are errors, and those surface in
//! [`Resolver::new`].

use std::collections::BTreeSet;

use crate::diagnostics::DiagnosticSink;
use crate::error::Result;
use crate::group::{Group, ResolveContext};
use crate::option::{ConfigOption, Value};
use crate::overrides::OverrideTree;
use crate::path::QualifiedName;
use crate::rules::{DerivationRule, RuleOutcome};
use crate::schema::Schema;

/// Resolves override sources against one bound schema
#[derive(Debug, Clone)]
pub struct Resolver {
    schema: Schema,
}

impl Resolver {
    /// Bind a schema.
    ///
    /// Stamps every option with its qualified name and validates the
    /// schema's derivation rules.
    pub fn new(mut schema: Schema) -> Result<Self> {
        schema.root.stamp_paths(&QualifiedName::root());
        for rule in &schema.rules {
            rule.validate(&schema.root)?;
        }
        tracing::debug!(
            options = schema.root.options().len(),
            rules = schema.rules.len(),
            "Bound configuration schema"
        );
        Ok(Self { schema })
    }

    /// Register an extra derivation rule, run after the existing ones
    pub fn register_rule(&mut self, rule: DerivationRule) -> Result<()> {
        rule.validate(&self.schema.root)?;
        self.schema.rules.push(rule);
        Ok(())
    }

    /// Resolve ordered override sources, earliest lowest precedence.
    ///
    /// Every option starts from its default, so resolving again (for a
    /// reload) does not see values from an earlier run. Diagnostics go to
    /// `sink`; the unrecognized override paths are returned.
    ///
    /// ```
    /// use loader_config::{ConfigOption, Diagnostic, Group, OverrideTree, Resolver, Schema, Value};
    ///
    /// let root = Group::builder()
    ///     .group(
    ///         "window",
    ///         Group::builder()
    ///             .option("width", ConfigOption::number(800.0, "Window width"))
    ///             .build()?,
    ///     )
    ///     .build()?;
    /// let mut resolver = Resolver::new(Schema::new(root))?;
    ///
    /// let defaults = OverrideTree::from_dotted_pairs([("window.width", "1024")]);
    /// let query = OverrideTree::from_dotted_pairs([("window.width", "1280"), ("debug", "1")]);
    ///
    /// let mut diagnostics: Vec<Diagnostic> = Vec::new();
    /// let unrecognized = resolver.resolve(&[defaults, query], &mut diagnostics);
    ///
    /// assert_eq!(resolver.value("window.width"), Some(&Value::Number(1280.0)));
    /// assert_eq!(unrecognized.len(), 1);
    /// # Ok::<(), loader_config::Error>(())
    /// ```
    pub fn resolve(
        &mut self,
        sources: &[OverrideTree],
        sink: &mut dyn DiagnosticSink,
    ) -> BTreeSet<QualifiedName> {
        tracing::debug!(sources = sources.len(), "Resolving configuration");
        self.schema.root.reset_all();

        let merged = OverrideTree::fold(sources);
        let mut ctx = ResolveContext::new(sink);
        self.schema
            .root
            .apply_overrides(&QualifiedName::root(), &merged, &mut ctx);
        let unrecognized = ctx.into_unrecognized();

        self.finalize();

        tracing::debug!(
            unrecognized = unrecognized.len(),
            "Configuration resolved"
        );
        unrecognized
    }

    /// Run the derivation rules once, in declaration order
    pub fn finalize(&mut self) {
        for rule in &self.schema.rules {
            let outcome = rule.apply(&mut self.schema.root);
            tracing::trace!(rule = %rule.name, ?outcome, "Applied derivation rule");
            if outcome == RuleOutcome::Invalid {
                tracing::warn!(rule = %rule.name, "Derivation rule no longer matches the schema");
            }
        }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn root(&self) -> &Group {
        &self.schema.root
    }

    /// Option at a dotted path
    pub fn option(&self, path: &str) -> Option<&ConfigOption> {
        self.schema.root.option(path)
    }

    /// Current value of the option at a dotted path
    pub fn value(&self, path: &str) -> Option<&Value> {
        self.option(path).map(ConfigOption::value)
    }

    /// Every option, depth-first in name order
    pub fn options(&self) -> Vec<&ConfigOption> {
        self.schema.root.options()
    }
}
