//! Typed configuration resolution for the application loader
//!
//! This crate defines the tunable parameters of the loader and resolves them
//! from several ordered override sources:
//!
//! - **Options**: typed leaves (boolean, number, string) with a default, a
//!   current value and a record of whether the user set them
//! - **Groups**: namespaces of options and nested groups with a structural,
//!   non-mutating merge
//! - **Resolver**: folds override sources (later wins per leaf), coerces raw
//!   text into declared types, collects unrecognized parameters and runs
//!   declarative derivation rules
//! - **Diagnostics**: recoverable problems delivered to an injected sink
//!
//! # Architecture
//!
//! ```text
//!   URL params   host config   build defaults      (produced by the host)
//!        \            |             /
//!         +------ OverrideTree -----+
//!                     |  fold, later wins
//!                  Resolver ---- DerivationRule (finalize)
//!                     |
//!                   Schema
//!                     |
//!            Group -> Node { Leaf(ConfigOption) | Branch(Group) }
//! ```
//!
//! # Example
//!
//! ```
//! use loader_config::{
//!     Action, Condition, ConfigOption, DerivationRule, Diagnostic, Group, OverrideTree, Resolver,
//!     Schema, Value,
//! };
//!
//! let root = Group::builder()
//!     .group(
//!         "startup",
//!         Group::builder()
//!             .option("entry", ConfigOption::string("ide", "Entry point to start"))
//!             .build()?,
//!     )
//!     .group(
//!         "loader",
//!         Group::builder()
//!             .option("enabled", ConfigOption::boolean(true, "Show the loading indicator"))
//!             .build()?,
//!     )
//!     .build()?;
//!
//! let schema = Schema::new(root).with_rule(DerivationRule::new(
//!     "loader-follows-entry",
//!     Condition::NotEquals { option: "startup.entry".into(), value: Value::from("ide") },
//!     Action::Set { option: "loader.enabled".into(), value: Value::Boolean(false) },
//! ));
//!
//! let mut resolver = Resolver::new(schema)?;
//! let query = OverrideTree::from_dotted_pairs([("startup.entry", "custom")]);
//!
//! let mut diagnostics: Vec<Diagnostic> = Vec::new();
//! let unrecognized = resolver.resolve(&[query], &mut diagnostics);
//!
//! assert!(unrecognized.is_empty());
//! assert_eq!(resolver.value("loader.enabled"), Some(&Value::Boolean(false)));
//! # Ok::<(), loader_config::Error>(())
//! ```

pub mod diagnostics;
pub mod error;
pub mod group;
pub mod option;
pub mod overrides;
pub mod path;
pub mod resolver;
pub mod rules;
pub mod schema;

pub use diagnostics::{Diagnostic, DiagnosticSink, NodeKind, Severity, TracingSink};
pub use error::{Error, Result};
pub use group::{Group, GroupBuilder, Node, ResolveContext};
pub use option::{CoercionError, ConfigOption, OptionType, RawScalar, Value};
pub use overrides::{OverrideTree, OverrideValue};
pub use path::QualifiedName;
pub use resolver::Resolver;
pub use rules::{Action, Condition, DerivationRule, RuleOutcome};
pub use schema::Schema;
