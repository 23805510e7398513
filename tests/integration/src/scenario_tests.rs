//! End-to-end resolution scenarios
//!
//! These tests build a small loader schema the way an application would,
//! feed it override sources shaped like the ones a host produces (URL
//! parameters, embedding configuration, build-time defaults) and check the
//! resolved option tree.

use loader_config::{
    Action, Condition, ConfigOption, DerivationRule, Diagnostic, Group, OverrideTree, Resolver,
    Schema, Value,
};
use pretty_assertions::assert_eq;
use serde_json::json;

// =============================================================================
// Test Infrastructure
// =============================================================================

fn loader_schema() -> Schema {
    let startup = Group::builder()
        .option("entry", ConfigOption::string("ide", "Entry point to start"))
        .build()
        .unwrap();
    let loader = Group::builder()
        .option(
            "enabled",
            ConfigOption::boolean(true, "Show the loading indicator"),
        )
        .build()
        .unwrap();
    let root = Group::builder()
        .group("startup", startup)
        .group("loader", loader)
        .build()
        .unwrap();

    Schema::new(root).with_rule(DerivationRule::new(
        "loader-follows-entry",
        Condition::NotEquals {
            option: "startup.entry".into(),
            value: Value::from("ide"),
        },
        Action::Set {
            option: "loader.enabled".into(),
            value: Value::Boolean(false),
        },
    ))
}

fn source(doc: serde_json::Value) -> OverrideTree {
    OverrideTree::try_from(doc).unwrap()
}

struct Outcome {
    resolver: Resolver,
    diagnostics: Vec<Diagnostic>,
    unrecognized: Vec<String>,
}

fn resolve(sources: Vec<OverrideTree>) -> Outcome {
    let mut resolver = Resolver::new(loader_schema()).unwrap();
    let mut diagnostics: Vec<Diagnostic> = Vec::new();
    let unrecognized = resolver
        .resolve(&sources, &mut diagnostics)
        .iter()
        .map(ToString::to_string)
        .collect();
    Outcome {
        resolver,
        diagnostics,
        unrecognized,
    }
}

// =============================================================================
// Entry point drives the loading indicator
// =============================================================================

#[test]
fn custom_entry_disables_loader() {
    let outcome = resolve(vec![source(json!({ "startup": { "entry": "custom" } }))]);

    assert_eq!(outcome.resolver.value("loader.enabled"), Some(&Value::Boolean(false)));
    assert!(!outcome.resolver.option("loader.enabled").unwrap().set_by_user());
    assert!(outcome.diagnostics.is_empty());
}

#[test]
fn explicit_loader_value_is_preserved() {
    let outcome = resolve(vec![source(json!({
        "startup": { "entry": "custom" },
        "loader": { "enabled": "true" }
    }))]);

    assert_eq!(outcome.resolver.value("loader.enabled"), Some(&Value::Boolean(true)));
    assert!(outcome.resolver.option("loader.enabled").unwrap().set_by_user());
}

#[test]
fn no_sources_yields_defaults() {
    let outcome = resolve(vec![]);

    assert_eq!(outcome.resolver.value("startup.entry"), Some(&Value::from("ide")));
    assert_eq!(outcome.resolver.value("loader.enabled"), Some(&Value::Boolean(true)));
    assert!(outcome.unrecognized.is_empty());
    assert!(outcome.diagnostics.is_empty());
}

// =============================================================================
// Layered hosts
// =============================================================================

#[test]
fn url_parameters_override_build_defaults() {
    let build_defaults = source(json!({ "startup": { "entry": "docs" } }));
    let host = source(json!({ "loader": { "enabled": false } }));
    let url = OverrideTree::from_dotted_pairs([("startup.entry", "ide")]);

    let outcome = resolve(vec![build_defaults, host, url]);

    assert_eq!(outcome.resolver.value("startup.entry"), Some(&Value::from("ide")));
    // The host set the indicator explicitly, so the derivation does not touch it.
    assert_eq!(outcome.resolver.value("loader.enabled"), Some(&Value::Boolean(false)));
}

#[test]
fn bad_and_unknown_parameters_degrade_gracefully() {
    let url = OverrideTree::from_dotted_pairs([
        ("startup.entry", "custom"),
        ("loader.enabled", "sometimes"),
        ("loader.colour", "blue"),
        ("telemetry", "off"),
    ]);

    let outcome = resolve(vec![url]);

    assert_eq!(outcome.unrecognized, vec!["loader.colour", "telemetry"]);
    assert_eq!(outcome.resolver.value("startup.entry"), Some(&Value::from("custom")));
    assert_eq!(outcome.resolver.value("loader.enabled"), Some(&Value::Boolean(false)));

    let coercion_failures: Vec<&Diagnostic> = outcome
        .diagnostics
        .iter()
        .filter(|d| matches!(d, Diagnostic::CoercionFailure { .. }))
        .collect();
    assert_eq!(coercion_failures.len(), 1);
    assert_eq!(coercion_failures[0].path().to_string(), "loader.enabled");
}

#[test]
fn reload_reflects_only_new_sources() {
    let mut resolver = Resolver::new(loader_schema()).unwrap();
    let mut diagnostics: Vec<Diagnostic> = Vec::new();

    resolver.resolve(
        &[source(json!({ "startup": { "entry": "custom" } }))],
        &mut diagnostics,
    );
    assert_eq!(resolver.value("loader.enabled"), Some(&Value::Boolean(false)));

    resolver.resolve(
        &[source(json!({ "loader": { "enabled": "no" } }))],
        &mut diagnostics,
    );
    assert_eq!(resolver.value("startup.entry"), Some(&Value::from("ide")));
    assert_eq!(resolver.value("loader.enabled"), Some(&Value::Boolean(false)));
    assert!(resolver.option("loader.enabled").unwrap().set_by_user());
}
