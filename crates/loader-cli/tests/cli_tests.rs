//! Integration tests that exercise the compiled `loader-config` binary

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Get a Command for the loader-config binary
fn loader_cmd() -> Command {
    let mut cmd = Command::cargo_bin("loader-config").expect("Failed to find loader-config binary");
    cmd.env_remove("LOADER_CONFIG_STRICT").env_remove("RUST_LOG");
    cmd
}

fn resolve_json(args: &[&str]) -> serde_json::Value {
    let output = loader_cmd()
        .arg("resolve")
        .args(args)
        .arg("--json")
        .output()
        .expect("failed to run loader-config");
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    serde_json::from_slice(&output.stdout).expect("resolve --json should print JSON")
}

// ============================================================================
// No command
// ============================================================================

#[test]
fn test_no_command_shows_hint() {
    loader_cmd()
        .assert()
        .success()
        .stdout(predicate::str::contains("--help"));
}

// ============================================================================
// resolve
// ============================================================================

#[test]
fn test_resolve_defaults() {
    let report = resolve_json(&[]);
    assert_eq!(report["options"]["startup"]["entry"]["value"], "ide");
    assert_eq!(report["options"]["loader"]["enabled"]["value"], true);
    assert_eq!(report["unrecognized"], serde_json::json!([]));
}

#[test]
fn test_resolve_derives_loader_from_entry() {
    let report = resolve_json(&["--set", "startup.entry=custom"]);
    let enabled = &report["options"]["loader"]["enabled"];
    assert_eq!(enabled["value"], false);
    assert_eq!(enabled["set_by_user"], false);
    assert_eq!(report["options"]["loader"]["spinner"]["value"], false);
}

#[test]
fn test_resolve_keeps_explicit_user_value() {
    let report = resolve_json(&["--set", "startup.entry=custom", "--set", "loader.enabled=yes"]);
    let enabled = &report["options"]["loader"]["enabled"];
    assert_eq!(enabled["value"], true);
    assert_eq!(enabled["set_by_user"], true);
}

#[test]
fn test_resolve_set_flags_override_source_files() {
    let temp = TempDir::new().unwrap();
    let host = temp.path().join("host.json");
    fs::write(
        &host,
        r#"{ "startup": { "project": "from-host", "entry": "docs" } }"#,
    )
    .unwrap();

    let host_path = host.to_str().unwrap();
    let report = resolve_json(&["--source", host_path, "--set", "startup.entry=ide"]);
    assert_eq!(report["options"]["startup"]["project"]["value"], "from-host");
    assert_eq!(report["options"]["startup"]["entry"]["value"], "ide");
    assert_eq!(report["options"]["loader"]["enabled"]["value"], true);
}

#[test]
fn test_resolve_reports_unrecognized_parameter() {
    let report = resolve_json(&["--set", "startup.flavour=vanilla"]);
    assert_eq!(report["unrecognized"], serde_json::json!(["startup.flavour"]));
    assert_eq!(report["diagnostics"][0]["kind"], "unrecognized_parameter");
}

#[test]
fn test_resolve_human_output_lists_diagnostics() {
    loader_cmd()
        .args(["resolve", "--set", "loader.download_to_init_ratio=lots"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Resolved Configuration"))
        .stdout(predicate::str::contains("loader.download_to_init_ratio"))
        .stdout(predicate::str::contains("Diagnostics"))
        .stdout(predicate::str::contains("lots"));
}

#[test]
fn test_resolve_prints_each_diagnostic_once() {
    loader_cmd()
        .args(["resolve", "--set", "startup.flavour=vanilla"])
        .assert()
        .success()
        .stdout(predicate::str::contains("startup.flavour"))
        .stderr(predicate::str::contains("startup.flavour").not());
}

#[test]
fn test_resolve_verbose_also_logs_diagnostics() {
    loader_cmd()
        .args(["--verbose", "resolve", "--set", "startup.flavour=vanilla"])
        .assert()
        .success()
        .stderr(predicate::str::contains("startup.flavour"));
}

#[test]
fn test_resolve_strict_fails_on_bad_input() {
    loader_cmd()
        .args(["resolve", "--strict", "--set", "loader.enabled=maybe"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}

#[test]
fn test_resolve_rejects_malformed_assignment() {
    loader_cmd()
        .args(["resolve", "--set", "no-equals-sign"])
        .assert()
        .failure();
}

#[test]
fn test_resolve_rejects_invalid_source_file() {
    let temp = TempDir::new().unwrap();
    let bad = temp.path().join("bad.json");
    fs::write(&bad, r#"{ "startup": ["not", "allowed"] }"#).unwrap();

    loader_cmd()
        .args(["resolve", "--source", bad.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("startup"));
}

// ============================================================================
// options
// ============================================================================

#[test]
fn test_options_hides_hidden_by_default() {
    loader_cmd()
        .arg("options")
        .assert()
        .success()
        .stdout(predicate::str::contains("Loader Options"))
        .stdout(predicate::str::contains("entry"))
        .stdout(predicate::str::contains("test_mode").not());
}

#[test]
fn test_options_all_includes_hidden() {
    loader_cmd()
        .args(["options", "--all"])
        .assert()
        .success()
        .stdout(predicate::str::contains("test_mode"))
        .stdout(predicate::str::contains("false if startup.entry is not 'ide'"));
}

#[test]
fn test_options_json_is_nested_tree() {
    let output = loader_cmd().args(["options", "--json"]).output().unwrap();
    assert!(output.status.success());
    let tree: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(tree["loader"]["enabled"]["type"], "boolean");
    assert_eq!(tree["loader"]["enabled"]["path"], "loader.enabled");
}
