//! The loader's configurable surface

use loader_config::{
    Action, Condition, ConfigOption, DerivationRule, Group, Result, Schema, Value,
};

/// Build the loader schema with its derivation rules
pub fn loader_schema() -> Result<Schema> {
    let startup = Group::builder()
        .option(
            "entry",
            ConfigOption::string("ide", "The application entry point to start."),
        )
        .option(
            "project",
            ConfigOption::string("", "Project to open after startup."),
        )
        .option(
            "platform",
            ConfigOption::string("web", "Platform the application runs on.").hidden(),
        )
        .build()?;

    let loader = Group::builder()
        .option(
            "enabled",
            ConfigOption::boolean(true, "Show the loading indicator while the application starts.")
                .with_default_description("false if startup.entry is not 'ide'"),
        )
        .option(
            "spinner",
            ConfigOption::boolean(true, "Show a spinner next to the progress bar."),
        )
        .option(
            "download_to_init_ratio",
            ConfigOption::number(1.0, "Share of the progress bar spent downloading.")
                .secondary(),
        )
        .option(
            "wasm_url",
            ConfigOption::string("pkg-opt.wasm", "URL of the application binary.").secondary(),
        )
        .build()?;

    let debug = Group::builder()
        .option(
            "enabled",
            ConfigOption::boolean(false, "Enable debug tooling and verbose logs."),
        )
        .option(
            "test_mode",
            ConfigOption::boolean(false, "Disable animations for automated tests.").hidden(),
        )
        .build()?;

    let root = Group::builder()
        .group("startup", startup)
        .group("loader", loader)
        .group("debug", debug)
        .build()?;

    Ok(Schema::new(root)
        .with_rule(DerivationRule::new(
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
        .with_rule(DerivationRule::new(
            "spinner-follows-loader",
            Condition::Always,
            Action::CopyFrom {
                option: "loader.spinner".into(),
                source: "loader.enabled".into(),
            },
        )))
}
