//! Configuration display and initialization commands

use std::fs;
use std::path::Path;

use colored::Colorize;
use gauge_core::constants::ProjectPath;
use gauge_core::{ConfigLayer, ConfigResolver, GaugeConfig, OptionMap};
use serde::Serialize;

use crate::error::Result;

/// Build-system table written ahead of the sample when a new file is created
const BUILD_SYSTEM: &str = r#"[build-system]
requires = ["poetry-core"]
build-backend = "poetry.core.masonry.api"
"#;

/// Sample `[tool.gauge]` table
pub const SAMPLE_CONFIG: &str = r#"
[tool.gauge]
specs_dir = "specs"
in_parallel = false
nodes = 1
env = "default"
additional_flags = ""
environment_variables = {}

# Example for different environments
# [tool.gauge.environments.dev]
# env = "dev"
# additional_flags = "--verbose"
#
# [tool.gauge.environments.ci]
# env = "ci"
# in_parallel = true
# nodes = 4
# additional_flags = "--simple-console"
"#;

/// Write a sample configuration to `dir/pyproject.toml`.
///
/// An existing file is never modified; the sample is printed instead.
pub fn run_config_init(dir: &Path) -> Result<()> {
    let path = dir.join(ProjectPath::PyProject);

    if path.exists() {
        println!(
            "{} {} already exists. Please add the gauge configuration manually.",
            "!".yellow().bold(),
            path.display()
        );
        println!("Sample configuration:");
        println!("{SAMPLE_CONFIG}");
        return Ok(());
    }

    fs::write(&path, format!("{BUILD_SYSTEM}{SAMPLE_CONFIG}"))?;
    println!(
        "{} Initialized gauge configuration in {}",
        "✓".green().bold(),
        path.display()
    );
    Ok(())
}

#[derive(Serialize)]
struct ConfigReport<'a> {
    source: Option<&'a Path>,
    environments: Vec<&'a str>,
    config: &'a GaugeConfig,
}

/// Display the resolved configuration, with command-line overrides applied.
pub fn run_config_show(resolver: &ConfigResolver, options: &OptionMap, json: bool) -> Result<()> {
    let overrides = ConfigLayer::from_options(options)?;
    let config = &resolver.resolve(&overrides)?;
    let file = resolver.project_file();

    if json {
        let report = ConfigReport {
            source: file.path(),
            environments: file.environment_names().collect(),
            config,
        };
        println!(
            "{}",
            serde_json::to_string_pretty(&report).unwrap_or_default()
        );
        return Ok(());
    }

    println!("{}", "Gauge Configuration".bold());
    println!();

    match file.path() {
        Some(path) => println!("  {:<24} {}", "Source:".dimmed(), path.display()),
        None => {
            println!("  {:<24} {}", "Source:".dimmed(), "(defaults)".dimmed());
        }
    }
    println!();

    let none = || "(none)".dimmed().to_string();
    println!("  {:<24} {}", "specs_dir:".dimmed(), config.specs_dir());
    println!("  {:<24} {}", "tags:".dimmed(), config.tags().map_or_else(none, String::from));
    println!("  {:<24} {}", "in_parallel:".dimmed(), config.in_parallel());
    println!("  {:<24} {}", "nodes:".dimmed(), config.nodes());
    println!("  {:<24} {}", "env:".dimmed(), config.env().map_or_else(none, String::from));
    println!(
        "  {:<24} {}",
        "additional_flags:".dimmed(),
        config.additional_flags().map_or_else(none, String::from)
    );
    println!("  {:<24} {}", "project_dir:".dimmed(), config.project_dir().display());
    println!(
        "  {:<24} {}",
        "gauge_root:".dimmed(),
        config
            .gauge_root()
            .map_or_else(none, |p| p.display().to_string())
    );

    if config.environment_variables().is_empty() {
        println!("  {:<24} {}", "environment_variables:".dimmed(), none());
    } else {
        println!("  {}:", "environment_variables".dimmed());
        for (key, value) in config.environment_variables() {
            println!("    {} {key}={value}", "+".green());
        }
    }

    let environments: Vec<_> = file.environment_names().collect();
    if !environments.is_empty() {
        println!();
        println!("  {:<24} {}", "Environments:".dimmed(), environments.join(", "));
    }

    if file.path().is_none() {
        println!();
        println!(
            "No Gauge configuration file found. Use {} to create one.",
            "gauge-py config --init".cyan()
        );
    }

    Ok(())
}
