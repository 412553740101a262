//! Gauge Python Build Plugin CLI
//!
//! Runs Gauge specs with configuration drawn from the command line,
//! `GAUGE_*` environment variables and the project's `[tool.gauge]` table.

mod cli;
mod commands;
mod error;
mod frontends;

use std::path::Path;

use clap::Parser;
use colored::Colorize;
use gauge_core::OptionValue;
use gauge_core::options::keys;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use cli::{Cli, Commands, ConfigArgs};
use error::Result;

fn main() {
    match run() {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            std::process::exit(1);
        }
    }
}

fn run() -> Result<i32> {
    let cli = Cli::parse();

    // Setup tracing if verbose
    if cli.verbose {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(Level::DEBUG)
            .with_target(true)
            .finish();
        tracing::subscriber::set_global_default(subscriber)
            .expect("Failed to set tracing subscriber");
        tracing::debug!("Verbose mode enabled");
    }

    let cwd = std::env::current_dir()?;
    match cli.command {
        Some(cmd) => execute_command(&cwd, cli.config.as_deref(), &cli.options, cmd),
        None => {
            println!(
                "{} Gauge Python Build Plugin",
                "gauge-py".green().bold()
            );
            println!();
            println!("Run {} for available commands.", "gauge-py --help".cyan());
            Ok(0)
        }
    }
}

fn execute_command(
    cwd: &Path,
    config_file: Option<&Path>,
    options: &ConfigArgs,
    cmd: Commands,
) -> Result<i32> {
    let mut options = options.clone();
    options.project_dir = options.project_dir.map(|dir| cwd.join(dir));
    options.gauge_root = options.gauge_root.map(|dir| cwd.join(dir));
    let start = commands::start_dir(cwd, options.project_dir.as_deref());

    match cmd {
        Commands::Config { init: true, .. } => {
            commands::run_config_init(&start)?;
            Ok(0)
        }
        Commands::Config { show: true, json, .. } => {
            let resolver = commands::load_resolver(&start, config_file)?;
            commands::run_config_show(&resolver, &options.to_options(), json)?;
            Ok(0)
        }
        Commands::Config { .. } => {
            println!(
                "Use {} to display the current configuration or {} to create one.",
                "--show".cyan(),
                "--init".cyan()
            );
            Ok(0)
        }
        Commands::Hook { args } => {
            let inner = frontends::parse_forwarded(&args)?;
            let merged = options.merged_with(&inner.options);
            let config_file = inner.config.as_deref().or(config_file);
            match inner.command {
                Some(inner_cmd) => execute_command(cwd, config_file, &merged, inner_cmd),
                None => Ok(0),
            }
        }
        Commands::Setup { args } => {
            if args.first().map(String::as_str) == Some("--help-commands") {
                print!("{}", frontends::describe_commands());
                return Ok(0);
            }
            let (operation, mut setup_options) = frontends::parse_setup_args(&args)?;
            let mut start = start;
            if let Some(OptionValue::Text(dir)) = setup_options.get_mut(keys::PROJECT_DIR) {
                start = commands::start_dir(cwd, Some(Path::new(dir.as_str())));
                *dir = start.to_string_lossy().into_owned();
            }
            if let Some(OptionValue::Text(root)) = setup_options.get_mut(keys::GAUGE_ROOT) {
                *root = cwd.join(root.as_str()).to_string_lossy().into_owned();
            }

            let mut all = options.to_options();
            all.extend(setup_options);
            let plugin = commands::load_plugin(&start, config_file)?;
            commands::run_operation(&plugin, &operation, &all)
        }
        other => match other.operation() {
            Some(operation) => {
                let plugin = commands::load_plugin(&start, config_file)?;
                commands::run_operation(&plugin, &operation, &options.to_options())
            }
            None => Ok(0),
        },
    }
}
