//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use gauge_core::options::{OptionMap, OptionValue, keys};
use gauge_core::Operation;

/// Gauge Python Build Plugin - Execute Gauge specs from Python build tools
#[derive(Parser, Debug)]
#[command(name = "gauge-py")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file (pyproject.toml or gauge.toml) to read instead of discovering one
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub options: ConfigArgs,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Flags mirroring the configuration fields; each one overrides every other source.
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigArgs {
    /// Gauge specs directory path
    #[arg(long, global = true, value_name = "DIR")]
    pub specs_dir: Option<String>,

    /// Filter specs by tags expression
    #[arg(long, global = true, value_name = "EXPR", allow_hyphen_values = true)]
    pub tags: Option<String>,

    /// Execute specs in parallel
    #[arg(short = 'p', long, global = true)]
    pub parallel: bool,

    /// Number of parallel execution streams
    #[arg(short = 'n', long, global = true, alias = "n", value_name = "N")]
    pub nodes: Option<i64>,

    /// Gauge environment to run against
    #[arg(short = 'e', long, global = true, value_name = "NAME")]
    pub env: Option<String>,

    /// Additional gauge flags (space-separated)
    #[arg(long, global = true, value_name = "FLAGS", allow_hyphen_values = true)]
    pub additional_flags: Option<String>,

    /// Path to gauge project directory
    #[arg(long, global = true, value_name = "PATH")]
    pub project_dir: Option<PathBuf>,

    /// Path to gauge installation root
    #[arg(long, global = true, value_name = "PATH")]
    pub gauge_root: Option<PathBuf>,
}

impl ConfigArgs {
    /// Flags that were given, as raw options keyed by field name.
    pub fn to_options(&self) -> OptionMap {
        let mut options = OptionMap::new();
        if let Some(dir) = &self.specs_dir {
            options.insert(keys::SPECS_DIR.into(), dir.clone().into());
        }
        if let Some(tags) = &self.tags {
            options.insert(keys::TAGS.into(), tags.clone().into());
        }
        if self.parallel {
            options.insert(keys::IN_PARALLEL.into(), OptionValue::Bool(true));
        }
        if let Some(nodes) = self.nodes {
            options.insert(keys::NODES.into(), OptionValue::Int(nodes));
        }
        if let Some(env) = &self.env {
            options.insert(keys::ENV.into(), env.clone().into());
        }
        if let Some(flags) = &self.additional_flags {
            options.insert(keys::ADDITIONAL_FLAGS.into(), flags.clone().into());
        }
        if let Some(dir) = &self.project_dir {
            options.insert(keys::PROJECT_DIR.into(), path_value(dir));
        }
        if let Some(root) = &self.gauge_root {
            options.insert(keys::GAUGE_ROOT.into(), path_value(root));
        }
        options
    }

    /// Combine with `inner`, whose flags win.
    pub fn merged_with(&self, inner: &ConfigArgs) -> ConfigArgs {
        ConfigArgs {
            specs_dir: inner.specs_dir.clone().or_else(|| self.specs_dir.clone()),
            tags: inner.tags.clone().or_else(|| self.tags.clone()),
            parallel: inner.parallel || self.parallel,
            nodes: inner.nodes.or(self.nodes),
            env: inner.env.clone().or_else(|| self.env.clone()),
            additional_flags: inner
                .additional_flags
                .clone()
                .or_else(|| self.additional_flags.clone()),
            project_dir: inner.project_dir.clone().or_else(|| self.project_dir.clone()),
            gauge_root: inner.gauge_root.clone().or_else(|| self.gauge_root.clone()),
        }
    }
}

fn path_value(path: &std::path::Path) -> OptionValue {
    OptionValue::Text(path.to_string_lossy().into_owned())
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Run Gauge specifications
    ///
    /// Examples:
    ///   gauge-py run                          # Run everything in the specs directory
    ///   gauge-py run specs/login.spec         # Run one spec file
    ///   gauge-py --parallel --nodes 4 run     # Run in four parallel streams
    Run {
        /// Spec files or directories to run instead of the specs directory
        specs: Vec<String>,
    },

    /// Validate the Gauge project
    Validate,

    /// Format Gauge specification files
    Format,

    /// Install a Gauge plugin
    Install {
        /// Name of the plugin
        plugin: String,

        /// Plugin version to install
        #[arg(long = "version", value_name = "VERSION")]
        plugin_version: Option<String>,
    },

    /// Manage Gauge configuration
    Config {
        /// Initialize a gauge configuration in pyproject.toml
        #[arg(long, conflicts_with = "show")]
        init: bool,

        /// Show the current configuration
        #[arg(long)]
        show: bool,

        /// Output as JSON for scripting
        #[arg(long, requires = "show")]
        json: bool,
    },

    /// Entry point for dependency-manager plugin hosts
    #[command(hide = true)]
    Hook {
        /// Forwarded command line, starting with the registered command name
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },

    /// Entry point for packaging-tool commands
    #[command(hide = true)]
    Setup {
        /// Packaging command name followed by its options
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
}

impl Commands {
    /// The runner operation this command performs, if any.
    pub fn operation(&self) -> Option<Operation> {
        match self {
            Commands::Run { specs } => Some(Operation::Run {
                specs: specs.clone(),
            }),
            Commands::Validate => Some(Operation::Validate),
            Commands::Format => Some(Operation::Format),
            Commands::Install {
                plugin,
                plugin_version,
            } => Some(Operation::Install {
                plugin: plugin.clone(),
                version: plugin_version.clone(),
            }),
            Commands::Config { .. } | Commands::Hook { .. } | Commands::Setup { .. } => None,
        }
    }
}
