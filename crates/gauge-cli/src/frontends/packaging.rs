//! Packaging-tool command hook
//!
//! Packaging frameworks run named commands (`gauge`, `gauge_validate`,
//! `gauge_format`) with `--option[=value]` arguments. Each command declares
//! its user options; a clap command built from that table parses the
//! arguments, which are then finalized before the operation is dispatched.

use std::collections::BTreeMap;

use clap::{Arg, ArgAction, Command};
use gauge_core::options::{OptionMap, OptionValue, keys};
use gauge_core::Operation;

use crate::error::{CliError, Result};

/// One declared command option.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserOption {
    /// Long name, as written after `--`
    pub name: &'static str,
    pub short: Option<char>,
    /// Whether the option expects a value
    pub takes_value: bool,
    pub help: &'static str,
}

const fn valued(name: &'static str, short: Option<char>, help: &'static str) -> UserOption {
    UserOption {
        name,
        short,
        takes_value: true,
        help,
    }
}

const PROJECT_OPTIONS: [UserOption; 3] = [
    valued("specs-dir", None, "Gauge specs directory path"),
    valued("project-dir", None, "Path to gauge project directory"),
    valued("gauge-root", None, "Path to gauge installation root"),
];

const RUN_OPTIONS: [UserOption; 9] = [
    valued("specs-dir", None, "Gauge specs directory path"),
    valued("tags", None, "Filter specs by tags expression"),
    UserOption {
        name: "parallel",
        short: Some('p'),
        takes_value: false,
        help: "Execute specs in parallel",
    },
    valued("nodes", Some('n'), "Number of parallel execution streams"),
    valued("env", Some('e'), "Gauge environment to run against"),
    valued("additional-flags", None, "Additional gauge flags"),
    valued("project-dir", None, "Path to gauge project directory"),
    valued("gauge-root", None, "Path to gauge installation root"),
    valued("specs", None, "Specific spec files to run (comma-separated)"),
];

/// Nodes used when parallel execution is requested without a count
const DEFAULT_PARALLEL_NODES: i64 = 2;

/// Commands registered with the packaging tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupCommand {
    Gauge,
    GaugeValidate,
    GaugeFormat,
}

impl SetupCommand {
    pub const ALL: [SetupCommand; 3] = [Self::Gauge, Self::GaugeValidate, Self::GaugeFormat];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Gauge => "gauge",
            Self::GaugeValidate => "gauge_validate",
            Self::GaugeFormat => "gauge_format",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.name() == name)
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Gauge => "Run Gauge specifications",
            Self::GaugeValidate => "Validate Gauge project",
            Self::GaugeFormat => "Format Gauge specification files",
        }
    }

    pub fn user_options(&self) -> &'static [UserOption] {
        match self {
            Self::Gauge => &RUN_OPTIONS,
            Self::GaugeValidate | Self::GaugeFormat => &PROJECT_OPTIONS,
        }
    }

    /// Parser for this command's declared options.
    fn clap_command(&self) -> Command {
        self.user_options().iter().fold(
            Command::new(self.name())
                .about(self.description())
                .disable_help_flag(true),
            |cmd, option| cmd.arg(option.to_arg()),
        )
    }
}

impl UserOption {
    fn to_arg(&self) -> Arg {
        let arg = Arg::new(self.name)
            .long(self.name)
            .short(self.short)
            .help(self.help);
        if self.takes_value {
            arg.action(ArgAction::Set)
                .value_name("VALUE")
                .allow_hyphen_values(true)
        } else {
            arg.action(ArgAction::SetTrue)
        }
    }
}

/// Parse `<command> [--option[=value]]...` into an operation and its options.
pub fn parse_setup_args(args: &[String]) -> Result<(Operation, OptionMap)> {
    let Some(name) = args.first() else {
        return Err(CliError::user("no packaging command given"));
    };
    let command = SetupCommand::from_name(name).ok_or_else(|| {
        let known: Vec<_> = SetupCommand::ALL.iter().map(|c| c.name()).collect();
        CliError::user(format!(
            "invalid command '{name}', expected one of: {}",
            known.join(", ")
        ))
    })?;

    let raw = collect_options(command, args)?;
    finalize(command, raw)
}

/// Values given on the command line, keyed by declared option name.
///
/// Flags map to `None`; options that were not given are absent.
fn collect_options(
    command: SetupCommand,
    args: &[String],
) -> Result<BTreeMap<&'static str, Option<String>>> {
    let matches = command
        .clap_command()
        .try_get_matches_from(args)
        .map_err(|e| CliError::user(e.render().to_string()))?;

    let mut values = BTreeMap::new();
    for option in command.user_options() {
        if option.takes_value {
            if let Some(value) = matches.get_one::<String>(option.name) {
                values.insert(option.name, Some(value.clone()));
            }
        } else if matches.get_flag(option.name) {
            values.insert(option.name, None);
        }
    }
    Ok(values)
}

fn finalize(
    command: SetupCommand,
    mut raw: BTreeMap<&'static str, Option<String>>,
) -> Result<(Operation, OptionMap)> {
    let mut options = OptionMap::new();
    // An empty specs directory is meaningful: the runner then picks its own
    if let Some(Some(dir)) = raw.remove("specs-dir") {
        options.insert(keys::SPECS_DIR.to_string(), OptionValue::Text(dir));
    }
    let mut text = |raw: &mut BTreeMap<&'static str, Option<String>>, name: &str, key: &str| {
        if let Some(Some(value)) = raw.remove(name)
            && !value.is_empty()
        {
            options.insert(key.to_string(), OptionValue::Text(value));
        }
    };

    text(&mut raw, "tags", keys::TAGS);
    text(&mut raw, "env", keys::ENV);
    text(&mut raw, "additional-flags", keys::ADDITIONAL_FLAGS);
    text(&mut raw, "project-dir", keys::PROJECT_DIR);
    text(&mut raw, "gauge-root", keys::GAUGE_ROOT);

    let parallel = raw.remove("parallel").is_some();
    let mut nodes = match raw.remove("nodes").flatten() {
        Some(value) => Some(parse_nodes(&value)?),
        None => None,
    };
    if parallel && nodes.is_none() {
        nodes = Some(DEFAULT_PARALLEL_NODES);
    }
    if parallel {
        options.insert(keys::IN_PARALLEL.to_string(), OptionValue::Bool(true));
    }
    if let Some(nodes) = nodes {
        options.insert(keys::NODES.to_string(), OptionValue::Int(nodes));
    }

    let specs: Vec<String> = raw
        .remove("specs")
        .flatten()
        .map(|list| {
            list.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect()
        })
        .unwrap_or_default();

    let operation = match command {
        SetupCommand::Gauge => Operation::Run { specs },
        SetupCommand::GaugeValidate => Operation::Validate,
        SetupCommand::GaugeFormat => Operation::Format,
    };

    tracing::debug!(command = command.name(), ?options, "Finalized packaging options");
    Ok((operation, options))
}

fn parse_nodes(value: &str) -> Result<i64> {
    let nodes: i64 = value
        .trim()
        .parse()
        .map_err(|_| CliError::user(format!("Invalid nodes value: '{value}' is not an integer")))?;
    if nodes < 1 {
        return Err(CliError::user(
            "Invalid nodes value: nodes must be at least 1",
        ));
    }
    Ok(nodes)
}

/// Help text listing every packaging command and its options.
pub fn describe_commands() -> String {
    SetupCommand::ALL
        .iter()
        .map(|command| command.clap_command().render_help().to_string())
        .collect::<Vec<_>>()
        .join("\n")
}
