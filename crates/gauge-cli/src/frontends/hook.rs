//! Dependency-manager plugin hook
//!
//! The host registers `gauge run`, `gauge validate`, `gauge format` and
//! `gauge install`, then forwards its argument vector to
//! `gauge-py hook gauge <subcommand> [flags]`. The forwarded arguments are
//! parsed with the same grammar as the standalone command line.

use clap::Parser;

use crate::cli::{Cli, Commands};
use crate::error::{CliError, Result};

/// Command namespace the host registers
pub const COMMAND_NAME: &str = "gauge";

/// Commands the host exposes
pub const REGISTERED_COMMANDS: &[&str] = &[
    "gauge run",
    "gauge validate",
    "gauge format",
    "gauge install",
];

/// Parse a forwarded host command line.
///
/// Only the registered runner commands are accepted.
pub fn parse_forwarded(args: &[String]) -> Result<Cli> {
    let Some((name, rest)) = args.split_first() else {
        return Err(CliError::user("no command forwarded"));
    };
    if name != COMMAND_NAME {
        return Err(CliError::user(format!(
            "unknown command '{name}', expected one of: {}",
            REGISTERED_COMMANDS.join(", ")
        )));
    }

    let argv = std::iter::once("gauge-py").chain(rest.iter().map(String::as_str));
    let cli = Cli::try_parse_from(argv).map_err(|e| CliError::user(e.render().to_string()))?;

    match &cli.command {
        Some(Commands::Run { .. } | Commands::Validate | Commands::Format | Commands::Install { .. }) => {
            tracing::debug!(?rest, "Forwarded host command");
            Ok(cli)
        }
        _ => Err(CliError::user(format!(
            "'{}' is not a registered command, expected one of: {}",
            std::iter::once(name.as_str())
                .chain(rest.first().map(String::as_str))
                .collect::<Vec<_>>()
                .join(" "),
            REGISTERED_COMMANDS.join(", ")
        ))),
    }
}
