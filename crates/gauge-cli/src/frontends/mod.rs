//! Host shims reachable through hidden subcommands
//!
//! Each shim reduces its host's argument shape to an [`gauge_core::Operation`]
//! plus overrides, which are then dispatched like the standalone commands.

pub mod hook;
pub mod packaging;

pub use hook::parse_forwarded;
pub use packaging::{describe_commands, parse_setup_args};
