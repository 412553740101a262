//! Gauge test-runner integration for build tools
//!
//! This crate resolves Gauge configuration from layered sources and drives the
//! external `gauge` runner:
//!
//! - **Configuration resolution**: overrides, `GAUGE_*` environment variables,
//!   the project file and defaults, merged field by field into a [`GaugeConfig`]
//! - **Task execution**: [`GaugeTask`] runs, validates, formats specs and
//!   installs runner plugins, reporting `true`/`false` per operation
//! - **Orchestration**: [`GaugePlugin`] binds a project root and derives one
//!   task per operation for the front ends
//!
//! # Architecture
//!
//! ```text
//!    gauge-py CLI     plugin hook     packaging commands
//!          \               |               /
//!           +------ Operation + OptionMap -+
//!                          |
//!                     GaugePlugin
//!                          |
//!          ConfigResolver -> GaugeConfig -> GaugeTask
//!                                              |
//!                                        ProcessRunner
//! ```
//!
//! # Example
//!
//! ```ignore
//! use gauge_core::{ConfigLayer, GaugePlugin};
//!
//! let plugin = GaugePlugin::discover(".")?;
//! let passed = plugin.run_specs(&ConfigLayer::default(), &[])?;
//! ```

pub mod config;
pub mod constants;
pub mod error;
pub mod options;
pub mod plugin;
pub mod process;
pub mod task;

pub use config::{ConfigLayer, ConfigResolver, GaugeConfig, ProjectFile};
pub use error::{Error, Result};
pub use options::{Operation, OptionMap, OptionValue, Outcome};
pub use plugin::{GaugePlugin, find_project_root};
pub use process::{ExitOutcome, Invocation, ProcessRunner, SystemRunner};
pub use task::GaugeTask;
