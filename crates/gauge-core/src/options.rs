//! Host-neutral operation requests
//!
//! Every front end (the command line, the dependency-manager hook, the
//! packaging commands) reduces its input to an [`Operation`] plus an
//! [`OptionMap`] of configuration overrides, and reduces the [`Outcome`] back
//! to whatever its host expects.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

use crate::config::{ConfigLayer, parse_bool, parse_int};
use crate::error::{Error, Result};

/// Option keys accepted in an [`OptionMap`]
pub mod keys {
    pub const SPECS_DIR: &str = "specs_dir";
    pub const TAGS: &str = "tags";
    pub const IN_PARALLEL: &str = "in_parallel";
    pub const NODES: &str = "nodes";
    pub const ENV: &str = "env";
    pub const ADDITIONAL_FLAGS: &str = "additional_flags";
    pub const PROJECT_DIR: &str = "project_dir";
    pub const GAUGE_ROOT: &str = "gauge_root";
    pub const ENVIRONMENT_VARIABLES: &str = "environment_variables";

    pub const ALL: &[&str] = &[
        SPECS_DIR,
        TAGS,
        IN_PARALLEL,
        NODES,
        ENV,
        ADDITIONAL_FLAGS,
        PROJECT_DIR,
        GAUGE_ROOT,
        ENVIRONMENT_VARIABLES,
    ];
}

/// A single raw option value as a host hands it over.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum OptionValue {
    Bool(bool),
    Int(i64),
    Text(String),
    Map(BTreeMap<String, String>),
}

impl OptionValue {
    fn kind(&self) -> &'static str {
        match self {
            OptionValue::Bool(_) => "a boolean",
            OptionValue::Int(_) => "an integer",
            OptionValue::Text(_) => "a string",
            OptionValue::Map(_) => "a table",
        }
    }

    fn into_text(self, key: &str) -> Result<String> {
        match self {
            OptionValue::Text(text) => Ok(text),
            other => Err(wrong_shape(key, "a string", &other)),
        }
    }

    fn into_bool(self, key: &str) -> Result<bool> {
        match self {
            OptionValue::Bool(flag) => Ok(flag),
            OptionValue::Text(text) => parse_bool(key, &text),
            other => Err(wrong_shape(key, "a boolean", &other)),
        }
    }

    fn into_int(self, key: &str) -> Result<i64> {
        match self {
            OptionValue::Int(n) => Ok(n),
            OptionValue::Text(text) => parse_int(key, &text),
            other => Err(wrong_shape(key, "an integer", &other)),
        }
    }

    fn into_map(self, key: &str) -> Result<BTreeMap<String, String>> {
        match self {
            OptionValue::Map(map) => Ok(map),
            other => Err(wrong_shape(key, "a table", &other)),
        }
    }
}

fn wrong_shape(key: &str, expected: &str, got: &OptionValue) -> Error {
    Error::invalid(key, format!("expected {expected}, got {}", got.kind()))
}

impl From<bool> for OptionValue {
    fn from(value: bool) -> Self {
        OptionValue::Bool(value)
    }
}

impl From<i64> for OptionValue {
    fn from(value: i64) -> Self {
        OptionValue::Int(value)
    }
}

impl From<&str> for OptionValue {
    fn from(value: &str) -> Self {
        OptionValue::Text(value.to_string())
    }
}

impl From<String> for OptionValue {
    fn from(value: String) -> Self {
        OptionValue::Text(value)
    }
}

impl From<BTreeMap<String, String>> for OptionValue {
    fn from(value: BTreeMap<String, String>) -> Self {
        OptionValue::Map(value)
    }
}

/// Raw configuration overrides keyed by snake_case field name.
pub type OptionMap = BTreeMap<String, OptionValue>;

impl ConfigLayer {
    /// Convert raw options into an overrides layer.
    ///
    /// Strings are accepted for boolean and integer fields and parsed the same
    /// way environment variables are. Unknown keys are rejected.
    pub fn from_options(options: &OptionMap) -> Result<Self> {
        let mut layer = ConfigLayer::default();

        for (key, value) in options.clone() {
            match key.as_str() {
                keys::SPECS_DIR => layer.specs_dir = Some(value.into_text(&key)?),
                keys::TAGS => layer.tags = Some(value.into_text(&key)?),
                keys::IN_PARALLEL => layer.in_parallel = Some(value.into_bool(&key)?),
                keys::NODES => layer.nodes = Some(value.into_int(&key)?),
                keys::ENV => layer.env = Some(value.into_text(&key)?),
                keys::ADDITIONAL_FLAGS => layer.additional_flags = Some(value.into_text(&key)?),
                keys::PROJECT_DIR => {
                    layer.project_dir = Some(PathBuf::from(value.into_text(&key)?));
                }
                keys::GAUGE_ROOT => layer.gauge_root = Some(PathBuf::from(value.into_text(&key)?)),
                keys::ENVIRONMENT_VARIABLES => {
                    layer.environment_variables = Some(value.into_map(&key)?);
                }
                unknown => {
                    return Err(Error::invalid(
                        unknown,
                        format!("unknown option, expected one of: {}", keys::ALL.join(", ")),
                    ));
                }
            }
        }

        Ok(layer)
    }
}

/// A Gauge operation requested by a front end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// Execute specs; explicit paths replace the specs directory
    Run { specs: Vec<String> },
    Validate,
    Format,
    Install {
        plugin: String,
        version: Option<String>,
    },
}

impl Operation {
    /// Runner subcommand name.
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Run { .. } => "run",
            Operation::Validate => "validate",
            Operation::Format => "format",
            Operation::Install { .. } => "install",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Install {
                plugin,
                version: Some(version),
            } => write!(f, "install {plugin} {version}"),
            Operation::Install { plugin, .. } => write!(f, "install {plugin}"),
            other => f.write_str(other.name()),
        }
    }
}

/// Result of an operation, in the shape front ends report it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Outcome {
    pub success: bool,
    /// Status reported by the host; `Some(0)` or `Some(1)` after dispatch
    pub exit_code: Option<i32>,
    /// One-line explanation when the operation failed
    pub diagnostic: Option<String>,
}

impl Outcome {
    pub fn succeeded() -> Self {
        Self {
            success: true,
            exit_code: Some(0),
            diagnostic: None,
        }
    }

    pub fn failed(diagnostic: impl Into<String>) -> Self {
        Self {
            success: false,
            exit_code: Some(1),
            diagnostic: Some(diagnostic.into()),
        }
    }

    /// Process exit status: 0 on success, 1 otherwise.
    pub fn exit_code(&self) -> i32 {
        if self.success { 0 } else { 1 }
    }
}
