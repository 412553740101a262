//! The resolved, validated Gauge configuration

use serde::Serialize;
use std::collections::BTreeMap;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use super::layer::ConfigLayer;
use crate::constants::{ProjectPath, vars};
use crate::error::{Error, Result};

/// Runner flag enabling parallel execution
pub const PARALLEL_FLAG: &str = "--parallel";
/// Runner flag carrying the number of parallel streams
pub const NODES_FLAG: &str = "--n";
/// Runner flag selecting the Gauge environment
pub const ENV_FLAG: &str = "--env";
/// Runner flag carrying the tag filter expression
pub const TAGS_FLAG: &str = "--tags";

/// Effective configuration for one Gauge operation.
///
/// A `GaugeConfig` never changes after it is built. Applying overrides with
/// [`GaugeConfig::with_overrides`] yields a new value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GaugeConfig {
    specs_dir: String,
    tags: Option<String>,
    in_parallel: bool,
    nodes: u32,
    env: Option<String>,
    additional_flags: Option<String>,
    project_dir: PathBuf,
    gauge_root: Option<PathBuf>,
    environment_variables: BTreeMap<String, String>,
}

impl GaugeConfig {
    /// Default configuration for a project rooted at `project_dir`.
    pub fn new(project_dir: impl Into<PathBuf>) -> Self {
        Self {
            specs_dir: ProjectPath::SpecsDir.as_str().to_string(),
            tags: None,
            in_parallel: false,
            nodes: 1,
            env: None,
            additional_flags: None,
            project_dir: project_dir.into(),
            gauge_root: None,
            environment_variables: BTreeMap::new(),
        }
    }

    /// Fill unset fields of `layer` with defaults and validate the result.
    ///
    /// `default_root` is used when the layer does not name a project directory.
    pub fn resolve(layer: ConfigLayer, default_root: &Path) -> Result<Self> {
        let defaults = Self::new(default_root);

        let nodes = match layer.nodes {
            None => defaults.nodes,
            Some(n) if n < 1 => {
                return Err(Error::invalid("nodes", format!("must be at least 1, got {n}")));
            }
            Some(n) => u32::try_from(n)
                .map_err(|_| Error::invalid("nodes", format!("{n} is too large")))?,
        };

        let specs_dir = layer.specs_dir.unwrap_or(defaults.specs_dir);

        let in_parallel = layer.in_parallel.unwrap_or(defaults.in_parallel);
        if nodes > 1 && !in_parallel {
            tracing::warn!(
                nodes,
                "nodes is set but parallel execution is disabled; the node count is ignored"
            );
        }

        Ok(Self {
            specs_dir,
            tags: non_empty(layer.tags),
            in_parallel,
            nodes,
            env: non_empty(layer.env),
            additional_flags: non_empty(layer.additional_flags),
            project_dir: layer.project_dir.unwrap_or(defaults.project_dir),
            gauge_root: layer.gauge_root,
            environment_variables: layer.environment_variables.unwrap_or_default(),
        })
    }

    /// Express this configuration as a fully populated layer.
    pub fn to_layer(&self) -> ConfigLayer {
        ConfigLayer {
            specs_dir: Some(self.specs_dir.clone()),
            tags: self.tags.clone(),
            in_parallel: Some(self.in_parallel),
            nodes: Some(i64::from(self.nodes)),
            env: self.env.clone(),
            additional_flags: self.additional_flags.clone(),
            project_dir: Some(self.project_dir.clone()),
            gauge_root: self.gauge_root.clone(),
            environment_variables: Some(self.environment_variables.clone()),
        }
    }

    /// Derive a new configuration with `overrides` applied on top of this one.
    pub fn with_overrides(&self, overrides: &ConfigLayer) -> Result<Self> {
        let merged = self.to_layer().overlay(overrides.clone());
        Self::resolve(merged, &self.project_dir)
    }

    pub fn specs_dir(&self) -> &str {
        &self.specs_dir
    }

    pub fn tags(&self) -> Option<&str> {
        self.tags.as_deref()
    }

    pub fn in_parallel(&self) -> bool {
        self.in_parallel
    }

    pub fn nodes(&self) -> u32 {
        self.nodes
    }

    pub fn env(&self) -> Option<&str> {
        self.env.as_deref()
    }

    pub fn additional_flags(&self) -> Option<&str> {
        self.additional_flags.as_deref()
    }

    pub fn project_dir(&self) -> &Path {
        &self.project_dir
    }

    pub fn gauge_root(&self) -> Option<&Path> {
        self.gauge_root.as_deref()
    }

    pub fn environment_variables(&self) -> &BTreeMap<String, String> {
        &self.environment_variables
    }

    /// The specs directory resolved against the project root, unless it is
    /// configured empty.
    pub fn specs_path(&self) -> Option<PathBuf> {
        (!self.specs_dir.is_empty()).then(|| self.project_dir.join(&self.specs_dir))
    }

    /// Runner arguments with the specs directory as the trailing positional.
    pub fn to_command_args(&self) -> Vec<String> {
        self.command_args(None)
    }

    /// Runner arguments in a fixed order: parallel and node count, environment,
    /// tags, additional flag tokens, then the spec location.
    ///
    /// Non-empty `specs` replaces the specs directory positional. An empty
    /// specs directory adds no positional at all.
    pub fn command_args(&self, specs: Option<&[String]>) -> Vec<String> {
        let mut args = Vec::new();

        if self.in_parallel {
            args.push(PARALLEL_FLAG.to_string());
            args.push(NODES_FLAG.to_string());
            args.push(self.nodes.to_string());
        }

        if let Some(env) = &self.env {
            args.push(ENV_FLAG.to_string());
            args.push(env.clone());
        }

        if let Some(tags) = &self.tags {
            args.push(TAGS_FLAG.to_string());
            args.push(tags.clone());
        }

        if let Some(flags) = &self.additional_flags {
            args.extend(flags.split_whitespace().map(String::from));
        }

        match specs {
            Some(paths) if !paths.is_empty() => args.extend(paths.iter().cloned()),
            _ if self.specs_dir.is_empty() => {}
            _ => args.push(self.specs_dir.clone()),
        }

        args
    }

    /// Variables this configuration adds to the runner environment.
    ///
    /// `GAUGE_ROOT` is exported when a runner root is configured; explicit
    /// `environment_variables` are applied afterwards and win.
    pub fn env_overrides(&self) -> BTreeMap<String, String> {
        let mut env = BTreeMap::new();
        if let Some(root) = &self.gauge_root {
            env.insert(
                vars::GAUGE_ROOT.to_string(),
                root.to_string_lossy().into_owned(),
            );
        }
        env.extend(
            self.environment_variables
                .iter()
                .map(|(k, v)| (k.clone(), v.clone())),
        );
        env
    }

    /// The inherited process environment merged with [`Self::env_overrides`].
    pub fn get_environment(&self) -> BTreeMap<OsString, OsString> {
        self.environment_from(std::env::vars_os())
    }

    /// Like [`Self::get_environment`] with an explicit inherited environment.
    pub fn environment_from<I>(&self, inherited: I) -> BTreeMap<OsString, OsString>
    where
        I: IntoIterator<Item = (OsString, OsString)>,
    {
        let mut env: BTreeMap<OsString, OsString> = inherited.into_iter().collect();
        for (key, value) in self.env_overrides() {
            env.insert(key.into(), value.into());
        }
        env
    }
}

/// Empty strings count as unset.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
