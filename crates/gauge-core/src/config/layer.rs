//! A single configuration source
//!
//! Every source (per-call overrides, environment variables, the project file)
//! produces a `ConfigLayer`. Layers are merged field by field: a field set in a
//! higher layer replaces the same field below it as a whole.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::constants::vars;
use crate::error::{Error, Result};

/// One layer of Gauge configuration. Unset fields fall through to lower layers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigLayer {
    /// Specs directory, relative to the project root or absolute
    pub specs_dir: Option<String>,

    /// Tag filter expression, passed to the runner untouched
    pub tags: Option<String>,

    /// Run specs in parallel
    pub in_parallel: Option<bool>,

    /// Number of parallel streams; validated when the layers are resolved
    #[serde(default, deserialize_with = "deserialize_nodes")]
    pub nodes: Option<i64>,

    /// Gauge environment name
    pub env: Option<String>,

    /// Extra runner flags, split on whitespace
    pub additional_flags: Option<String>,

    /// Project root used as the runner's working directory
    pub project_dir: Option<PathBuf>,

    /// Gauge installation root
    pub gauge_root: Option<PathBuf>,

    /// Variables exported to the runner
    pub environment_variables: Option<BTreeMap<String, String>>,
}

impl ConfigLayer {
    /// Returns true if no field is set.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Merge `higher` on top of this layer.
    ///
    /// Each field set in `higher` wins; `environment_variables` is replaced as a
    /// whole, never merged key by key.
    pub fn overlay(self, higher: ConfigLayer) -> ConfigLayer {
        ConfigLayer {
            specs_dir: higher.specs_dir.or(self.specs_dir),
            tags: higher.tags.or(self.tags),
            in_parallel: higher.in_parallel.or(self.in_parallel),
            nodes: higher.nodes.or(self.nodes),
            env: higher.env.or(self.env),
            additional_flags: higher.additional_flags.or(self.additional_flags),
            project_dir: higher.project_dir.or(self.project_dir),
            gauge_root: higher.gauge_root.or(self.gauge_root),
            environment_variables: higher.environment_variables.or(self.environment_variables),
        }
    }

    /// Build a layer from `GAUGE_*` variables in the current process environment.
    pub fn from_process_env() -> Result<Self> {
        let recognized = std::env::vars_os().filter_map(|(key, value)| {
            let key = key.into_string().ok()?;
            if !vars::ALL.contains(&key.as_str()) {
                return None;
            }
            Some((key, value.into_string().ok()?))
        });
        Self::from_env_vars(recognized)
    }

    /// Build a layer from `(name, value)` pairs.
    ///
    /// Unrecognized names are ignored and empty values count as unset.
    pub fn from_env_vars<I, K, V>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut layer = ConfigLayer::default();

        for (key, value) in pairs {
            let key = key.as_ref();
            let value: String = value.into();
            if value.trim().is_empty() {
                continue;
            }

            match key {
                vars::SPECS_DIR => layer.specs_dir = Some(value),
                vars::TAGS => layer.tags = Some(value),
                vars::PARALLEL => layer.in_parallel = Some(parse_bool(key, &value)?),
                vars::NODES => layer.nodes = Some(parse_int(key, &value)?),
                vars::ENV => layer.env = Some(value),
                vars::ADDITIONAL_FLAGS => layer.additional_flags = Some(value),
                vars::PROJECT_DIR => layer.project_dir = Some(PathBuf::from(value)),
                vars::GAUGE_ROOT => layer.gauge_root = Some(PathBuf::from(value)),
                _ => continue,
            }
            tracing::debug!(variable = key, "Configuration taken from environment");
        }

        Ok(layer)
    }
}

/// Parse a boolean written as `1/0`, `true/false`, `yes/no` or `on/off`.
pub(crate) fn parse_bool(field: &str, value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(Error::invalid(
            field,
            format!("expected a boolean, got '{other}'"),
        )),
    }
}

pub(crate) fn parse_int(field: &str, value: &str) -> Result<i64> {
    value
        .trim()
        .parse::<i64>()
        .map_err(|_| Error::invalid(field, format!("expected an integer, got '{value}'")))
}

/// `nodes` may be written as a TOML integer or as a string of digits.
fn deserialize_nodes<'de, D>(deserializer: D) -> std::result::Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Nodes {
        Int(i64),
        Text(String),
    }

    match Option::<Nodes>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Nodes::Int(n)) => Ok(Some(n)),
        Some(Nodes::Text(text)) => text.trim().parse::<i64>().map(Some).map_err(|_| {
            serde::de::Error::custom(format!("nodes must be an integer, got '{text}'"))
        }),
    }
}
