//! Project file loading
//!
//! Gauge settings live in `[tool.gauge]` of `pyproject.toml`. When the manifest
//! has no such table, `gauge.toml` is consulted instead, read from either
//! `[tool.gauge]` or a top-level `[gauge]` table.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use super::layer::ConfigLayer;
use crate::constants::ProjectPath;
use crate::error::{Error, Result};

/// Key of the named environment sub-tables
const ENVIRONMENTS_KEY: &str = "environments";

/// Gauge settings read from a project file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectFile {
    /// File the settings came from, if any
    path: Option<PathBuf>,

    /// The base table
    base: ConfigLayer,

    /// Named alternate environments, `[tool.gauge.environments.<name>]`
    environments: BTreeMap<String, ConfigLayer>,
}

impl ProjectFile {
    /// No file, no settings.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Find the settings for the project at `root`.
    ///
    /// Missing files are skipped. A file that exists but cannot be read or
    /// parsed is an error.
    pub fn discover(root: &Path) -> Result<Self> {
        let pyproject = root.join(ProjectPath::PyProject);
        if pyproject.is_file() {
            tracing::debug!(path = ?pyproject, "Loading project manifest");
            if let Some(file) = Self::read_table(&pyproject)? {
                return Ok(file);
            }
            tracing::debug!(path = ?pyproject, "No [tool.gauge] table, trying fallback");
        }

        let fallback = root.join(ProjectPath::GaugeToml);
        if fallback.is_file() {
            tracing::debug!(path = ?fallback, "Loading fallback configuration");
            if let Some(file) = Self::read_table(&fallback)? {
                return Ok(file);
            }
        }

        tracing::debug!(?root, "No Gauge configuration file found, using defaults");
        Ok(Self::empty())
    }

    /// Load settings from an explicitly named file, which must exist.
    ///
    /// A file without a Gauge table yields empty settings.
    pub fn load(path: &Path) -> Result<Self> {
        Ok(Self::read_table(path)?.unwrap_or_else(|| Self {
            path: Some(path.to_path_buf()),
            ..Self::default()
        }))
    }

    /// Parse settings from TOML content. `path` is used for error messages.
    pub fn parse(content: &str, path: &Path) -> Result<Option<Self>> {
        let mut document: toml::Table = toml::from_str(content).map_err(|e| Error::ConfigParse {
            path: path.to_path_buf(),
            message: e.message().to_string(),
        })?;

        let Some(mut table) = take_gauge_table(&mut document) else {
            return Ok(None);
        };

        let environments = match table.remove(ENVIRONMENTS_KEY) {
            None => BTreeMap::new(),
            Some(toml::Value::Table(envs)) => envs
                .into_iter()
                .map(|(name, value)| Ok((name, to_layer(value, path)?)))
                .collect::<Result<_>>()?,
            Some(_) => {
                return Err(Error::ConfigParse {
                    path: path.to_path_buf(),
                    message: format!("'{ENVIRONMENTS_KEY}' must be a table"),
                });
            }
        };

        Ok(Some(Self {
            path: Some(path.to_path_buf()),
            base: to_layer(toml::Value::Table(table), path)?,
            environments,
        }))
    }

    fn read_table(path: &Path) -> Result<Option<Self>> {
        let content = fs::read_to_string(path).map_err(|source| Error::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content, path)
    }

    /// The file the settings were read from.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// The base table.
    pub fn base(&self) -> &ConfigLayer {
        &self.base
    }

    /// Names of the declared alternate environments.
    pub fn environment_names(&self) -> impl Iterator<Item = &str> {
        self.environments.keys().map(String::as_str)
    }

    /// The project-file layer for the selected environment name.
    ///
    /// When `selected` names a declared environment, its fields overlay the base
    /// table. Unknown names leave the base table unchanged.
    pub fn layer_for(&self, selected: Option<&str>) -> ConfigLayer {
        match selected.and_then(|name| self.environments.get(name)) {
            Some(profile) => {
                tracing::debug!(env = selected, "Applying named environment");
                self.base.clone().overlay(profile.clone())
            }
            None => self.base.clone(),
        }
    }
}

/// Remove and return `[tool.gauge]`, or a top-level `[gauge]` table.
fn take_gauge_table(document: &mut toml::Table) -> Option<toml::Table> {
    if let Some(toml::Value::Table(tool)) = document.get_mut("tool")
        && let Some(toml::Value::Table(gauge)) = tool.remove("gauge")
    {
        return Some(gauge);
    }
    match document.remove("gauge") {
        Some(toml::Value::Table(gauge)) => Some(gauge),
        _ => None,
    }
}

fn to_layer(value: toml::Value, path: &Path) -> Result<ConfigLayer> {
    value.try_into().map_err(|e: toml::de::Error| Error::ConfigParse {
        path: path.to_path_buf(),
        message: e.message().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn discover_returns_empty_without_files() {
        let temp = TempDir::new().unwrap();
        let file = ProjectFile::discover(temp.path()).unwrap();
        assert_eq!(file, ProjectFile::empty());
        assert!(file.path().is_none());
    }

    #[test]
    fn reads_tool_gauge_from_pyproject() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join("pyproject.toml"),
            r#"
[project]
name = "demo"

[tool.gauge]
specs_dir = "acceptance"
nodes = 2
"#,
        )
        .unwrap();

        let file = ProjectFile::discover(temp.path()).unwrap();
        assert_eq!(file.base().specs_dir.as_deref(), Some("acceptance"));
        assert_eq!(file.base().nodes, Some(2));
        assert_eq!(file.path(), Some(temp.path().join("pyproject.toml").as_path()));
    }

    #[test]
    fn falls_back_to_gauge_toml_when_table_missing() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("pyproject.toml"), "[project]\nname = \"demo\"\n").unwrap();
        fs::write(temp.path().join("gauge.toml"), "[gauge]\ntags = \"smoke\"\n").unwrap();

        let file = ProjectFile::discover(temp.path()).unwrap();
        assert_eq!(file.base().tags.as_deref(), Some("smoke"));
        assert_eq!(file.path(), Some(temp.path().join("gauge.toml").as_path()));
    }

    #[test]
    fn invalid_toml_is_an_error_naming_the_file() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("pyproject.toml"), "[tool.gauge\n").unwrap();

        let err = ProjectFile::discover(temp.path()).unwrap_err();
        assert!(matches!(err, Error::ConfigParse { .. }));
        assert!(err.to_string().contains("pyproject.toml"), "got: {err}");
    }

    #[test]
    fn non_string_environment_variables_rejected() {
        let err = ProjectFile::parse(
            "[tool.gauge.environment_variables]\nRETRIES = 3\n",
            Path::new("pyproject.toml"),
        )
        .unwrap_err();
        assert!(matches!(err, Error::ConfigParse { .. }));
    }

    #[test]
    fn named_environment_overlays_base() {
        let file = ProjectFile::parse(
            r#"
[tool.gauge]
specs_dir = "specs"
additional_flags = "--verbose"

[tool.gauge.environments.ci]
in_parallel = true
nodes = 4
additional_flags = "--simple-console"
"#,
            Path::new("pyproject.toml"),
        )
        .unwrap()
        .unwrap();

        assert_eq!(file.environment_names().collect::<Vec<_>>(), vec!["ci"]);

        let ci = file.layer_for(Some("ci"));
        assert_eq!(ci.in_parallel, Some(true));
        assert_eq!(ci.nodes, Some(4));
        assert_eq!(ci.additional_flags.as_deref(), Some("--simple-console"));
        assert_eq!(ci.specs_dir.as_deref(), Some("specs"));

        let unknown = file.layer_for(Some("staging"));
        assert_eq!(&unknown, file.base());
    }

    #[test]
    fn explicit_file_without_table_is_empty() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("custom.toml");
        fs::write(&path, "[other]\nkey = 1\n").unwrap();

        let file = ProjectFile::load(&path).unwrap();
        assert!(file.base().is_empty());
        assert_eq!(file.path(), Some(path.as_path()));
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let temp = TempDir::new().unwrap();
        let err = ProjectFile::load(&temp.path().join("nope.toml")).unwrap_err();
        assert!(matches!(err, Error::ConfigRead { .. }));
    }
}
