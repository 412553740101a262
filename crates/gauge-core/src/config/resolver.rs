//! Configuration resolution with layered merge
//!
//! The `ConfigResolver` holds the file and environment layers of one project
//! and merges them with per-call overrides into a [`GaugeConfig`].

use std::path::{Path, PathBuf};

use super::layer::ConfigLayer;
use super::project_file::ProjectFile;
use super::settings::GaugeConfig;
use crate::Result;

/// Resolves configuration by merging multiple sources
///
/// Sources, highest precedence first:
/// 1. Per-call overrides
/// 2. `GAUGE_*` environment variables
/// 3. The project file (`[tool.gauge]` in pyproject.toml, or gauge.toml)
/// 4. Built-in defaults
#[derive(Debug, Clone)]
pub struct ConfigResolver {
    /// Project root directory
    root: PathBuf,

    /// Settings read from the project file
    project_file: ProjectFile,

    /// Settings read from environment variables
    env_layer: ConfigLayer,
}

impl ConfigResolver {
    /// Create a resolver for the project at `root`, reading the project file
    /// and the current process environment.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let project_file = ProjectFile::discover(&root)?;
        let env_layer = ConfigLayer::from_process_env()?;
        Ok(Self::with_sources(root, project_file, env_layer))
    }

    /// Create a resolver that reads an explicitly named configuration file.
    pub fn with_config_file(root: impl Into<PathBuf>, config_file: &Path) -> Result<Self> {
        let project_file = ProjectFile::load(config_file)?;
        let env_layer = ConfigLayer::from_process_env()?;
        Ok(Self::with_sources(root, project_file, env_layer))
    }

    /// Create a resolver from already loaded sources.
    ///
    /// Tests use this to supply an environment layer without touching the
    /// process environment.
    pub fn with_sources(
        root: impl Into<PathBuf>,
        project_file: ProjectFile,
        env_layer: ConfigLayer,
    ) -> Self {
        Self {
            root: root.into(),
            project_file,
            env_layer,
        }
    }

    /// Resolve the configuration with `overrides` as the highest layer.
    ///
    /// The named environment applied from the project file is the `env` of
    /// the highest layer that sets one.
    pub fn resolve(&self, overrides: &ConfigLayer) -> Result<GaugeConfig> {
        let selected_env = overrides
            .env
            .as_deref()
            .or(self.env_layer.env.as_deref())
            .or(self.project_file.base().env.as_deref());

        let merged = self
            .project_file
            .layer_for(selected_env)
            .overlay(self.env_layer.clone())
            .overlay(overrides.clone());

        GaugeConfig::resolve(merged, &self.root)
    }

    /// Get the project root path
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Get the loaded project file settings
    pub fn project_file(&self) -> &ProjectFile {
        &self.project_file
    }

    /// Get the environment variable layer
    pub fn env_layer(&self) -> &ConfigLayer {
        &self.env_layer
    }
}
