//! Build-system integration entry point
//!
//! A `GaugePlugin` is bound to one project root. It owns the base
//! configuration and derives a fresh [`GaugeTask`] for every operation, so
//! per-call overrides never leak into later calls.

use std::path::{Path, PathBuf};

use crate::config::{ConfigLayer, ConfigResolver, GaugeConfig, ProjectFile};
use crate::constants::ProjectPath;
use crate::error::{Error, Result};
use crate::options::{Operation, OptionMap, Outcome};
use crate::process::{ProcessRunner, SystemRunner};
use crate::task::GaugeTask;

/// Gauge integration for one project.
#[derive(Debug, Clone)]
pub struct GaugePlugin<R = SystemRunner> {
    resolver: ConfigResolver,
    config: GaugeConfig,
    runner: R,
}

impl GaugePlugin<SystemRunner> {
    /// Open the project rooted at `root`, which must contain `manifest.json`.
    pub fn open(root: impl AsRef<Path>) -> Result<Self> {
        let root = project_root(root.as_ref())?;
        Self::from_resolver(ConfigResolver::new(root)?)
    }

    /// Find the project containing `start` by walking up to the first
    /// directory with a `manifest.json`.
    pub fn discover(start: impl AsRef<Path>) -> Result<Self> {
        let root = find_project_root(start.as_ref())?;
        Self::from_resolver(ConfigResolver::new(root)?)
    }

    /// Build a plugin from an already configured resolver.
    pub fn from_resolver(resolver: ConfigResolver) -> Result<Self> {
        Self::with_runner(resolver, SystemRunner)
    }
}

impl<R: ProcessRunner + Clone> GaugePlugin<R> {
    /// Build a plugin whose tasks spawn processes through `runner`.
    ///
    /// The resolver root must hold a project manifest. The base configuration
    /// is resolved immediately so invalid project settings surface before any
    /// operation is attempted.
    pub fn with_runner(resolver: ConfigResolver, runner: R) -> Result<Self> {
        require_manifest(resolver.root())?;
        let config = resolver.resolve(&ConfigLayer::default())?;
        tracing::debug!(
            root = ?resolver.root(),
            file = ?resolver.project_file().path(),
            "Gauge plugin initialized"
        );
        Ok(Self {
            resolver,
            config,
            runner,
        })
    }

    /// The base configuration without overrides.
    pub fn config(&self) -> &GaugeConfig {
        &self.config
    }

    pub fn root(&self) -> &Path {
        self.resolver.root()
    }

    /// The project file settings were read from.
    pub fn project_file(&self) -> &ProjectFile {
        self.resolver.project_file()
    }

    /// Derive a task from the base configuration with `overrides` applied.
    ///
    /// Overrides go through the full source merge, so an overriding `env`
    /// also selects the matching named environment from the project file.
    pub fn create_task(&self, overrides: &ConfigLayer) -> Result<GaugeTask<R>> {
        let config = if overrides.is_empty() {
            self.config.clone()
        } else {
            self.resolver.resolve(overrides)?
        };
        Ok(GaugeTask::with_runner(config, self.runner.clone()))
    }

    /// Run specs with `overrides`; explicit `specs` replace the specs directory.
    pub fn run_specs(&self, overrides: &ConfigLayer, specs: &[String]) -> Result<bool> {
        self.create_task(overrides)?.run(specs)
    }

    pub fn validate_project(&self, overrides: &ConfigLayer) -> Result<bool> {
        self.create_task(overrides)?.validate()
    }

    pub fn format_specs(&self, overrides: &ConfigLayer) -> Result<bool> {
        self.create_task(overrides)?.format_specs()
    }

    pub fn install_plugin(
        &self,
        overrides: &ConfigLayer,
        plugin: &str,
        version: Option<&str>,
    ) -> Result<bool> {
        self.create_task(overrides)?.install_plugin(plugin, version)
    }

    /// Perform `operation` on behalf of a front end.
    ///
    /// Setup errors propagate; a failed runner becomes an unsuccessful
    /// [`Outcome`] carrying a diagnostic line.
    pub fn dispatch(&self, operation: &Operation, options: &OptionMap) -> Result<Outcome> {
        let overrides = ConfigLayer::from_options(options)?;
        self.dispatch_layer(operation, &overrides)
    }

    /// Like [`Self::dispatch`] with an already typed overrides layer.
    pub fn dispatch_layer(&self, operation: &Operation, overrides: &ConfigLayer) -> Result<Outcome> {
        let success = match operation {
            Operation::Run { specs } => self.run_specs(overrides, specs)?,
            Operation::Validate => self.validate_project(overrides)?,
            Operation::Format => self.format_specs(overrides)?,
            Operation::Install { plugin, version } => {
                self.install_plugin(overrides, plugin, version.as_deref())?
            }
        };

        if success {
            Ok(Outcome::succeeded())
        } else {
            Ok(Outcome::failed(format!("gauge {operation} failed")))
        }
    }
}

fn require_manifest(root: &Path) -> Result<()> {
    let manifest = root.join(ProjectPath::Manifest);
    if !manifest.is_file() {
        return Err(Error::ManifestNotFound { path: manifest });
    }
    Ok(())
}

/// `root` itself, if it holds a project manifest.
fn project_root(root: &Path) -> Result<PathBuf> {
    require_manifest(root)?;
    Ok(dunce::canonicalize(root)?)
}

/// Walk up from `start` to the first directory holding a project manifest.
pub fn find_project_root(start: &Path) -> Result<PathBuf> {
    let start = dunce::canonicalize(start).map_err(|_| Error::ProjectDirNotFound {
        path: start.to_path_buf(),
    })?;

    for dir in start.ancestors() {
        if dir.join(ProjectPath::Manifest).is_file() {
            tracing::debug!(root = ?dir, "Found Gauge project");
            return Ok(dir.to_path_buf());
        }
    }

    Err(Error::ManifestNotFound {
        path: start.join(ProjectPath::Manifest),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn find_project_root_walks_up() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("manifest.json"), "{}").unwrap();
        let nested = temp.path().join("specs").join("nested");
        fs::create_dir_all(&nested).unwrap();

        let root = find_project_root(&nested).unwrap();
        assert_eq!(root, dunce::canonicalize(temp.path()).unwrap());
    }

    #[test]
    fn find_project_root_without_manifest_fails() {
        let temp = TempDir::new().unwrap();
        // Some ancestor of the temp dir could in theory hold a manifest.json
        if let Err(err) = find_project_root(temp.path()) {
            assert!(matches!(err, Error::ManifestNotFound { .. }));
        }
    }

    #[test]
    fn open_requires_manifest_in_root() {
        let temp = TempDir::new().unwrap();
        let err = project_root(temp.path()).unwrap_err();
        assert!(err.is_missing_project());
        assert!(err.to_string().contains("manifest.json"));
    }
}
