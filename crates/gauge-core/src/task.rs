//! Gauge task execution
//!
//! A `GaugeTask` binds one [`GaugeConfig`] to a [`ProcessRunner`] and performs
//! single runner operations. Each operation spawns exactly one process in the
//! project root and reports whether it exited with status 0.
//!
//! Setup problems (missing project, manifest, specs directory or executable)
//! are returned as errors before anything is spawned. A runner that exits
//! non-zero is an ordinary `Ok(false)`.

use std::path::PathBuf;

use crate::config::GaugeConfig;
use crate::constants::ProjectPath;
use crate::error::{Error, Result};
use crate::process::{Invocation, ProcessRunner, SystemRunner, locate_gauge};

/// Runner subcommands used by the task
mod subcommand {
    pub const RUN: &str = "run";
    pub const VALIDATE: &str = "validate";
    pub const FORMAT: &str = "format";
    pub const INSTALL: &str = "install";
}

/// Executes Gauge operations for one configuration.
#[derive(Debug, Clone)]
pub struct GaugeTask<R = SystemRunner> {
    config: GaugeConfig,
    runner: R,
    executable: Option<PathBuf>,
}

impl GaugeTask<SystemRunner> {
    /// Create a task that spawns real processes.
    pub fn new(config: GaugeConfig) -> Self {
        Self::with_runner(config, SystemRunner)
    }
}

impl<R: ProcessRunner> GaugeTask<R> {
    /// Create a task with a custom process runner.
    pub fn with_runner(config: GaugeConfig, runner: R) -> Self {
        Self {
            config,
            runner,
            executable: None,
        }
    }

    /// Use `path` as the gauge executable instead of searching for it.
    pub fn with_executable(mut self, path: impl Into<PathBuf>) -> Self {
        self.executable = Some(path.into());
        self
    }

    /// The configuration this task runs with.
    pub fn config(&self) -> &GaugeConfig {
        &self.config
    }

    /// Run specs.
    ///
    /// Non-empty `specs` are passed instead of the specs directory.
    pub fn run(&self, specs: &[String]) -> Result<bool> {
        self.check_project()?;
        if specs.is_empty() {
            self.check_specs_dir()?;
        }

        let mut args = vec![subcommand::RUN.to_string()];
        args.extend(self.config.command_args(Some(specs)));
        self.execute(args)
    }

    /// Validate the project.
    pub fn validate(&self) -> Result<bool> {
        self.check_project()?;
        self.check_specs_dir()?;
        self.execute(self.specs_dir_args(subcommand::VALIDATE))
    }

    /// Format the specification files.
    pub fn format_specs(&self) -> Result<bool> {
        self.check_project()?;
        self.check_specs_dir()?;
        self.execute(self.specs_dir_args(subcommand::FORMAT))
    }

    /// Install a Gauge plugin, optionally at a specific version.
    ///
    /// Only the project directory must exist; plugins install outside the project.
    pub fn install_plugin(&self, plugin: &str, version: Option<&str>) -> Result<bool> {
        self.check_project_dir()?;
        if plugin.trim().is_empty() {
            return Err(Error::invalid("plugin", "plugin name must not be empty"));
        }

        let mut args = vec![subcommand::INSTALL.to_string(), plugin.to_string()];
        if let Some(version) = version {
            args.push("--version".to_string());
            args.push(version.to_string());
        }
        self.execute(args)
    }

    fn check_project_dir(&self) -> Result<()> {
        let dir = self.config.project_dir();
        if !dir.is_dir() {
            return Err(Error::ProjectDirNotFound {
                path: dir.to_path_buf(),
            });
        }
        Ok(())
    }

    fn check_project(&self) -> Result<()> {
        self.check_project_dir()?;
        let manifest = self.config.project_dir().join(ProjectPath::Manifest);
        if !manifest.is_file() {
            return Err(Error::ManifestNotFound { path: manifest });
        }
        Ok(())
    }

    /// An empty specs directory is left for the runner to default.
    fn check_specs_dir(&self) -> Result<()> {
        if let Some(specs) = self.config.specs_path()
            && !specs.is_dir()
        {
            return Err(Error::SpecsDirNotFound { path: specs });
        }
        Ok(())
    }

    fn specs_dir_args(&self, subcommand: &str) -> Vec<String> {
        let mut args = vec![subcommand.to_string()];
        if !self.config.specs_dir().is_empty() {
            args.push(self.config.specs_dir().to_string());
        }
        args
    }

    fn executable(&self) -> Result<PathBuf> {
        match &self.executable {
            Some(path) => Ok(path.clone()),
            None => locate_gauge(self.config.gauge_root()),
        }
    }

    fn execute(&self, args: Vec<String>) -> Result<bool> {
        let invocation = Invocation {
            program: self.executable()?,
            args,
            cwd: self.config.project_dir().to_path_buf(),
            env: self.config.get_environment(),
        };

        tracing::info!(command = %invocation.command_line(), "Running gauge");
        tracing::debug!(cwd = ?invocation.cwd, "Working directory");

        let outcome = self.runner.run(&invocation)?;
        if !outcome.success() {
            tracing::debug!(code = ?outcome.code, "Gauge exited unsuccessfully");
        }
        Ok(outcome.success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigLayer;
    use crate::process::ExitOutcome;
    use std::cell::RefCell;
    use std::path::Path;
    use tempfile::TempDir;

    struct Recorder {
        code: i32,
        calls: RefCell<Vec<Invocation>>,
    }

    impl ProcessRunner for Recorder {
        fn run(&self, invocation: &Invocation) -> Result<ExitOutcome> {
            self.calls.borrow_mut().push(invocation.clone());
            Ok(ExitOutcome::from_code(self.code))
        }
    }

    fn project() -> TempDir {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("manifest.json"), "{}").unwrap();
        std::fs::create_dir(temp.path().join("specs")).unwrap();
        temp
    }

    fn task(root: &Path, code: i32) -> GaugeTask<Recorder> {
        let config = GaugeConfig::resolve(ConfigLayer::default(), root).unwrap();
        GaugeTask::with_runner(
            config,
            Recorder {
                code,
                calls: RefCell::new(Vec::new()),
            },
        )
        .with_executable("/usr/bin/gauge")
    }

    #[test]
    fn run_builds_run_subcommand() {
        let temp = project();
        let task = task(temp.path(), 0);

        assert!(task.run(&[]).unwrap());

        let calls = task.runner.calls.borrow();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].program, PathBuf::from("/usr/bin/gauge"));
        assert_eq!(calls[0].args, vec!["run", "specs"]);
        assert_eq!(calls[0].cwd, temp.path());
    }

    #[test]
    fn non_zero_exit_is_false_not_error() {
        let temp = project();
        let task = task(temp.path(), 2);
        assert!(!task.run(&[]).unwrap());
    }

    #[test]
    fn missing_manifest_spawns_nothing() {
        let temp = TempDir::new().unwrap();
        let task = task(temp.path(), 0);

        let err = task.validate().unwrap_err();
        assert!(matches!(err, Error::ManifestNotFound { .. }));
        assert!(task.runner.calls.borrow().is_empty());
    }

    #[test]
    fn empty_specs_dir_skips_check_and_positional() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("manifest.json"), "{}").unwrap();
        let layer = ConfigLayer {
            specs_dir: Some(String::new()),
            ..Default::default()
        };
        let config = GaugeConfig::resolve(layer, temp.path()).unwrap();
        let task = GaugeTask::with_runner(
            config,
            Recorder {
                code: 0,
                calls: RefCell::new(Vec::new()),
            },
        )
        .with_executable("/usr/bin/gauge");

        assert!(task.run(&[]).unwrap());
        assert!(task.validate().unwrap());
        assert!(task.format_specs().unwrap());

        let args: Vec<_> = task.runner.calls.borrow().iter().map(|c| c.args.clone()).collect();
        assert_eq!(args, vec![vec!["run"], vec!["validate"], vec!["format"]]);
    }

    #[test]
    fn install_does_not_need_manifest() {
        let temp = TempDir::new().unwrap();
        let task = task(temp.path(), 0);

        assert!(task.install_plugin("html-report", Some("4.3.0")).unwrap());
        assert_eq!(
            task.runner.calls.borrow()[0].args,
            vec!["install", "html-report", "--version", "4.3.0"]
        );
    }
}
