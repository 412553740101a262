//! Spawning the Gauge runner
//!
//! `GaugeTask` never calls `std::process` directly. It builds an [`Invocation`]
//! and hands it to a [`ProcessRunner`], so task logic can be exercised with a
//! recording fake instead of a real runner.

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::constants::GAUGE_EXECUTABLE;
use crate::error::{Error, Result};

/// One fully described runner process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Executable to start
    pub program: PathBuf,
    /// Arguments after the program name
    pub args: Vec<String>,
    /// Working directory
    pub cwd: PathBuf,
    /// Complete environment of the child
    pub env: BTreeMap<OsString, OsString>,
}

impl Invocation {
    /// Program and arguments as one printable line.
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.display().to_string())
            .chain(self.args.iter().cloned())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// How a runner process ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitOutcome {
    /// Exit code; `None` when the process was ended by a signal
    pub code: Option<i32>,
}

impl ExitOutcome {
    pub fn from_code(code: i32) -> Self {
        Self { code: Some(code) }
    }

    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Capability to start a process and wait for it.
///
/// Implementations must block until the process exits and must not capture
/// its output.
pub trait ProcessRunner {
    fn run(&self, invocation: &Invocation) -> Result<ExitOutcome>;
}

impl<R: ProcessRunner + ?Sized> ProcessRunner for &R {
    fn run(&self, invocation: &Invocation) -> Result<ExitOutcome> {
        (**self).run(invocation)
    }
}

/// Runs processes with `std::process::Command`, inheriting stdio.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl ProcessRunner for SystemRunner {
    fn run(&self, invocation: &Invocation) -> Result<ExitOutcome> {
        let status = Command::new(&invocation.program)
            .args(&invocation.args)
            .current_dir(&invocation.cwd)
            .env_clear()
            .envs(&invocation.env)
            .status()
            .map_err(|source| Error::Spawn {
                program: invocation.program.clone(),
                source,
            })?;

        Ok(ExitOutcome {
            code: status.code(),
        })
    }
}

/// Path of the gauge binary inside an installation root.
pub fn executable_in_root(gauge_root: &Path) -> PathBuf {
    let name = if cfg!(windows) {
        format!("{GAUGE_EXECUTABLE}.exe")
    } else {
        GAUGE_EXECUTABLE.to_string()
    };
    gauge_root.join("bin").join(name)
}

/// Locate the gauge executable.
///
/// `<gauge_root>/bin/gauge` is preferred when it exists, then `gauge` on the
/// search path.
pub fn locate_gauge(gauge_root: Option<&Path>) -> Result<PathBuf> {
    let mut searched = Vec::new();

    if let Some(root) = gauge_root {
        let candidate = executable_in_root(root);
        if candidate.is_file() {
            // The child starts in the project root, so a relative path would not resolve there
            return Ok(std::path::absolute(&candidate)?);
        }
        tracing::debug!(path = ?candidate, "No gauge executable under gauge_root");
        searched.push(candidate.display().to_string());
    }

    match which::which(GAUGE_EXECUTABLE) {
        Ok(path) => Ok(path),
        Err(_) => {
            searched.push("PATH".to_string());
            Err(Error::ExecutableNotFound { searched })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn command_line_joins_program_and_args() {
        let invocation = Invocation {
            program: PathBuf::from("/usr/bin/gauge"),
            args: vec!["run".into(), "specs".into()],
            cwd: PathBuf::from("."),
            env: BTreeMap::new(),
        };
        assert_eq!(invocation.command_line(), "/usr/bin/gauge run specs");
    }

    #[test]
    fn exit_outcome_success_only_on_zero() {
        assert!(ExitOutcome::from_code(0).success());
        assert!(!ExitOutcome::from_code(2).success());
        assert!(!ExitOutcome { code: None }.success());
    }

    #[test]
    fn locate_prefers_gauge_root() {
        let temp = TempDir::new().unwrap();
        let exe = executable_in_root(temp.path());
        std::fs::create_dir_all(exe.parent().unwrap()).unwrap();
        std::fs::write(&exe, "").unwrap();

        assert_eq!(locate_gauge(Some(temp.path())).unwrap(), exe);
        assert!(exe.is_absolute());
    }

    #[test]
    fn missing_root_executable_is_listed_when_not_found() {
        let temp = TempDir::new().unwrap();
        match locate_gauge(Some(temp.path())) {
            // gauge happens to be installed on this machine
            Ok(path) => assert!(path.ends_with(GAUGE_EXECUTABLE) || path.exists()),
            Err(Error::ExecutableNotFound { searched }) => {
                assert_eq!(searched.len(), 2);
                assert!(searched[0].contains("bin"));
                assert_eq!(searched[1], "PATH");
            }
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn system_runner_reports_exit_code() {
        let temp = TempDir::new().unwrap();
        let invocation = Invocation {
            program: PathBuf::from("sh"),
            args: vec!["-c".into(), "exit 3".into()],
            cwd: temp.path().to_path_buf(),
            env: std::env::vars_os().collect(),
        };
        let outcome = SystemRunner.run(&invocation).unwrap();
        assert_eq!(outcome.code, Some(3));
    }

    #[test]
    fn system_runner_spawn_failure_is_an_error() {
        let temp = TempDir::new().unwrap();
        let invocation = Invocation {
            program: temp.path().join("does-not-exist"),
            args: vec![],
            cwd: temp.path().to_path_buf(),
            env: BTreeMap::new(),
        };
        assert!(matches!(
            SystemRunner.run(&invocation),
            Err(Error::Spawn { .. })
        ));
    }
}
