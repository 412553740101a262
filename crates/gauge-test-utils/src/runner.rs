//! A stand-in `gauge` executable for end-to-end tests.
//!
//! [`FakeGauge::install`] writes a shell script to `<gauge_root>/bin/gauge`
//! that records its working directory, environment and arguments, then exits
//! with a fixed code. Unix only.

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

const ARGS_LOG: &str = "args.log";
const CWD_LOG: &str = "cwd.log";
const ENV_LOG: &str = "env.log";

/// Handle to an installed fake runner and its recordings.
#[derive(Debug, Clone)]
pub struct FakeGauge {
    gauge_root: PathBuf,
}

impl FakeGauge {
    /// Install a fake runner under `gauge_root` that exits with `exit_code`.
    pub fn install(gauge_root: &Path, exit_code: i32) -> Self {
        let bin = gauge_root.join("bin");
        fs::create_dir_all(&bin).unwrap();

        let dir = gauge_root.display();
        let script = format!(
            "#!/bin/sh\n\
             pwd > '{dir}/{CWD_LOG}'\n\
             env > '{dir}/{ENV_LOG}'\n\
             : > '{dir}/{ARGS_LOG}'\n\
             for arg in \"$@\"; do\n\
             \x20 printf '%s\\n' \"$arg\" >> '{dir}/{ARGS_LOG}'\n\
             done\n\
             exit {exit_code}\n"
        );

        let executable = bin.join("gauge");
        fs::write(&executable, script).unwrap();
        fs::set_permissions(&executable, fs::Permissions::from_mode(0o755)).unwrap();

        Self {
            gauge_root: gauge_root.to_path_buf(),
        }
    }

    /// The installation root to configure as `gauge_root`.
    pub fn root(&self) -> &Path {
        &self.gauge_root
    }

    /// Path of the installed script.
    pub fn executable(&self) -> PathBuf {
        self.gauge_root.join("bin").join("gauge")
    }

    /// Whether the fake has been invoked at least once.
    pub fn was_invoked(&self) -> bool {
        self.gauge_root.join(ARGS_LOG).exists()
    }

    /// Arguments of the most recent invocation, one entry per argument.
    pub fn recorded_args(&self) -> Vec<String> {
        self.read_log(ARGS_LOG).lines().map(String::from).collect()
    }

    /// Working directory of the most recent invocation.
    pub fn recorded_cwd(&self) -> PathBuf {
        PathBuf::from(self.read_log(CWD_LOG).trim_end())
    }

    /// Value of `name` in the environment of the most recent invocation.
    pub fn recorded_env(&self, name: &str) -> Option<String> {
        let prefix = format!("{name}=");
        self.read_log(ENV_LOG)
            .lines()
            .find_map(|line| line.strip_prefix(&prefix).map(String::from))
    }

    fn read_log(&self, name: &str) -> String {
        let path = self.gauge_root.join(name);
        fs::read_to_string(&path)
            .unwrap_or_else(|_| panic!("fake gauge was not invoked: {} missing", path.display()))
    }
}
