//! Command implementations for gauge-cli

pub mod config;
pub mod run;

use std::path::{Path, PathBuf};

use gauge_core::{ConfigResolver, GaugePlugin, find_project_root};

use crate::error::Result;

pub use config::{run_config_init, run_config_show};
pub use run::run_operation;

/// Directory commands start from: `--project-dir` when given, else `cwd`.
pub fn start_dir(cwd: &Path, project_dir: Option<&Path>) -> PathBuf {
    match project_dir {
        Some(dir) => cwd.join(dir),
        None => cwd.to_path_buf(),
    }
}

/// Build the plugin for the project containing `start`.
///
/// Fails with the expected manifest path when no directory above `start`
/// is a Gauge project.
pub fn load_plugin(start: &Path, config_file: Option<&Path>) -> Result<GaugePlugin> {
    let root = find_project_root(start)?;
    Ok(GaugePlugin::from_resolver(resolver_for(root, config_file)?)?)
}

/// Configuration sources for the project containing `start`.
///
/// Without a project manifest anywhere above `start`, `start` itself is used
/// as the root so settings can still be inspected.
pub fn load_resolver(start: &Path, config_file: Option<&Path>) -> Result<ConfigResolver> {
    let root = match find_project_root(start) {
        Ok(root) => root,
        Err(err) if err.is_missing_project() => {
            tracing::debug!(error = %err, "No project manifest found, using start directory");
            start.to_path_buf()
        }
        Err(err) => return Err(err.into()),
    };
    resolver_for(root, config_file)
}

fn resolver_for(root: PathBuf, config_file: Option<&Path>) -> Result<ConfigResolver> {
    let resolver = match config_file {
        Some(path) => ConfigResolver::with_config_file(root, path)?,
        None => ConfigResolver::new(root)?,
    };
    Ok(resolver)
}
