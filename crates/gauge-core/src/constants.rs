//! File names and environment variable names the adapter recognizes.

use std::path::Path;

/// Well-known files inside a Gauge project root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectPath {
    /// The Gauge project manifest marking a project root
    Manifest,
    /// The standard Python project manifest carrying `[tool.gauge]`
    PyProject,
    /// The dedicated fallback configuration file
    GaugeToml,
    /// The default specs directory
    SpecsDir,
}

impl ProjectPath {
    /// Get the string representation of the path.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Manifest => "manifest.json",
            Self::PyProject => "pyproject.toml",
            Self::GaugeToml => "gauge.toml",
            Self::SpecsDir => "specs",
        }
    }
}

impl AsRef<Path> for ProjectPath {
    fn as_ref(&self) -> &Path {
        Path::new(self.as_str())
    }
}

impl AsRef<str> for ProjectPath {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl std::fmt::Display for ProjectPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Environment variables mapped onto configuration fields.
pub mod vars {
    pub const SPECS_DIR: &str = "GAUGE_SPECS_DIR";
    pub const TAGS: &str = "GAUGE_TAGS";
    pub const PARALLEL: &str = "GAUGE_PARALLEL";
    pub const NODES: &str = "GAUGE_NODES";
    pub const ENV: &str = "GAUGE_ENV";
    pub const ADDITIONAL_FLAGS: &str = "GAUGE_ADDITIONAL_FLAGS";
    pub const PROJECT_DIR: &str = "GAUGE_PROJECT_DIR";
    /// Also exported to the runner when `gauge_root` is configured
    pub const GAUGE_ROOT: &str = "GAUGE_ROOT";

    /// Every recognized name, in field order.
    pub const ALL: &[&str] = &[
        SPECS_DIR,
        TAGS,
        PARALLEL,
        NODES,
        ENV,
        ADDITIONAL_FLAGS,
        PROJECT_DIR,
        GAUGE_ROOT,
    ];
}

/// Name of the runner executable on the search path.
pub const GAUGE_EXECUTABLE: &str = "gauge";
