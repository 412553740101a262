//! Error types for gauge-core
//!
//! Every variant here is a setup or configuration error. A runner subcommand that
//! exits non-zero is not an error; it is reported as `false` by the task methods.

use std::path::PathBuf;

/// Result type for gauge-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in gauge-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Project manifest missing from the project root
    #[error("Gauge project manifest not found at {path}")]
    ManifestNotFound { path: PathBuf },

    /// Configured project directory does not exist
    #[error("Project directory not found: {path}")]
    ProjectDirNotFound { path: PathBuf },

    /// Specs directory missing at execution time
    #[error("Specs directory not found at {path}")]
    SpecsDirNotFound { path: PathBuf },

    /// The gauge executable could not be located
    #[error("Gauge executable not found (searched: {}). Install Gauge or set gauge_root in configuration.", searched.join(", "))]
    ExecutableNotFound { searched: Vec<String> },

    /// A configuration file exists but could not be read
    #[error("Failed to read configuration file {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A configuration file could not be parsed
    #[error("Failed to parse configuration file {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },

    /// A configuration value failed validation
    #[error("Invalid configuration for '{field}': {message}")]
    InvalidConfig { field: String, message: String },

    /// The runner process could not be started
    #[error("Failed to execute {program}: {source}")]
    Spawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Whether this error means no usable project was found.
    pub fn is_missing_project(&self) -> bool {
        matches!(
            self,
            Error::ManifestNotFound { .. } | Error::ProjectDirNotFound { .. }
        )
    }
}
