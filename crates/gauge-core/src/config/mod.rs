//! Configuration resolution
//!
//! Gauge settings come from four sources, merged field by field
//! (highest precedence first):
//!
//! 1. **Overrides** - values passed by a front end for one call
//! 2. **Environment** - `GAUGE_SPECS_DIR`, `GAUGE_TAGS`, `GAUGE_PARALLEL`,
//!    `GAUGE_NODES`, `GAUGE_ENV`, `GAUGE_ADDITIONAL_FLAGS`, `GAUGE_PROJECT_DIR`,
//!    `GAUGE_ROOT`
//! 3. **Project file** - `[tool.gauge]` in `pyproject.toml`, falling back to
//!    `gauge.toml`; `[tool.gauge.environments.<name>]` overlays the base table
//!    when `<name>` is the selected Gauge environment
//! 4. **Defaults** - `specs_dir = "specs"`, `nodes = 1`, sequential execution
//!
//! # Example
//!
//! ```ignore
//! use gauge_core::config::{ConfigLayer, ConfigResolver};
//!
//! let resolver = ConfigResolver::new("/path/to/project")?;
//! let config = resolver.resolve(&ConfigLayer::default())?;
//! println!("{:?}", config.to_command_args());
//! ```

mod layer;
mod project_file;
mod resolver;
mod settings;

pub use layer::ConfigLayer;
pub(crate) use layer::{parse_bool, parse_int};
pub use project_file::ProjectFile;
pub use resolver::ConfigResolver;
pub use settings::{ENV_FLAG, GaugeConfig, NODES_FLAG, PARALLEL_FLAG, TAGS_FLAG};
