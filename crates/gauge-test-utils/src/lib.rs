//! Shared test utilities for the gauge-build workspace.
//!
//! A dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`project`] - [`TestProject`] builder for Gauge project layouts
//! - [`runner`] - a fake `gauge` executable that records its invocations (unix)

pub mod project;
#[cfg(unix)]
pub mod runner;

pub use project::TestProject;
#[cfg(unix)]
pub use runner::FakeGauge;
