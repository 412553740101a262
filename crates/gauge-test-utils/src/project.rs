//! [`TestProject`] builder for Gauge project scenarios.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Manifest written by [`TestProject::init_gauge`]
pub const MANIFEST_JSON: &str = r#"{
  "Language": "python",
  "Plugins": [
    "html-report"
  ]
}
"#;

const EXAMPLE_SPEC: &str = "# Example\n\n## Greeting\n\n* Say \"hello\"\n";

/// A temporary project directory with helper methods for test setup and
/// assertion.
///
/// # Example
///
/// ```rust,no_run
/// use gauge_test_utils::TestProject;
///
/// let project = TestProject::new().init_gauge();
/// project.write_pyproject("specs_dir = \"specs\"\n");
/// project.assert_file_exists("manifest.json");
/// ```
pub struct TestProject {
    temp_dir: TempDir,
}

impl Default for TestProject {
    fn default() -> Self {
        Self::new()
    }
}

impl TestProject {
    /// Create an empty temporary directory.
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
        }
    }

    /// Return the root path of the temporary directory.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Absolute path of `relative` inside the project.
    pub fn path(&self, relative: &str) -> PathBuf {
        self.root().join(relative)
    }

    /// Write `manifest.json` and a `specs/` directory with one spec file.
    pub fn init_gauge(self) -> Self {
        self.write_file("manifest.json", MANIFEST_JSON);
        self.write_file("specs/example.spec", EXAMPLE_SPEC);
        self
    }

    /// Write a file relative to the root, creating parent directories.
    pub fn write_file(&self, relative: &str, content: &str) {
        let path = self.path(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
    }

    /// Create an empty directory relative to the root.
    pub fn create_dir(&self, relative: &str) {
        fs::create_dir_all(self.path(relative)).unwrap();
    }

    /// Write a `pyproject.toml` whose `[tool.gauge]` table holds `gauge_table`.
    ///
    /// `gauge_table` may contain further sub-tables such as
    /// `[tool.gauge.environments.ci]`.
    pub fn write_pyproject(&self, gauge_table: &str) {
        let content =
            format!("[project]\nname = \"demo\"\nversion = \"0.1.0\"\n\n[tool.gauge]\n{gauge_table}");
        self.write_file("pyproject.toml", &content);
    }

    /// Read a file relative to the root.
    pub fn read_file(&self, relative: &str) -> String {
        let path = self.path(relative);
        fs::read_to_string(&path)
            .unwrap_or_else(|_| panic!("Could not read file: {}", path.display()))
    }

    /// Assert that `path` (relative to the project root) exists.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path does not exist.
    pub fn assert_file_exists(&self, path: &str) {
        let full_path = self.path(path);
        assert!(
            full_path.exists(),
            "Expected file to exist: {}",
            full_path.display()
        );
    }

    /// Assert that `path` (relative to the project root) does **not** exist.
    pub fn assert_file_not_exists(&self, path: &str) {
        let full_path = self.path(path);
        assert!(
            !full_path.exists(),
            "Expected file NOT to exist: {}",
            full_path.display()
        );
    }

    /// Assert that the file at `path` (relative to root) contains `content`.
    pub fn assert_file_contains(&self, path: &str, content: &str) {
        let file_content = self.read_file(path);
        assert!(
            file_content.contains(content),
            "File {} does not contain expected content.\nExpected: {}\nActual: {}",
            self.path(path).display(),
            content,
            file_content
        );
    }
}
