//! Tests for the plugin orchestrator and the shared dispatch interface

use gauge_core::config::{ConfigLayer, ConfigResolver, ProjectFile};
use gauge_core::process::{ExitOutcome, Invocation, ProcessRunner};
use gauge_core::{Error, GaugePlugin, Operation, OptionMap, OptionValue, Result};
use gauge_test_utils::TestProject;
use pretty_assertions::assert_eq;
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Clone, Default)]
struct RecordingRunner {
    fail: bool,
    calls: Rc<RefCell<Vec<Invocation>>>,
}

impl RecordingRunner {
    fn args(&self) -> Vec<Vec<String>> {
        self.calls.borrow().iter().map(|c| c.args.clone()).collect()
    }
}

impl ProcessRunner for RecordingRunner {
    fn run(&self, invocation: &Invocation) -> Result<ExitOutcome> {
        self.calls.borrow_mut().push(invocation.clone());
        Ok(ExitOutcome::from_code(if self.fail { 1 } else { 0 }))
    }
}

/// A project whose `gauge_root` holds a placeholder executable, so tasks
/// find a runner without consulting the search path.
fn project_with_runner_root(gauge_table: &str) -> TestProject {
    let project = TestProject::new().init_gauge();
    project.write_file("gauge-home/bin/gauge", "");
    let root = project.path("gauge-home");
    project.write_pyproject(&format!(
        "gauge_root = '{}'\n{gauge_table}",
        root.display()
    ));
    project
}

fn plugin(project: &TestProject, env: &[(&str, &str)], runner: &RecordingRunner) -> GaugePlugin<RecordingRunner> {
    let resolver = ConfigResolver::with_sources(
        project.root(),
        ProjectFile::discover(project.root()).unwrap(),
        ConfigLayer::from_env_vars(env.iter().copied()).unwrap(),
    );
    GaugePlugin::with_runner(resolver, runner.clone()).unwrap()
}

fn options(pairs: &[(&str, OptionValue)]) -> OptionMap {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

mod create_task_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_overrides_do_not_leak_between_tasks() {
        let project = project_with_runner_root("");
        let runner = RecordingRunner::default();
        let plugin = plugin(&project, &[], &runner);

        let parallel = plugin
            .create_task(&ConfigLayer {
                in_parallel: Some(true),
                nodes: Some(4),
                ..Default::default()
            })
            .unwrap();
        let plain = plugin.create_task(&ConfigLayer::default()).unwrap();

        assert!(parallel.config().in_parallel());
        assert_eq!(parallel.config().nodes(), 4);
        assert!(!plain.config().in_parallel());
        assert!(!plugin.config().in_parallel());
    }

    #[test]
    fn test_override_env_selects_named_environment() {
        let project = project_with_runner_root("\n[tool.gauge.environments.ci]\nin_parallel = true\nnodes = 3\n");
        let runner = RecordingRunner::default();
        let plugin = plugin(&project, &[], &runner);

        let task = plugin
            .create_task(&ConfigLayer {
                env: Some("ci".into()),
                ..Default::default()
            })
            .unwrap();
        assert!(task.config().in_parallel());
        assert_eq!(task.config().nodes(), 3);
    }

    #[test]
    fn test_invalid_override_is_error() {
        let project = project_with_runner_root("");
        let runner = RecordingRunner::default();
        let plugin = plugin(&project, &[], &runner);

        let result = plugin.create_task(&ConfigLayer {
            nodes: Some(0),
            ..Default::default()
        });
        assert!(matches!(result, Err(Error::InvalidConfig { .. })));
    }

    #[test]
    fn test_invalid_base_configuration_fails_at_construction() {
        let project = TestProject::new().init_gauge();
        project.write_pyproject("nodes = 0\n");

        let resolver = ConfigResolver::with_sources(
            project.root(),
            ProjectFile::discover(project.root()).unwrap(),
            ConfigLayer::default(),
        );
        assert!(GaugePlugin::with_runner(resolver, RecordingRunner::default()).is_err());
    }

    #[test]
    fn test_root_without_manifest_spawns_nothing() {
        let project = TestProject::new();
        project.write_file("gauge-home/bin/gauge", "");
        let runner = RecordingRunner::default();
        let resolver = ConfigResolver::with_sources(
            project.root(),
            ProjectFile::empty(),
            ConfigLayer {
                gauge_root: Some(project.path("gauge-home")),
                ..Default::default()
            },
        );

        let result = GaugePlugin::with_runner(resolver, runner.clone());
        assert!(matches!(result, Err(Error::ManifestNotFound { ref path }) if path.ends_with("manifest.json")));
        assert!(runner.args().is_empty());
    }
}

mod operation_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_run_specs_with_env_layer() {
        let project = project_with_runner_root("tags = \"file\"\n");
        let runner = RecordingRunner::default();
        let plugin = plugin(&project, &[("GAUGE_TAGS", "env")], &runner);

        assert!(plugin.run_specs(&ConfigLayer::default(), &[]).unwrap());
        assert_eq!(runner.args(), vec![vec!["run", "--tags", "env", "specs"]]);
    }

    #[test]
    fn test_validate_format_install() {
        let project = project_with_runner_root("");
        let runner = RecordingRunner::default();
        let plugin = plugin(&project, &[], &runner);

        assert!(plugin.validate_project(&ConfigLayer::default()).unwrap());
        assert!(plugin.format_specs(&ConfigLayer::default()).unwrap());
        assert!(plugin
            .install_plugin(&ConfigLayer::default(), "html-report", None)
            .unwrap());

        assert_eq!(
            runner.args(),
            vec![
                vec!["validate", "specs"],
                vec!["format", "specs"],
                vec!["install", "html-report"],
            ]
        );
    }

    #[test]
    fn test_failed_run_is_false() {
        let project = project_with_runner_root("");
        let runner = RecordingRunner {
            fail: true,
            ..Default::default()
        };
        let plugin = plugin(&project, &[], &runner);

        assert!(!plugin.run_specs(&ConfigLayer::default(), &[]).unwrap());
    }
}

mod dispatch_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_dispatch_converts_options() {
        let project = project_with_runner_root("");
        let runner = RecordingRunner::default();
        let plugin = plugin(&project, &[], &runner);

        let outcome = plugin
            .dispatch(
                &Operation::Run { specs: vec![] },
                &options(&[
                    ("in_parallel", true.into()),
                    ("nodes", "2".into()),
                    ("env", "dev".into()),
                ]),
            )
            .unwrap();

        assert!(outcome.success);
        assert_eq!(outcome.exit_code(), 0);
        assert_eq!(outcome.diagnostic, None);
        assert_eq!(
            runner.args(),
            vec![vec!["run", "--parallel", "--n", "2", "--env", "dev", "specs"]]
        );
    }

    #[test]
    fn test_dispatch_failure_has_diagnostic() {
        let project = project_with_runner_root("");
        let runner = RecordingRunner {
            fail: true,
            ..Default::default()
        };
        let plugin = plugin(&project, &[], &runner);

        let outcome = plugin.dispatch(&Operation::Validate, &OptionMap::new()).unwrap();
        assert!(!outcome.success);
        assert_eq!(outcome.exit_code(), 1);
        assert_eq!(outcome.diagnostic.as_deref(), Some("gauge validate failed"));
    }

    #[test]
    fn test_dispatch_unknown_option_is_error() {
        let project = project_with_runner_root("");
        let runner = RecordingRunner::default();
        let plugin = plugin(&project, &[], &runner);

        let result = plugin.dispatch(&Operation::Format, &options(&[("colour", true.into())]));
        assert!(matches!(result, Err(Error::InvalidConfig { .. })));
        assert!(runner.args().is_empty());
    }

    #[test]
    fn test_dispatch_setup_error_propagates() {
        let project = project_with_runner_root("");
        std::fs::remove_dir_all(project.path("specs")).unwrap();
        let runner = RecordingRunner::default();
        let plugin = plugin(&project, &[], &runner);

        let result = plugin.dispatch(&Operation::Format, &OptionMap::new());
        assert!(matches!(result, Err(Error::SpecsDirNotFound { .. })));
    }
}

mod discovery_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_discover_from_nested_directory() {
        let project = TestProject::new().init_gauge();
        project.create_dir("specs/checkout");

        let plugin = GaugePlugin::discover(project.path("specs/checkout")).unwrap();
        assert_eq!(plugin.root(), dunce::canonicalize(project.root()).unwrap());
        assert_eq!(plugin.config().project_dir(), plugin.root());
    }

    #[test]
    fn test_open_without_manifest_names_expected_path() {
        let project = TestProject::new();
        let err = GaugePlugin::open(project.root()).unwrap_err();
        assert!(matches!(err, Error::ManifestNotFound { ref path } if path.ends_with("manifest.json")));
    }

    #[test]
    fn test_open_reports_project_file() {
        let project = TestProject::new().init_gauge();
        project.write_pyproject("tags = \"smoke\"\n");

        let plugin = GaugePlugin::open(project.root()).unwrap();
        assert!(plugin.project_file().path().unwrap().ends_with("pyproject.toml"));
    }
}
