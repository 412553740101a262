//! Runner operations: run, validate, format and install

use colored::Colorize;
use gauge_core::{GaugePlugin, Operation, OptionMap, Outcome};

use crate::error::Result;

/// Dispatch `operation` and report the outcome.
///
/// Returns the process exit code. Setup errors propagate to `main`.
pub fn run_operation(plugin: &GaugePlugin, operation: &Operation, options: &OptionMap) -> Result<i32> {
    tracing::debug!(%operation, ?options, "Dispatching");
    let outcome = plugin.dispatch(operation, options)?;
    report(operation, &outcome);
    Ok(outcome.exit_code())
}

fn report(operation: &Operation, outcome: &Outcome) {
    if outcome.success {
        println!("{} {}", "✓".green().bold(), success_message(operation));
    } else {
        eprintln!("{} {}", "✗".red().bold(), failure_message(operation));
    }
}

/// Line printed when an operation succeeds.
pub fn success_message(operation: &Operation) -> String {
    match operation {
        Operation::Run { .. } => "Gauge execution completed successfully".to_string(),
        Operation::Validate => "Gauge project validation completed successfully".to_string(),
        Operation::Format => "Gauge specs formatting completed successfully".to_string(),
        Operation::Install { plugin, .. } => {
            format!("Gauge plugin '{plugin}' installed successfully")
        }
    }
}

/// Line printed when the runner reports failure.
pub fn failure_message(operation: &Operation) -> String {
    match operation {
        Operation::Run { .. } => "Gauge execution failed".to_string(),
        Operation::Validate => "Gauge project validation failed".to_string(),
        Operation::Format => "Gauge specs formatting failed".to_string(),
        Operation::Install { plugin, .. } => {
            format!("Failed to install Gauge plugin '{plugin}'")
        }
    }
}
