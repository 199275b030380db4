//! ondone parse command implementation
//!
//! Validates an onCompletion string and prints the parsed configuration
//! with its human description. Touches no files.

use crate::action::{parse_on_completion, ActionConfig};
use crate::dispatch::ExecutorTable;
use crate::error::{Error, Result};
use crate::output::{emit_success, HumanOutput, OutputOptions};

#[derive(serde::Serialize)]
struct ParseReport<'a> {
    raw: &'a str,
    config: &'a ActionConfig,
    canonical: String,
    description: String,
}

pub fn run(options: OutputOptions, value: &str) -> Result<()> {
    let outcome = parse_on_completion(value);
    let config = match outcome.config {
        Some(config) if outcome.is_valid => config,
        _ => {
            return Err(Error::InvalidOnCompletion(
                outcome
                    .error
                    .unwrap_or_else(|| "invalid value".to_string()),
            ))
        }
    };

    let table = ExecutorTable::standard();
    let description = table.describe(&config);

    let report = ParseReport {
        raw: value,
        config: &config,
        canonical: config.canonical_string(),
        description: description.clone(),
    };

    let mut human = HumanOutput::new(format!("Valid onCompletion action: {}", config.kind()));
    human.push_summary("description", description);
    human.push_summary("canonical", report.canonical.clone());

    emit_success(options, "parse", &report, Some(&human))
}
