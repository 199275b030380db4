//! Keep action: an explicit no-op.
//!
//! Exists so "no action" is distinguishable from an invalid config.

use crate::action::{ActionConfig, ActionKind};
use crate::dispatch::{ExecutionContext, ExecutionResult, Executor};

pub fn executor() -> Executor {
    Executor {
        kind: ActionKind::Keep,
        validate,
        execute,
        describe,
    }
}

fn validate(config: &ActionConfig) -> bool {
    matches!(config, ActionConfig::Keep)
}

fn execute(_ctx: ExecutionContext<'_>, config: &ActionConfig) -> ExecutionResult {
    if !validate(config) {
        return ExecutionResult::fail("Invalid keep configuration");
    }
    ExecutionResult::ok("Task kept (no action taken)")
}

fn describe(_config: &ActionConfig) -> String {
    "Keep the task unchanged when completed".to_string()
}
