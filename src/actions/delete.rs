//! Delete action: remove the completed task's line from its source.
//!
//! Single mutation against a single document, so no rollback handling is
//! needed here.

use crate::action::{ActionConfig, ActionKind};
use crate::dispatch::{ExecutionContext, ExecutionResult, Executor};
use crate::locate::mutator_for;

pub fn executor() -> Executor {
    Executor {
        kind: ActionKind::Delete,
        validate,
        execute,
        describe,
    }
}

fn validate(config: &ActionConfig) -> bool {
    matches!(config, ActionConfig::Delete) && config.is_structurally_valid()
}

fn execute(ctx: ExecutionContext<'_>, config: &ActionConfig) -> ExecutionResult {
    if !validate(config) {
        return ExecutionResult::fail("Invalid delete configuration");
    }

    let mutator = mutator_for(ctx.task.source_kind());
    match mutator.remove_line(ctx.docs, ctx.task) {
        Ok(_) => ExecutionResult::ok("Task deleted successfully"),
        Err(err) => ExecutionResult::fail(err.to_string()),
    }
}

fn describe(_config: &ActionConfig) -> String {
    "Delete the task when completed".to_string()
}
