//! Move action: relocate the task's line to another document.
//!
//! Ordering matters for failure semantics: the target document is found or
//! created and written *before* the source removal is committed, so a
//! target-side failure leaves the source untouched. The reverse case, a
//! source removal failing after the target was written, is reported as a
//! compound error naming both facts rather than rolled back.

use crate::action::{ActionConfig, ActionKind};
use crate::actions::write_line_to_target;
use crate::dispatch::{ExecutionContext, ExecutionResult, Executor};
use crate::locate::mutator_for;

pub fn executor() -> Executor {
    Executor {
        kind: ActionKind::Move,
        validate,
        execute,
        describe,
    }
}

fn validate(config: &ActionConfig) -> bool {
    matches!(config, ActionConfig::Move { .. }) && config.is_structurally_valid()
}

fn execute(ctx: ExecutionContext<'_>, config: &ActionConfig) -> ExecutionResult {
    if !validate(config) {
        return ExecutionResult::fail("Invalid move configuration");
    }
    let ActionConfig::Move {
        target_file,
        target_section,
    } = config
    else {
        unreachable!("validated above");
    };

    let mutator = mutator_for(ctx.task.source_kind());
    let line = match mutator.read_line(ctx.docs, ctx.task) {
        Ok(line) => line,
        Err(err) => return ExecutionResult::fail(err.to_string()),
    };

    if let Err(err) = write_line_to_target(ctx, target_file, &line, target_section.as_deref()) {
        return ExecutionResult::fail(err.to_string());
    }

    match mutator.remove_line(ctx.docs, ctx.task) {
        Ok(_) => ExecutionResult::ok(format!("Task moved successfully to {}", target_file)),
        Err(err) => ExecutionResult::fail(format!(
            "Task moved successfully to {}, but failed to remove from {}: {}",
            target_file,
            ctx.task.source_kind().describe(),
            err
        )),
    }
}

fn describe(config: &ActionConfig) -> String {
    match config {
        ActionConfig::Move {
            target_file,
            target_section: Some(section),
        } => format!("Move task to {} (section: {})", target_file, section),
        ActionConfig::Move { target_file, .. } => format!("Move task to {}", target_file),
        _ => "Move task to another file".to_string(),
    }
}
