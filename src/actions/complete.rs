//! Complete action: cascade-complete a list of related tasks.
//!
//! Best-effort batch semantics: each id is fetched and updated
//! independently, a missing or failing id never aborts the rest, and
//! partial success counts as success. Tasks that are already completed are
//! skipped silently.

use crate::action::{ActionConfig, ActionKind};
use crate::dispatch::{ExecutionContext, ExecutionResult, Executor};

pub fn executor() -> Executor {
    Executor {
        kind: ActionKind::Complete,
        validate,
        execute,
        describe,
    }
}

fn validate(config: &ActionConfig) -> bool {
    matches!(config, ActionConfig::Complete { .. }) && config.is_structurally_valid()
}

fn execute(ctx: ExecutionContext<'_>, config: &ActionConfig) -> ExecutionResult {
    if !validate(config) {
        return ExecutionResult::fail("Invalid complete configuration");
    }
    let ActionConfig::Complete { task_ids } = config else {
        unreachable!("validated above");
    };

    let mut succeeded: Vec<&str> = Vec::new();
    let mut failures: Vec<String> = Vec::new();

    for id in task_ids {
        let Some(mut related) = ctx.tasks.get_task_by_id(id) else {
            failures.push(format!("Task not found: {}", id));
            continue;
        };
        if related.completed {
            continue;
        }

        related.completed = true;
        related.status = 'x';
        related.metadata.completed_date = Some(chrono::Local::now().date_naive());

        match ctx.tasks.update_task(&related) {
            Ok(()) => succeeded.push(id),
            Err(err) => failures.push(format!("Failed to complete task {}: {}", id, err)),
        }
    }

    if succeeded.is_empty() && !failures.is_empty() {
        return ExecutionResult::fail(failures.join("; "));
    }

    let mut message = if succeeded.is_empty() {
        "No tasks required completion".to_string()
    } else {
        format!("Completed tasks: {}", succeeded.join(", "))
    };
    if !failures.is_empty() {
        message.push_str("; Failed: ");
        message.push_str(&failures.join("; "));
    }
    ExecutionResult::ok(message)
}

fn describe(config: &ActionConfig) -> String {
    match config {
        ActionConfig::Complete { task_ids } => {
            format!("Complete related tasks: {}", task_ids.join(", "))
        }
        _ => "Complete related tasks".to_string(),
    }
}
