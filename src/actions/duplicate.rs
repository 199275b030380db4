//! Duplicate action: copy the task's line without removing the original.
//!
//! The copy's checkbox is reset to incomplete and a `(duplicated <date>)`
//! marker is appended. Unless `preserveMetadata` is set, completion and
//! scheduled date annotations are stripped from the copy; the original line
//! is never touched. With no target file the copy lands on the line
//! directly after the original; a target-file creation failure aborts the
//! whole operation before anything is written.

use crate::action::{ActionConfig, ActionKind};
use crate::actions::{today, write_line_to_target};
use crate::dispatch::{ExecutionContext, ExecutionResult, Executor};
use crate::locate::mutator_for;
use crate::metadata;

pub fn executor() -> Executor {
    Executor {
        kind: ActionKind::Duplicate,
        validate,
        execute,
        describe,
    }
}

fn validate(config: &ActionConfig) -> bool {
    matches!(config, ActionConfig::Duplicate { .. }) && config.is_structurally_valid()
}

fn execute(ctx: ExecutionContext<'_>, config: &ActionConfig) -> ExecutionResult {
    if !validate(config) {
        return ExecutionResult::fail("Invalid duplicate configuration");
    }
    let ActionConfig::Duplicate {
        target_file,
        target_section,
        preserve_metadata,
    } = config
    else {
        unreachable!("validated above");
    };

    let mutator = mutator_for(ctx.task.source_kind());
    let line = match mutator.read_line(ctx.docs, ctx.task) {
        Ok(line) => line,
        Err(err) => return ExecutionResult::fail(err.to_string()),
    };
    let copy = duplicated_line(&line, *preserve_metadata);

    match target_file.as_deref() {
        Some(file) => {
            if let Err(err) = write_line_to_target(ctx, file, &copy, target_section.as_deref()) {
                return ExecutionResult::fail(err.to_string());
            }
            ExecutionResult::ok(format!("Task duplicated to {}", file))
        }
        None => match mutator.insert_after(ctx.docs, ctx.task, &copy) {
            Ok(()) => ExecutionResult::ok("Task duplicated"),
            Err(err) => ExecutionResult::fail(err.to_string()),
        },
    }
}

/// Build the duplicated copy of a task line.
fn duplicated_line(line: &str, preserve_metadata: bool) -> String {
    let mut copy = metadata::with_status(line, ' ');
    if !preserve_metadata {
        copy = metadata::strip_date_annotation(&copy, metadata::COMPLETED_GLYPH);
        copy = metadata::strip_date_annotation(&copy, metadata::SCHEDULED_GLYPH);
    }
    format!("{} (duplicated {})", copy.trim_end(), today())
}

fn describe(config: &ActionConfig) -> String {
    match config {
        ActionConfig::Duplicate {
            target_file: Some(file),
            ..
        } => format!("Duplicate task to {}", file),
        _ => "Duplicate task in the same file".to_string(),
    }
}
