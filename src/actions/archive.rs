//! Archive action: move the task's line to an archive document with a
//! completion annotation.
//!
//! Shaped like move, with defaults from `.ondone.toml` when the config
//! names no archive file or section. The archived copy is suffixed with
//! `- Completed <date> (from <source>)`; a copy taken from a Canvas node
//! additionally drops its onCompletion annotations and is forced to the
//! completed marker even when the source task was not yet marked done.
//! Target-before-source ordering and compound partial-failure errors match
//! the move action.

use crate::action::{ActionConfig, ActionKind};
use crate::actions::{today, write_line_to_target};
use crate::dispatch::{ExecutionContext, ExecutionResult, Executor};
use crate::locate::mutator_for;
use crate::metadata;
use crate::task::SourceKind;

pub fn executor() -> Executor {
    Executor {
        kind: ActionKind::Archive,
        validate,
        execute,
        describe,
    }
}

fn validate(config: &ActionConfig) -> bool {
    matches!(config, ActionConfig::Archive { .. }) && config.is_structurally_valid()
}

fn execute(ctx: ExecutionContext<'_>, config: &ActionConfig) -> ExecutionResult {
    if !validate(config) {
        return ExecutionResult::fail("Invalid archive configuration");
    }
    let ActionConfig::Archive {
        archive_file,
        archive_section,
    } = config
    else {
        unreachable!("validated above");
    };

    let file = archive_file
        .clone()
        .unwrap_or_else(|| ctx.config.archive.default_file.clone());
    let section = archive_section
        .clone()
        .unwrap_or_else(|| ctx.config.archive.default_section.clone());

    let mutator = mutator_for(ctx.task.source_kind());
    let line = match mutator.read_line(ctx.docs, ctx.task) {
        Ok(line) => line,
        Err(err) => return ExecutionResult::fail(err.to_string()),
    };
    let archived = archived_line(&line, ctx.task.source_kind(), &ctx.task.file_path);

    if let Err(err) = write_line_to_target(ctx, &file, &archived, Some(&section)) {
        return ExecutionResult::fail(err.to_string());
    }

    match mutator.remove_line(ctx.docs, ctx.task) {
        Ok(_) => ExecutionResult::ok(format!("Task archived successfully to {}", file)),
        Err(err) => ExecutionResult::fail(format!(
            "Task archived successfully to {}, but failed to remove from {}: {}",
            file,
            ctx.task.source_kind().describe(),
            err
        )),
    }
}

/// Build the archived copy of a task line.
fn archived_line(line: &str, source: SourceKind, source_path: &str) -> String {
    let mut copy = line.to_string();
    if source == SourceKind::Board {
        if let Some(parts) = metadata::parse_checkbox_line(&copy) {
            let rest = metadata::strip_on_completion(parts.rest);
            copy = format!("{}{} [x] {}", parts.indent, parts.bullet, rest);
        }
    }
    format!(
        "{} - Completed {} (from {})",
        copy.trim_end(),
        today(),
        source_path
    )
}

fn describe(config: &ActionConfig) -> String {
    match config {
        ActionConfig::Archive {
            archive_file: Some(file),
            archive_section: Some(section),
        } => format!("Archive task to {} (section: {})", file, section),
        ActionConfig::Archive {
            archive_file: Some(file),
            ..
        } => format!("Archive task to {}", file),
        _ => "Archive task to the default archive file".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn board_copy_drops_on_completion_and_forces_marker() {
        let line = "- [/] Canvas task \u{1F3C1} archive";
        let archived = archived_line(line, SourceKind::Board, "b.canvas");
        assert!(archived.starts_with("- [x] Canvas task - Completed "));
        assert!(archived.ends_with("(from b.canvas)"));
        assert!(!archived.contains('\u{1F3C1}'));
    }

    #[test]
    fn flat_copy_keeps_line_verbatim_before_annotation() {
        let line = "  - [x] Done thing #tag";
        let archived = archived_line(line, SourceKind::FlatText, "notes.md");
        assert!(archived.starts_with("  - [x] Done thing #tag - Completed "));
    }
}
