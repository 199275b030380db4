//! Task model for ondone.
//!
//! A [`Task`] is the unit of work the engine acts on. Tasks are produced by
//! an external parser; this module defines their shape plus a small
//! checkbox-line reader used by the CLI and tests to lift a line from disk
//! into a `Task` without pulling in the full parsing subsystem.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::metadata;

/// Which storage representation a task came from.
///
/// Closed on purpose: the locator/mutator selects its backend from this and
/// new backends are an explicit extension point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// Line-oriented markdown document; tasks are addressed by line index.
    FlatText,
    /// Canvas JSON document; tasks live inside one node's text blob and are
    /// addressed by node id plus content matching.
    Board,
}

impl SourceKind {
    pub fn describe(&self) -> &'static str {
        match self {
            SourceKind::FlatText => "file",
            SourceKind::Board => "Canvas text node",
        }
    }
}

/// Where a task's text lives inside its source document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TaskLocation {
    /// Zero-based line index in a flat-text document. Trusted directly;
    /// completion events fire immediately after the line was edited.
    Line { line: usize },
    /// Canvas node id plus the verbatim line text captured at parse time.
    /// A node's text is a single blob re-parsed per operation, so there is
    /// no stable line number to store.
    BoardNode {
        node_id: String,
        original_line: String,
    },
}

impl TaskLocation {
    pub fn source_kind(&self) -> SourceKind {
        match self {
            TaskLocation::Line { .. } => SourceKind::FlatText,
            TaskLocation::BoardNode { .. } => SourceKind::Board,
        }
    }
}

/// Metadata bag carried on a task line after its display text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskMetadata {
    /// Raw onCompletion instruction, exactly as persisted on the line.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub on_completion: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,

    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub tags: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheduled_date: Option<NaiveDate>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_date: Option<NaiveDate>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,

    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub children: Vec<String>,
}

/// A single trackable to-do item parsed from a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Stable identifier.
    pub id: String,

    /// Display text with metadata markers stripped.
    pub content: String,

    /// Whether the status marker counts as completed.
    pub completed: bool,

    /// Single-character status marker inside the checkbox.
    pub status: char,

    /// Path of the owning document, relative to the vault root.
    pub file_path: String,

    /// Location descriptor; valid until the task is mutated or deleted.
    pub location: TaskLocation,

    #[serde(default)]
    pub metadata: TaskMetadata,
}

impl Task {
    pub fn source_kind(&self) -> SourceKind {
        self.location.source_kind()
    }

    /// The stored verbatim line for board tasks, if any.
    pub fn original_line(&self) -> Option<&str> {
        match &self.location {
            TaskLocation::BoardNode { original_line, .. } => Some(original_line),
            TaskLocation::Line { .. } => None,
        }
    }
}

/// Extract the onCompletion payload from a task line, if present.
///
/// Both persisted encodings are recognized: the inline glyph form
/// (`🏁 archive:Done.md`, payload runs to end of line) and the dataview
/// field form (`[onCompletion:: delete]`).
pub fn extract_on_completion(line: &str) -> Option<String> {
    if let Some(pos) = line.find(metadata::ON_COMPLETION_GLYPH) {
        let payload = line[pos + metadata::ON_COMPLETION_GLYPH.len()..].trim();
        if !payload.is_empty() {
            return Some(payload.to_string());
        }
    }
    let needle = "[onCompletion::";
    if let Some(start) = line.find(needle) {
        let after = &line[start + needle.len()..];
        if let Some(end) = after.find(']') {
            let payload = after[..end].trim();
            if !payload.is_empty() {
                return Some(payload.to_string());
            }
        }
    }
    None
}

/// Lift a checkbox line into a [`Task`] with a flat-text location.
///
/// This is a deliberately small shim for the CLI and tests; the real parser
/// lives outside this crate. Returns `None` for non-checkbox lines.
pub fn task_from_line(line: &str, file_path: &str, line_index: usize) -> Option<Task> {
    let parts = metadata::parse_checkbox_line(line)?;
    Some(Task {
        id: format!("{}:{}", file_path, line_index),
        content: metadata::core_text(parts.rest),
        completed: metadata::is_completed_marker(parts.status),
        status: parts.status,
        file_path: file_path.to_string(),
        location: TaskLocation::Line { line: line_index },
        metadata: TaskMetadata {
            on_completion: extract_on_completion(parts.rest),
            ..TaskMetadata::default()
        },
    })
}

/// Lift a checkbox line found inside a Canvas text node into a [`Task`].
pub fn task_from_node_line(line: &str, file_path: &str, node_id: &str) -> Option<Task> {
    let parts = metadata::parse_checkbox_line(line)?;
    Some(Task {
        id: format!("{}:{}", file_path, node_id),
        content: metadata::core_text(parts.rest),
        completed: metadata::is_completed_marker(parts.status),
        status: parts.status,
        file_path: file_path.to_string(),
        location: TaskLocation::BoardNode {
            node_id: node_id.to_string(),
            original_line: line.to_string(),
        },
        metadata: TaskMetadata {
            on_completion: extract_on_completion(parts.rest),
            ..TaskMetadata::default()
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_from_line_reads_checkbox_and_payload() {
        let task = task_from_line(
            "- [x] Ship release \u{1F3C1} archive",
            "Projects/notes.md",
            4,
        )
        .expect("task");
        assert_eq!(task.content, "Ship release");
        assert!(task.completed);
        assert_eq!(task.status, 'x');
        assert_eq!(task.location, TaskLocation::Line { line: 4 });
        assert_eq!(task.metadata.on_completion.as_deref(), Some("archive"));
    }

    #[test]
    fn extract_on_completion_reads_dataview_form() {
        let payload = extract_on_completion("Do thing [onCompletion:: move:Done.md] #tag");
        assert_eq!(payload.as_deref(), Some("move:Done.md"));
        assert_eq!(extract_on_completion("Plain line"), None);
    }

    #[test]
    fn board_task_keeps_original_line() {
        let line = "- [ ] Canvas task \u{23EB}";
        let task = task_from_node_line(line, "board.canvas", "node-1").expect("task");
        assert_eq!(task.source_kind(), SourceKind::Board);
        assert_eq!(task.original_line(), Some(line));
    }
}
