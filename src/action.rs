//! Parsed onCompletion configurations.
//!
//! A task's `onCompletion` metadata is persisted as a plain string in one of
//! two syntaxes: a short form (`archive:Done/2025.md`) or a structured JSON
//! object (`{"type": "move", "targetFile": "Done.md"}`). This module turns
//! either into an [`ActionConfig`] value and validates its shape. Configs are
//! rebuilt from the string on every invocation and never persisted as
//! objects.

use serde::{Deserialize, Serialize};

/// Action kind, used as the dispatch key in the executor table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    Delete,
    Keep,
    Complete,
    Move,
    Archive,
    Duplicate,
}

impl ActionKind {
    pub const ALL: [ActionKind; 6] = [
        ActionKind::Delete,
        ActionKind::Keep,
        ActionKind::Complete,
        ActionKind::Move,
        ActionKind::Archive,
        ActionKind::Duplicate,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::Delete => "delete",
            ActionKind::Keep => "keep",
            ActionKind::Complete => "complete",
            ActionKind::Move => "move",
            ActionKind::Archive => "archive",
            ActionKind::Duplicate => "duplicate",
        }
    }

    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "delete" => Some(ActionKind::Delete),
            "keep" => Some(ActionKind::Keep),
            "complete" => Some(ActionKind::Complete),
            "move" => Some(ActionKind::Move),
            "archive" => Some(ActionKind::Archive),
            "duplicate" => Some(ActionKind::Duplicate),
            _ => None,
        }
    }
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parsed, validated onCompletion instruction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ActionConfig {
    /// Remove the completed task's line from its source document.
    Delete,
    /// Explicit no-op, distinguishable from an invalid config.
    Keep,
    /// Cascade-complete the listed related tasks.
    Complete {
        #[serde(rename = "taskIds")]
        task_ids: Vec<String>,
    },
    /// Move the task's line to another document.
    Move {
        #[serde(rename = "targetFile")]
        target_file: String,
        #[serde(rename = "targetSection", skip_serializing_if = "Option::is_none")]
        target_section: Option<String>,
    },
    /// Move the task's line to an archive document, annotated with the
    /// completion date and source path.
    Archive {
        #[serde(rename = "archiveFile", skip_serializing_if = "Option::is_none")]
        archive_file: Option<String>,
        #[serde(rename = "archiveSection", skip_serializing_if = "Option::is_none")]
        archive_section: Option<String>,
    },
    /// Copy the task's line, leaving the original in place.
    Duplicate {
        #[serde(rename = "targetFile", skip_serializing_if = "Option::is_none")]
        target_file: Option<String>,
        #[serde(rename = "targetSection", skip_serializing_if = "Option::is_none")]
        target_section: Option<String>,
        #[serde(rename = "preserveMetadata", default)]
        preserve_metadata: bool,
    },
}

impl ActionConfig {
    pub fn kind(&self) -> ActionKind {
        match self {
            ActionConfig::Delete => ActionKind::Delete,
            ActionConfig::Keep => ActionKind::Keep,
            ActionConfig::Complete { .. } => ActionKind::Complete,
            ActionConfig::Move { .. } => ActionKind::Move,
            ActionConfig::Archive { .. } => ActionKind::Archive,
            ActionConfig::Duplicate { .. } => ActionKind::Duplicate,
        }
    }

    /// Structural validity per kind: non-empty id lists, non-blank targets.
    pub fn is_structurally_valid(&self) -> bool {
        match self {
            ActionConfig::Delete | ActionConfig::Keep => true,
            ActionConfig::Complete { task_ids } => {
                !task_ids.is_empty() && task_ids.iter().all(|id| !id.trim().is_empty())
            }
            ActionConfig::Move { target_file, .. } => !target_file.trim().is_empty(),
            ActionConfig::Archive { archive_file, .. } => archive_file
                .as_deref()
                .map(|file| !file.trim().is_empty())
                .unwrap_or(true),
            ActionConfig::Duplicate { target_file, .. } => target_file
                .as_deref()
                .map(|file| !file.trim().is_empty())
                .unwrap_or(true),
        }
    }

    /// Canonical string encoding: the short form whenever the config is
    /// expressible in it, the structured JSON form otherwise.
    pub fn canonical_string(&self) -> String {
        match self {
            ActionConfig::Delete => "delete".to_string(),
            ActionConfig::Keep => "keep".to_string(),
            ActionConfig::Complete { task_ids } => {
                format!("complete:{}", task_ids.join(","))
            }
            ActionConfig::Move {
                target_file,
                target_section: None,
            } => format!("move:{}", target_file),
            ActionConfig::Archive {
                archive_file: None,
                archive_section: None,
            } => "archive".to_string(),
            ActionConfig::Archive {
                archive_file: Some(file),
                archive_section: None,
            } => format!("archive:{}", file),
            ActionConfig::Duplicate {
                target_file: None,
                target_section: None,
                preserve_metadata: false,
            } => "duplicate".to_string(),
            ActionConfig::Duplicate {
                target_file: Some(file),
                target_section: None,
                preserve_metadata: false,
            } => format!("duplicate:{}", file),
            other => serde_json::to_string(other).unwrap_or_default(),
        }
    }
}

/// Result of parsing an onCompletion string.
#[derive(Debug, Clone, Serialize)]
pub struct ParseOutcome {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config: Option<ActionConfig>,
    pub is_valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ParseOutcome {
    fn valid(config: ActionConfig) -> Self {
        Self {
            config: Some(config),
            is_valid: true,
            error: None,
        }
    }

    fn invalid(error: impl Into<String>) -> Self {
        Self {
            config: None,
            is_valid: false,
            error: Some(error.into()),
        }
    }
}

/// Parse an onCompletion string in either syntax.
pub fn parse_on_completion(raw: &str) -> ParseOutcome {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return ParseOutcome::invalid("Empty or invalid value");
    }

    if trimmed.starts_with('{') {
        return parse_structured(trimmed);
    }
    parse_short_form(trimmed)
}

fn parse_structured(raw: &str) -> ParseOutcome {
    // Two failure classes: text that is not JSON at all, and JSON whose
    // shape does not match any action kind.
    let value: serde_json::Value = match serde_json::from_str(raw) {
        Ok(value) => value,
        Err(err) => return ParseOutcome::invalid(format!("Parse error: {}", err)),
    };

    match serde_json::from_value::<ActionConfig>(value) {
        Ok(config) if config.is_structurally_valid() => ParseOutcome::valid(config),
        Ok(_) | Err(_) => ParseOutcome::invalid("Invalid configuration structure"),
    }
}

fn parse_short_form(raw: &str) -> ParseOutcome {
    let (keyword, argument) = match raw.split_once(':') {
        Some((left, right)) => (left, Some(right)),
        None => (raw, None),
    };
    let keyword = keyword.trim().to_ascii_lowercase();

    let Some(kind) = ActionKind::from_keyword(&keyword) else {
        return ParseOutcome::invalid("Unrecognized onCompletion format");
    };

    let config = match (kind, argument) {
        (ActionKind::Delete, None) => ActionConfig::Delete,
        (ActionKind::Keep, None) => ActionConfig::Keep,
        (ActionKind::Complete, Some(ids)) => ActionConfig::Complete {
            task_ids: ids
                .split(',')
                .map(str::trim)
                .filter(|id| !id.is_empty())
                .map(str::to_string)
                .collect(),
        },
        (ActionKind::Move, Some(path)) => ActionConfig::Move {
            target_file: path.trim().to_string(),
            target_section: None,
        },
        (ActionKind::Archive, None) => ActionConfig::Archive {
            archive_file: None,
            archive_section: None,
        },
        (ActionKind::Archive, Some(path)) => ActionConfig::Archive {
            archive_file: Some(path.trim().to_string()),
            archive_section: None,
        },
        (ActionKind::Duplicate, None) => ActionConfig::Duplicate {
            target_file: None,
            target_section: None,
            preserve_metadata: false,
        },
        (ActionKind::Duplicate, Some(path)) => ActionConfig::Duplicate {
            target_file: Some(path.trim().to_string()),
            target_section: None,
            preserve_metadata: false,
        },
        // delete/keep take no argument; complete and move require one.
        _ => return ParseOutcome::invalid("Unrecognized onCompletion format"),
    };

    if !config.is_structurally_valid() {
        return ParseOutcome::invalid("Invalid configuration structure");
    }
    ParseOutcome::valid(config)
}
