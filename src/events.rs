//! Engine event output.
//!
//! The dispatcher runs on background completion notifications, so failures
//! are reported to an injected sink instead of being surfaced to the caller.
//! Sinks receive structured events and may write them as JSON lines, route
//! them to tracing, or collect them in memory for assertions.

use std::cell::RefCell;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::Result;

pub const EVENT_SCHEMA_VERSION: &str = "ondone.event.v1";

/// Event kinds emitted by the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// A stored onCompletion string failed to parse; no executor ran.
    ParseWarning,
    /// An action executed and reported success.
    ActionSucceeded,
    /// An action executed and reported failure (including partial failure).
    ActionFailed,
}

/// A structured engine event.
#[derive(Debug, Clone, Serialize)]
pub struct EngineEvent {
    pub schema_version: &'static str,
    pub event: EventKind,
    pub timestamp: DateTime<Utc>,
    pub task_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl EngineEvent {
    pub fn new(event: EventKind, task_id: impl Into<String>) -> Self {
        Self {
            schema_version: EVENT_SCHEMA_VERSION,
            event,
            timestamp: Utc::now(),
            task_id: task_id.into(),
            action: None,
            detail: None,
        }
    }

    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

/// Destination for engine events.
#[derive(Debug, Clone)]
pub enum EventDestination {
    Stdout,
    File(PathBuf),
}

impl EventDestination {
    pub fn parse(raw: Option<&str>) -> Option<Self> {
        raw.and_then(|value| {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                return None;
            }
            if trimmed == "-" {
                return Some(EventDestination::Stdout);
            }
            Some(EventDestination::File(PathBuf::from(trimmed)))
        })
    }

    pub fn open(&self) -> Result<JsonlSink> {
        match self {
            EventDestination::Stdout => Ok(JsonlSink::stdout()),
            EventDestination::File(path) => JsonlSink::file(path),
        }
    }
}

/// Receiver for engine events. Emission is best-effort; a sink that cannot
/// write must not fail the action that produced the event.
pub trait EventSink {
    fn emit(&self, event: &EngineEvent);
}

/// Routes events to the `tracing` subscriber. The default sink.
#[derive(Debug, Default)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn emit(&self, event: &EngineEvent) {
        match event.event {
            EventKind::ParseWarning | EventKind::ActionFailed => tracing::warn!(
                task_id = %event.task_id,
                action = event.action.as_deref().unwrap_or("-"),
                detail = event.detail.as_deref().unwrap_or("-"),
                kind = ?event.event,
                "completion action event"
            ),
            EventKind::ActionSucceeded => tracing::debug!(
                task_id = %event.task_id,
                action = event.action.as_deref().unwrap_or("-"),
                "completion action succeeded"
            ),
        }
    }
}

/// Writes events as JSON lines to stdout or a file.
pub struct JsonlSink {
    writer: RefCell<Box<dyn Write>>,
}

impl JsonlSink {
    pub fn stdout() -> Self {
        Self {
            writer: RefCell::new(Box::new(std::io::stdout())),
        }
    }

    pub fn file(path: &Path) -> Result<Self> {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)?;
        Ok(Self {
            writer: RefCell::new(Box::new(file)),
        })
    }
}

impl EventSink for JsonlSink {
    fn emit(&self, event: &EngineEvent) {
        let Ok(serialized) = serde_json::to_vec(event) else {
            return;
        };
        let mut writer = self.writer.borrow_mut();
        let _ = writer.write_all(&serialized);
        let _ = writer.write_all(b"\n");
        let _ = writer.flush();
    }
}

/// Collects events in memory. Used by tests to assert on the
/// swallow-and-log path.
#[derive(Debug, Default)]
pub struct MemorySink {
    events: RefCell<Vec<EngineEvent>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<EngineEvent> {
        self.events.borrow().clone()
    }

    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }
}

impl EventSink for MemorySink {
    fn emit(&self, event: &EngineEvent) {
        self.events.borrow_mut().push(event.clone());
    }
}
