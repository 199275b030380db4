//! Completion-action dispatch.
//!
//! The dispatcher is the engine's facade: it owns nothing mutable, borrows
//! an immutable executor table built at startup, parses the stored
//! onCompletion string on every invocation and routes the parsed config to
//! the matching executor. Every failure mode is converted into an
//! [`ExecutionResult`]; callers never see a raw error or panic.

use std::panic::{catch_unwind, AssertUnwindSafe};

use serde::Serialize;

use crate::action::{parse_on_completion, ActionConfig, ActionKind};
use crate::actions;
use crate::config::Config;
use crate::events::{EngineEvent, EventKind, EventSink};
use crate::store::{DocumentStore, TaskStore};
use crate::task::Task;

/// Outcome of one executor invocation.
///
/// Exactly one of `message`/`error` is meaningful depending on `success`.
/// Partial success across documents is reported as failure with a compound
/// error naming both halves; it is never silent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExecutionResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ExecutionResult {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            error: None,
        }
    }

    pub fn fail(error: impl Into<String>) -> Self {
        Self {
            success: false,
            message: None,
            error: Some(error.into()),
        }
    }
}

/// Ephemeral bundle of references passed by value into every executor call.
#[derive(Clone, Copy)]
pub struct ExecutionContext<'a> {
    pub task: &'a Task,
    pub docs: &'a dyn DocumentStore,
    pub tasks: &'a dyn TaskStore,
    pub config: &'a Config,
}

/// Handler function triple for one action kind.
#[derive(Clone, Copy)]
pub struct Executor {
    pub kind: ActionKind,
    pub validate: fn(&ActionConfig) -> bool,
    pub execute: fn(ExecutionContext<'_>, &ActionConfig) -> ExecutionResult,
    pub describe: fn(&ActionConfig) -> String,
}

/// Immutable executor registry, built once at startup and passed by
/// reference into the dispatcher.
pub struct ExecutorTable {
    executors: Vec<Executor>,
}

impl ExecutorTable {
    /// Table with all six standard executors registered.
    pub fn standard() -> Self {
        Self {
            executors: vec![
                actions::delete::executor(),
                actions::keep::executor(),
                actions::complete::executor(),
                actions::mv::executor(),
                actions::archive::executor(),
                actions::duplicate::executor(),
            ],
        }
    }

    /// Table with an explicit executor set. Tests use this to exercise the
    /// missing-executor path.
    pub fn with_executors(executors: Vec<Executor>) -> Self {
        Self { executors }
    }

    pub fn get(&self, kind: ActionKind) -> Option<&Executor> {
        self.executors.iter().find(|executor| executor.kind == kind)
    }

    /// Human description of a config, for settings display. Pure.
    pub fn describe(&self, config: &ActionConfig) -> String {
        match self.get(config.kind()) {
            Some(executor) => (executor.describe)(config),
            None => format!("Unknown action: {}", config.kind()),
        }
    }
}

impl Default for ExecutorTable {
    fn default() -> Self {
        Self::standard()
    }
}

/// The engine facade.
pub struct Dispatcher<'a> {
    table: &'a ExecutorTable,
    sink: &'a dyn EventSink,
}

impl<'a> Dispatcher<'a> {
    pub fn new(table: &'a ExecutorTable, sink: &'a dyn EventSink) -> Self {
        Self { table, sink }
    }

    /// Route a parsed config to its executor.
    ///
    /// A missing table entry is a configuration/programming error, never
    /// retried. A panicking executor is caught and normalized; this method
    /// never propagates.
    pub fn execute(&self, ctx: ExecutionContext<'_>, config: &ActionConfig) -> ExecutionResult {
        let kind = config.kind();
        let Some(executor) = self.table.get(kind) else {
            return ExecutionResult::fail(format!(
                "No executor found for action type: {}",
                kind
            ));
        };

        let execute = executor.execute;
        match catch_unwind(AssertUnwindSafe(|| execute(ctx, config))) {
            Ok(result) => result,
            Err(panic) => ExecutionResult::fail(format!(
                "Execution failed: {}",
                panic_message(panic.as_ref())
            )),
        }
    }

    /// Entry point for task-completed notifications.
    ///
    /// Most tasks carry no onCompletion metadata; those are a silent no-op.
    /// A present-but-unparsable value produces a warning event and nothing
    /// else. Execution failures are reported to the sink, not to the
    /// caller: this runs on a background event.
    pub fn on_task_completed(&self, ctx: ExecutionContext<'_>) {
        let Some(raw) = ctx.task.metadata.on_completion.as_deref() else {
            return;
        };

        let outcome = parse_on_completion(raw);
        let Some(config) = outcome.config.filter(|_| outcome.is_valid) else {
            self.sink.emit(
                &EngineEvent::new(EventKind::ParseWarning, &ctx.task.id).with_detail(
                    outcome
                        .error
                        .unwrap_or_else(|| "invalid onCompletion value".to_string()),
                ),
            );
            return;
        };

        let result = self.execute(ctx, &config);
        let event = if result.success {
            EngineEvent::new(EventKind::ActionSucceeded, &ctx.task.id)
                .with_action(config.kind().as_str())
                .with_detail(result.message.clone().unwrap_or_default())
        } else {
            EngineEvent::new(EventKind::ActionFailed, &ctx.task.id)
                .with_action(config.kind().as_str())
                .with_detail(result.error.clone().unwrap_or_default())
        };
        self.sink.emit(&event);
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
