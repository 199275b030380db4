//! ondone run command implementation
//!
//! Completes the task at a given location and applies its onCompletion
//! action. Foreground runs surface the execution result directly (errors
//! exit non-zero); `--background` exercises the event entry point, where
//! failures only reach the event sink.

use std::path::PathBuf;

use crate::action::parse_on_completion;
use crate::config::Config;
use crate::dispatch::{Dispatcher, ExecutionContext, ExecutorTable};
use crate::error::{Error, Result};
use crate::events::{EventDestination, EventSink, TracingSink};
use crate::locate::{mutator_for, FlatDocument};
use crate::metadata;
use crate::output::{emit_success, HumanOutput, OutputOptions};
use crate::store::{DocumentStore, MemoryTaskStore, VaultStore};
use crate::task::{self, Task, TaskLocation};

pub struct RunArgs {
    pub vault: PathBuf,
    pub file: String,
    pub line: usize,
    pub node: Option<String>,
    pub action: Option<String>,
    pub background: bool,
    pub events: Option<String>,
}

#[derive(serde::Serialize)]
struct RunReport<'a> {
    file: &'a str,
    task: &'a str,
    action: Option<String>,
    message: Option<String>,
}

pub fn run(options: OutputOptions, args: RunArgs) -> Result<()> {
    let store = VaultStore::new(args.vault.clone())?;
    let config = Config::load_from_vault(store.root())?;

    let mut task = load_task(&store, &args)?;
    if let Some(action) = &args.action {
        task.metadata.on_completion = Some(action.clone());
    }

    mark_completed(&store, &mut task)?;

    let task_store = MemoryTaskStore::new();
    let table = ExecutorTable::standard();
    let ctx = ExecutionContext {
        task: &task,
        docs: &store,
        tasks: &task_store,
        config: &config,
    };

    if args.background {
        let tracing_sink = TracingSink;
        let file_sink;
        let sink: &dyn EventSink = match EventDestination::parse(args.events.as_deref()) {
            Some(destination) => {
                file_sink = destination.open()?;
                &file_sink
            }
            None => &tracing_sink,
        };
        Dispatcher::new(&table, sink).on_task_completed(ctx);

        let report = RunReport {
            file: &args.file,
            task: &task.content,
            action: task.metadata.on_completion.clone(),
            message: Some("completion event dispatched".to_string()),
        };
        let human = HumanOutput::new("Completion event dispatched");
        return emit_success(options, "run", &report, Some(&human));
    }

    let Some(raw) = task.metadata.on_completion.clone() else {
        let report = RunReport {
            file: &args.file,
            task: &task.content,
            action: None,
            message: Some("task completed; no onCompletion action".to_string()),
        };
        let human = HumanOutput::new("Task completed (no onCompletion action)");
        return emit_success(options, "run", &report, Some(&human));
    };

    let outcome = parse_on_completion(&raw);
    let action_config = match outcome.config {
        Some(config) if outcome.is_valid => config,
        _ => {
            return Err(Error::InvalidOnCompletion(
                outcome.error.unwrap_or_else(|| "invalid value".to_string()),
            ))
        }
    };

    let sink = TracingSink;
    let result = Dispatcher::new(&table, &sink).execute(ctx, &action_config);
    if !result.success {
        return Err(Error::OperationFailed(
            result.error.unwrap_or_else(|| "unknown failure".to_string()),
        ));
    }

    let message = result.message.unwrap_or_default();
    let report = RunReport {
        file: &args.file,
        task: &task.content,
        action: Some(raw),
        message: Some(message.clone()),
    };
    let mut human = HumanOutput::new(message);
    human.push_summary("task", task.content.clone());
    emit_success(options, "run", &report, Some(&human))
}

/// Lift the addressed line into a [`Task`].
fn load_task(store: &VaultStore, args: &RunArgs) -> Result<Task> {
    let content = store.read(&args.file)?;

    if args.file.ends_with(".canvas") {
        let node_id = args.node.as_deref().ok_or_else(|| {
            Error::InvalidArgument("--node is required for .canvas files".to_string())
        })?;
        let board = crate::board::BoardDocument::parse(&content, &args.file)?;
        let node_index = board
            .node_index(node_id)
            .ok_or_else(|| Error::NodeNotFound(node_id.to_string()))?;
        let text = FlatDocument::parse(board.nodes[node_index].text.as_deref().unwrap_or_default());
        let line = text.line(args.line).ok_or_else(|| {
            Error::InvalidArgument(format!("line {} out of range in node", args.line))
        })?;
        return task::task_from_node_line(line, &args.file, node_id).ok_or_else(|| {
            Error::InvalidArgument(format!("line {} is not a task line", args.line))
        });
    }

    let document = FlatDocument::parse(&content);
    let line = document
        .line(args.line)
        .ok_or_else(|| Error::InvalidArgument(format!("line {} out of range", args.line)))?;
    task::task_from_line(line, &args.file, args.line)
        .ok_or_else(|| Error::InvalidArgument(format!("line {} is not a task line", args.line)))
}

/// Flip the checkbox to done in the document, the edit a real completion
/// event would follow.
fn mark_completed(store: &dyn DocumentStore, task: &mut Task) -> Result<()> {
    if task.completed {
        return Ok(());
    }
    let mutator = mutator_for(task.source_kind());
    let line = mutator.read_line(store, task)?;
    let updated = metadata::with_status(&line, 'x');
    mutator.replace_line(store, task, &updated)?;
    task.completed = true;
    task.status = 'x';
    if let TaskLocation::BoardNode { original_line, .. } = &mut task.location {
        *original_line = updated;
    }
    Ok(())
}
