mod support;

use ondone::action::{ActionConfig, ActionKind};
use ondone::dispatch::{Dispatcher, ExecutionContext, ExecutionResult, Executor, ExecutorTable};
use ondone::events::{EventKind, MemorySink};
use ondone::store::{DocumentStore, MemoryStore, MemoryTaskStore};

use support::{flat_task, test_config};

#[test]
fn task_without_on_completion_is_a_silent_no_op() {
    let docs = MemoryStore::new().with_document("notes.md", "- [x] plain task\n");
    let tasks = MemoryTaskStore::new();
    let config = test_config();
    let task = flat_task("- [x] plain task", "notes.md", 0);

    let table = ExecutorTable::standard();
    let sink = MemorySink::new();
    Dispatcher::new(&table, &sink).on_task_completed(ExecutionContext {
        task: &task,
        docs: &docs,
        tasks: &tasks,
        config: &config,
    });

    assert!(sink.is_empty());
    assert_eq!(docs.read("notes.md").expect("read"), "- [x] plain task\n");
}

#[test]
fn unparsable_value_emits_warning_and_nothing_else() {
    let line = "- [x] task \u{1F3C1} explode";
    let docs = MemoryStore::new().with_document("notes.md", &format!("{}\n", line));
    let tasks = MemoryTaskStore::new();
    let config = test_config();
    let task = flat_task(line, "notes.md", 0);

    let table = ExecutorTable::standard();
    let sink = MemorySink::new();
    Dispatcher::new(&table, &sink).on_task_completed(ExecutionContext {
        task: &task,
        docs: &docs,
        tasks: &tasks,
        config: &config,
    });

    let events = sink.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].event, EventKind::ParseWarning);
    assert_eq!(
        events[0].detail.as_deref(),
        Some("Unrecognized onCompletion format")
    );
    // No executor ran.
    assert_eq!(docs.read("notes.md").expect("read"), format!("{}\n", line));
}

#[test]
fn execution_failure_reaches_the_sink_only() {
    let line = "- [x] task \u{1F3C1} delete";
    // Source file intentionally absent.
    let docs = MemoryStore::new();
    let tasks = MemoryTaskStore::new();
    let config = test_config();
    let task = flat_task(line, "notes.md", 0);

    let table = ExecutorTable::standard();
    let sink = MemorySink::new();
    Dispatcher::new(&table, &sink).on_task_completed(ExecutionContext {
        task: &task,
        docs: &docs,
        tasks: &tasks,
        config: &config,
    });

    let events = sink.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].event, EventKind::ActionFailed);
    assert_eq!(events[0].action.as_deref(), Some("delete"));
}

#[test]
fn successful_action_emits_success_event() {
    let line = "- [x] task \u{1F3C1} keep";
    let docs = MemoryStore::new().with_document("notes.md", &format!("{}\n", line));
    let tasks = MemoryTaskStore::new();
    let config = test_config();
    let task = flat_task(line, "notes.md", 0);

    let table = ExecutorTable::standard();
    let sink = MemorySink::new();
    Dispatcher::new(&table, &sink).on_task_completed(ExecutionContext {
        task: &task,
        docs: &docs,
        tasks: &tasks,
        config: &config,
    });

    let events = sink.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].event, EventKind::ActionSucceeded);
    assert_eq!(events[0].action.as_deref(), Some("keep"));
}

#[test]
fn missing_executor_is_reported_not_thrown() {
    let docs = MemoryStore::new();
    let tasks = MemoryTaskStore::new();
    let config = test_config();
    let task = flat_task("- [x] task", "notes.md", 0);

    let table = ExecutorTable::with_executors(Vec::new());
    let sink = MemorySink::new();
    let result = Dispatcher::new(&table, &sink).execute(
        ExecutionContext {
            task: &task,
            docs: &docs,
            tasks: &tasks,
            config: &config,
        },
        &ActionConfig::Delete,
    );

    assert!(!result.success);
    assert_eq!(
        result.error.as_deref(),
        Some("No executor found for action type: delete")
    );
}

#[test]
fn panicking_executor_is_normalized() {
    fn panicking(_: ExecutionContext<'_>, _: &ActionConfig) -> ExecutionResult {
        panic!("boom");
    }

    let docs = MemoryStore::new();
    let tasks = MemoryTaskStore::new();
    let config = test_config();
    let task = flat_task("- [x] task", "notes.md", 0);

    let table = ExecutorTable::with_executors(vec![Executor {
        kind: ActionKind::Keep,
        validate: |config| matches!(config, ActionConfig::Keep),
        execute: panicking,
        describe: |_| String::new(),
    }]);
    let sink = MemorySink::new();
    let result = Dispatcher::new(&table, &sink).execute(
        ExecutionContext {
            task: &task,
            docs: &docs,
            tasks: &tasks,
            config: &config,
        },
        &ActionConfig::Keep,
    );

    assert!(!result.success);
    assert_eq!(result.error.as_deref(), Some("Execution failed: boom"));
}

#[test]
fn every_executor_rejects_foreign_configs() {
    let table = ExecutorTable::standard();
    let samples = [
        ActionConfig::Delete,
        ActionConfig::Keep,
        ActionConfig::Complete {
            task_ids: vec!["a".to_string()],
        },
        ActionConfig::Move {
            target_file: "dst.md".to_string(),
            target_section: None,
        },
        ActionConfig::Archive {
            archive_file: None,
            archive_section: None,
        },
        ActionConfig::Duplicate {
            target_file: None,
            target_section: None,
            preserve_metadata: false,
        },
    ];

    for kind in ActionKind::ALL {
        let executor = table.get(kind).expect("registered");
        for sample in &samples {
            let accepts = (executor.validate)(sample);
            assert_eq!(
                accepts,
                sample.kind() == kind,
                "executor {kind} on config {:?}",
                sample.kind()
            );
        }
    }
}
