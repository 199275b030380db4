mod support;

use ondone::action::ActionConfig;
use ondone::dispatch::{Dispatcher, ExecutionContext, ExecutorTable};
use ondone::events::MemorySink;
use ondone::store::{DocumentStore, MemoryStore, MemoryTaskStore};

use support::{flat_task, test_config, FailingStore};

fn run_action(
    docs: &dyn DocumentStore,
    task: &ondone::task::Task,
    action: &ActionConfig,
) -> ondone::dispatch::ExecutionResult {
    let tasks = MemoryTaskStore::new();
    let config = test_config();
    let table = ExecutorTable::standard();
    let sink = MemorySink::new();
    Dispatcher::new(&table, &sink).execute(
        ExecutionContext {
            task,
            docs,
            tasks: &tasks,
            config: &config,
        },
        action,
    )
}

fn today() -> String {
    chrono::Local::now().date_naive().format("%Y-%m-%d").to_string()
}

#[test]
fn same_document_copy_lands_after_original() {
    let docs = MemoryStore::new().with_document("notes.md", "- [x] repeat me\n- [ ] other\n");
    let task = flat_task("- [x] repeat me", "notes.md", 0);

    let result = run_action(
        &docs,
        &task,
        &ActionConfig::Duplicate {
            target_file: None,
            target_section: None,
            preserve_metadata: false,
        },
    );

    assert!(result.success, "{:?}", result.error);
    assert_eq!(
        docs.read("notes.md").expect("read"),
        format!(
            "- [x] repeat me\n- [ ] repeat me (duplicated {})\n- [ ] other\n",
            today()
        )
    );
}

#[test]
fn copy_strips_dates_but_original_is_untouched() {
    let line = "- [x] repeat me \u{2705} 2025-01-01 \u{23F3} 2025-02-01";
    let docs = MemoryStore::new().with_document("notes.md", &format!("{}\n", line));
    let task = flat_task(line, "notes.md", 0);

    let result = run_action(
        &docs,
        &task,
        &ActionConfig::Duplicate {
            target_file: None,
            target_section: None,
            preserve_metadata: false,
        },
    );

    assert!(result.success, "{:?}", result.error);
    let content = docs.read("notes.md").expect("read");
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines[0], line, "original must stay byte-identical");
    assert_eq!(
        lines[1],
        format!("- [ ] repeat me (duplicated {})", today())
    );
}

#[test]
fn preserve_metadata_keeps_dates_on_the_copy() {
    let line = "- [x] repeat me \u{2705} 2025-01-01";
    let docs = MemoryStore::new().with_document("notes.md", &format!("{}\n", line));
    let task = flat_task(line, "notes.md", 0);

    let result = run_action(
        &docs,
        &task,
        &ActionConfig::Duplicate {
            target_file: None,
            target_section: None,
            preserve_metadata: true,
        },
    );

    assert!(result.success, "{:?}", result.error);
    let content = docs.read("notes.md").expect("read");
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(
        lines[1],
        format!("- [ ] repeat me \u{2705} 2025-01-01 (duplicated {})", today())
    );
}

#[test]
fn duplicate_to_other_file_leaves_source_alone() {
    let docs = MemoryStore::new().with_document("notes.md", "- [x] repeat me\n");
    let task = flat_task("- [x] repeat me", "notes.md", 0);

    let result = run_action(
        &docs,
        &task,
        &ActionConfig::Duplicate {
            target_file: Some("copies.md".to_string()),
            target_section: None,
            preserve_metadata: false,
        },
    );

    assert!(result.success, "{:?}", result.error);
    assert_eq!(docs.read("notes.md").expect("read"), "- [x] repeat me\n");
    assert_eq!(
        docs.read("copies.md").expect("read"),
        format!("- [ ] repeat me (duplicated {})\n", today())
    );
}

#[test]
fn target_creation_failure_aborts_without_writes() {
    let docs = FailingStore::new()
        .with_document("notes.md", "- [x] repeat me\n")
        .fail_create("copies.md");
    let task = flat_task("- [x] repeat me", "notes.md", 0);

    let result = run_action(
        &docs,
        &task,
        &ActionConfig::Duplicate {
            target_file: Some("copies.md".to_string()),
            target_section: None,
            preserve_metadata: false,
        },
    );

    assert!(!result.success);
    assert_eq!(
        result.error.as_deref(),
        Some("Failed to create target file: copies.md")
    );
    assert!(docs.writes().is_empty());
    assert_eq!(docs.read("notes.md").expect("read"), "- [x] repeat me\n");
}
