mod support;

use ondone::action::ActionConfig;
use ondone::dispatch::{Dispatcher, ExecutionContext, ExecutorTable};
use ondone::events::MemorySink;
use ondone::store::{DocumentStore, MemoryStore, MemoryTaskStore};

use support::{board_json, board_task, test_config};

fn delete_task(docs: &dyn DocumentStore, task: &ondone::task::Task) -> ondone::dispatch::ExecutionResult {
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
        &ActionConfig::Delete,
    )
}

#[test]
fn drifted_metadata_still_matches_by_core_text() {
    // The task was parsed with one set of metadata; the node has since been
    // edited to carry different tokens and a different checkbox state.
    let docs = MemoryStore::new().with_document(
        "board.canvas",
        &board_json(
            "n1",
            "## Tasks\n- [x] Write report \u{1F4C5} 2025-06-01 #work\n- [ ] other",
        ),
    );
    let task = board_task(
        "- [/] Write report \u{23EB} #urgent",
        "board.canvas",
        "n1",
    );

    let result = delete_task(&docs, &task);
    assert!(result.success, "{:?}", result.error);

    let content = docs.read("board.canvas").expect("read");
    assert!(!content.contains("Write report"), "{content}");
    assert!(content.contains("- [ ] other"), "{content}");
}

#[test]
fn different_core_text_never_matches() {
    let docs = MemoryStore::new().with_document(
        "board.canvas",
        &board_json("n1", "## Tasks\n- [ ] Write summary \u{23EB} #work"),
    );
    // Identical metadata, different core text.
    let task = board_task("- [ ] Write report \u{23EB} #work", "board.canvas", "n1");

    let result = delete_task(&docs, &task);
    assert!(!result.success);
    assert_eq!(
        result.error.as_deref(),
        Some("Task not found in Canvas text node")
    );
}

#[test]
fn first_match_wins_for_duplicate_core_text() {
    // Known limitation: two tasks sharing a core text cannot be told apart
    // once their metadata drifts; the first line wins.
    let docs = MemoryStore::new().with_document(
        "board.canvas",
        &board_json("n1", "- [ ] Same text #a\n- [ ] Same text #b"),
    );
    let task = board_task("- [ ] Same text #c", "board.canvas", "n1");

    let result = delete_task(&docs, &task);
    assert!(result.success, "{:?}", result.error);
    let content = docs.read("board.canvas").expect("read");
    assert!(!content.contains("#a"), "{content}");
    assert!(content.contains("#b"), "{content}");
}

#[test]
fn missing_node_id_is_a_hard_failure() {
    let docs = MemoryStore::new()
        .with_document("board.canvas", &board_json("n1", "- [ ] task"));
    let task = board_task("- [ ] task", "board.canvas", "ghost");

    let result = delete_task(&docs, &task);
    assert!(!result.success);
    assert_eq!(
        result.error.as_deref(),
        Some("Canvas node not found: ghost")
    );
}
