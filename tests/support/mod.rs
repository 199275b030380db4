//! Shared fixtures for ondone integration tests.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashSet;

use ondone::config::Config;
use ondone::error::{Error, Result};
use ondone::store::{DocumentStore, MemoryStore};
use ondone::task::{task_from_line, task_from_node_line, Task};

/// Build a flat-text task from a line plus its document location.
pub fn flat_task(line: &str, file: &str, index: usize) -> Task {
    task_from_line(line, file, index).expect("task line")
}

/// Build a board task from a line inside a Canvas node.
pub fn board_task(line: &str, file: &str, node_id: &str) -> Task {
    task_from_node_line(line, file, node_id).expect("task line")
}

/// Minimal Canvas document JSON with a single text node.
pub fn board_json(node_id: &str, text: &str) -> String {
    serde_json::json!({
        "nodes": [{
            "id": node_id,
            "type": "text",
            "text": text,
            "x": 0, "y": 0, "width": 250, "height": 280
        }],
        "edges": []
    })
    .to_string()
}

/// Default engine configuration for tests.
pub fn test_config() -> Config {
    Config::default()
}

/// Document store that fails selected operations, for exercising ordering
/// and partial-failure semantics.
#[derive(Default)]
pub struct FailingStore {
    inner: MemoryStore,
    fail_create: HashSet<String>,
    fail_write: HashSet<String>,
    writes: RefCell<Vec<String>>,
}

impl FailingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(mut self, path: &str, content: &str) -> Self {
        self.inner = self.inner.with_document(path, content);
        self
    }

    pub fn fail_create(mut self, path: &str) -> Self {
        self.fail_create.insert(path.to_string());
        self
    }

    pub fn fail_write(mut self, path: &str) -> Self {
        self.fail_write.insert(path.to_string());
        self
    }

    /// Paths written so far, in order.
    pub fn writes(&self) -> Vec<String> {
        self.writes.borrow().clone()
    }
}

impl DocumentStore for FailingStore {
    fn read(&self, path: &str) -> Result<String> {
        self.inner.read(path)
    }

    fn write(&self, path: &str, content: &str) -> Result<()> {
        if self.fail_write.contains(path) {
            return Err(Error::OperationFailed(format!(
                "simulated write failure: {}",
                path
            )));
        }
        self.writes.borrow_mut().push(path.to_string());
        self.inner.write(path, content)
    }

    fn exists(&self, path: &str) -> bool {
        self.inner.exists(path)
    }

    fn create(&self, path: &str, initial_content: &str) -> Result<()> {
        if self.fail_create.contains(path) {
            return Err(Error::OperationFailed(format!(
                "simulated create failure: {}",
                path
            )));
        }
        self.writes.borrow_mut().push(path.to_string());
        self.inner.create(path, initial_content)
    }

    fn create_folder(&self, path: &str) -> Result<()> {
        self.inner.create_folder(path)
    }
}
