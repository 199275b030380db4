//! Document and task store abstractions.
//!
//! The engine never touches the filesystem directly; executors go through
//! [`DocumentStore`] for document content and [`TaskStore`] for cross-task
//! lookups (the cascade-complete action). [`VaultStore`] is the filesystem
//! implementation rooted at a vault directory; [`MemoryStore`] and
//! [`MemoryTaskStore`] back the CLI and tests.

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};

use crate::error::{Error, Result};
use crate::task::Task;

/// Access to documents by vault-relative path.
///
/// Every path is a forward-slash relative path; implementations decide what
/// it resolves to. All operations are synchronous read-then-write steps; the
/// engine performs no locking.
pub trait DocumentStore {
    fn read(&self, path: &str) -> Result<String>;
    fn write(&self, path: &str, content: &str) -> Result<()>;
    fn exists(&self, path: &str) -> bool;
    fn create(&self, path: &str, initial_content: &str) -> Result<()>;
    fn create_folder(&self, path: &str) -> Result<()>;
}

/// Cross-task lookup used by the cascade-complete action.
pub trait TaskStore {
    fn get_task_by_id(&self, id: &str) -> Option<Task>;
    fn update_task(&self, task: &Task) -> Result<()>;
}

/// Filesystem-backed document store rooted at a vault directory.
#[derive(Debug, Clone)]
pub struct VaultStore {
    root: PathBuf,
}

impl VaultStore {
    pub fn new(root: PathBuf) -> Result<Self> {
        if !root.is_dir() {
            return Err(Error::VaultNotFound(root));
        }
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a vault-relative path, rejecting absolute paths and `..`
    /// traversal out of the root.
    fn resolve(&self, path: &str) -> Result<PathBuf> {
        let relative = Path::new(path);
        if relative.is_absolute() {
            return Err(Error::PathOutsideVault(path.to_string()));
        }
        for component in relative.components() {
            match component {
                Component::Normal(_) | Component::CurDir => {}
                _ => return Err(Error::PathOutsideVault(path.to_string())),
            }
        }
        Ok(self.root.join(relative))
    }
}

impl DocumentStore for VaultStore {
    fn read(&self, path: &str) -> Result<String> {
        let full = self.resolve(path)?;
        if !full.is_file() {
            return Err(Error::SourceFileNotFound(path.to_string()));
        }
        Ok(std::fs::read_to_string(full)?)
    }

    fn write(&self, path: &str, content: &str) -> Result<()> {
        let full = self.resolve(path)?;
        std::fs::write(full, content)?;
        Ok(())
    }

    fn exists(&self, path: &str) -> bool {
        self.resolve(path)
            .map(|full| full.is_file())
            .unwrap_or(false)
    }

    fn create(&self, path: &str, initial_content: &str) -> Result<()> {
        let full = self.resolve(path)?;
        if let Some(parent) = full.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(full, initial_content)?;
        Ok(())
    }

    fn create_folder(&self, path: &str) -> Result<()> {
        let full = self.resolve(path)?;
        std::fs::create_dir_all(full)?;
        Ok(())
    }
}

/// In-memory document store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    documents: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(self, path: &str, content: &str) -> Self {
        self.documents
            .borrow_mut()
            .insert(path.to_string(), content.to_string());
        self
    }
}

impl DocumentStore for MemoryStore {
    fn read(&self, path: &str) -> Result<String> {
        self.documents
            .borrow()
            .get(path)
            .cloned()
            .ok_or_else(|| Error::SourceFileNotFound(path.to_string()))
    }

    fn write(&self, path: &str, content: &str) -> Result<()> {
        self.documents
            .borrow_mut()
            .insert(path.to_string(), content.to_string());
        Ok(())
    }

    fn exists(&self, path: &str) -> bool {
        self.documents.borrow().contains_key(path)
    }

    fn create(&self, path: &str, initial_content: &str) -> Result<()> {
        self.write(path, initial_content)
    }

    fn create_folder(&self, _path: &str) -> Result<()> {
        Ok(())
    }
}

/// In-memory task store keyed by task id.
#[derive(Debug, Default)]
pub struct MemoryTaskStore {
    tasks: RefCell<HashMap<String, Task>>,
}

impl MemoryTaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, task: Task) {
        self.tasks.borrow_mut().insert(task.id.clone(), task);
    }
}

impl TaskStore for MemoryTaskStore {
    fn get_task_by_id(&self, id: &str) -> Option<Task> {
        self.tasks.borrow().get(id).cloned()
    }

    fn update_task(&self, task: &Task) -> Result<()> {
        let mut tasks = self.tasks.borrow_mut();
        match tasks.get_mut(&task.id) {
            Some(slot) => {
                *slot = task.clone();
                Ok(())
            }
            None => Err(Error::TaskNotFound(task.id.clone())),
        }
    }
}
