//! Locating and mutating a task's text span inside its source document.
//!
//! One contract, two backends selected by the task's [`SourceKind`]:
//!
//! - Flat-text documents trust the task's stored line index directly. O(1),
//!   but fragile to concurrent edits; completion events fire immediately
//!   after the triggering edit, so the window is accepted.
//! - Board documents never trust an index. A node's text is one multi-line
//!   blob that shifts arbitrarily between parses, so the backend matches by
//!   content: first the verbatim original line, then a fallback comparison
//!   of metadata-stripped core text (checkbox state may differ, core text
//!   must be identical). First match wins; two tasks sharing identical core
//!   text in one node cannot be told apart, a documented limitation.

use crate::board::BoardDocument;
use crate::error::{Error, Result};
use crate::metadata;
use crate::store::DocumentStore;
use crate::task::{SourceKind, Task};

/// A flat-text document as a list of newline-separated segments.
///
/// Parsing and rendering are exact inverses, so untouched lines come back
/// byte-identical, including blank lines and indentation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatDocument {
    segments: Vec<String>,
}

impl FlatDocument {
    pub fn parse(content: &str) -> Self {
        Self {
            segments: content.split('\n').map(str::to_string).collect(),
        }
    }

    pub fn render(&self) -> String {
        self.segments.join("\n")
    }

    pub fn line(&self, index: usize) -> Option<&str> {
        self.segments.get(index).map(String::as_str)
    }

    pub fn line_count(&self) -> usize {
        self.segments.len()
    }

    pub fn remove_line(&mut self, index: usize) -> String {
        self.segments.remove(index)
    }

    pub fn replace_line(&mut self, index: usize, new_line: &str) {
        self.segments[index] = new_line.to_string();
    }

    pub fn insert_line(&mut self, index: usize, line: &str) {
        self.segments.insert(index, line.to_string());
    }

    /// Append a line, keeping a trailing newline if the document had one.
    pub fn append_line(&mut self, line: &str) {
        match self.segments.last() {
            Some(last) if last.is_empty() => {
                let index = self.segments.len() - 1;
                self.segments.insert(index, line.to_string());
            }
            _ => self.segments.push(line.to_string()),
        }
    }
}

/// Mutation contract over a located task line.
pub trait TaskMutator {
    /// Read the task's current line without mutating anything.
    fn read_line(&self, store: &dyn DocumentStore, task: &Task) -> Result<String>;

    /// Remove the task's line and persist the document. Returns the removed
    /// line.
    fn remove_line(&self, store: &dyn DocumentStore, task: &Task) -> Result<String>;

    /// Replace the task's line with new text and persist the document.
    fn replace_line(&self, store: &dyn DocumentStore, task: &Task, new_line: &str) -> Result<()>;

    /// Insert a line immediately after the task's line and persist.
    fn insert_after(&self, store: &dyn DocumentStore, task: &Task, new_line: &str) -> Result<()>;
}

/// Select the backend for a task's source kind.
pub fn mutator_for(kind: SourceKind) -> &'static dyn TaskMutator {
    match kind {
        SourceKind::FlatText => &FlatTextMutator,
        SourceKind::Board => &BoardMutator,
    }
}

/// Line-index backend for flat-text documents.
pub struct FlatTextMutator;

impl FlatTextMutator {
    fn locate(&self, document: &FlatDocument, task: &Task) -> Result<usize> {
        let crate::task::TaskLocation::Line { line } = task.location else {
            return Err(Error::InvalidArgument(
                "flat-text mutator given a board task".to_string(),
            ));
        };
        if line >= document.line_count() {
            return Err(Error::TaskNotFoundInFile);
        }
        Ok(line)
    }
}

impl TaskMutator for FlatTextMutator {
    fn read_line(&self, store: &dyn DocumentStore, task: &Task) -> Result<String> {
        let document = FlatDocument::parse(&store.read(&task.file_path)?);
        let index = self.locate(&document, task)?;
        Ok(document.line(index).unwrap_or_default().to_string())
    }

    fn remove_line(&self, store: &dyn DocumentStore, task: &Task) -> Result<String> {
        let mut document = FlatDocument::parse(&store.read(&task.file_path)?);
        let index = self.locate(&document, task)?;
        let removed = document.remove_line(index);
        store.write(&task.file_path, &document.render())?;
        Ok(removed)
    }

    fn replace_line(&self, store: &dyn DocumentStore, task: &Task, new_line: &str) -> Result<()> {
        let mut document = FlatDocument::parse(&store.read(&task.file_path)?);
        let index = self.locate(&document, task)?;
        document.replace_line(index, new_line);
        store.write(&task.file_path, &document.render())
    }

    fn insert_after(&self, store: &dyn DocumentStore, task: &Task, new_line: &str) -> Result<()> {
        let mut document = FlatDocument::parse(&store.read(&task.file_path)?);
        let index = self.locate(&document, task)?;
        document.insert_line(index + 1, new_line);
        store.write(&task.file_path, &document.render())
    }
}

/// Content-matching backend for board documents.
pub struct BoardMutator;

struct BoardLine {
    board: BoardDocument,
    node_index: usize,
    text: FlatDocument,
    line_index: usize,
}

impl BoardMutator {
    fn locate(&self, store: &dyn DocumentStore, task: &Task) -> Result<BoardLine> {
        let crate::task::TaskLocation::BoardNode {
            node_id,
            original_line,
        } = &task.location
        else {
            return Err(Error::InvalidArgument(
                "board mutator given a flat-text task".to_string(),
            ));
        };

        let board = BoardDocument::parse(&store.read(&task.file_path)?, &task.file_path)?;
        let node_index = board
            .node_index(node_id)
            .ok_or_else(|| Error::NodeNotFound(node_id.clone()))?;
        let text = FlatDocument::parse(
            board.nodes[node_index].text.as_deref().unwrap_or_default(),
        );
        let line_index = locate_board_line(&text, original_line)?;
        Ok(BoardLine {
            board,
            node_index,
            text,
            line_index,
        })
    }

    fn persist(&self, store: &dyn DocumentStore, task: &Task, mut located: BoardLine) -> Result<()> {
        located.board.nodes[located.node_index].text = Some(located.text.render());
        store.write(&task.file_path, &located.board.render()?)
    }
}

impl TaskMutator for BoardMutator {
    fn read_line(&self, store: &dyn DocumentStore, task: &Task) -> Result<String> {
        let located = self.locate(store, task)?;
        Ok(located
            .text
            .line(located.line_index)
            .unwrap_or_default()
            .to_string())
    }

    fn remove_line(&self, store: &dyn DocumentStore, task: &Task) -> Result<String> {
        let mut located = self.locate(store, task)?;
        let removed = located.text.remove_line(located.line_index);
        self.persist(store, task, located)?;
        Ok(removed)
    }

    fn replace_line(&self, store: &dyn DocumentStore, task: &Task, new_line: &str) -> Result<()> {
        let mut located = self.locate(store, task)?;
        located.text.replace_line(located.line_index, new_line);
        self.persist(store, task, located)
    }

    fn insert_after(&self, store: &dyn DocumentStore, task: &Task, new_line: &str) -> Result<()> {
        let mut located = self.locate(store, task)?;
        located.text.insert_line(located.line_index + 1, new_line);
        self.persist(store, task, located)
    }
}

/// Content-matching ladder for a line inside a board node's text.
///
/// 1. Exact match against the stored original line.
/// 2. Core-text match: both sides stripped of recognized metadata tokens;
///    the candidate must still be a checkbox line, its status may differ.
fn locate_board_line(text: &FlatDocument, original_line: &str) -> Result<usize> {
    for index in 0..text.line_count() {
        if text.line(index) == Some(original_line) {
            return Ok(index);
        }
    }

    let expected = metadata::core_text_of_line(original_line);
    if expected.is_empty() {
        return Err(Error::TaskNotFoundInNode);
    }
    for index in 0..text.line_count() {
        let line = text.line(index).unwrap_or_default();
        if metadata::parse_checkbox_line(line).is_some()
            && metadata::core_text_of_line(line) == expected
        {
            return Ok(index);
        }
    }
    Err(Error::TaskNotFoundInNode)
}
