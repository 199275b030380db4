//! ondone - Completion-Action Engine Library
//!
//! This library implements the completion-action engine for task notes:
//! when a task transitions to done, a small per-task configuration string
//! selects one of several follow-up behaviors (delete, keep, archive, move,
//! duplicate, cascade-complete related tasks) and the engine mutates the
//! task's storage representation to realize it.
//!
//! # Core Concepts
//!
//! - **Tasks**: checkbox lines in flat markdown documents or inside Canvas
//!   board text nodes
//! - **Action Configs**: parsed onCompletion instructions, short form or
//!   structured JSON
//! - **Executors**: one handler triple per action kind, registered in an
//!   immutable table
//! - **Locator/Mutator**: line-index addressing for flat text, content
//!   matching for board nodes
//! - **Dispatcher**: the facade; converts every failure into a structured
//!   result and reports background outcomes to an event sink
//!
//! # Module Organization
//!
//! - `action`: onCompletion parsing and the ActionConfig tagged union
//! - `actions`: the six action executors
//! - `board`: Canvas board documents and section management
//! - `cli`: command-line interface using clap
//! - `config`: configuration loading from `.ondone.toml`
//! - `dispatch`: executor table, dispatcher and execution results
//! - `error`: error types and result aliases
//! - `events`: structured event sinks for background failure reporting
//! - `locate`: task locator/mutator backends
//! - `metadata`: task-line metadata tokens and core-text stripping
//! - `store`: document and task store abstractions
//! - `task`: the task model

pub mod action;
pub mod actions;
pub mod board;
pub mod cli;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod events;
pub mod locate;
pub mod metadata;
pub mod output;
pub mod store;
pub mod task;

pub use error::{Error, Result};
