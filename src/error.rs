//! Error types for ondone
//!
//! Exit codes:
//! - 0: Success
//! - 2: User error (bad args, invalid onCompletion string, missing vault)
//! - 4: Operation failed (I/O error, task not found, partial failure)

use std::path::PathBuf;
use thiserror::Error;

/// Exit codes for the ondone CLI
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const USER_ERROR: i32 = 2;
    pub const OPERATION_FAILED: i32 = 4;
}

/// Main error type for ondone operations
#[derive(Error, Debug)]
pub enum Error {
    // User errors (exit code 2)
    #[error("Vault not found: {0}")]
    VaultNotFound(PathBuf),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid onCompletion value: {0}")]
    InvalidOnCompletion(String),

    #[error("Path escapes vault root: {0}")]
    PathOutsideVault(String),

    // Operation failures (exit code 4)
    #[error("Source file not found: {0}")]
    SourceFileNotFound(String),

    #[error("Task not found in file")]
    TaskNotFoundInFile,

    #[error("Task not found in Canvas text node")]
    TaskNotFoundInNode,

    #[error("Canvas node not found: {0}")]
    NodeNotFound(String),

    #[error("Task not found: {0}")]
    TaskNotFound(String),

    #[error("Failed to create target file: {0}")]
    TargetFileCreation(String),

    #[error("Not a Canvas document: {0}")]
    NotABoard(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Operation failed: {0}")]
    OperationFailed(String),
}

impl Error {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            // User errors
            Error::VaultNotFound(_)
            | Error::InvalidArgument(_)
            | Error::InvalidOnCompletion(_)
            | Error::PathOutsideVault(_) => exit_codes::USER_ERROR,

            // Operation failures
            Error::SourceFileNotFound(_)
            | Error::TaskNotFoundInFile
            | Error::TaskNotFoundInNode
            | Error::NodeNotFound(_)
            | Error::TaskNotFound(_)
            | Error::TargetFileCreation(_)
            | Error::NotABoard(_)
            | Error::Io(_)
            | Error::Json(_)
            | Error::TomlParse(_)
            | Error::OperationFailed(_) => exit_codes::OPERATION_FAILED,
        }
    }
}

/// Result type alias for ondone operations
pub type Result<T> = std::result::Result<T, Error>;
