//! Command-line interface for ondone
//!
//! This module defines the CLI structure using clap derive macros.
//! Each subcommand is defined in its own submodule.

use clap::{Parser, Subcommand};

use crate::error::Result;

mod parse;
mod run;

/// ondone - completion actions for task notes
///
/// Validates onCompletion instructions and applies them to tasks stored in
/// markdown or Canvas documents inside a vault directory.
#[derive(Parser, Debug)]
#[command(name = "ondone")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Parse and describe an onCompletion value without touching any file
    Parse {
        /// The onCompletion string (short form or JSON)
        value: String,
    },

    /// Complete the task at a location and apply its onCompletion action
    Run {
        /// Vault root directory
        #[arg(long, env = "ONDONE_VAULT")]
        vault: std::path::PathBuf,

        /// Document path relative to the vault root
        #[arg(long)]
        file: String,

        /// Zero-based line index; for Canvas files, the line within the
        /// node's text
        #[arg(long)]
        line: usize,

        /// Canvas node id (required for .canvas files)
        #[arg(long)]
        node: Option<String>,

        /// Override the task's stored onCompletion value
        #[arg(long)]
        action: Option<String>,

        /// Run as a background event: failures are logged, not surfaced
        #[arg(long)]
        background: bool,

        /// Event destination for background runs: "-" for stdout or a file
        /// path
        #[arg(long)]
        events: Option<String>,
    },
}

impl Cli {
    /// Execute the parsed command
    pub fn run(self) -> Result<()> {
        let options = crate::output::OutputOptions {
            json: self.json,
            quiet: self.quiet,
        };

        match self.command {
            Commands::Parse { value } => parse::run(options, &value),
            Commands::Run {
                vault,
                file,
                line,
                node,
                action,
                background,
                events,
            } => run::run(
                options,
                run::RunArgs {
                    vault,
                    file,
                    line,
                    node,
                    action,
                    background,
                    events,
                },
            ),
        }
    }
}
