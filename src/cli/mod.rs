//! CLI support for rsql-filter
//!
//! Provides programmatic access to the `rsql` commands so other tools can
//! embed them without spawning a process.

mod check;
mod docs;

pub use check::{
    CompileOptions, CompileOutput, FilterOptions, execute_check, execute_compile, execute_filter,
};
pub use docs::{DocCategory, get_doc_category, get_docs_overview};

use std::io;

use thiserror::Error;

/// Errors that can occur during CLI operations
#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0}")]
    Compile(#[from] crate::Error),

    #[error("evaluation error: {0}")]
    Eval(#[from] crate::EvalError),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("no input provided. Use --input or pipe JSON to stdin.")]
    NoInput,

    #[error("expected a JSON array of records")]
    NotAnArray,

    #[error("unknown category: '{0}'\nRun 'rsql docs' to see available categories.")]
    UnknownCategory(String),
}
