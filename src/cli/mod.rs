//! CLI support for callq
//!
//! Provides programmatic access to the `callq` commands for embedding in
//! other tools.

mod check;
mod docs;

pub use check::{CheckOptions, CheckResult, execute_check};
pub use docs::{get_docs_overview, operator_table};

use std::io;

use crate::schema::SchemaError;

/// Errors that can occur during CLI operations
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("Invalid schema: {0}")]
    Schema(#[from] SchemaError),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("No schema provided. Use --schema, --schema-file, or pipe JSON to stdin.")]
    NoSchema,

    /// The query was rejected; the diagnostics have already been reported.
    #[error("Query has {0} error(s)")]
    Diagnostics(usize),
}
