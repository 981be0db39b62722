//! Error types for benchmark transformation.
//!
//! Covers every failure class of a run:
//! - Discovery (missing source root, nothing to process)
//! - Loading and parsing result files
//! - Schema checks on combined/summary stats
//! - Copying into the website data folder
//! - Invalid command-line invocations

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while discovering, validating or copying benchmark results.
#[derive(Debug, Error)]
pub enum TransformError {
    #[error("Source directory not found: {}", .0.display())]
    MissingSourceRoot(PathBuf),

    #[error("Required file not found: {}", .0.display())]
    MissingFile(PathBuf),

    #[error("Invalid JSON in '{}': {source}", path.display())]
    InvalidJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Schema validation failed for '{}': {}", path.display(), errors.join("; "))]
    SchemaViolation { path: PathBuf, errors: Vec<String> },

    #[error("Failed to copy '{}' to '{}': {source}", from.display(), to.display())]
    CopyFailure {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{combination} failed validation: {}", errors.join("; "))]
    InvalidCombination {
        combination: String,
        errors: Vec<String>,
    },

    #[error("Backup directory '{}' would be inside destination '{}'", backup.display(), dest.display())]
    BackupInsideDestination { backup: PathBuf, dest: PathBuf },

    #[error("Invalid invocation: {0}")]
    InvalidInvocation(String),

    #[error("No scaffold/model combinations found in {}", .0.display())]
    NoCombinations(PathBuf),

    #[error("No valid combinations found ({total} checked)")]
    NoValidCombinations { total: usize },

    #[error("All {attempted} transformations failed")]
    AllTransformsFailed { attempted: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
