//! Copying benchmark results into the website data folder.
//!
//! This module provides the transformer service, the backup step that runs
//! before a bulk copy, and the reports returned to the CLI.

pub mod backup;
pub mod report;
pub mod transformer;

pub use backup::{backup_existing_data, copy_dir_recursive};
pub use report::{RunStatus, TransformReport, ValidationReport};
pub use transformer::BenchmarkTransformer;
