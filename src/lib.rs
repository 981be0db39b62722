//! benchmark-transformer: publish agent-scaffold benchmark results to the website.
//!
//! Discovers `<scaffold>/<model>` result directories, checks the shape of
//! their `combined_stats.json` and `summary_stats.json`, and copies them into
//! the flattened layout the website reads.

pub mod cli;
pub mod config;
pub mod discovery;
pub mod error;
pub mod transform;
pub mod validation;

pub use config::TransformerConfig;
pub use discovery::{find_all_combinations, Combination};
pub use error::TransformError;
pub use transform::{BenchmarkTransformer, RunStatus, TransformReport, ValidationReport};
pub use validation::{validate_json_file, StatsFileType};
