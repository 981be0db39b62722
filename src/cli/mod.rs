//! Command-line interface for transform-benchmark.
//!
//! Resolves flags into a run plan and drives the transformer.

mod commands;
mod signal;

pub use commands::{parse_cli, run_with_cli, Cli, RunPlan, ValidationPolicy};
pub use signal::wait_for_interrupt;
