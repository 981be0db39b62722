//! CLI definitions and command runner for transform-benchmark.
//!
//! The flags map onto a [`RunPlan`]: an optional single combination plus a
//! [`ValidationPolicy`].

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use serde::Serialize;
use tracing::{error, info};

use crate::config::{TransformerConfig, DEFAULT_DEST_ROOT, DEFAULT_SOURCE_ROOT};
use crate::discovery::Combination;
use crate::error::TransformError;
use crate::transform::{BenchmarkTransformer, RunStatus, TransformReport, ValidationReport};

/// Copy and rename benchmark result files for the website.
#[derive(Parser, Debug)]
#[command(name = "transform-benchmark")]
#[command(about = "Copy & rename benchmark results into the website data folder")]
#[command(version)]
#[command(
    long_about = "transform-benchmark copies <scaffold>/<model>/combined_stats.json and summary_stats.json\ninto <dest>/<scaffold>_<model>.json and <dest>/summary/<scaffold>_<model>.json.\n\nBy default every combination is validated first and only valid ones are copied.\n\nExample usage:\n  transform-benchmark --scaffold agentless --model GPT-4o\n  transform-benchmark --validate-only"
)]
pub struct Cli {
    /// Scaffold of the single combination to transform (requires --model).
    #[arg(long)]
    pub scaffold: Option<String>,

    /// Model of the single combination to transform (requires --scaffold).
    #[arg(long)]
    pub model: Option<String>,

    /// Only validate and report; never copy.
    #[arg(long)]
    pub validate_only: bool,

    /// Transform every valid combination (the default behaviour, made explicit).
    #[arg(long)]
    pub auto: bool,

    /// Skip validation and copy files as they are.
    #[arg(long)]
    pub no_validate: bool,

    /// Verbose logging; also prints the full error chain on failure.
    #[arg(short, long)]
    pub verbose: bool,

    /// Source tree containing <scaffold>/<model>/ result directories.
    #[arg(long, env = "BENCHMARK_SOURCE_DIR", default_value = DEFAULT_SOURCE_ROOT)]
    pub source: PathBuf,

    /// Destination folder read by the website.
    #[arg(long, env = "BENCHMARK_DEST_DIR", default_value = DEFAULT_DEST_ROOT)]
    pub dest: PathBuf,

    /// Print the run report as JSON on stdout.
    #[arg(short = 'j', long)]
    pub json: bool,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short, long, default_value = "info")]
    pub log_level: String,
}

/// When validation runs, and whether anything is copied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationPolicy {
    /// Validate, then copy only what passed.
    Enforce,
    /// Copy without validating.
    Skip,
    /// Validate and report; never copy.
    ReportOnly,
}

/// What a single invocation will do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunPlan {
    /// `None` means every discovered combination.
    pub target: Option<Combination>,
    pub policy: ValidationPolicy,
}

impl Cli {
    /// Resolve the flags into a run plan, rejecting contradictory combinations.
    pub fn plan(&self) -> Result<RunPlan, TransformError> {
        let target = match (&self.scaffold, &self.model) {
            (Some(scaffold), Some(model)) => Some(Combination::new(scaffold, model)),
            (None, Some(_)) => {
                return Err(TransformError::InvalidInvocation(
                    "--model requires --scaffold".to_string(),
                ))
            }
            (Some(_), None) => {
                return Err(TransformError::InvalidInvocation(
                    "--scaffold requires --model".to_string(),
                ))
            }
            (None, None) => None,
        };

        if self.validate_only && self.no_validate {
            return Err(TransformError::InvalidInvocation(
                "--validate-only cannot be combined with --no-validate".to_string(),
            ));
        }
        if self.auto && target.is_some() {
            return Err(TransformError::InvalidInvocation(
                "--auto cannot be combined with --scaffold/--model".to_string(),
            ));
        }

        let policy = if self.validate_only {
            ValidationPolicy::ReportOnly
        } else if self.no_validate {
            ValidationPolicy::Skip
        } else {
            ValidationPolicy::Enforce
        };

        Ok(RunPlan { target, policy })
    }

    pub fn config(&self) -> TransformerConfig {
        TransformerConfig::new(&self.source, &self.dest)
    }

    /// Log filter used when `RUST_LOG` is unset.
    pub fn log_filter(&self) -> String {
        if self.verbose && self.log_level == "info" {
            "debug".to_string()
        } else {
            self.log_level.clone()
        }
    }
}

/// Parse command-line arguments.
pub fn parse_cli() -> Cli {
    Cli::parse()
}

/// Run the CLI with already parsed arguments.
///
/// The filesystem work runs on a blocking thread so the caller can race it
/// against an interrupt.
pub async fn run_with_cli(cli: Cli) -> anyhow::Result<()> {
    let plan = cli.plan()?;
    let transformer = BenchmarkTransformer::new(cli.config());
    let json = cli.json;

    tokio::task::spawn_blocking(move || execute(&transformer, &plan, json))
        .await
        .context("transform task did not complete")?
}

fn execute(transformer: &BenchmarkTransformer, plan: &RunPlan, json: bool) -> anyhow::Result<()> {
    info!(
        "Source: {} | Destination: {}",
        transformer.config().source_root().display(),
        transformer.config().dest_root().display()
    );

    match (plan.policy, &plan.target) {
        (ValidationPolicy::ReportOnly, Some(combination)) => {
            let mut report = ValidationReport::default();
            report.record(combination.key(), transformer.validate_combination(combination));
            print_validation(&report, json)?;
            if report.valid_count() == 0 {
                return Err(TransformError::NoValidCombinations { total: 1 }.into());
            }
        }
        (ValidationPolicy::ReportOnly, None) => {
            let report = transformer.validate_all();
            print_validation(&report, json)?;
            if report.total() == 0 {
                return Err(transformer.nothing_found().into());
            }
            if report.valid_count() == 0 {
                return Err(TransformError::NoValidCombinations {
                    total: report.total(),
                }
                .into());
            }
        }
        (policy, Some(combination)) => {
            let validate = policy == ValidationPolicy::Enforce;
            let mut report = TransformReport::new(transformer.config(), validate);
            let result = transformer.try_transform_combination(combination, validate);
            match &result {
                Ok(()) => info!("✔ {} -> {}", combination, combination.output_file_name()),
                Err(e) => error!("Failed to transform {}: {}", combination, e),
            }
            report.record(combination.key(), result.is_ok());
            print_transform(&report, json)?;
            result?;
        }
        (policy, None) => {
            let report = transformer.transform_all(policy == ValidationPolicy::Enforce)?;
            print_transform(&report, json)?;
            if report.succeeded.is_empty() {
                return Err(TransformError::AllTransformsFailed {
                    attempted: report.attempted(),
                }
                .into());
            }
        }
    }

    Ok(())
}

#[derive(Serialize)]
struct ValidateOutput<'a> {
    status: RunStatus,
    total: usize,
    valid: usize,
    results: &'a std::collections::BTreeMap<String, bool>,
}

#[derive(Serialize)]
struct TransformOutput<'a> {
    status: RunStatus,
    #[serde(flatten)]
    report: &'a TransformReport,
}

fn print_validation(report: &ValidationReport, json: bool) -> anyhow::Result<()> {
    if json {
        let output = ValidateOutput {
            status: report.status(),
            total: report.total(),
            valid: report.valid_count(),
            results: &report.results,
        };
        let json_output = serde_json::to_string_pretty(&output)
            .map_err(|e| anyhow::anyhow!("Failed to serialize JSON output: {}", e))?;
        println!("{}", json_output);
        return Ok(());
    }

    println!("\n=== Validation Results ===");
    for (key, valid) in &report.results {
        println!("  {} {}", if *valid { "✔" } else { "✘" }, key);
    }
    println!("Valid: {}/{}", report.valid_count(), report.total());
    Ok(())
}

fn print_transform(report: &TransformReport, json: bool) -> anyhow::Result<()> {
    if json {
        let output = TransformOutput {
            status: report.status(),
            report,
        };
        let json_output = serde_json::to_string_pretty(&output)
            .map_err(|e| anyhow::anyhow!("Failed to serialize JSON output: {}", e))?;
        println!("{}", json_output);
        return Ok(());
    }

    println!("\n=== Transform Results ===");
    println!("Copied:  {}/{}", report.succeeded.len(), report.attempted());
    for key in &report.failed {
        println!("  ✘ {}", key);
    }
    if let Some(backup) = &report.backup {
        println!("Backup:  {}", backup.display());
    }
    println!("Output:  {}", report.destination.display());
    Ok(())
}
