//! Schema validation for benchmark result files.
//!
//! Checks that `combined_stats.json` and `summary_stats.json` carry the
//! fields the website expects, with the right JSON types. The checks are
//! purely structural: no consistency between fields is verified.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, error};

use crate::error::TransformError;

/// Numeric fields of every instance record in `combined_stats.json`.
pub const INSTANCE_NUMERIC_FIELDS: [&str; 8] = [
    "input_tokens",
    "output_tokens",
    "cpu_time",
    "gpu_time",
    "duration",
    "llm_calls",
    "measured_gpu_time",
    "measured_duration",
];

/// Boolean field of every instance record in `combined_stats.json`.
pub const INSTANCE_BOOL_FIELD: &str = "resolved";

/// Numeric fields of `summary_stats.json`, raw totals followed by averages.
pub const SUMMARY_NUMERIC_FIELDS: [&str; 20] = [
    "total_projects",
    "resolved",
    "input_tokens",
    "output_tokens",
    "cpu_time",
    "gpu_time",
    "duration",
    "llm_calls",
    "measured_gpu_time",
    "measured_duration",
    "avg_resolved",
    "avg_input_tokens",
    "avg_output_tokens",
    "avg_cpu_time",
    "avg_gpu_time",
    "avg_duration",
    "avg_llm_calls",
    "avg_measured_gpu_time",
    "avg_measured_duration",
    "avg_call_duration",
];

/// Ratio field of `summary_stats.json`.
pub const SUMMARY_PRECISION_FIELD: &str = "precision";

/// Summary fields that must lie in `[0, 1]`.
pub const UNIT_INTERVAL_FIELDS: [&str; 2] = ["avg_resolved", SUMMARY_PRECISION_FIELD];

/// Which of the two result files is being checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatsFileType {
    /// Per-instance measurements.
    CombinedStats,
    /// Aggregated metrics.
    SummaryStats,
}

impl fmt::Display for StatsFileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CombinedStats => write!(f, "combined_stats"),
            Self::SummaryStats => write!(f, "summary_stats"),
        }
    }
}

/// Result of checking a document against one of the schemas.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaValidationResult {
    /// Whether the document passes all required checks.
    pub valid: bool,
    /// Violations that fail the file.
    pub errors: Vec<SchemaError>,
    /// Notes that do not block validation.
    pub warnings: Vec<String>,
}

impl SchemaValidationResult {
    /// Create a new valid result with no errors or warnings.
    pub fn valid() -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Add an error to the result.
    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(SchemaError {
            field: field.into(),
            message: message.into(),
        });
        self.valid = false;
    }

    /// Add a warning to the result.
    pub fn add_warning(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    /// Error messages formatted as `field: message`.
    pub fn error_messages(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }
}

/// A single schema violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaError {
    /// Field (or instance path) that failed validation.
    pub field: String,
    /// Description of the violation.
    pub message: String,
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validator for the combined/summary stats schemas.
pub struct SchemaValidator;

impl SchemaValidator {
    /// Dispatch to the schema matching `file_type`.
    pub fn validate(data: &Value, file_type: StatsFileType) -> SchemaValidationResult {
        match file_type {
            StatsFileType::CombinedStats => Self::validate_combined_stats(data),
            StatsFileType::SummaryStats => Self::validate_summary_stats(data),
        }
    }

    /// Validate a `combined_stats.json` document.
    ///
    /// The document must be a non-empty object whose values are instance
    /// objects carrying every numeric field plus a boolean `resolved`.
    pub fn validate_combined_stats(data: &Value) -> SchemaValidationResult {
        let mut result = SchemaValidationResult::valid();

        let Some(instances) = data.as_object() else {
            result.add_error("$", format!("expected an object, got {}", type_name(data)));
            return result;
        };

        if instances.is_empty() {
            result.add_error("$", "expected at least one instance");
            return result;
        }

        for (instance_id, record) in instances {
            let Some(record) = record.as_object() else {
                result.add_error(
                    instance_id.as_str(),
                    format!("instance record must be an object, got {}", type_name(record)),
                );
                continue;
            };

            let missing = missing_fields(
                record,
                INSTANCE_NUMERIC_FIELDS
                    .iter()
                    .copied()
                    .chain(std::iter::once(INSTANCE_BOOL_FIELD)),
            );
            if !missing.is_empty() {
                result.add_error(
                    instance_id.as_str(),
                    format!("missing required fields: {}", missing.join(", ")),
                );
            }

            for field in INSTANCE_NUMERIC_FIELDS {
                if let Some(value) = record.get(field) {
                    if !value.is_number() {
                        result.add_error(
                            format!("{}.{}", instance_id, field),
                            format!("must be a number, got {}", type_name(value)),
                        );
                    }
                }
            }

            if let Some(value) = record.get(INSTANCE_BOOL_FIELD) {
                if !value.is_boolean() {
                    result.add_error(
                        format!("{}.{}", instance_id, INSTANCE_BOOL_FIELD),
                        format!("must be a boolean, got {}", type_name(value)),
                    );
                }
            }
        }

        result
    }

    /// Validate a `summary_stats.json` document.
    ///
    /// Every numeric field and `precision` must be present and numeric;
    /// `avg_resolved` and `precision` must lie in `[0, 1]`. Unknown fields
    /// only produce warnings.
    pub fn validate_summary_stats(data: &Value) -> SchemaValidationResult {
        let mut result = SchemaValidationResult::valid();

        let Some(summary) = data.as_object() else {
            result.add_error("$", format!("expected an object, got {}", type_name(data)));
            return result;
        };

        let missing = missing_fields(summary, required_summary_fields());
        if !missing.is_empty() {
            result.add_error(
                "$",
                format!("missing required fields: {}", missing.join(", ")),
            );
        }

        for field in required_summary_fields() {
            let Some(value) = summary.get(field) else {
                continue;
            };
            if !value.is_number() {
                result.add_error(
                    field,
                    format!("must be a number, got {}", type_name(value)),
                );
                continue;
            }
            if UNIT_INTERVAL_FIELDS.contains(&field) {
                let in_range = value
                    .as_f64()
                    .is_some_and(|v| (0.0..=1.0).contains(&v));
                if !in_range {
                    result.add_error(field, format!("must be between 0 and 1, got {}", value));
                }
            }
        }

        for key in summary.keys() {
            if !required_summary_fields().any(|field| field == key.as_str()) {
                result.add_warning(format!("unexpected field '{}'", key));
            }
        }

        result
    }
}

fn required_summary_fields() -> impl Iterator<Item = &'static str> {
    SUMMARY_NUMERIC_FIELDS
        .iter()
        .copied()
        .chain(std::iter::once(SUMMARY_PRECISION_FIELD))
}

fn missing_fields<'a>(
    object: &Map<String, Value>,
    required: impl Iterator<Item = &'a str>,
) -> Vec<&'a str> {
    required
        .filter(|field| !object.contains_key(*field))
        .collect()
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Load `path` and check it against the schema for `file_type`.
///
/// Returns the (valid) result with any warnings, or the reason the file was
/// rejected.
pub fn check_json_file(
    path: &Path,
    file_type: StatsFileType,
) -> Result<SchemaValidationResult, TransformError> {
    if !path.is_file() {
        return Err(TransformError::MissingFile(path.to_path_buf()));
    }

    let bytes = fs::read(path)?;
    let data: Value = serde_json::from_slice(&bytes).map_err(|source| TransformError::InvalidJson {
        path: path.to_path_buf(),
        source,
    })?;

    let result = SchemaValidator::validate(&data, file_type);
    if !result.valid {
        return Err(TransformError::SchemaViolation {
            path: path.to_path_buf(),
            errors: result.error_messages(),
        });
    }

    Ok(result)
}

/// Check `path` against the schema for `file_type`, logging any failure.
pub fn validate_json_file(path: &Path, file_type: StatsFileType) -> bool {
    match check_json_file(path, file_type) {
        Ok(result) => {
            for warning in &result.warnings {
                debug!("{} ({}): {}", path.display(), file_type, warning);
            }
            true
        }
        Err(e) => {
            error!("{}", e);
            false
        }
    }
}
